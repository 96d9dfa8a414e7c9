// src/state.rs

use axum::extract::FromRef;
use std::sync::Arc;

use crate::{config::Config, generation::QuestionGenerator, store::Store};

/// Everything a handler can reach: the store, the configuration, and the
/// question generator behind its trait object so tests can swap in a
/// deterministic fake.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub generator: Arc<dyn QuestionGenerator>,
}

impl FromRef<AppState> for Store {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn QuestionGenerator> {
    fn from_ref(state: &AppState) -> Self {
        state.generator.clone()
    }
}
