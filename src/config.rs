// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,

    /// Credential for the generative-AI service. Supplied via the
    /// GEMINI_API_KEY environment variable, never hard-coded.
    pub gemini_api_key: String,

    /// Model identifier passed to the generation endpoint.
    pub gemini_model: String,

    /// Upper bound on a single generation call, in seconds.
    pub generation_timeout_secs: u64,

    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let gemini_api_key = env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");

        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());

        let generation_timeout_secs = env::var("GENERATION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            gemini_api_key,
            gemini_model,
            generation_timeout_secs,
            rust_log,
        }
    }
}
