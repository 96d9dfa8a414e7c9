// src/lib.rs

pub mod client;
pub mod config;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod scoring;
pub mod state;
pub mod store;
pub mod utils;

pub use routes::create_router;
