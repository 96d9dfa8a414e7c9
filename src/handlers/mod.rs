// src/handlers/mod.rs

pub mod host;
pub mod quiz;
pub mod user;
