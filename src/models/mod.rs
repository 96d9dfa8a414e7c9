// src/models/mod.rs

pub mod attempt;
pub mod host;
pub mod quiz;
pub mod user;
