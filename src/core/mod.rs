// src/core/mod.rs
pub mod alphabet;
pub mod engine;
pub mod filter;
pub mod store;
pub mod types;
pub mod validation;
