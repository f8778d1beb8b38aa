// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod persistence;

pub use crate::config::Config;
pub use crate::core::engine::DictionaryEngine;
pub use crate::core::types::{Cell, KeyFilterState, LoadSummary, SortMode};
pub use crate::core::validation::is_acceptable_word;
pub use crate::error::{DictError, Result};
