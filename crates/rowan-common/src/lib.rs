//! RowanDB common types, errors, and utilities.
//!
//! This crate provides shared definitions used across all RowanDB components.

pub mod config;
pub mod error;
pub mod text;
pub mod types;

pub use config::{EngineConfig, HeapConfig, IndexConfig, MIN_FILL_FACTOR, MIN_NODE_CAPACITY};
pub use error::{Result, RowanError};
pub use text::normalize;
pub use types::Rid;
