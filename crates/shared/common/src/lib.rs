//! Common utilities shared across all services.
//!
//! This crate provides:
//! - Unified error handling and the store degradation helpers
//! - Configuration structures for both stores

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, ResultExt};
