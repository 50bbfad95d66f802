//! Common utilities shared across crates.
//!
//! This crate provides:
//! - Unified error handling for repository operations
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
