//! Shared types for the restaurant POS
//!
//! Wire models, the unified error system and small utilities used by
//! `pos-server` and its HTTP clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
