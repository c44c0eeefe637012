//! Rexster Core Library
//!
//! Data model shared by the Rexster client:
//! - Element identifiers and property mappings
//! - `_type` tagged element payload decoding
//! - Graph and index descriptors
//! - Client configuration

pub mod config;
pub mod error;
pub mod models;
pub mod payload;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::MisuseError;
pub use models::*;
pub use payload::{EdgeData, ElementPayload, VertexData};
