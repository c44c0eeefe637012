//! Rexster Client Library
//!
//! HTTP client for graphs served over the Rexster ReST API: graph lookup,
//! vertex and edge CRUD, Gremlin script execution and index management.

mod client;
mod element;
mod graph;
mod index;
mod transport;

#[cfg(test)]
mod testing;

pub use client::{Client, Params};
pub use element::{Edge, Element, ElementCore, GraphElement, Vertex};
pub use graph::Graph;
pub use index::IndexHandle;
pub use rexster_core::{
    ClientConfig, Direction, ElementId, ElementPayload, IndexClass, IndexType, MisuseError,
    Properties,
};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Request { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Misuse(#[from] MisuseError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
