//! In-memory transport for exercising request building and response mapping.

use crate::client::Client;
use crate::graph::Graph;
use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::{ClientError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use rexster_core::GraphInfo;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

enum Canned {
    Response(HttpResponse),
    TransportFailure,
}

#[derive(Default)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<Canned>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, status: u16, body: Value) {
        self.respond_raw(status, &body.to_string());
    }

    pub(crate) fn respond_raw(&self, status: u16, body: &str) {
        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("");
        self.responses.lock().unwrap().push_back(Canned::Response(HttpResponse {
            status,
            status_line: format!("HTTP/1.1 {} {}", status, reason),
            body: body.to_string(),
        }));
    }

    /// Next send fails before any status is received
    pub(crate) fn fail_transport(&self) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Canned::TransportFailure);
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        let canned = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no canned response left");
        match canned {
            Canned::Response(response) => Ok(response),
            Canned::TransportFailure => Err(transport_error()),
        }
    }
}

/// A real reqwest error, raised without touching the network
fn transport_error() -> ClientError {
    reqwest::Client::new()
        .get("not a url")
        .build()
        .expect_err("malformed URL must not build")
        .into()
}

pub(crate) fn client(mock: &Arc<MockTransport>) -> Client {
    Client::with_transport("http://rexster.test", mock.clone())
}

/// A handle on `tinkergraph` that never touched the network
pub(crate) fn graph(mock: &Arc<MockTransport>) -> Graph {
    Graph::new(
        client(mock),
        GraphInfo {
            name: "tinkergraph".to_string(),
            kind: "tinkergraph".to_string(),
            extensions: Value::Null,
        },
    )
}

pub(crate) fn query_value<'a>(request: &'a HttpRequest, key: &str) -> Option<&'a str> {
    request
        .query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
