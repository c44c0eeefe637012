use crate::graph::Graph;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::{ClientError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use rexster_core::{ClientConfig, GraphInfo};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Request parameters, sent as a query string or as a JSON body
pub type Params = Map<String, Value>;

/// Rexster ReST API Client
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Client {
    base_url: Arc<str>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a new client connected to the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, Arc::new(ReqwestTransport::new()))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::with_transport(config.base_url.clone(), Arc::new(transport)))
    }

    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').into(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Names of all graphs configured on the server
    pub async fn get_graphs(&self) -> Result<Vec<String>> {
        let mut data = self.call(Method::GET, "/", None, false).await?;
        match data.get_mut("graphs").map(Value::take) {
            Some(graphs) => Ok(serde_json::from_value(graphs)?),
            None => Ok(Vec::new()),
        }
    }

    /// Open the graph called `name`
    pub async fn get_graph(&self, name: &str) -> Result<Graph> {
        let path = format!("/{}", urlencoding::encode(name));
        let data = self.call(Method::GET, &path, None, false).await?;
        let info: GraphInfo = serde_json::from_value(data)?;
        Ok(Graph::new(self.clone(), info))
    }

    /// Make a request of the server and decode the JSON it answers with.
    ///
    /// `params` go into the query string, except for a POST with `as_json`
    /// set, where they become the JSON request body.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
        as_json: bool,
    ) -> Result<Value> {
        let request = self.build_request(method.clone(), path, params, as_json)?;

        tracing::debug!(method = %method, path, "Dispatching request");
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let error = classify_failure(&method, path, &response);
            tracing::warn!(
                method = %method,
                path,
                status = response.status,
                "Request failed: {}",
                error
            );
            return Err(error);
        }

        tracing::debug!(method = %method, path, status = response.status, "Request succeeded");
        decode_body(&response.body)
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
        as_json: bool,
    ) -> Result<HttpRequest> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut query = Vec::new();
        let mut body = None;

        if let Some(params) = params.filter(|p| !p.is_empty()) {
            if method == Method::POST && as_json {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                body = Some(serde_json::to_string(params)?);
            } else {
                query = query_pairs(params);
            }
        }

        Ok(HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            query,
            headers,
            body,
        })
    }
}

/// Turn a failed response into a request error.
///
/// A server-supplied `message` wins; otherwise the text names the request
/// and the status line.
pub(crate) fn classify_failure(method: &Method, path: &str, response: &HttpResponse) -> ClientError {
    let message = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| match body.get("message") {
            Some(Value::String(message)) => Some(message.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_else(|| format!("{} {} : {}", method, path, response.status_line));

    ClientError::Request {
        status: response.status,
        message,
    }
}

fn decode_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

fn query_pairs(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}
