use crate::client::{Client, Params};
use crate::element::{Edge, GraphElement, Vertex};
use crate::index::IndexHandle;
use crate::{ClientError, Result};
use reqwest::Method;
use rexster_core::payload::{EdgeData, ElementPayload, VertexData, IN_V, LABEL, OUT_V};
use rexster_core::{ElementId, GraphInfo, IndexClass, IndexInfo, IndexType, Properties};
use serde_json::Value;

/// Graph is a handle on one graph hosted by the server.
///
/// All paths it requests are scoped under `/{name}`.
#[derive(Debug, Clone)]
pub struct Graph {
    client: Client,
    name: String,
    kind: String,
    extensions: Value,
}

impl Graph {
    pub(crate) fn new(client: Client, info: GraphInfo) -> Self {
        Self {
            client,
            name: info.name,
            kind: info.kind,
            extensions: info.extensions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage engine reported by the server
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Extension descriptors as reported by the server
    pub fn extensions(&self) -> &Value {
        &self.extensions
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Same as [`Client::call`] with `path` relative to this graph
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
        as_json: bool,
    ) -> Result<Value> {
        let path = format!("/{}{}", urlencoding::encode(&self.name), path);
        self.client.call(method, &path, params, as_json).await
    }

    /// Create a vertex. Without an `id` the server picks one.
    pub async fn create_vertex(
        &self,
        id: Option<&ElementId>,
        properties: Properties,
    ) -> Result<Vertex> {
        let path = match id {
            Some(id) => format!("/vertices/{}", urlencoding::encode(&id.to_string())),
            None => "/vertices".to_string(),
        };
        let params = properties.into_map();

        let data = self.call(Method::POST, &path, Some(&params), false).await?;
        let vertex = VertexData::decode(&single_result(data, "vertex creation")?)?;
        tracing::debug!(graph = %self.name, id = %vertex.id, "Created vertex");
        Ok(Vertex::from_data(self.clone(), vertex))
    }

    pub async fn get_vertex(&self, id: &ElementId) -> Result<Vertex> {
        let path = format!("/vertices/{}", urlencoding::encode(&id.to_string()));
        let data = self.call(Method::GET, &path, None, false).await?;
        let vertex = VertexData::decode(&single_result(data, "vertex lookup")?)?;
        Ok(Vertex::from_data(self.clone(), vertex))
    }

    /// Create an edge from `out_id` to `in_id`
    pub async fn create_edge(
        &self,
        out_id: &ElementId,
        in_id: &ElementId,
        label: &str,
        properties: Properties,
    ) -> Result<Edge> {
        // Endpoint fields go in last so they always win
        let mut params = properties.into_map();
        params.insert(OUT_V.to_string(), out_id.to_value());
        params.insert(IN_V.to_string(), in_id.to_value());
        params.insert(LABEL.to_string(), Value::String(label.to_string()));

        let data = self.call(Method::POST, "/edges", Some(&params), false).await?;
        let edge = EdgeData::decode(&single_result(data, "edge creation")?)?;
        tracing::debug!(graph = %self.name, id = %edge.id, label, "Created edge");
        Ok(Edge::from_data(self.clone(), edge))
    }

    pub async fn get_edge(&self, id: &ElementId) -> Result<Edge> {
        let path = format!("/edges/{}", urlencoding::encode(&id.to_string()));
        let data = self.call(Method::GET, &path, None, false).await?;
        let edge = EdgeData::decode(&single_result(data, "edge lookup")?)?;
        Ok(Edge::from_data(self.clone(), edge))
    }

    /// Run a Gremlin script on the server.
    ///
    /// Only vertex and edge results are returned; anything else the script
    /// yields is skipped. A response without `results` gives an empty list.
    pub async fn gremlin(&self, script: &str) -> Result<Vec<GraphElement>> {
        let mut params = Params::new();
        params.insert("script".to_string(), Value::String(script.to_string()));

        let data = self.call(Method::POST, "/tp/gremlin", Some(&params), true).await?;
        self.elements_from(result_list(data))
    }

    /// Create an index. `keys` only matters for automatic indices.
    pub async fn create_index(
        &self,
        name: &str,
        class: IndexClass,
        kind: IndexType,
        keys: &[&str],
    ) -> Result<IndexHandle> {
        let mut params = Params::new();
        params.insert("class".to_string(), Value::from(class.as_str()));
        params.insert("type".to_string(), Value::from(kind.as_str()));
        if !keys.is_empty() {
            // The server expects its own list literal, not a JSON array
            params.insert("keys".to_string(), Value::String(format!("[{}]", keys.join(","))));
        }

        let path = format!("/indices/{}", urlencoding::encode(name));
        let data = self.call(Method::POST, &path, Some(&params), false).await?;
        let info: IndexInfo = serde_json::from_value(single_result(data, "index creation")?)?;
        tracing::debug!(graph = %self.name, index = %info.name, "Created index");
        Ok(IndexHandle::new(self.clone(), info))
    }

    /// Create a manual vertex index
    pub async fn create_vertex_index(&self, name: &str) -> Result<IndexHandle> {
        self.create_index(name, IndexClass::Vertex, IndexType::Manual, &[]).await
    }

    pub async fn get_index(&self, name: &str) -> Result<IndexHandle> {
        let path = format!("/indices/{}", urlencoding::encode(name));
        let mut data = self.call(Method::GET, &path, None, false).await?;

        // Descriptor may come bare or wrapped in `results`
        let descriptor = match data.get_mut("results").map(Value::take) {
            Some(results) if results.is_object() => results,
            _ => data,
        };
        let info: IndexInfo = serde_json::from_value(descriptor)?;
        Ok(IndexHandle::new(self.clone(), info))
    }

    pub async fn get_indexes(&self) -> Result<Vec<IndexHandle>> {
        let data = self.call(Method::GET, "/indices", None, false).await?;
        result_list(data)
            .into_iter()
            .map(|raw| -> Result<IndexHandle> {
                let info: IndexInfo = serde_json::from_value(raw)?;
                Ok(IndexHandle::new(self.clone(), info))
            })
            .collect()
    }

    /// Build elements from tagged results, skipping unrecognized ones
    pub(crate) fn elements_from(&self, results: Vec<Value>) -> Result<Vec<GraphElement>> {
        let mut elements = Vec::with_capacity(results.len());
        for raw in &results {
            match ElementPayload::decode(raw)? {
                ElementPayload::Vertex(data) => {
                    elements.push(GraphElement::Vertex(Vertex::from_data(self.clone(), data)))
                }
                ElementPayload::Edge(data) => {
                    elements.push(GraphElement::Edge(Edge::from_data(self.clone(), data)))
                }
                ElementPayload::Unrecognized(tag) => {
                    tracing::debug!(graph = %self.name, tag = ?tag, "Skipping non-element result");
                }
            }
        }
        Ok(elements)
    }
}

/// The `results` payload of a single-element response
pub(crate) fn single_result(mut data: Value, operation: &str) -> Result<Value> {
    match data.get_mut("results").map(Value::take) {
        Some(Value::Null) | None => Err(ClientError::InvalidResponse(format!(
            "{} response has no results",
            operation
        ))),
        Some(results) => Ok(results),
    }
}

/// The `results` payload of a list response; missing means empty
pub(crate) fn result_list(mut data: Value) -> Vec<Value> {
    match data.get_mut("results").map(Value::take) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(single) => vec![single],
    }
}
