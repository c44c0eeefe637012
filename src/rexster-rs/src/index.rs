use crate::client::Params;
use crate::element::{Edge, Element, GraphElement, Vertex};
use crate::graph::{result_list, Graph};
use crate::{ClientError, Result};
use reqwest::Method;
use rexster_core::{ElementId, IndexClass, IndexInfo, IndexType};
use serde_json::Value;

/// IndexHandle is one named index of a graph.
///
/// Its class and type are whatever the server reported and never change.
#[derive(Debug, Clone)]
pub struct IndexHandle {
    graph: Graph,
    name: String,
    class: IndexClass,
    kind: IndexType,
}

impl IndexHandle {
    pub(crate) fn new(graph: Graph, info: IndexInfo) -> Self {
        Self {
            graph,
            name: info.name,
            class: info.class,
            kind: info.kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> IndexClass {
        self.class
    }

    pub fn kind(&self) -> IndexType {
        self.kind
    }

    fn path(&self, suffix: &str) -> String {
        format!("/indices/{}{}", urlencoding::encode(&self.name), suffix)
    }

    /// Index `vertex` under `key` = `value`
    pub async fn add_vertex(
        &self,
        vertex: &Vertex,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        vertex.ensure_live()?;
        self.add(vertex.id(), IndexClass::Vertex, key, value.into()).await
    }

    /// Index `edge` under `key` = `value`
    pub async fn add_edge(&self, edge: &Edge, key: &str, value: impl Into<Value>) -> Result<()> {
        edge.ensure_live()?;
        self.add(edge.id(), IndexClass::Edge, key, value.into()).await
    }

    async fn add(&self, id: &ElementId, class: IndexClass, key: &str, value: Value) -> Result<()> {
        let mut params = Params::new();
        params.insert("id".to_string(), id.to_value());
        params.insert("class".to_string(), Value::from(class.as_str()));
        params.insert("key".to_string(), Value::from(key));
        params.insert("value".to_string(), value);

        self.graph
            .call(Method::POST, &self.path(""), Some(&params), false)
            .await?;
        tracing::debug!(index = %self.name, id = %id, key, "Added index entry");
        Ok(())
    }

    /// Elements indexed under `key` = `value`
    pub async fn get(&self, key: &str, value: impl Into<Value>) -> Result<Vec<GraphElement>> {
        let params = lookup_params(key, value.into());
        let data = self
            .graph
            .call(Method::GET, &self.path(""), Some(&params), false)
            .await?;
        self.graph.elements_from(result_list(data))
    }

    /// Number of elements indexed under `key` = `value`
    pub async fn count(&self, key: &str, value: impl Into<Value>) -> Result<u64> {
        let params = lookup_params(key, value.into());
        let data = self
            .graph
            .call(Method::GET, &self.path("/count"), Some(&params), false)
            .await?;

        data.get("totalSize")
            .and_then(Value::as_u64)
            .ok_or_else(|| ClientError::InvalidResponse("index count has no totalSize".to_string()))
    }

    /// Keys the index holds entries for
    pub async fn keys(&self) -> Result<Vec<String>> {
        let data = self
            .graph
            .call(Method::GET, &self.path("/keys"), None, false)
            .await?;
        Ok(serde_json::from_value(Value::Array(result_list(data)))?)
    }
}

fn lookup_params(key: &str, value: Value) -> Params {
    let mut params = Params::new();
    params.insert("key".to_string(), Value::from(key));
    params.insert("value".to_string(), value);
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{graph, query_value, MockTransport};
    use rexster_core::payload::{EdgeData, VertexData};
    use serde_json::json;

    fn people(graph: &Graph) -> IndexHandle {
        IndexHandle::new(
            graph.clone(),
            IndexInfo {
                name: "people".to_string(),
                class: IndexClass::Vertex,
                kind: IndexType::Manual,
            },
        )
    }

    #[tokio::test]
    async fn test_add_vertex_then_count() {
        let mock = MockTransport::new();
        let graph = graph(&mock);
        let index = people(&graph);
        let fred = Vertex::from_data(
            graph.clone(),
            VertexData::decode(&json!({"_id": 1, "name": "Fred"})).unwrap(),
        );

        mock.respond(200, json!({"queryTime": 1.2}));
        index.add_vertex(&fred, "name", "Fred").await.unwrap();

        let request = mock.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "http://rexster.test/tinkergraph/indices/people");
        assert_eq!(query_value(&request, "id"), Some("1"));
        assert_eq!(query_value(&request, "class"), Some("vertex"));
        assert_eq!(query_value(&request, "key"), Some("name"));
        assert_eq!(query_value(&request, "value"), Some("Fred"));

        mock.respond(200, json!({"totalSize": 1}));
        let count = index.count("name", "Fred").await.unwrap();

        let request = mock.last_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "http://rexster.test/tinkergraph/indices/people/count");
        assert_eq!(query_value(&request, "key"), Some("name"));
        assert_eq!(query_value(&request, "value"), Some("Fred"));
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_add_edge_sends_edge_class() {
        let mock = MockTransport::new();
        let graph = graph(&mock);
        let index = people(&graph);
        let edge = Edge::from_data(
            graph.clone(),
            EdgeData::decode(&json!({"_id": "e9", "_outV": 1, "_inV": 2, "_label": "knows"}))
                .unwrap(),
        );

        mock.respond(200, json!({}));
        index.add_edge(&edge, "since", 1960).await.unwrap();

        let request = mock.last_request();
        assert_eq!(query_value(&request, "id"), Some("e9"));
        assert_eq!(query_value(&request, "class"), Some("edge"));
        assert_eq!(query_value(&request, "value"), Some("1960"));
    }

    #[tokio::test]
    async fn test_add_deleted_vertex_is_rejected() {
        let mock = MockTransport::new();
        let graph = graph(&mock);
        let index = people(&graph);
        let mut fred = Vertex::from_data(
            graph.clone(),
            VertexData::decode(&json!({"_id": 1})).unwrap(),
        );

        mock.respond(200, json!({}));
        fred.delete().await.unwrap();

        let error = index.add_vertex(&fred, "name", "Fred").await.unwrap_err();
        assert!(matches!(error, ClientError::Misuse(_)));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_get_dispatches_edges_as_edges() {
        let mock = MockTransport::new();
        let index = people(&graph(&mock));

        mock.respond(200, json!({"results": [
            {"_id": 1, "_type": "vertex", "name": "Fred"},
            {"_id": 5, "_type": "edge", "_outV": 1, "_inV": 2, "_label": "knows", "name": "Fred"},
            {"_type": "graph"}
        ]}));
        let results = index.get("name", "Fred").await.unwrap();

        assert_eq!(
            mock.last_request().url,
            "http://rexster.test/tinkergraph/indices/people"
        );
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], GraphElement::Vertex(_)));
        assert!(matches!(results[1], GraphElement::Edge(_)));
        assert_eq!(results[1].properties().get("name"), Some(&json!("Fred")));
    }

    #[tokio::test]
    async fn test_count_without_total_is_invalid() {
        let mock = MockTransport::new();
        let index = people(&graph(&mock));

        mock.respond(200, json!({"results": []}));
        let error = index.count("name", "Fred").await.unwrap_err();
        assert!(matches!(error, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_keys() {
        let mock = MockTransport::new();
        let index = people(&graph(&mock));

        mock.respond(200, json!({"results": ["name", "age"]}));
        let keys = index.keys().await.unwrap();

        assert_eq!(
            mock.last_request().url,
            "http://rexster.test/tinkergraph/indices/people/keys"
        );
        assert_eq!(keys, vec!["name", "age"]);
    }
}
