use crate::graph::{result_list, Graph};
use crate::Result;
use async_trait::async_trait;
use reqwest::Method;
use rexster_core::payload::{EdgeData, VertexData, LABEL};
use rexster_core::{Direction, ElementId, MisuseError, Properties};
use serde_json::Value;

/// State shared by vertices and edges
#[doc(hidden)]
#[derive(Debug)]
pub struct ElementCore {
    graph: Graph,
    id: ElementId,
    properties: Properties,
    deleted: bool,
}

impl ElementCore {
    fn new(graph: Graph, id: ElementId, properties: Properties) -> Self {
        Self {
            graph,
            id,
            properties,
            deleted: false,
        }
    }
}

/// Element is the behavior vertices and edges share.
///
/// Property accessors only touch the local mapping; [`Element::save`] is
/// the one place local changes reach the server. After [`Element::delete`]
/// every mutating or remote operation fails with a misuse error; the
/// read-only accessors (`id`, `properties`, `property`, `has_property`)
/// keep returning the last local snapshot.
#[async_trait]
pub trait Element: Send + Sync {
    /// Collection segment of the element's path, `vertices` or `edges`
    const COLLECTION: &'static str;

    #[doc(hidden)]
    fn core(&self) -> &ElementCore;

    #[doc(hidden)]
    fn core_mut(&mut self) -> &mut ElementCore;

    fn id(&self) -> &ElementId {
        &self.core().id
    }

    fn graph(&self) -> &Graph {
        &self.core().graph
    }

    fn properties(&self) -> &Properties {
        &self.core().properties
    }

    fn property(&self, key: &str) -> Option<&Value> {
        self.core().properties.get(key)
    }

    fn has_property(&self, key: &str) -> bool {
        self.core().properties.contains_key(key)
    }

    /// Set a property locally; fails for system keys such as `_id`.
    fn set_property<V: Into<Value>>(&mut self, key: &str, value: V) -> Result<Option<Value>> {
        self.ensure_live()?;
        Ok(self.core_mut().properties.insert(key, value)?)
    }

    fn remove_property(&mut self, key: &str) -> Result<Option<Value>> {
        self.ensure_live()?;
        Ok(self.core_mut().properties.remove(key))
    }

    fn is_deleted(&self) -> bool {
        self.core().deleted
    }

    /// Server-relative path of this element inside its graph
    fn path(&self) -> String {
        format!(
            "/{}/{}",
            Self::COLLECTION,
            urlencoding::encode(&self.core().id.to_string())
        )
    }

    fn ensure_live(&self) -> Result<()> {
        let core = self.core();
        if core.deleted {
            return Err(MisuseError::Deleted {
                collection: Self::COLLECTION,
                id: core.id.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Send the whole property mapping to the server
    async fn save(&mut self) -> Result<()> {
        self.ensure_live()?;
        let path = self.path();
        let params = self.core().properties.as_map().clone();
        self.graph()
            .call(Method::POST, &path, Some(&params), false)
            .await?;
        Ok(())
    }

    /// Remove the element from the graph. The local value is unusable afterwards.
    async fn delete(&mut self) -> Result<()> {
        self.ensure_live()?;
        let path = self.path();
        self.graph().call(Method::DELETE, &path, None, false).await?;
        self.core_mut().deleted = true;
        tracing::debug!(graph = %self.graph().name(), path = %path, "Deleted element");
        Ok(())
    }
}

/// A vertex
#[derive(Debug)]
pub struct Vertex {
    core: ElementCore,
}

impl Vertex {
    pub(crate) fn from_data(graph: Graph, data: VertexData) -> Self {
        Self {
            core: ElementCore::new(graph, data.id, data.properties),
        }
    }

    /// Create an edge from this vertex to `other`
    pub async fn create_edge(
        &self,
        other: &Vertex,
        label: &str,
        properties: Properties,
    ) -> Result<Edge> {
        self.ensure_live()?;
        other.ensure_live()?;
        self.graph()
            .create_edge(self.id(), other.id(), label, properties)
            .await
    }

    /// Edges incident to this vertex, optionally only those with `label`
    pub async fn edges(&self, direction: Direction, label: Option<&str>) -> Result<Vec<Edge>> {
        self.ensure_live()?;

        let params = label.map(|label| {
            let mut params = crate::Params::new();
            params.insert(LABEL.to_string(), Value::String(label.to_string()));
            params
        });
        let path = format!("{}/{}", self.path(), direction.edges_segment());

        let data = self
            .graph()
            .call(Method::GET, &path, params.as_ref(), false)
            .await?;

        result_list(data)
            .iter()
            .map(|raw| -> Result<Edge> {
                Ok(Edge::from_data(self.graph().clone(), EdgeData::decode(raw)?))
            })
            .collect()
    }
}

impl Element for Vertex {
    const COLLECTION: &'static str = "vertices";

    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }
}

/// An edge. Its endpoints and label are fixed once created.
#[derive(Debug)]
pub struct Edge {
    core: ElementCore,
    out_id: ElementId,
    in_id: ElementId,
    label: String,
}

impl Edge {
    pub(crate) fn from_data(graph: Graph, data: EdgeData) -> Self {
        Self {
            core: ElementCore::new(graph, data.id, data.properties),
            out_id: data.out_id,
            in_id: data.in_id,
            label: data.label,
        }
    }

    /// Identifier of the vertex the edge leaves
    pub fn out_id(&self) -> &ElementId {
        &self.out_id
    }

    /// Identifier of the vertex the edge enters
    pub fn in_id(&self) -> &ElementId {
        &self.in_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub async fn out_vertex(&self) -> Result<Vertex> {
        self.ensure_live()?;
        self.graph().get_vertex(&self.out_id).await
    }

    pub async fn in_vertex(&self) -> Result<Vertex> {
        self.ensure_live()?;
        self.graph().get_vertex(&self.in_id).await
    }
}

impl Element for Edge {
    const COLLECTION: &'static str = "edges";

    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }
}

/// A script or index result: either kind of element
#[derive(Debug)]
pub enum GraphElement {
    Vertex(Vertex),
    Edge(Edge),
}

impl GraphElement {
    pub fn id(&self) -> &ElementId {
        match self {
            GraphElement::Vertex(v) => v.id(),
            GraphElement::Edge(e) => e.id(),
        }
    }

    pub fn properties(&self) -> &Properties {
        match self {
            GraphElement::Vertex(v) => v.properties(),
            GraphElement::Edge(e) => e.properties(),
        }
    }

    pub fn as_vertex(&self) -> Option<&Vertex> {
        match self {
            GraphElement::Vertex(v) => Some(v),
            GraphElement::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            GraphElement::Edge(e) => Some(e),
            GraphElement::Vertex(_) => None,
        }
    }

    pub fn into_vertex(self) -> Option<Vertex> {
        match self {
            GraphElement::Vertex(v) => Some(v),
            GraphElement::Edge(_) => None,
        }
    }

    pub fn into_edge(self) -> Option<Edge> {
        match self {
            GraphElement::Edge(e) => Some(e),
            GraphElement::Vertex(_) => None,
        }
    }
}
