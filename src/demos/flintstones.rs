//! Flintstones Example
//!
//! Loads two families into an empty graph, links them up, indexes the
//! members by name and queries the result with a Gremlin script.
//!
//! Run with: cargo run --example flintstones
//! Optionally pass a JSON config file: cargo run --example flintstones -- rexster.json

use rexster_rs::{
    Client, ClientConfig, Direction, Element, Graph, GraphElement, Properties, Vertex,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

async fn named_vertex(graph: &Graph, name: &str) -> anyhow::Result<Vertex> {
    let properties = Properties::try_from(json!({ "name": name }))?;
    Ok(graph.create_vertex(None, properties).await?)
}

async fn family(
    graph: &Graph,
    family_name: &str,
    husband: &str,
    wife: &str,
    child: &str,
) -> anyhow::Result<Vec<Vertex>> {
    let household = named_vertex(graph, family_name).await?;
    let husband = named_vertex(graph, husband).await?;
    let wife = named_vertex(graph, wife).await?;
    let child = named_vertex(graph, child).await?;

    household.create_edge(&husband, "has_member", Properties::new()).await?;
    household.create_edge(&wife, "has_member", Properties::new()).await?;
    husband.create_edge(&wife, "married_to", Properties::new()).await?;
    child.create_edge(&wife, "child_of", Properties::new()).await?;
    child.create_edge(&husband, "child_of", Properties::new()).await?;

    Ok(vec![household, husband, wife, child])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rexster_rs=debug")),
        )
        .with_target(false)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ClientConfig::load(&path)?,
        None => ClientConfig::default(),
    };
    let graph_name = config.graph.clone().unwrap_or_else(|| "emptygraph".to_string());

    let client = Client::from_config(&config)?;
    println!("Rexster Flintstones Example\n");
    println!("Graphs on {}: {:?}\n", client.base_url(), client.get_graphs().await?);

    let graph = client.get_graph(&graph_name).await?;
    println!("✅ Opened graph '{}' ({})\n", graph.name(), graph.kind());

    let flintstones = family(
        &graph,
        "Flintstones",
        "Fred Flintstone",
        "Wilma Flintstone",
        "Pebbles Flintstone",
    )
    .await?;
    let rubbles = family(
        &graph,
        "Rubbles",
        "Barney Rubble",
        "Betty Rubble",
        "Bamm-Bamm Rubble",
    )
    .await?;
    flintstones[0]
        .create_edge(&rubbles[0], "friends_with", Properties::new())
        .await?;
    println!("📝 Created {} vertices\n", flintstones.len() + rubbles.len());

    let index = graph.create_vertex_index("members").await?;
    for member in flintstones.iter().chain(rubbles.iter()) {
        if let Some(name) = member.property("name").and_then(|v| v.as_str()) {
            index.add_vertex(member, "name", name).await?;
        }
    }
    println!(
        "🔍 Index '{}' has {} entry for Fred",
        index.name(),
        index.count("name", "Fred Flintstone").await?
    );

    let fred = &flintstones[1];
    for edge in fred.edges(Direction::Out, Some("married_to")).await? {
        let spouse = edge.in_vertex().await?;
        println!("   Fred is married to {:?}", spouse.property("name"));
    }

    let script = format!("g.v({}).in('child_of')", fred.id());
    println!("\n🔍 Gremlin: {}", script);
    for result in graph.gremlin(&script).await? {
        match result {
            GraphElement::Vertex(child) => println!("   child: {:?}", child.property("name")),
            GraphElement::Edge(edge) => println!("   edge: {}", edge.label()),
        }
    }

    Ok(())
}
