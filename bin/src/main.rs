use std::path::PathBuf;
use std::time::Instant;

use routing_core::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let network_dir: PathBuf = "files/network".into();

    let entities = loaders::load_dir(&network_dir)?;
    let projector = Projector::new()?;

    let instant = Instant::now();
    let graph = build_graph(
        &entities.lines,
        &entities.routes,
        &entities.points,
        &entities.steps,
        &projector,
    )?;
    tracing::info!(elapsed = ?instant.elapsed(), nodes = graph.node_count(), "graph built");

    let index = SpatialIndex::build(&entities.points, &projector)?;

    let origin = (30.320234, 59.875912);
    let destination = (30.309416, 60.066852);

    let options = SearchOptions::from_toml_file("routing.toml")?;
    tracing::debug!(?options, "search options resolved");

    let instant = Instant::now();
    let response = k_best(
        &graph,
        &index,
        &projector,
        origin,
        destination,
        options,
        Budget::none(),
    );
    tracing::info!(elapsed = ?instant.elapsed(), found = response.itineraries.len(), "search complete");

    println!("{}", serde_json::to_string_pretty(&response.itineraries)?);

    Ok(())
}
