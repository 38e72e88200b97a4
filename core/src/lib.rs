/*!
# routing-core

A K-best alternative-route planner for fixed-route public transit
networks: a static graph over `Line`/`Route`/`Step` entities, a spatial
index for stop selection, and a penalty-augmented lexicographic
Dijkstra that returns up to K distance/switch-count-ordered itineraries
per query instead of a single shortest path.

```ignore
use routing_core::prelude::*;

let entities = loaders::load_dir("files/network")?;
let projector = Projector::new()?;
let graph = graph::build_graph(&entities.lines, &entities.routes, &entities.points, &entities.steps, &projector)?;
let index = SpatialIndex::build(&entities.points, &projector)?;

let response = query::k_best(
    &graph,
    &index,
    &projector,
    (-58.3816, -34.6037),
    (-58.3731, -34.6083),
    SearchOptions::default(),
    Budget::none(),
);
```

`SearchOptions` is `serde::Deserialize`, so a deployment can load it
straight out of a `routing.toml` via `SearchOptions::from_toml_file`
rather than hand-constructing it; see `query::SearchOptions`.
*/

pub mod algo;
pub mod error;
pub mod graph;
pub mod itinerary;
pub mod loaders;
pub mod model;
pub mod prelude;
pub mod projector;
pub mod query;
pub mod spatial_index;

pub use error::Error;
