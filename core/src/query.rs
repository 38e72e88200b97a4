//! Query coordinator: the crate's single public entry point. Accepts an
//! origin/destination in geographic coordinates, expands each into a
//! candidate stop set via the spatial index, invokes the search core,
//! and post-processes results into segmented itineraries with walking
//! legs prepended and appended.

use std::path::Path;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::algo::{k_best_paths, Budget};
use crate::error::Error;
use crate::graph::{Graph, DEFAULT_SWITCH_COST_M};
use crate::itinerary::{group_into_segments, Itinerary, StepRow, WALKING_LINE_COLOR, WALKING_LINE_NAME, WALKING_ROUTE_ID};
use crate::model::PointId;
use crate::projector::Projector;
use crate::spatial_index::SpatialIndex;

/// Tunable knobs for `k_best`. Deserializable so a `routing.toml` file
/// can override the defaults on top of `Self::default()` — see
/// [`SearchOptions::from_toml_file`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub walk_radius_m: f64,
    pub switch_cost_m: f64,
    pub max_alternatives_k: usize,
    pub max_pops: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            walk_radius_m: 400.0,
            switch_cost_m: DEFAULT_SWITCH_COST_M,
            max_alternatives_k: 3,
            max_pops: None,
        }
    }
}

impl SearchOptions {
    /// Reads a `routing.toml`-shaped config file and overlays it onto
    /// `Self::default()` via `#[serde(default)]`, so the file only needs
    /// to name the fields it overrides. `Ok(Self::default())` if `path`
    /// does not exist; `Err` only on a malformed file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Outcome of `k_best`: up to `max_alternatives_k` itineraries, plus
/// whether the search was cut short by a cancellation budget — an
/// out-of-band signal, not an error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KBestResponse {
    pub itineraries: Vec<Itinerary>,
    pub partial: bool,
}

/// Runs one K-best query from `origin` to `destination` (both WGS84
/// `(lon, lat)` degrees).
///
/// Expands each endpoint into a candidate stop set via
/// `index.within(.., walk_radius_m)`, falling back to
/// `[index.nearest(..)]` when empty; computes walking costs from each
/// endpoint to each candidate stop; invokes the search core; and
/// post-processes the result into segmented itineraries with walking
/// legs prepended/appended.
pub fn k_best(
    graph: &Graph,
    index: &SpatialIndex,
    projector: &Projector,
    origin: (f64, f64),
    destination: (f64, f64),
    opts: SearchOptions,
    budget: Budget,
) -> KBestResponse {
    let Ok(origin_xy) = projector.project(origin.0, origin.1) else {
        return KBestResponse::default();
    };
    let Ok(destination_xy) = projector.project(destination.0, destination.1) else {
        return KBestResponse::default();
    };

    let origin_stops = candidate_stops(index, origin_xy, opts.walk_radius_m);
    let destination_stops = candidate_stops(index, destination_xy, opts.walk_radius_m);

    if origin_stops.is_empty() || destination_stops.is_empty() {
        return KBestResponse::default();
    }

    let start_costs = walking_costs(graph, &origin_stops, origin_xy);
    let end_costs = walking_costs(graph, &destination_stops, destination_xy);

    let start_steps: Vec<_> = origin_stops
        .iter()
        .flat_map(|&p| graph.steps_at(p).iter().copied())
        .collect();
    let end_point_set: HashSet<PointId> = destination_stops.into_iter().collect();

    if start_steps.is_empty() {
        return KBestResponse::default();
    }

    let result = k_best_paths(
        graph,
        &start_steps,
        start_costs.clone(),
        &end_point_set,
        end_costs.clone(),
        opts.switch_cost_m,
        opts.max_alternatives_k,
        budget,
    );

    let itineraries = result
        .paths
        .iter()
        .filter_map(|accepted| {
            build_itinerary(
                graph,
                &accepted.steps,
                accepted.true_distance_m,
                origin,
                destination,
            )
        })
        .collect();

    KBestResponse {
        itineraries,
        partial: result.cancelled,
    }
}

/// `index.within(p, walk_radius_m)`, falling back to `[index.nearest(p)]`
/// when no stop lies within the radius.
fn candidate_stops(index: &SpatialIndex, xy: (f64, f64), radius_m: f64) -> Vec<PointId> {
    let within = index.within(xy, radius_m);
    if within.is_empty() {
        index.nearest(xy).into_iter().collect()
    } else {
        within
    }
}

fn walking_costs(
    graph: &Graph,
    stops: &[PointId],
    from_xy: (f64, f64),
) -> HashMap<PointId, f64> {
    stops
        .iter()
        .filter_map(|&point| {
            let (_, stop_xy) = graph.point(point)?;
            Some((point, crate::graph::euclidean(from_xy, stop_xy)))
        })
        .collect()
}

/// Prepends/appends synthetic walking legs to an accepted step sequence
/// and groups the result into route-contiguous segments.
fn build_itinerary(
    graph: &Graph,
    steps: &[crate::model::StepId],
    true_distance_m: f64,
    origin: (f64, f64),
    destination: (f64, f64),
) -> Option<Itinerary> {
    let first_point_id = graph.point_of(*steps.first()?)?;
    let last_point_id = graph.point_of(*steps.last()?)?;
    let (first_point, _) = graph.point(first_point_id)?;
    let (last_point, _) = graph.point(last_point_id)?;

    let mut rows = Vec::with_capacity(steps.len() + 2);

    rows.push(StepRow {
        route_id: WALKING_ROUTE_ID,
        line_name: WALKING_LINE_NAME.to_string(),
        line_color: Some(WALKING_LINE_COLOR.to_string()),
        point: origin_as_point(origin),
    });
    rows.push(StepRow {
        route_id: WALKING_ROUTE_ID,
        line_name: WALKING_LINE_NAME.to_string(),
        line_color: Some(WALKING_LINE_COLOR.to_string()),
        point: first_point,
    });

    for &step in steps {
        let point_id = graph.point_of(step)?;
        let (point, _) = graph.point(point_id)?;
        let route_id = graph.route(step)?;
        let (line_name, line_color) = graph
            .route_view(route_id)
            .and_then(|route| graph.line_view(route.line_id))
            .map(|l| (l.short_name.clone(), l.color.clone()))
            .unwrap_or_else(|| (format!("route-{}", route_id.get()), None));
        rows.push(StepRow {
            route_id,
            line_name,
            line_color,
            point,
        });
    }

    rows.push(StepRow {
        route_id: WALKING_ROUTE_ID,
        line_name: WALKING_LINE_NAME.to_string(),
        line_color: Some(WALKING_LINE_COLOR.to_string()),
        point: last_point,
    });
    rows.push(StepRow {
        route_id: WALKING_ROUTE_ID,
        line_name: WALKING_LINE_NAME.to_string(),
        line_color: Some(WALKING_LINE_COLOR.to_string()),
        point: destination_as_point(destination),
    });

    Some(Itinerary {
        total_distance_m: true_distance_m,
        segments: group_into_segments(rows),
    })
}

fn origin_as_point(origin: (f64, f64)) -> crate::model::Point {
    crate::model::Point {
        id: PointId(0),
        lon: origin.0,
        lat: origin.1,
    }
}

fn destination_as_point(destination: (f64, f64)) -> crate::model::Point {
    crate::model::Point {
        id: PointId(0),
        lon: destination.0,
        lat: destination.1,
    }
}
