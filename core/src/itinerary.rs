//! Itinerary serializer: groups a flat step list into route-contiguous
//! segments, with synthetic walking legs prepended and appended by the
//! query coordinator.
//!
//! Distance-only: no schedule-derived payload, since this system has no
//! time-of-day scheduling.

use geojson::{Feature, FeatureCollection, Geometry, Value};
use itertools::Itertools;
use serde::Serialize;
use serde_json::Map;

use crate::model::{Point, RouteId};

/// Sentinel route id used for the synthetic walking legs the query
/// coordinator prepends/appends. Never produced by `build_graph` for a
/// real `Route`, so the grouping pass below can tell walking segments
/// from ride segments without a separate enum discriminant living on
/// every `Route`.
pub const WALKING_ROUTE_ID: RouteId = RouteId(u32::MAX);
pub const WALKING_LINE_NAME: &str = "Walk";
pub const WALKING_LINE_COLOR: &str = "#888888";

/// A contiguous run of one route (or the walking sentinel) through a
/// sequence of points.
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub route_id: RouteId,
    pub line_name: String,
    pub line_color: Option<String>,
    pub path: Vec<Point>,
}

impl Segment {
    #[must_use]
    pub fn is_walking(&self) -> bool {
        self.route_id == WALKING_ROUTE_ID
    }
}

/// A full itinerary: total metric distance plus walk/ride/.../walk
/// segments.
#[derive(Debug, Clone, Serialize)]
pub struct Itinerary {
    pub total_distance_m: f64,
    pub segments: Vec<Segment>,
}

impl Itinerary {
    #[must_use]
    pub fn to_geojson(&self) -> geojson::GeoJson {
        let mut features = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let coords: Vec<Vec<f64>> = segment.path.iter().map(|p| vec![p.lon, p.lat]).collect();
            let mut properties = Map::new();
            properties.insert(
                "kind".to_string(),
                if segment.is_walking() { "walk" } else { "ride" }.into(),
            );
            properties.insert("line_name".to_string(), segment.line_name.clone().into());

            features.push(Feature {
                geometry: Some(Geometry::new(Value::LineString(coords))),
                properties: Some(properties),
                id: None,
                bbox: None,
                foreign_members: None,
            });
        }
        geojson::GeoJson::FeatureCollection(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }
}

/// One (route, line-name, line-color, point) row, the raw material the
/// grouping pass below consumes. The query coordinator builds this list
/// by walking an accepted step sequence plus its prepended/appended
/// walking legs.
pub struct StepRow {
    pub route_id: RouteId,
    pub line_name: String,
    pub line_color: Option<String>,
    pub point: Point,
}

/// Groups a flat, ordered row list into route-contiguous segments. A
/// route change (including into/out of the walking sentinel) starts a
/// new segment; consecutive rows sharing a route accumulate into the
/// same segment's path.
#[must_use]
pub fn group_into_segments(rows: Vec<StepRow>) -> Vec<Segment> {
    rows.into_iter()
        .chunk_by(|row| row.route_id)
        .into_iter()
        .map(|(route_id, group)| {
            let mut line_name = String::new();
            let mut line_color = None;
            let mut path = Vec::new();
            for row in group {
                line_name = row.line_name;
                line_color = row.line_color;
                path.push(row.point);
            }
            Segment {
                route_id,
                line_name,
                line_color,
                path,
            }
        })
        .collect()
}
