//! The transit network's data model: `Line`, `Point`, `Route`, `Step`.
//!
//! These are plain records handed in by whatever out-of-band loader
//! populated them (a relational store in production, `loaders::csv` in
//! this repo's tests and CLI demo). Entities are immutable once built;
//! the graph and spatial index never mutate them.

use serde::{Deserialize, Serialize};

/// Opaque id newtypes, used as keys throughout instead of raw integers
/// scattered through call sites.
macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl $name {
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }
    };
}

id_type!(LineId);
id_type!(PointId);
id_type!(RouteId);
id_type!(StepId);

/// An identified public-transport line. Immutable for the process's
/// lifetime; a pure grouping label for its `Route`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub short_name: String,
    pub color: Option<String>,
}

/// A geographic location in WGS84 degrees (`lon`/`lat`). The planar
/// projection into the configured metric CRS is computed once at
/// graph/index build time and cached alongside, never recomputed per
/// query — this struct carries no projection behavior of its own;
/// projection lives in [`crate::projector`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub lon: f64,
    pub lat: f64,
}

/// An ordered chain of `Step`s belonging to one `Line` in one direction.
/// `first` names the head of the per-route singly linked `Step` list;
/// `distance`/`time` are precomputed aggregates carried for display, not
/// used by the search core, which always recomputes true distance from
/// raw edge weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub line_id: LineId,
    pub is_return: bool,
    pub first: StepId,
    pub distance: f64,
    pub time: f64,
}

/// A single stop visit within a `Route`. `next` is the route-successor
/// step, or `None` at the route's last stop. Invariant enforced by
/// `graph::build_graph`: for every step `s` with `s.next = Some(n)`,
/// `steps[n].route == s.route`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub route_id: RouteId,
    pub point_id: PointId,
    pub next: Option<StepId>,
}
