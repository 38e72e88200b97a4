//! Error taxonomy, split by audience per the service's error-handling design:
//! configuration/initialization failures are fatal and meant to abort
//! service startup; everything else the search core can produce is a
//! normal `Result` the caller folds into an empty itinerary list.

use thiserror::Error;

use crate::model::{PointId, RouteId, StepId};

/// Errors raised while constructing or querying the routing core.
///
/// - `Config`, the dangling-reference variants, and `EmptyGraph` are
///   fatal at startup.
/// - `Projection` surfaces a misconfigured or unsupported CRS pair.
/// - Anything client-facing (bad coordinates) is the HTTP boundary's
///   job, not this crate's.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("step {step:?} references missing point {point:?}")]
    DanglingPoint { step: StepId, point: PointId },

    #[error("step {step:?} references missing route {route:?}")]
    DanglingRoute { step: StepId, route: RouteId },

    #[error("route {0:?} has no steps")]
    EmptyRoute(RouteId),

    #[error("graph has no points to index")]
    EmptyGraph,

    #[error("geodetic projection failed: {0}")]
    Projection(#[from] proj::ProjCreateError),

    #[error("geodetic transform failed: {0}")]
    Transform(#[from] proj::ProjError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("malformed input row: {0}")]
    InvalidRow(String),
}
