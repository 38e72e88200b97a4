//! Common re-exports — the set a consumer reaches for on nearly every
//! call site.

pub use crate::algo::Budget;
pub use crate::error::Error;
pub use crate::graph::{build_graph, Graph};
pub use crate::itinerary::Itinerary;
pub use crate::loaders;
pub use crate::model::{Line, LineId, Point, PointId, Route, RouteId, Step, StepId};
pub use crate::projector::Projector;
pub use crate::query::{k_best, KBestResponse, SearchOptions};
pub use crate::spatial_index::SpatialIndex;
