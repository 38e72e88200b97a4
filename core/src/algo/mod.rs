//! Path search core: single-round lexicographic Dijkstra plus the
//! penalty-driven outer loop that turns it into K distinct alternatives.

mod dijkstra;
mod k_best;
mod scored;

pub use dijkstra::{search_once, SearchOutcome};
pub use k_best::{k_best_paths, Budget, KBestResult};
pub use scored::{Cost, ScoredNode};

/// Additive cost applied to a penalized intra-route edge during a later
/// round, to push the search away from edges already used by an accepted
/// path. Must dwarf any realistic true path cost in the service area;
/// documented here as a named constant rather than buried inline.
pub const EDGE_PENALTY: f64 = 100_000.0;

/// Additive cost applied to an already-used entry/exit walking cost in a
/// later round, biasing subsequent searches toward different
/// boarding/alighting stops.
pub const POINT_REUSE_PENALTY: f64 = 100_000.0;
