//! Outer K-best loop: repeatedly invokes `search_once` with accumulated
//! edge and endpoint-reuse penalties to yield up to K distinct
//! alternatives.
//!
//! This is a variant of Yen-style alternative routing using additive
//! penalties rather than explicit path/edge exclusion — heuristic, not
//! optimal K-shortest-paths, but cheap and effective so long as the
//! penalty dwarfs realistic metric distances (see `EDGE_PENALTY`,
//! `POINT_REUSE_PENALTY`).

use std::time::Instant;

use hashbrown::{HashMap, HashSet};

use super::dijkstra::search_once;
use super::{EDGE_PENALTY, POINT_REUSE_PENALTY};
use crate::graph::Graph;
use crate::model::{PointId, StepId};

/// Soft cancellation budget shared across every round of one `k_best`
/// call: a deadline, a max-pops ceiling, or both. Either bound, once
/// crossed, stops the outer loop and returns whatever K-best paths have
/// already been accepted — never an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Budget {
    pub deadline: Option<Instant>,
    pub max_pops: Option<usize>,
}

impl Budget {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            max_pops: None,
        }
    }

    #[must_use]
    pub fn with_max_pops(max_pops: usize) -> Self {
        Self {
            deadline: None,
            max_pops: Some(max_pops),
        }
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// One accepted alternative: the raw step sequence plus its true,
/// penalty-free total distance.
#[derive(Debug, Clone)]
pub struct AcceptedPath {
    pub steps: Vec<StepId>,
    pub true_distance_m: f64,
}

/// Result of the outer loop: up to `k` accepted, pairwise-distinct paths,
/// plus whether the loop stopped early due to the cancellation budget.
#[derive(Debug, Clone, Default)]
pub struct KBestResult {
    pub paths: Vec<AcceptedPath>,
    pub cancelled: bool,
}

/// Runs the outer K-best loop. `start_costs`/`end_costs` are mutable
/// copies the loop escalates in place with `POINT_REUSE_PENALTY` after
/// each accepted path — callers should pass fresh maps per `k_best` call.
#[allow(clippy::too_many_arguments)]
pub fn k_best_paths(
    graph: &Graph,
    start_steps: &[StepId],
    mut start_costs: HashMap<PointId, f64>,
    end_point_set: &HashSet<PointId>,
    mut end_costs: HashMap<PointId, f64>,
    switch_cost_m: f64,
    k: usize,
    budget: Budget,
) -> KBestResult {
    let mut accepted: Vec<AcceptedPath> = Vec::with_capacity(k);
    let mut seen_sequences: HashSet<Vec<StepId>> = HashSet::new();
    let mut penalized_edges: HashSet<(StepId, StepId)> = HashSet::new();
    let mut cancelled = false;

    if k == 0 {
        return KBestResult::default();
    }

    let max_rounds = 2 * k;
    for round in 0..max_rounds {
        if accepted.len() >= k {
            break;
        }
        if budget.deadline_passed() {
            tracing::debug!(round, accepted = accepted.len(), "k-best deadline passed");
            cancelled = true;
            break;
        }

        let Some(outcome) = search_once(
            graph,
            start_steps,
            &start_costs,
            end_point_set,
            &end_costs,
            switch_cost_m,
            EDGE_PENALTY,
            &penalized_edges,
            budget.max_pops,
            budget.deadline,
        ) else {
            break;
        };

        if outcome.cancelled {
            cancelled = true;
            tracing::debug!(round, "k-best round cut short by pop budget or deadline");
        }

        if seen_sequences.contains(&outcome.path) {
            // Duplicate under exact tuple equality: don't record it, but
            // still apply penalties so the next round is pushed away
            // from it.
            tracing::debug!(round, "k-best round produced a duplicate path, penalizing and retrying");
        } else {
            let true_distance = recompute_true_distance(
                graph,
                &outcome.path,
                &start_costs,
                &end_costs,
                switch_cost_m,
            );
            seen_sequences.insert(outcome.path.clone());
            tracing::debug!(
                round,
                accepted = accepted.len() + 1,
                true_distance_m = true_distance,
                "k-best path accepted"
            );
            accepted.push(AcceptedPath {
                steps: outcome.path.clone(),
                true_distance_m: true_distance,
            });
        }

        penalize_intra_route_edges(graph, &outcome.path, &mut penalized_edges);

        *start_costs.entry(outcome.entry_point).or_insert(0.0) += POINT_REUSE_PENALTY;
        *end_costs.entry(outcome.exit_point).or_insert(0.0) += POINT_REUSE_PENALTY;

        if outcome.cancelled {
            break;
        }
    }

    accepted.truncate(k);
    KBestResult {
        paths: accepted,
        cancelled,
    }
}

/// Marks every intra-route edge the accepted path traversed as
/// penalized for subsequent rounds. Transfer edges are never penalized —
/// re-using a transfer is fine, re-using a ride isn't.
fn penalize_intra_route_edges(
    graph: &Graph,
    path: &[StepId],
    penalized_edges: &mut HashSet<(StepId, StepId)>,
) {
    for window in path.windows(2) {
        let (from, to) = (window[0], window[1]);
        if graph.next(from) == Some(to) {
            penalized_edges.insert((from, to));
        }
    }
}

/// Recomputes the itinerary's total distance with all penalty terms
/// stripped: entry walk + raw intra-route edge weights + `switch_cost_m`
/// per transfer + exit walk.
fn recompute_true_distance(
    graph: &Graph,
    path: &[StepId],
    start_costs: &HashMap<PointId, f64>,
    end_costs: &HashMap<PointId, f64>,
    switch_cost_m: f64,
) -> f64 {
    let Some(&entry) = path.first() else {
        return 0.0;
    };
    let Some(&exit) = path.last() else {
        return 0.0;
    };

    let entry_point = graph.point_of(entry).unwrap_or(PointId(0));
    let exit_point = graph.point_of(exit).unwrap_or(PointId(0));

    let entry_walk = point_reuse_floor(start_costs.get(&entry_point).copied());
    let exit_walk = point_reuse_floor(end_costs.get(&exit_point).copied());

    let mut ride_total = 0.0;
    for window in path.windows(2) {
        let (from, to) = (window[0], window[1]);
        if graph.next(from) == Some(to) {
            let from_xy = graph.xy_of(from).unwrap_or((0.0, 0.0));
            let to_xy = graph.xy_of(to).unwrap_or((0.0, 0.0));
            ride_total += crate::graph::euclidean(from_xy, to_xy);
        } else {
            ride_total += switch_cost_m;
        }
    }

    entry_walk + ride_total + exit_walk
}

/// `start_costs`/`end_costs` accumulate `POINT_REUSE_PENALTY` across
/// rounds for stops already used as an entry/exit; the *true* distance
/// reported to callers must use the walking cost from *before* any reuse
/// penalty was applied to this point. Since this module only ever adds
/// whole multiples of `POINT_REUSE_PENALTY` on top of the original
/// walking cost, stripping is exact: take the value modulo the penalty.
fn point_reuse_floor(cost: Option<f64>) -> f64 {
    match cost {
        Some(c) if c >= POINT_REUSE_PENALTY => c % POINT_REUSE_PENALTY,
        Some(c) => c,
        None => 0.0,
    }
}
