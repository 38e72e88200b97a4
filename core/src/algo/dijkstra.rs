//! One round of lexicographic single-source, multi-target Dijkstra,
//! augmented with endpoint walking costs and an edge penalty set.
//! Priority queue + predecessor map + `BinaryHeap<ScoredNode<..>>` over
//! a lexicographic `(distance, switches)` key, with best-candidate
//! tracking so the search can keep going past the first target hit to
//! find a cheaper one before pruning. Both the pop budget and the
//! deadline are checked on every pop, so either bound alone caps a
//! single round's work, not just the outer loop between rounds.

use std::collections::BinaryHeap;
use std::time::Instant;

use hashbrown::{HashMap, HashSet};
use petgraph::visit::EdgeRef;

use super::scored::{Cost, ScoredNode};
use crate::graph::{Graph, StepEdge};
use crate::model::{PointId, StepId};

/// Outcome of one search round: the winning step sequence plus the
/// lexicographic cost it was found at (still carrying penalty terms —
/// callers recompute the true, penalty-free distance separately).
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub path: Vec<StepId>,
    pub entry_point: PointId,
    pub exit_point: PointId,
    pub cost: Cost,
    /// `true` if the round was cut short by the pop budget or the
    /// deadline before the queue naturally drained — the returned path
    /// (if any) is still the best found so far.
    pub cancelled: bool,
}

/// Runs one lexicographic Dijkstra round from the union of
/// `start_steps` to any step whose point is in `end_point_set`.
///
/// `start_costs`/`end_costs` map point id -> walking cost in meters.
/// `penalized_edges` holds ordered `(from, to)` step-id pairs that
/// should be charged `EDGE_PENALTY` in addition to their raw intra-route
/// distance in this round.
///
/// Returns `None` if `start_steps` is empty, if no step in the union's
/// reachable set has a point in `end_point_set`, or if the pop budget or
/// deadline is exhausted before any candidate is found.
#[allow(clippy::too_many_arguments)]
pub fn search_once(
    graph: &Graph,
    start_steps: &[StepId],
    start_costs: &HashMap<PointId, f64>,
    end_point_set: &HashSet<PointId>,
    end_costs: &HashMap<PointId, f64>,
    switch_cost_m: f64,
    edge_penalty: f64,
    penalized_edges: &HashSet<(StepId, StepId)>,
    max_pops: Option<usize>,
    deadline: Option<Instant>,
) -> Option<SearchOutcome> {
    if start_steps.is_empty() || end_point_set.is_empty() {
        return None;
    }

    let mut best: HashMap<StepId, Cost> = HashMap::new();
    let mut predecessor: HashMap<StepId, StepId> = HashMap::new();
    let mut heap: BinaryHeap<ScoredNode<StepId>> = BinaryHeap::new();
    let mut tiebreak: u64 = 0;

    for &start in start_steps {
        let Some(point) = graph.point_of(start) else {
            continue;
        };
        let Some(&walk_cost) = start_costs.get(&point) else {
            continue;
        };
        let cost = Cost::zero(walk_cost);
        let improves = best.get(&start).map_or(true, |&stored| cost < stored);
        if improves {
            best.insert(start, cost);
            heap.push(ScoredNode {
                cost,
                tiebreak,
                node: start,
            });
            tiebreak += 1;
        }
    }

    let mut best_total = f64::INFINITY;
    let mut best_exit: Option<StepId> = None;
    let mut pops = 0usize;
    let mut cancelled = false;

    while let Some(ScoredNode {
        cost: popped_cost,
        node: step,
        ..
    }) = heap.pop()
    {
        if let Some(limit) = max_pops {
            if pops >= limit {
                cancelled = true;
                break;
            }
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            cancelled = true;
            break;
        }
        pops += 1;

        // Stale entry: a better cost for this step was already found and
        // pushed after this entry was queued. Skip only if the popped
        // cost is strictly worse than the recorded best.
        if let Some(&stored) = best.get(&step) {
            if popped_cost > stored {
                continue;
            }
        }

        if popped_cost.distance > best_total {
            break;
        }

        if let Some(point) = graph.point_of(step) {
            if end_point_set.contains(&point) {
                let end_cost = end_costs.get(&point).copied().unwrap_or(0.0);
                let candidate_total = popped_cost.distance + end_cost;
                if candidate_total < best_total {
                    best_total = candidate_total;
                    best_exit = Some(step);
                }
            }
        }

        let Some(node_idx) = graph.node_of(step) else {
            continue;
        };

        for edge in graph.edges(node_idx) {
            let target_step = graph[edge.target()].step_id;

            let edge_weight = match edge.weight() {
                StepEdge::Intra { weight_m } => {
                    let penalty = if penalized_edges.contains(&(step, target_step)) {
                        edge_penalty
                    } else {
                        0.0
                    };
                    *weight_m + penalty
                }
                StepEdge::Transfer { .. } => switch_cost_m,
            };
            let switch_delta = u32::from(edge.weight().is_transfer());

            let next_cost = Cost {
                distance: popped_cost.distance + edge_weight,
                switches: popped_cost.switches + switch_delta,
            };

            let improves = best
                .get(&target_step)
                .map_or(true, |&stored| next_cost < stored);

            if improves {
                best.insert(target_step, next_cost);
                predecessor.insert(target_step, step);
                heap.push(ScoredNode {
                    cost: next_cost,
                    tiebreak,
                    node: target_step,
                });
                tiebreak += 1;
            }
        }
    }

    let exit = best_exit?;

    let mut path = vec![exit];
    let mut current = exit;
    while let Some(&prev) = predecessor.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();

    let entry_point = path.first().and_then(|&s| graph.point_of(s))?;
    let exit_point = graph.point_of(exit)?;

    Some(SearchOutcome {
        path,
        entry_point,
        exit_point,
        cost: best_total_cost(&best, exit),
        cancelled,
    })
}

fn best_total_cost(best: &HashMap<StepId, Cost>, exit: StepId) -> Cost {
    best.get(&exit).copied().unwrap_or(Cost::INFINITE)
}
