//! Lexicographic `(distance, switches)` cost and its min-heap ordering.
//!
//! A reverse-ordered wrapper around `BinaryHeap`, modeled on
//! `petgraph`'s own `MinScored` but over a two-component lexicographic
//! key, plus a monotonic tiebreak counter so priority-queue ties are
//! resolved deterministically rather than by whatever order a hash
//! iteration happens to produce.

use std::cmp::Ordering;

/// A `(distance, switches)` pair, compared lexicographically: distance
/// dominates, switches is the tiebreak. `f64` is assumed finite/non-NaN
/// here — every distance this search core produces is a sum of metric
/// distances and fixed penalty constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cost {
    pub distance: f64,
    pub switches: u32,
}

impl Cost {
    pub const INFINITE: Self = Self {
        distance: f64::INFINITY,
        switches: u32::MAX,
    };

    #[must_use]
    pub const fn zero(distance: f64) -> Self {
        Self {
            distance,
            switches: 0,
        }
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            .then(self.switches.cmp(&other.switches))
    }
}

/// A priority-queue entry: a `Cost`, a node key, and a monotonic
/// insertion counter. Ordered in reverse of `Cost` (plus reverse
/// tiebreak) so a `BinaryHeap<ScoredNode<K>>` behaves as a min-heap over
/// `(distance, switches)`, ties broken by earliest insertion.
#[derive(Debug, Clone, Copy)]
pub struct ScoredNode<K> {
    pub cost: Cost,
    pub tiebreak: u64,
    pub node: K,
}

impl<K: PartialEq> PartialEq for ScoredNode<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.tiebreak == other.tiebreak && self.node == other.node
    }
}

impl<K: Eq> Eq for ScoredNode<K> {}

impl<K: Eq> PartialOrd for ScoredNode<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Eq> Ord for ScoredNode<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the smallest cost
        // (and, on ties, the earliest-inserted entry) to pop first.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.tiebreak.cmp(&self.tiebreak))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn pops_lowest_distance_first() {
        let mut heap = BinaryHeap::new();
        heap.push(ScoredNode {
            cost: Cost { distance: 5.0, switches: 0 },
            tiebreak: 0,
            node: "far",
        });
        heap.push(ScoredNode {
            cost: Cost { distance: 1.0, switches: 2 },
            tiebreak: 1,
            node: "near",
        });
        assert_eq!(heap.pop().unwrap().node, "near");
        assert_eq!(heap.pop().unwrap().node, "far");
    }

    #[test]
    fn ties_broken_by_earliest_tiebreak() {
        let mut heap = BinaryHeap::new();
        heap.push(ScoredNode {
            cost: Cost { distance: 1.0, switches: 0 },
            tiebreak: 5,
            node: "later",
        });
        heap.push(ScoredNode {
            cost: Cost { distance: 1.0, switches: 0 },
            tiebreak: 2,
            node: "earlier",
        });
        assert_eq!(heap.pop().unwrap().node, "earlier");
    }

    #[test]
    fn distance_dominates_switches() {
        let cheaper_more_switches = Cost { distance: 1.0, switches: 9 };
        let pricier_fewer_switches = Cost { distance: 2.0, switches: 0 };
        assert!(cheaper_more_switches < pricier_fewer_switches);
    }
}
