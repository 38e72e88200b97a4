//! Stop spatial index: a static 2-D nearest-neighbor index over all
//! `Point`s, built once from storage.
//!
//! Backed by `rstar::RTree`, bulk-loaded once. Keyed on `PointId`
//! directly rather than a graph node index, since stop selection and
//! graph traversal are separate concerns here — this is an explicitly
//! constructed, immutable, cheaply `Clone`-able value, never a lazy
//! global.

use std::sync::Arc;

use rstar::primitives::GeomWithData;
use rstar::RTree;

use crate::error::Error;
use crate::model::{Point, PointId};
use crate::projector::Projector;

type IndexedStop = GeomWithData<[f64; 2], PointId>;

/// Read-only nearest-neighbor index over a network's stops.
///
/// Thread safety: built once, then shared by arbitrary concurrent
/// readers — the tree lives behind an `Arc` so `Clone` is a refcount
/// bump, not a data copy, and no interior mutability is exposed.
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Arc<RTree<IndexedStop>>,
}

impl SpatialIndex {
    /// Project every `Point` and bulk-load the R-tree. Idempotent,
    /// intended to run at most once per process (or once per reload).
    pub fn build(points: &[Point], projector: &Projector) -> Result<Self, Error> {
        let mut entries = Vec::with_capacity(points.len());
        for point in points {
            let (x, y) = projector.project(point.lon, point.lat)?;
            entries.push(IndexedStop::new([x, y], point.id));
        }
        Ok(Self {
            tree: Arc::new(RTree::bulk_load(entries)),
        })
    }

    /// Returns the single closest indexed point to `(x, y)` in projected
    /// meters. `None` only if the index is empty.
    #[must_use]
    pub fn nearest(&self, xy: (f64, f64)) -> Option<PointId> {
        self.tree
            .nearest_neighbor(&[xy.0, xy.1])
            .map(|stop| stop.data)
    }

    /// Returns every indexed point whose projected distance from
    /// `(x, y)` is `<= radius_m`. Order is unspecified. Empty when no
    /// stop lies within the radius.
    #[must_use]
    pub fn within(&self, xy: (f64, f64), radius_m: f64) -> Vec<PointId> {
        let query = [xy.0, xy.1];
        let radius_sq = radius_m * radius_m;
        self.tree
            .locate_within_distance(query, radius_sq)
            .map(|stop| stop.data)
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(id: u32, lon: f64, lat: f64) -> Point {
        Point {
            id: PointId(id),
            lon,
            lat,
        }
    }

    #[test]
    fn nearest_and_within_agree_on_a_small_network() {
        let projector = Projector::new().unwrap();
        let points = vec![
            pt(1, -58.40, -34.60),
            pt(2, -58.41, -34.61),
            pt(3, -58.50, -34.70),
        ];
        let index = SpatialIndex::build(&points, &projector).unwrap();

        let (x, y) = projector.project(-58.40, -34.60).unwrap();
        assert_eq!(index.nearest((x, y)), Some(PointId(1)));

        let within = index.within((x, y), 5_000.0);
        assert!(within.contains(&PointId(1)));
        assert!(within.contains(&PointId(2)));
        assert!(!within.contains(&PointId(3)));
    }

    #[test]
    fn empty_index_has_no_nearest() {
        let projector = Projector::new().unwrap();
        let index = SpatialIndex::build(&[], &projector).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.nearest((0.0, 0.0)), None);
        assert!(index.within((0.0, 0.0), 1000.0).is_empty());
    }
}
