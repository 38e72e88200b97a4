//! Transit graph builder.
//!
//! Backed by `petgraph::graph::DiGraph<StepNode, StepEdge>`, wrapped with
//! `Deref` to the inner graph. Two edge kinds: intra-route (ride one stop
//! further) and transfer (change vehicles at a shared stop). Built once;
//! no mutation during search.

use std::ops::Deref;

use geo::{EuclideanDistance, Point as GeoPoint};
use hashbrown::HashMap;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::Error;
use crate::model::{Line, Point, PointId, Route, RouteId, Step, StepId};
use crate::projector::Projector;

/// Fixed cost of a transfer edge, in projected meters — deliberately
/// small relative to any realistic ride edge. Exposed as a documented
/// constant rather than buried inline; `SearchOptions::switch_cost_m` is
/// the per-request override, this is only the graph-build-time label.
pub const DEFAULT_SWITCH_COST_M: f64 = 200.0;

/// A node in the transit graph: one `Step`, with its point/route back
/// references and its projected coordinates cached at build time instead
/// of re-projected on every query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepNode {
    pub step_id: StepId,
    pub point_id: PointId,
    pub route_id: RouteId,
    pub next: Option<StepId>,
    pub xy: (f64, f64),
}

/// An edge in the transit graph: distance-only, no time-of-day schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepEdge {
    /// Ride one stop further on the same vehicle.
    Intra { weight_m: f64 },
    /// Change vehicles at a shared stop.
    Transfer { weight_m: f64 },
}

impl StepEdge {
    #[must_use]
    pub const fn weight_m(&self) -> f64 {
        match self {
            Self::Intra { weight_m } | Self::Transfer { weight_m } => *weight_m,
        }
    }

    #[must_use]
    pub const fn is_transfer(&self) -> bool {
        matches!(self, Self::Transfer { .. })
    }
}

/// The static transit graph: node/edge lookup plus the `steps_at`
/// side-table used both to wire transfer edges at build time and to
/// expand a spatial-index hit into a candidate step set at query time.
pub struct Graph {
    inner: DiGraph<StepNode, StepEdge>,
    step_index: HashMap<StepId, NodeIndex>,
    steps_at_point: HashMap<PointId, Vec<StepId>>,
    route_of: HashMap<RouteId, Route>,
    line_of: HashMap<crate::model::LineId, Line>,
    points: HashMap<PointId, (Point, (f64, f64))>,
}

impl Deref for Graph {
    type Target = DiGraph<StepNode, StepEdge>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Graph {
    /// Look up a step's graph node index by id.
    #[must_use]
    pub fn node_of(&self, step: StepId) -> Option<NodeIndex> {
        self.step_index.get(&step).copied()
    }

    /// All steps (across all routes) whose stopping point has this id —
    /// used to enumerate transfer edges and to expand origin/destination
    /// candidate stop sets into start/end step sets.
    #[must_use]
    pub fn steps_at(&self, point: PointId) -> &[StepId] {
        self.steps_at_point
            .get(&point)
            .map_or(&[], Vec::as_slice)
    }

    /// The route-successor step, if any.
    #[must_use]
    pub fn next(&self, step: StepId) -> Option<StepId> {
        let idx = self.node_of(step)?;
        self.inner.node_weight(idx).and_then(|n| n.next)
    }

    /// The route a step belongs to, for itinerary grouping.
    #[must_use]
    pub fn route(&self, step: StepId) -> Option<RouteId> {
        self.node_of(step)
            .and_then(|idx| self.inner.node_weight(idx))
            .map(|n| n.route_id)
    }

    #[must_use]
    pub fn route_view(&self, route: RouteId) -> Option<&Route> {
        self.route_of.get(&route)
    }

    /// The `Line` a route belongs to, for itinerary display (name, color).
    #[must_use]
    pub fn line_view(&self, line: crate::model::LineId) -> Option<&Line> {
        self.line_of.get(&line)
    }

    #[must_use]
    pub fn point_of(&self, step: StepId) -> Option<PointId> {
        self.node_of(step)
            .and_then(|idx| self.inner.node_weight(idx))
            .map(|n| n.point_id)
    }

    #[must_use]
    pub fn xy_of(&self, step: StepId) -> Option<(f64, f64)> {
        self.node_of(step)
            .and_then(|idx| self.inner.node_weight(idx))
            .map(|n| n.xy)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// The `Point` record and its cached planar projection for a point
    /// id, for query-coordinator walking-cost math and itinerary
    /// geometry — looked up by point rather than step, since many steps
    /// can share one stop.
    #[must_use]
    pub fn point(&self, point: PointId) -> Option<(Point, (f64, f64))> {
        self.points.get(&point).copied()
    }
}

/// Builds the transit graph from the full entity set. Fatal (returns
/// `Err`) on dangling references — a `Step` naming a missing `Point` or
/// `Route` aborts construction.
pub fn build_graph(
    lines: &[Line],
    routes: &[Route],
    points: &[Point],
    steps: &[Step],
    projector: &Projector,
) -> Result<Graph, Error> {
    if steps.is_empty() {
        return Err(Error::EmptyGraph);
    }

    let route_by_id: HashMap<RouteId, &Route> = routes.iter().map(|r| (r.id, r)).collect();

    for route in routes {
        if !steps.iter().any(|s| s.id == route.first) {
            return Err(Error::EmptyRoute(route.id));
        }
    }

    let mut projected_points: HashMap<PointId, (Point, (f64, f64))> =
        HashMap::with_capacity(points.len());
    for point in points {
        let xy = projector.project(point.lon, point.lat)?;
        projected_points.insert(point.id, (*point, xy));
    }

    let mut inner = DiGraph::<StepNode, StepEdge>::new();
    let mut step_index: HashMap<StepId, NodeIndex> = HashMap::with_capacity(steps.len());
    let mut steps_at_point: HashMap<PointId, Vec<StepId>> = HashMap::new();

    for step in steps {
        let &(_, xy) = projected_points
            .get(&step.point_id)
            .ok_or(Error::DanglingPoint {
                step: step.id,
                point: step.point_id,
            })?;
        if !route_by_id.contains_key(&step.route_id) {
            return Err(Error::DanglingRoute {
                step: step.id,
                route: step.route_id,
            });
        }

        let node = inner.add_node(StepNode {
            step_id: step.id,
            point_id: step.point_id,
            route_id: step.route_id,
            next: step.next,
            xy,
        });
        step_index.insert(step.id, node);
        steps_at_point.entry(step.point_id).or_default().push(step.id);
    }

    // Intra-route edges: each step to its route-successor.
    for step in steps {
        let Some(next_id) = step.next else { continue };
        let Some(&source) = step_index.get(&step.id) else {
            continue;
        };
        let Some(&target) = step_index.get(&next_id) else {
            continue;
        };
        let weight_m = euclidean(inner[source].xy, inner[target].xy);
        inner.add_edge(source, target, StepEdge::Intra { weight_m });
    }

    // Transfer edges: every ordered pair of distinct steps sharing a
    // point, regardless of route — s != t is the only requirement.
    for same_point_steps in steps_at_point.values() {
        for &s in same_point_steps {
            for &t in same_point_steps {
                if s == t {
                    continue;
                }
                let source = step_index[&s];
                let target = step_index[&t];
                inner.add_edge(
                    source,
                    target,
                    StepEdge::Transfer {
                        weight_m: DEFAULT_SWITCH_COST_M,
                    },
                );
            }
        }
    }

    let route_of = routes.iter().map(|r| (r.id, r.clone())).collect();
    let line_of = lines.iter().map(|l| (l.id, l.clone())).collect();

    tracing::debug!(
        nodes = inner.node_count(),
        edges = inner.edge_count(),
        points = projected_points.len(),
        "transit graph built"
    );

    Ok(Graph {
        inner,
        step_index,
        steps_at_point,
        route_of,
        line_of,
        points: projected_points,
    })
}

/// Straight-line distance between two projected-meter coordinates, via
/// `geo`'s `EuclideanDistance` trait rather than hand-rolled Pythagoras
/// at every call site.
pub(crate) fn euclidean(a: (f64, f64), b: (f64, f64)) -> f64 {
    GeoPoint::new(a.0, a.1).euclidean_distance(&GeoPoint::new(b.0, b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> Projector {
        Projector::new().unwrap()
    }

    fn line() -> Line {
        Line {
            id: crate::model::LineId(1),
            short_name: "A".into(),
            color: None,
        }
    }

    #[test]
    fn builds_intra_and_transfer_edges_for_a_single_transfer_network() {
        let p = projector();
        let points = vec![
            Point {
                id: PointId(1),
                lon: -58.40,
                lat: -34.60,
            },
            Point {
                id: PointId(2),
                lon: -58.41,
                lat: -34.61,
            },
            Point {
                id: PointId(3),
                lon: -58.42,
                lat: -34.62,
            },
        ];

        // Route A: step(P1) -> step(P2); Route B: step(P2) -> step(P3).
        let steps = vec![
            Step {
                id: StepId(1),
                route_id: RouteId(1),
                point_id: PointId(1),
                next: Some(StepId(2)),
            },
            Step {
                id: StepId(2),
                route_id: RouteId(1),
                point_id: PointId(2),
                next: None,
            },
            Step {
                id: StepId(3),
                route_id: RouteId(2),
                point_id: PointId(2),
                next: Some(StepId(4)),
            },
            Step {
                id: StepId(4),
                route_id: RouteId(2),
                point_id: PointId(3),
                next: None,
            },
        ];

        let routes = vec![
            Route {
                id: RouteId(1),
                line_id: line().id,
                is_return: false,
                first: StepId(1),
                distance: 0.0,
                time: 0.0,
            },
            Route {
                id: RouteId(2),
                line_id: line().id,
                is_return: false,
                first: StepId(3),
                distance: 0.0,
                time: 0.0,
            },
        ];

        let graph = build_graph(&[line()], &routes, &points, &steps, &p).unwrap();

        assert_eq!(graph.next(StepId(1)), Some(StepId(2)));
        assert_eq!(graph.next(StepId(2)), None);

        // Transfer edge exists from step 2 (route A at P2) to step 3 (route B at P2).
        let s2 = graph.node_of(StepId(2)).unwrap();
        let s3 = graph.node_of(StepId(3)).unwrap();
        assert!(graph.find_edge(s2, s3).is_some());

        assert_eq!(graph.steps_at(PointId(2)).len(), 2);
    }

    #[test]
    fn rejects_dangling_point_reference() {
        let p = projector();
        let routes = vec![Route {
            id: RouteId(1),
            line_id: line().id,
            is_return: false,
            first: StepId(1),
            distance: 0.0,
            time: 0.0,
        }];
        let steps = vec![Step {
            id: StepId(1),
            route_id: RouteId(1),
            point_id: PointId(99),
            next: None,
        }];

        let result = build_graph(&[line()], &routes, &[], &steps, &p);
        assert!(matches!(result, Err(Error::DanglingPoint { .. })));
    }

    #[test]
    fn rejects_route_whose_first_step_does_not_exist() {
        let p = projector();
        let routes = vec![Route {
            id: RouteId(1),
            line_id: line().id,
            is_return: false,
            first: StepId(1),
            distance: 0.0,
            time: 0.0,
        }];
        let steps = vec![Step {
            id: StepId(2),
            route_id: RouteId(1),
            point_id: PointId(1),
            next: None,
        }];
        let points = vec![Point {
            id: PointId(1),
            lon: -58.40,
            lat: -34.60,
        }];

        let result = build_graph(&[line()], &routes, &points, &steps, &p);
        assert!(matches!(result, Err(Error::EmptyRoute(RouteId(1)))));
    }

    #[test]
    fn rejects_empty_step_table() {
        let p = projector();
        let result = build_graph(&[line()], &[], &[], &[], &p);
        assert!(matches!(result, Err(Error::EmptyGraph)));
    }
}
