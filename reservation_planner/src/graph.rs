use std::collections::HashMap;

use kd_tree::KDTree;
use nalgebra as na;

use crate::error::PlanningError;
use crate::obstacle::{BBox, Obstacle};
use crate::point::{point2, Point};
use crate::utils::EPSILON;

#[derive(Debug, Clone, PartialEq)]
pub struct WaypointNode {
    pub pos: Point,
    /// Ids of every node within the adjacency distance that is in line of sight.
    pub neighbours: Vec<usize>,
}

impl WaypointNode {
    fn new(pos: Point) -> Self {
        WaypointNode {
            pos,
            neighbours: Vec::new(),
        }
    }
}

/// Static waypoint graph of a map. Node ids are indices into `nodes` and never change once built.
#[derive(Debug, Clone)]
pub struct WaypointGraph {
    nodes: Vec<WaypointNode>,
    tree: KDTree<Point, 2>,
    max_adjacency: f32,
}

impl WaypointGraph {
    /// Places a node on every grid point of `bounds` (borders included) that lies outside of every
    /// obstacle.
    pub fn from_grid<O: Obstacle>(bounds: BBox, resolution: f32, max_adjacency: f32, obstacles: &[O]) -> Self {
        assert!(resolution > 0.0, "grid resolution must be positive, was {}", resolution);

        let extent = bounds.max_corner - bounds.min_corner;
        let steps_x = (extent.x / resolution + EPSILON).floor().max(0.0) as usize;
        let steps_y = (extent.y / resolution + EPSILON).floor().max(0.0) as usize;

        let mut points = Vec::with_capacity((steps_x + 1) * (steps_y + 1));
        for i in 0..=steps_x {
            for j in 0..=steps_y {
                points.push(point2(
                    bounds.min_corner.x + i as f32 * resolution,
                    bounds.min_corner.y + j as f32 * resolution,
                ));
            }
        }

        Self::from_points(points, max_adjacency, obstacles)
    }

    /// Builds the graph from an explicit list of points. Points inside an obstacle are dropped, the
    /// remaining ones keep their relative order.
    pub fn from_points<O: Obstacle>(points: Vec<Point>, max_adjacency: f32, obstacles: &[O]) -> Self {
        let points: Vec<Point> = points
            .into_iter()
            .filter(|p| !obstacles.iter().any(|o| o.is_inside(p)))
            .collect();

        let tree: KDTree<Point, 2> = KDTree::from_vec(points.clone());
        let mut nodes: Vec<WaypointNode> = points.into_iter().map(WaypointNode::new).collect();

        for i in 0..nodes.len() {
            let pos = nodes[i].pos;
            for j in tree.find_indices_within_radius(&pos, max_adjacency) {
                // Every pair is checked once, from its lower id.
                if j <= i {
                    continue;
                }
                let other = nodes[j].pos;
                if is_line_of_sight_free(obstacles, &pos, &other) {
                    nodes[i].neighbours.push(j);
                    nodes[j].neighbours.push(i);
                }
            }
        }

        for node in nodes.iter_mut() {
            node.neighbours.sort_unstable();
        }

        WaypointGraph {
            nodes,
            tree,
            max_adjacency,
        }
    }

    /// Id of the node closest to `p`, if it is no farther than `tolerance`.
    pub fn nearest(&self, p: &Point, tolerance: f32) -> Option<usize> {
        self.tree
            .find_nearest_index(p)
            .filter(|&idx| na::distance(self.tree.get_point(idx), p) <= tolerance)
    }

    pub fn node(&self, id: usize) -> &WaypointNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[WaypointNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_adjacency(&self) -> f32 {
        self.max_adjacency
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbours.len()).sum::<usize>() / 2
    }
}

pub(crate) fn is_line_of_sight_free<O: Obstacle>(obstacles: &[O], a: &Point, b: &Point) -> bool {
    !obstacles.iter().any(|o| o.intersects_segment(a, b))
}

/// Per query view of a [`WaypointGraph`] that can hold extra helper nodes for the exact start and
/// target of a route. Helper ids continue after the base ids. The base graph is never modified.
#[derive(Debug)]
pub struct QueryGraph<'g> {
    base: &'g WaypointGraph,
    helpers: Vec<WaypointNode>,
    // Edges from base nodes to helper nodes.
    helper_edges: HashMap<usize, Vec<usize>>,
}

impl<'g> QueryGraph<'g> {
    pub fn new(base: &'g WaypointGraph) -> Self {
        QueryGraph {
            base,
            helpers: Vec::new(),
            helper_edges: HashMap::new(),
        }
    }

    /// Returns the id of the node at `p`, adding a helper node if there is none yet.
    ///
    /// A helper node is connected to every node in sight within the adjacency distance (or the snap
    /// tolerance, if that is larger). Fails if no base node lies within `snap_tolerance` of `p`.
    pub fn with_endpoint<O: Obstacle>(
        &mut self,
        p: &Point,
        snap_tolerance: f32,
        obstacles: &[O],
    ) -> Result<usize, PlanningError> {
        if self.base.nearest(p, snap_tolerance).is_none() {
            return Err(PlanningError::not_in_graph(p));
        }

        if let Some(existing) = self.base.nearest(p, EPSILON) {
            return Ok(existing);
        }
        if let Some(helper) = self.helpers.iter().position(|h| na::distance(&h.pos, p) <= EPSILON) {
            return Ok(self.base.len() + helper);
        }

        let id = self.base.len() + self.helpers.len();
        let radius = self.base.max_adjacency.max(snap_tolerance);

        let mut neighbours: Vec<usize> = self
            .base
            .tree
            .find_indices_within_radius(p, radius)
            .into_iter()
            .filter(|&other| is_line_of_sight_free(obstacles, p, &self.base.nodes[other].pos))
            .collect();
        neighbours.sort_unstable();

        for (i, helper) in self.helpers.iter_mut().enumerate() {
            if na::distance(&helper.pos, p) <= radius && is_line_of_sight_free(obstacles, p, &helper.pos) {
                helper.neighbours.push(id);
                neighbours.push(self.base.len() + i);
            }
        }

        for &other in neighbours.iter().filter(|&&other| other < self.base.len()) {
            self.helper_edges.entry(other).or_default().push(id);
        }

        self.helpers.push(WaypointNode { pos: *p, neighbours });
        Ok(id)
    }

    pub fn position(&self, id: usize) -> Point {
        if id < self.base.len() {
            self.base.nodes[id].pos
        } else {
            self.helpers[id - self.base.len()].pos
        }
    }

    pub fn neighbours(&self, id: usize) -> Vec<usize> {
        if id < self.base.len() {
            let mut neighbours = self.base.nodes[id].neighbours.clone();
            if let Some(extra) = self.helper_edges.get(&id) {
                neighbours.extend_from_slice(extra);
            }
            neighbours
        } else {
            self.helpers[id - self.base.len()].neighbours.clone()
        }
    }

    pub fn base(&self) -> &WaypointGraph {
        self.base
    }

    pub fn len(&self) -> usize {
        self.base.len() + self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rectangle::TimedRectangle;
    use crate::point::vec2;

    fn no_obstacles() -> Vec<TimedRectangle> {
        Vec::new()
    }

    #[test]
    fn grid_includes_borders() {
        let bounds = BBox::new(point2(0.0, 0.0), point2(2.0, 1.0));
        let graph = WaypointGraph::from_grid(bounds, 0.5, 0.6, &no_obstacles());
        assert_eq!(graph.len(), 5 * 3);
        assert!(graph.nearest(&point2(2.0, 1.0), 1e-3).is_some());
    }

    #[test]
    fn grid_skips_obstacles_and_blocked_edges() {
        let bounds = BBox::new(point2(0.0, 0.0), point2(4.0, 0.0));
        let wall = TimedRectangle::obstacle(point2(2.0, 0.0), vec2(0.2, 2.0), 0.0, 0.0);
        let graph = WaypointGraph::from_grid(bounds, 1.0, 2.5, &[wall]);

        // The node at x = 2 is inside the wall.
        assert_eq!(graph.len(), 4);
        assert!(graph.nearest(&point2(2.0, 0.0), 0.1).is_none());

        let left = graph.nearest(&point2(1.0, 0.0), 0.1).unwrap();
        let right = graph.nearest(&point2(3.0, 0.0), 0.1).unwrap();
        assert!(!graph.node(left).neighbours.contains(&right));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let bounds = BBox::new(point2(0.0, 0.0), point2(3.0, 3.0));
        let graph = WaypointGraph::from_grid(bounds, 1.0, 1.5, &no_obstacles());
        for (id, node) in graph.nodes().iter().enumerate() {
            for &other in &node.neighbours {
                assert!(graph.node(other).neighbours.contains(&id));
                assert!(na::distance(&node.pos, &graph.node(other).pos) <= 1.5);
            }
        }
    }

    #[test]
    fn helper_nodes_live_in_the_overlay() {
        let bounds = BBox::new(point2(0.0, 0.0), point2(2.0, 2.0));
        let graph = WaypointGraph::from_grid(bounds, 1.0, 1.5, &no_obstacles());
        let base_edges = graph.edge_count();

        let mut query = QueryGraph::new(&graph);
        let on_grid = query.with_endpoint(&point2(1.0, 1.0), 0.5, &no_obstacles()).unwrap();
        assert!(on_grid < graph.len());

        let helper = query.with_endpoint(&point2(0.4, 0.6), 0.8, &no_obstacles()).unwrap();
        assert_eq!(helper, graph.len());
        assert_eq!(query.position(helper), point2(0.4, 0.6));
        assert!(query.neighbours(on_grid).contains(&helper));
        assert!(query.neighbours(helper).contains(&on_grid));

        // Asking again for the same point gives the same helper.
        assert_eq!(query.with_endpoint(&point2(0.4, 0.6), 0.8, &no_obstacles()).unwrap(), helper);
        assert_eq!(graph.edge_count(), base_edges);
    }

    #[test]
    fn far_endpoint_is_rejected() {
        let bounds = BBox::new(point2(0.0, 0.0), point2(2.0, 2.0));
        let graph = WaypointGraph::from_grid(bounds, 1.0, 1.5, &no_obstacles());
        let mut query = QueryGraph::new(&graph);
        assert_eq!(
            query.with_endpoint(&point2(10.0, 10.0), 1.0, &no_obstacles()),
            Err(PlanningError::EndpointNotInGraph { x: 10.0, y: 10.0 })
        );
    }
}
