use std::cmp::Reverse;
use std::collections::BinaryHeap;

use nalgebra as na;

use crate::error::{PlanningError, PlanningResult};
use crate::graph::QueryGraph;
use crate::hardware::HardwareProfile;
use crate::map::ReservationMap;
use crate::path::{Path, ReservationSettings};
use crate::obstacle::Obstacle;
use crate::point::{angle_difference, rotation_of, Point};
use crate::rectangle::TimedRectangle;
use crate::solvers::node::SearchArena;
use crate::solvers::{PathSolver, PlanningRequest};
use crate::utils::{OrdF64, ToOrd, EPSILON};

/// Added to every wait so that the departure never lands right before the end of a reservation.
const TIME_EPSILON: f64 = 1e-6;

/// Theta* over the waypoint graph of a [`ReservationMap`], with arrival time as the cost.
///
/// Besides the usual any-angle shortcut through the predecessor, a connection may wait at its
/// first node until the reservations in its way are gone. Every edge is confirmed with
/// [`ReservationMap::is_timed_connection_free`] before it is taken.
pub struct ThetaStarSolver;

impl PathSolver for ThetaStarSolver {
    fn find_path(map: &ReservationMap, request: &PlanningRequest) -> PlanningResult<Path> {
        ThetaStarSearch::new(map, request).run()
    }
}

/// Edge candidate leaving the arena node `from`.
#[derive(Debug, Clone, Copy)]
struct Edge {
    from: usize,
    waiting: f64,
    driving: f64,
}

struct ThetaStarSearch<'a> {
    map: &'a ReservationMap,
    request: &'a PlanningRequest,
    hardware: &'a dyn HardwareProfile,
    graph: QueryGraph<'a>,
    arena: SearchArena,
    queue: BinaryHeap<Reverse<(OrdF64, usize)>>,
    target: Point,
    root: Option<usize>,
    // Foreign reservations covering the start, skipped on edges leaving the root.
    starting_reservations: Vec<TimedRectangle>,
}

impl<'a> ThetaStarSearch<'a> {
    fn new(map: &'a ReservationMap, request: &'a PlanningRequest) -> Self {
        ThetaStarSearch {
            map,
            request,
            hardware: map.hardware_profile().as_ref(),
            graph: QueryGraph::new(map.graph()),
            arena: SearchArena::new(),
            queue: BinaryHeap::new(),
            target: request.target.point(),
            root: None,
            starting_reservations: Vec::new(),
        }
    }

    fn run(mut self) -> PlanningResult<Path> {
        let start = self.request.start.point();
        let start_time = self.request.start_time;

        let start_id = self.snap(&start, "start")?;
        let target = self.target;
        let target_id = self.snap(&target, "target")?;
        if start_id == target_id {
            return Err(PlanningError::DegenerateRoute { x: start.x, y: start.y });
        }

        if self.request.ignore_starting_reservations {
            self.starting_reservations = self.reservations_on_start(&start);
        }
        let initial_wait = self.initial_wait(&start);

        let root = self.arena.get_or_insert(start_id);
        self.root = Some(root);
        self.arena[root].arrival = start_time + initial_wait;
        self.arena[root].departure_from_prev = start_time + initial_wait;
        self.push(root);

        while let Some(Reverse((key, current))) = self.queue.pop() {
            if key.0 > self.key_of(current) + 1e-9 {
                continue;
            }
            let waypoint = self.arena[current].waypoint;
            if waypoint == target_id {
                return self.reconstruct(current, initial_wait);
            }

            for neighbour in self.graph.neighbours(waypoint) {
                self.relax(current, neighbour);
            }
        }

        Err(PlanningError::no_feasible_path(&start, &self.target))
    }

    fn snap(&mut self, p: &Point, what: &str) -> PlanningResult<usize> {
        let config = self.map.config();
        self.graph
            .with_endpoint(p, config.snap_tolerance, self.map.static_obstacles())
            .map_err(|err| {
                self.map
                    .logger()
                    .warn(&format!("{} point ({}, {}) is not in the map", what, p.x, p.y));
                err
            })
    }

    fn reservations_on_start(&self, start: &Point) -> Vec<TimedRectangle> {
        let agent = self.request.agent;
        let on_start: Vec<TimedRectangle> = self
            .map
            .reservations_at(start)
            .into_iter()
            .chain(self.request.extra_reservations.iter().filter(|r| r.is_inside(start)).cloned())
            .filter(|r| r.owner() != Some(agent))
            .collect();

        if !on_start.is_empty() {
            self.map.logger().info(&format!(
                "agent {} ignores {} reservations on its start ({}, {})",
                agent,
                on_start.len(),
                start.x,
                start.y
            ));
        }
        on_start
    }

    /// Reservations to skip on edges leaving the arena node `from`.
    fn ignored_from(&self, from: usize) -> &[TimedRectangle] {
        if self.root == Some(from) {
            &self.starting_reservations
        } else {
            &[]
        }
    }

    /// How long the robot has to stay at the start because another robot still reserved it.
    fn initial_wait(&self, start: &Point) -> f64 {
        let probe = self.map.config().initial_wait_probe;
        let t = self.request.start_time;
        let result = self.map.timed_line_of_sight_ignoring(
            start,
            t,
            start,
            t + probe,
            self.request.agent,
            &self.request.extra_reservations,
            &self.starting_reservations,
        );

        if result.blocked_by_timed {
            let wait = result.free_after - t + probe;
            self.map.logger().warn(&format!(
                "agent {} has to wait {:.2}s before leaving ({}, {})",
                self.request.agent, wait, start.x, start.y
            ));
            wait
        } else {
            0.0
        }
    }

    fn relax(&mut self, current: usize, neighbour: usize) {
        let to = self.graph.position(neighbour);

        let edge = match self
            .shortcut(current, &to)
            .or_else(|| self.connect(current, &to))
        {
            Some(edge) => edge,
            None => return,
        };

        let from = &self.arena[edge.from];
        let from_pos = self.graph.position(from.waypoint);
        let leave_at = from.arrival;
        let arrival = leave_at + edge.waiting + edge.driving;

        let idx = self.arena.get_or_insert(neighbour);
        if arrival >= self.arena[idx].arrival {
            return;
        }

        let free = self.map.timed_connection_free_ignoring(
            &from_pos,
            &to,
            leave_at,
            edge.waiting,
            edge.driving,
            self.request.agent,
            &self.request.extra_reservations,
            self.ignored_from(edge.from),
        );
        if !free {
            return;
        }

        let node = &mut self.arena[idx];
        node.arrival = arrival;
        node.prev = Some(edge.from);
        node.departure_from_prev = leave_at + edge.waiting;
        self.push(idx);
    }

    /// Direct connection from the predecessor of `current`, skipping `current`.
    fn shortcut(&self, current: usize, to: &Point) -> Option<Edge> {
        let prev = self.arena[current].prev?;
        let node = &self.arena[prev];
        let from = self.graph.position(node.waypoint);

        let driving = self.driving_time(prev, to);
        let result = self.map.timed_line_of_sight_ignoring(
            &from,
            node.arrival,
            to,
            node.arrival + driving,
            self.request.agent,
            &self.request.extra_reservations,
            self.ignored_from(prev),
        );

        result.is_free_at(node.arrival).then(|| Edge {
            from: prev,
            waiting: 0.0,
            driving,
        })
    }

    /// Connection from `current`, waiting there first if a reservation is in the way.
    fn connect(&self, current: usize, to: &Point) -> Option<Edge> {
        let node = &self.arena[current];
        let from = self.graph.position(node.waypoint);

        let driving = self.driving_time(current, to);
        let result = self.map.timed_line_of_sight_ignoring(
            &from,
            node.arrival,
            to,
            node.arrival + driving,
            self.request.agent,
            &self.request.extra_reservations,
            self.ignored_from(current),
        );

        let departure = result.earliest_departure(node.arrival)?;
        let waiting = if departure > node.arrival {
            departure - node.arrival + TIME_EPSILON
        } else {
            0.0
        };
        Some(Edge {
            from: current,
            waiting,
            driving,
        })
    }

    /// Time to turn towards `to` and drive there from the arena node `from`.
    fn driving_time(&self, from: usize, to: &Point) -> f64 {
        let node = &self.arena[from];
        let pos = self.graph.position(node.waypoint);

        let incoming = match node.prev {
            Some(prev) => rotation_of(&(pos - self.graph.position(self.arena[prev].waypoint))),
            None => self.request.start.o,
        };
        let outgoing = rotation_of(&(to - pos));

        self.hardware.driving_duration(na::distance(&pos, to))
            + self.hardware.turning_duration(angle_difference(incoming, outgoing))
    }

    fn heuristic(&self, p: &Point) -> f64 {
        self.hardware.driving_duration(na::distance(p, &self.target))
    }

    fn key_of(&self, idx: usize) -> f64 {
        let node = &self.arena[idx];
        node.arrival + self.heuristic(&self.graph.position(node.waypoint))
    }

    fn push(&mut self, idx: usize) {
        let key = self.key_of(idx).to_ord();
        self.queue.push(Reverse((key, idx)));
    }

    fn reconstruct(&self, target: usize, initial_wait: f64) -> PlanningResult<Path> {
        let request = self.request;
        let chain = self.arena.chain(target);

        let mut nodes: Vec<Point> = chain
            .iter()
            .map(|&idx| self.graph.position(self.arena[idx].waypoint))
            .collect();
        // departures[i] is the absolute time the robot leaves nodes[i].
        let mut departures: Vec<f64> = chain[1..]
            .iter()
            .map(|&idx| self.arena[idx].departure_from_prev)
            .collect();

        let start = request.start.point();
        if na::distance(&nodes[0], &start) > EPSILON {
            nodes.insert(0, start);
            departures.insert(0, request.start_time + initial_wait);
        } else {
            nodes[0] = start;
        }
        if let Some(last) = nodes.last_mut() {
            if na::distance(last, &self.target) <= EPSILON {
                *last = self.target;
            }
        }

        // Waits are derived from the absolute departures, with the same timing the path uses.
        let mut wait_times = Vec::with_capacity(nodes.len());
        let mut time = request.start_time;
        let mut heading = request.start.o;
        for (i, window) in nodes.windows(2).enumerate() {
            let wait = (departures[i] - time).max(0.0);
            let segment = window[1] - window[0];
            let rotation = rotation_of(&segment);

            time += wait
                + self.hardware.turning_duration(angle_difference(heading, rotation))
                + self.hardware.driving_duration(segment.norm());
            heading = rotation;
            wait_times.push(wait);
        }
        wait_times.push(0.0);

        let path = Path::new(
            request.start,
            request.target,
            nodes,
            wait_times,
            request.start_time,
            self.map.hardware_profile().clone(),
        )?
        .with_target_reservation_time(request.target_reservation_time)
        .with_reservation_settings(ReservationSettings::from(self.map.config()));

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::config::PlannerConfig;
    use crate::graph::WaypointGraph;
    use crate::hardware::LinearHardwareProfile;
    use crate::logger::test_support::RecordingLogger;
    use crate::logger::NoopLogger;
    use crate::obstacle::Obstacle;
    use crate::point::{point2, vec2, OrientedPoint};
    use crate::rectangle::TimedRectangle;

    fn hardware() -> Arc<LinearHardwareProfile> {
        Arc::new(LinearHardwareProfile::new(1.0, 1.0))
    }

    fn open_map(size: f32) -> ReservationMap {
        let config = PlannerConfig {
            width: size,
            height: size,
            grid_resolution: 1.0,
            max_adjacency_distance: 1.5,
            ..PlannerConfig::default()
        };
        ReservationMap::new(config, Vec::new(), hardware(), Arc::new(NoopLogger))
    }

    /// A 10 m long corridor along y = 1 between two walls.
    fn corridor() -> ReservationMap {
        let config = PlannerConfig {
            width: 10.0,
            height: 2.0,
            grid_resolution: 1.0,
            max_adjacency_distance: 1.2,
            ..PlannerConfig::default()
        };
        let walls = vec![
            TimedRectangle::obstacle(point2(5.0, 0.0), vec2(12.0, 0.8), 0.0, 0.3),
            TimedRectangle::obstacle(point2(5.0, 2.0), vec2(12.0, 0.8), 0.0, 0.3),
        ];
        ReservationMap::new(config, walls, hardware(), Arc::new(NoopLogger))
    }

    fn solve(map: &ReservationMap, start: OrientedPoint, target: OrientedPoint, t: f64, agent: u32) -> PlanningResult<Path> {
        ThetaStarSolver::find_path(map, &PlanningRequest::new(start, target, t, agent))
    }

    #[test]
    fn straight_line_without_reservations() {
        let map = open_map(10.0);
        let path = solve(&map, OrientedPoint::new(0.0, 0.0, 0.0), OrientedPoint::new(5.0, 0.0, 0.0), 0.0, 1).unwrap();

        assert_eq!(path.nodes().first(), Some(&point2(0.0, 0.0)));
        assert_eq!(path.nodes().last(), Some(&point2(5.0, 0.0)));
        assert!((path.duration() - 5.0).abs() < 1e-4);
        assert!(path.wait_times().iter().all(|&w| w == 0.0));
        assert!((path.distance() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn any_angle_route_is_taut() {
        let map = open_map(10.0);
        let path = solve(&map, OrientedPoint::new(0.0, 0.0, 0.0), OrientedPoint::new(6.0, 3.0, 0.0), 0.0, 1).unwrap();

        // Without obstacles the route is the straight line.
        assert_eq!(path.nodes().len(), 2);
        assert!((path.distance() - 45f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn shortcut_skips_intermediate_waypoint() {
        let config = PlannerConfig {
            max_adjacency_distance: 1.2,
            ..PlannerConfig::default()
        };
        let graph = WaypointGraph::from_points(
            vec![point2(0.0, 0.0), point2(1.0, 0.0), point2(2.0, 0.0)],
            1.2,
            &[] as &[TimedRectangle],
        );
        let map = ReservationMap::with_graph(config, Vec::new(), graph, hardware(), Arc::new(NoopLogger));

        let path = solve(&map, OrientedPoint::new(0.0, 0.0, 0.0), OrientedPoint::new(2.0, 0.0, 0.0), 0.0, 1).unwrap();
        assert_eq!(path.nodes(), &[point2(0.0, 0.0), point2(2.0, 0.0)]);
    }

    #[test]
    fn waits_for_reservation_in_corridor() {
        let map = corridor();
        let blocked = TimedRectangle::reservation(point2(5.0, 1.0), vec2(1.0, 1.0), 0.0, 0.3, 10.0, 20.0, 7);
        map.add_reservations(vec![blocked.clone()]);

        let path = solve(&map, OrientedPoint::new(0.0, 1.0, 0.0), OrientedPoint::new(10.0, 1.0, 0.0), 5.0, 1).unwrap();

        // Entering the reserved square is only possible once it is released at 20.
        assert!((path.arrival_time() - 26.0).abs() < 1e-3, "arrived at {}", path.arrival_time());
        assert!(path.wait_times().iter().sum::<f64>() > 10.0);

        for (i, window) in path.nodes().windows(2).enumerate() {
            if blocked.intersects_segment(&window[0], &window[1]) {
                assert!(path.departure_times()[i] >= 20.0 - 1e-6);
            }
        }
    }

    #[test]
    fn own_reservations_do_not_block() {
        let map = corridor();
        map.add_reservations(vec![TimedRectangle::reservation(
            point2(5.0, 1.0),
            vec2(1.0, 1.0),
            0.0,
            0.3,
            0.0,
            100.0,
            1,
        )]);

        let path = solve(&map, OrientedPoint::new(0.0, 1.0, 0.0), OrientedPoint::new(10.0, 1.0, 0.0), 0.0, 1).unwrap();
        assert!((path.duration() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn initial_wait_when_start_is_reserved() {
        let map = open_map(10.0);
        map.add_reservations(vec![TimedRectangle::reservation(
            point2(1.0, 1.0),
            vec2(0.5, 0.5),
            0.0,
            0.25,
            0.0,
            3.0,
            4,
        )]);

        let path = solve(&map, OrientedPoint::new(1.0, 1.0, 0.0), OrientedPoint::new(5.0, 1.0, 0.0), 1.0, 2).unwrap();

        // Free after 3, plus the probe of 0.5.
        assert!((path.wait_times()[0] - 2.5).abs() < 1e-4);
        assert!((path.departure_times()[0] - 3.5).abs() < 1e-4);
        assert!((path.arrival_time() - 7.5).abs() < 1e-3);
    }

    #[test]
    fn blocked_target_is_reported() {
        let logger = Arc::new(RecordingLogger::default());
        let walls = vec![
            TimedRectangle::obstacle(point2(5.0, 0.0), vec2(12.0, 0.8), 0.0, 0.3),
            TimedRectangle::obstacle(point2(5.0, 2.0), vec2(12.0, 0.8), 0.0, 0.3),
            TimedRectangle::obstacle(point2(5.0, 1.0), vec2(0.2, 2.0), 0.0, 0.3),
        ];
        let config = PlannerConfig {
            width: 10.0,
            height: 2.0,
            grid_resolution: 1.0,
            max_adjacency_distance: 1.2,
            ..PlannerConfig::default()
        };
        let map = ReservationMap::new(config, walls, hardware(), logger.clone());

        let result = map.get_path_between(
            OrientedPoint::new(0.0, 1.0, 0.0),
            OrientedPoint::new(10.0, 1.0, 0.0),
            0.0,
            0.0,
            1,
        );
        assert!(matches!(result, Err(PlanningError::NoFeasiblePath { .. })));
        assert!(logger.count("error") >= 1);
    }

    #[rstest]
    #[case::same_point(OrientedPoint::new(2.0, 2.0, 0.0), OrientedPoint::new(2.0, 2.0, 1.0))]
    #[case::same_snapped_node(OrientedPoint::new(2.0, 2.0, 0.0), OrientedPoint::new(2.00001, 2.0, 0.0))]
    fn degenerate_route_is_rejected(#[case] start: OrientedPoint, #[case] target: OrientedPoint) {
        let map = open_map(5.0);
        assert!(matches!(
            solve(&map, start, target, 0.0, 1),
            Err(PlanningError::DegenerateRoute { .. })
        ));
    }

    #[test]
    fn endpoint_outside_of_graph() {
        let map = open_map(5.0);
        let result = solve(&map, OrientedPoint::new(2.0, 2.0, 0.0), OrientedPoint::new(40.0, 40.0, 0.0), 0.0, 1);
        assert!(matches!(result, Err(PlanningError::EndpointNotInGraph { .. })));
    }

    #[test]
    fn turning_time_is_part_of_the_route() {
        let map = open_map(10.0);
        // Facing away from the target, the robot has to turn half a circle first.
        let path = solve(
            &map,
            OrientedPoint::new(0.0, 0.0, std::f32::consts::PI),
            OrientedPoint::new(5.0, 0.0, 0.0),
            0.0,
            1,
        )
        .unwrap();
        assert!((path.duration() - (5.0 + std::f64::consts::PI)).abs() < 1e-3);
    }

    #[test]
    fn two_robots_do_not_share_space_time() {
        let map = open_map(10.0);
        let first = map
            .get_path_between(OrientedPoint::new(0.0, 5.0, 0.0), OrientedPoint::new(10.0, 5.0, 0.0), 0.0, 0.0, 1)
            .unwrap();
        assert_eq!(first.nodes().len(), 2);
        map.add_reservations(first.generate_reservations(1));

        let up = std::f32::consts::FRAC_PI_2;
        let second = map
            .get_path_between(OrientedPoint::new(5.0, 0.0, up), OrientedPoint::new(5.0, 10.0, up), 0.0, 0.0, 2)
            .unwrap();

        // The straight line would meet the first robot at (5, 5).
        assert!(second.duration() > 10.0 + 1e-3);

        let departures = second.departure_times();
        let waits = second.wait_times();
        for (i, window) in second.nodes().windows(2).enumerate() {
            let arrival = departures[i + 1] - waits[i + 1];
            let driving = arrival - departures[i];
            assert!(map.is_timed_connection_free(&window[0], &window[1], departures[i] + 1e-4, 0.0, driving - 2e-4, 2, &[]));
        }
    }

    /// Position of the robot following `path` at time `t`. Turns happen in place before a segment is
    /// driven at 1 m/s.
    fn position_at(path: &Path, t: f64) -> Point {
        let nodes = path.nodes();
        let departures = path.departure_times();
        let waits = path.wait_times();

        for i in 0..nodes.len() - 1 {
            let arrival = departures[i + 1] - waits[i + 1];
            if t > arrival {
                continue;
            }
            let length = na::distance(&nodes[i], &nodes[i + 1]) as f64;
            let moving_since = arrival - length;
            if t <= moving_since {
                return nodes[i];
            }
            let ratio = ((t - moving_since) / length) as f32;
            return nodes[i] + (nodes[i + 1] - nodes[i]) * ratio;
        }
        nodes[nodes.len() - 1]
    }

    #[test]
    fn starting_reservations_can_be_ignored() {
        let map = open_map(10.0);
        map.add_reservations(vec![TimedRectangle::reservation(
            point2(1.0, 1.0),
            vec2(0.5, 0.5),
            0.0,
            0.25,
            0.0,
            50.0,
            4,
        )]);
        let request = PlanningRequest::new(OrientedPoint::new(1.0, 1.0, 0.0), OrientedPoint::new(5.0, 1.0, 0.0), 1.0, 2);

        let waiting = map.plan(&request).unwrap();
        assert!((waiting.wait_times()[0] - 49.5).abs() < 1e-4);

        let leaving = map.plan(&request.clone().ignoring_starting_reservations(true)).unwrap();
        assert_eq!(leaving.wait_times()[0], 0.0);
        assert!((leaving.arrival_time() - 5.0).abs() < 1e-3, "arrived at {}", leaving.arrival_time());
        assert_eq!(map.reservations().len(), 1);
    }

    #[test]
    fn extra_reservations_are_planned_around() {
        let map = corridor();
        let extra = TimedRectangle::reservation(point2(5.0, 1.0), vec2(1.0, 1.0), 0.0, 0.3, 10.0, 20.0, 7);
        let request = PlanningRequest::new(OrientedPoint::new(0.0, 1.0, 0.0), OrientedPoint::new(10.0, 1.0, 0.0), 5.0, 1)
            .with_extra_reservations(vec![extra]);

        let path = ThetaStarSolver::find_path(&map, &request).unwrap();
        assert!((path.arrival_time() - 26.0).abs() < 1e-3, "arrived at {}", path.arrival_time());

        // The map itself holds nothing, so the plain route is not delayed.
        let plain = solve(&map, OrientedPoint::new(0.0, 1.0, 0.0), OrientedPoint::new(10.0, 1.0, 0.0), 5.0, 1).unwrap();
        assert!((plain.arrival_time() - 15.0).abs() < 1e-3);
    }

    #[test]
    fn reserved_route_is_free_only_for_its_owner() {
        let map = open_map(10.0);
        let path = map
            .get_path_between(OrientedPoint::new(1.0, 2.0, 0.0), OrientedPoint::new(8.0, 6.0, 0.0), 0.0, 2.0, 1)
            .unwrap();
        map.add_reservations(path.generate_reservations(1));

        let departures = path.departure_times();
        let waits = path.wait_times();
        for (i, window) in path.nodes().windows(2).enumerate() {
            let arrival = departures[i + 1] - waits[i + 1];
            let driving = arrival - departures[i];
            assert!(map.is_timed_connection_free(&window[0], &window[1], departures[i], 0.0, driving, 1, &[]));
            assert!(!map.is_timed_connection_free(&window[0], &window[1], departures[i], 0.0, driving, 2, &[]));
        }
    }

    #[test]
    fn reverse_route_keeps_its_distance() {
        let map = open_map(10.0);
        let there = map
            .get_path_between(OrientedPoint::new(0.0, 5.0, 0.0), OrientedPoint::new(10.0, 5.0, 0.0), 0.0, 0.0, 1)
            .unwrap();
        map.add_reservations(there.generate_reservations(1));

        let pi = std::f32::consts::PI;
        let back = map
            .get_path_between(OrientedPoint::new(10.0, 5.0, pi), OrientedPoint::new(0.0, 5.0, pi), 0.0, 0.0, 2)
            .unwrap();
        assert_eq!(back.nodes().first(), Some(&point2(10.0, 5.0)));
        assert_eq!(back.nodes().last(), Some(&point2(0.0, 5.0)));

        // Both robots have a radius of 0.25, so their centres never get closer than 0.5.
        for step in 0..=1000 {
            let t = step as f64 * 0.01;
            let distance = na::distance(&position_at(&there, t), &position_at(&back, t));
            assert!(distance > 0.5 - 0.05, "robots are {} apart at {}", distance, t);
        }
    }
}
