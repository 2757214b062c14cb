use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;

use crate::config::PlannerConfig;
use crate::error::{PlanningError, PlanningResult};
use crate::graph::{self, WaypointGraph};
use crate::hardware::HardwareProfile;
use crate::logger::DynLogger;
use crate::obstacle::{BBox, Obstacle};
use crate::path::Path;
use crate::point::{point2, OrientedPoint, Point};
use crate::rectangle::TimedRectangle;
use crate::solvers::{PathSolver, PlanningRequest, ThetaStarSolver};
use crate::utils::gen_random_in_range;
use crate::AgentId;

/// Answer of [`ReservationMap::when_is_timed_line_of_sight_free`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedLineOfSightResult {
    pub blocked_by_static: bool,
    pub blocked_by_timed: bool,
    /// Latest end of the reservations that block the segment during the queried interval.
    pub free_after: f64,
    pub has_upcoming_obstacle: bool,
    /// Latest departure that still clears every upcoming reservation.
    pub last_valid_entry_time: f64,
    /// Latest end of the upcoming reservations that can no longer be cleared.
    pub free_after_upcoming_obstacle: f64,
}

impl Default for TimedLineOfSightResult {
    fn default() -> Self {
        TimedLineOfSightResult {
            blocked_by_static: false,
            blocked_by_timed: false,
            free_after: f64::NEG_INFINITY,
            has_upcoming_obstacle: false,
            last_valid_entry_time: f64::INFINITY,
            free_after_upcoming_obstacle: f64::NEG_INFINITY,
        }
    }
}

impl TimedLineOfSightResult {
    /// Whether a robot leaving at `departure` can use the segment without waiting.
    pub fn is_free_at(&self, departure: f64) -> bool {
        !self.blocked_by_static && !self.blocked_by_timed && !self.must_wait_for_upcoming(departure)
    }

    pub fn must_wait_for_upcoming(&self, departure: f64) -> bool {
        self.has_upcoming_obstacle && departure > self.last_valid_entry_time
    }

    /// Earliest time the segment may be entered, or `None` when it is statically blocked.
    pub fn earliest_departure(&self, departure: f64) -> Option<f64> {
        if self.blocked_by_static {
            return None;
        }
        let mut earliest = departure;
        if self.blocked_by_timed {
            earliest = earliest.max(self.free_after);
        }
        if self.must_wait_for_upcoming(departure) {
            earliest = earliest.max(self.free_after_upcoming_obstacle);
        }
        Some(earliest)
    }
}

/// A storage or charging location. A robot docks by driving onto the tray with heading `orientation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tray {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    /// Radians.
    pub orientation: f32,
}

impl Tray {
    pub fn new(id: u32, x: f32, y: f32, orientation: f32) -> Self {
        Tray { id, x, y, orientation }
    }

    pub fn position(&self) -> Point {
        point2(self.x, self.y)
    }

    /// The point `distance` in front of the tray, facing it.
    pub fn approach_point(&self, distance: f32) -> OrientedPoint {
        let approach = OrientedPoint::from_point(self.position(), self.orientation);
        OrientedPoint::from_point(approach.point() - approach.direction() * distance, self.orientation)
    }
}

/// Start or target of a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint {
    Point(OrientedPoint),
    Tray(Tray),
}

impl Endpoint {
    pub fn resolve(&self, tray_approach_distance: f32) -> OrientedPoint {
        match self {
            Endpoint::Point(p) => *p,
            Endpoint::Tray(tray) => tray.approach_point(tray_approach_distance),
        }
    }
}

impl From<OrientedPoint> for Endpoint {
    fn from(p: OrientedPoint) -> Self {
        Endpoint::Point(p)
    }
}

impl From<Tray> for Endpoint {
    fn from(tray: Tray) -> Self {
        Endpoint::Tray(tray)
    }
}

/// Map of a warehouse floor shared by all robots: static obstacles, the waypoint graph and the
/// reservations every robot made for its current route.
///
/// Static data is immutable after construction. Reservations sit behind a single lock that every
/// query and mutation holds only for its own duration.
pub struct ReservationMap {
    config: PlannerConfig,
    obstacles: Vec<TimedRectangle>,
    graph: WaypointGraph,
    reservations: Mutex<Vec<TimedRectangle>>,
    hardware: Arc<dyn HardwareProfile>,
    logger: DynLogger,
}

impl std::fmt::Debug for ReservationMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationMap")
            .field("width", &self.config.width)
            .field("height", &self.config.height)
            .field("obstacles", &self.obstacles.len())
            .field("waypoints", &self.graph.len())
            .field("reservations", &self.reservations.lock().len())
            .finish()
    }
}

impl ReservationMap {
    /// Builds the map and its waypoint graph. `config` is expected to be validated.
    pub fn new(
        config: PlannerConfig,
        obstacles: Vec<TimedRectangle>,
        hardware: Arc<dyn HardwareProfile>,
        logger: DynLogger,
    ) -> Self {
        let bounds = usable_area(&config);
        let graph = WaypointGraph::from_grid(
            bounds,
            config.grid_resolution,
            config.max_adjacency_distance,
            &obstacles,
        );

        logger.info(&format!(
            "map {}x{} with {} obstacles, {} waypoints and {} edges",
            config.width,
            config.height,
            obstacles.len(),
            graph.len(),
            graph.edge_count(),
        ));

        ReservationMap {
            config,
            obstacles,
            graph,
            reservations: Mutex::new(Vec::new()),
            hardware,
            logger,
        }
    }

    /// Like [`ReservationMap::new`] but with a caller supplied graph.
    pub fn with_graph(
        config: PlannerConfig,
        obstacles: Vec<TimedRectangle>,
        graph: WaypointGraph,
        hardware: Arc<dyn HardwareProfile>,
        logger: DynLogger,
    ) -> Self {
        ReservationMap {
            config,
            obstacles,
            graph,
            reservations: Mutex::new(Vec::new()),
            hardware,
            logger,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub(crate) fn static_obstacles(&self) -> &[TimedRectangle] {
        &self.obstacles
    }

    pub fn graph(&self) -> &WaypointGraph {
        &self.graph
    }

    pub fn hardware_profile(&self) -> &Arc<dyn HardwareProfile> {
        &self.hardware
    }

    pub fn logger(&self) -> &DynLogger {
        &self.logger
    }

    pub fn width(&self) -> f32 {
        self.config.width
    }

    pub fn height(&self) -> f32 {
        self.config.height
    }

    pub fn margin(&self) -> f32 {
        self.config.margin
    }

    pub fn is_inside_any_static_inflated_obstacle(&self, p: &Point) -> bool {
        self.obstacles.iter().any(|o| o.is_inside(p))
    }

    pub fn is_static_line_of_sight_free(&self, a: &Point, b: &Point) -> bool {
        graph::is_line_of_sight_free(&self.obstacles, a, b)
    }

    /// Checks the segment `a`-`b`, driven during `[t_a, t_b]`, against the static obstacles and every
    /// reservation (and `extra`) not owned by `agent`.
    pub fn when_is_timed_line_of_sight_free(
        &self,
        a: &Point,
        t_a: f64,
        b: &Point,
        t_b: f64,
        agent: AgentId,
        extra: &[TimedRectangle],
    ) -> TimedLineOfSightResult {
        self.timed_line_of_sight_ignoring(a, t_a, b, t_b, agent, extra, &[])
    }

    /// [`ReservationMap::when_is_timed_line_of_sight_free`] that skips every rectangle in `ignored`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn timed_line_of_sight_ignoring(
        &self,
        a: &Point,
        t_a: f64,
        b: &Point,
        t_b: f64,
        agent: AgentId,
        extra: &[TimedRectangle],
        ignored: &[TimedRectangle],
    ) -> TimedLineOfSightResult {
        let mut result = TimedLineOfSightResult::default();

        if !self.is_static_line_of_sight_free(a, b) {
            result.blocked_by_static = true;
            return result;
        }

        let clearance = self.config.upcoming_obstacle_clearance;
        let drive = t_b - t_a;

        let reservations = self.reservations.lock();
        let foreign = reservations
            .iter()
            .chain(extra)
            .filter(|r| r.owner() != Some(agent))
            .filter(|r| !ignored.contains(*r))
            .filter(|r| r.intersects_segment(a, b));

        for r in foreign {
            if r.overlaps_time_range(t_a, t_b, agent) {
                result.blocked_by_timed = true;
                result.free_after = result.free_after.max(r.free_after());
            } else if r.start_time() >= t_b {
                let entry_limit = r.start_time() - clearance - drive;
                result.has_upcoming_obstacle = true;
                result.last_valid_entry_time = result.last_valid_entry_time.min(entry_limit);
                if entry_limit < t_a {
                    result.free_after_upcoming_obstacle =
                        result.free_after_upcoming_obstacle.max(r.free_after());
                }
            }
        }

        result
    }

    /// Whether `agent` can wait at `a` for `waiting` seconds starting at `start` and then drive to `b`
    /// within `driving` seconds without touching a static obstacle or a foreign reservation.
    #[allow(clippy::too_many_arguments)]
    pub fn is_timed_connection_free(
        &self,
        a: &Point,
        b: &Point,
        start: f64,
        waiting: f64,
        driving: f64,
        agent: AgentId,
        extra: &[TimedRectangle],
    ) -> bool {
        self.timed_connection_free_ignoring(a, b, start, waiting, driving, agent, extra, &[])
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn timed_connection_free_ignoring(
        &self,
        a: &Point,
        b: &Point,
        start: f64,
        waiting: f64,
        driving: f64,
        agent: AgentId,
        extra: &[TimedRectangle],
        ignored: &[TimedRectangle],
    ) -> bool {
        if !self.is_static_line_of_sight_free(a, b) {
            return false;
        }

        let departure = start + waiting;
        let arrival = departure + driving;

        let reservations = self.reservations.lock();
        for r in reservations.iter().chain(extra).filter(|r| !ignored.contains(*r)) {
            if waiting > 0.0 && r.overlaps_time_range(start, departure, agent) && r.is_inside(a) {
                return false;
            }
            if r.overlaps_time_range(departure, arrival, agent) && r.intersects_segment(a, b) {
                return false;
            }
        }

        true
    }

    pub fn is_point_in_map(&self, p: &Point) -> bool {
        usable_area(&self.config).is_inside(p)
    }

    /// Uniformly samples a point of the map that is not inside any static obstacle. Gives up after
    /// `random_point_attempts` tries.
    pub fn random_free_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Point> {
        let area = usable_area(&self.config);
        (0..self.config.random_point_attempts)
            .map(|_| gen_random_in_range(rng, area.min_corner..area.max_corner))
            .find(|p| !self.is_inside_any_static_inflated_obstacle(p))
    }

    pub fn point_in_front_of_tray(&self, tray: &Tray) -> OrientedPoint {
        tray.approach_point(self.config.tray_approach_distance)
    }

    pub fn add_reservations<I>(&self, new_reservations: I)
    where
        I: IntoIterator<Item = TimedRectangle>,
    {
        // Static rectangles are obstacles and never belong in the reservation list.
        self.reservations
            .lock()
            .extend(new_reservations.into_iter().filter(|r| !r.is_static()));
    }

    /// Drops every reservation that ended before `now`.
    pub fn delete_expired_reservations(&self, now: f64) {
        self.reservations.lock().retain(|r| !r.is_expired(now));
    }

    /// Removes and returns all reservations of `agent`.
    pub fn delete_reservations_from_agent(&self, agent: AgentId) -> Vec<TimedRectangle> {
        let removed = {
            let mut reservations = self.reservations.lock();
            let (removed, kept): (Vec<_>, Vec<_>) =
                reservations.drain(..).partition(|r| r.owner() == Some(agent));
            *reservations = kept;
            removed
        };

        if !removed.is_empty() {
            self.logger
                .info(&format!("removed {} reservations of agent {}", removed.len(), agent));
        }
        removed
    }

    /// Plans a route for `agent` leaving `start` at `start_time`. When `target_reservation_time` is
    /// positive the route reserves the target for that long after arrival.
    pub fn get_path(
        &self,
        start: impl Into<Endpoint>,
        target: impl Into<Endpoint>,
        start_time: f64,
        target_reservation_time: f64,
        agent: AgentId,
    ) -> PlanningResult<Path> {
        let distance = self.config.tray_approach_distance;
        let request = PlanningRequest::new(
            start.into().resolve(distance),
            target.into().resolve(distance),
            start_time,
            agent,
        )
        .with_target_reservation_time(target_reservation_time);

        self.plan(&request)
    }

    pub fn get_path_between(
        &self,
        start: OrientedPoint,
        target: OrientedPoint,
        start_time: f64,
        target_reservation_time: f64,
        agent: AgentId,
    ) -> PlanningResult<Path> {
        self.get_path(start, target, start_time, target_reservation_time, agent)
    }

    pub fn plan(&self, request: &PlanningRequest) -> PlanningResult<Path> {
        let result = ThetaStarSolver::find_path(self, request);
        if let Err(err @ PlanningError::NoFeasiblePath { .. }) = &result {
            let target = request.target.point();
            self.logger.error(&format!("{}", err));
            for r in self.reservations_at(&target) {
                self.logger.error(&format!(
                    "  reserved by agent {:?} during [{}, {}) at ({}, {})",
                    r.owner(),
                    r.start_time(),
                    r.end_time(),
                    r.position().x,
                    r.position().y,
                ));
            }
        }
        result
    }

    /// Whether the point is the destination of another robot. The destination of a robot is the
    /// footprint of its non-expired reservation that ends last.
    pub fn is_point_target_of_another_robot(
        &self,
        endpoint: impl Into<Endpoint>,
        agent: AgentId,
        now: f64,
    ) -> bool {
        let p = endpoint.into().resolve(self.config.tray_approach_distance).point();
        let reservations = self.reservations.lock();

        let mut destinations: Vec<&TimedRectangle> = Vec::new();
        for r in reservations.iter().filter(|r| !r.is_expired(now)) {
            let owner = match r.owner() {
                Some(owner) if owner != agent => owner,
                _ => continue,
            };
            match destinations.iter_mut().find(|d| d.owner() == Some(owner)) {
                Some(d) if d.end_time() < r.end_time() => *d = r,
                Some(_) => {}
                None => destinations.push(r),
            }
        }

        destinations.iter().any(|d| d.is_inside(&p))
    }

    /// Every reservation whose footprint contains `p`.
    pub fn reservations_at(&self, p: &Point) -> Vec<TimedRectangle> {
        self.reservations
            .lock()
            .iter()
            .filter(|r| r.is_inside(p))
            .cloned()
            .collect()
    }

    pub fn obstacles(&self) -> Vec<TimedRectangle> {
        self.obstacles.clone()
    }

    pub fn reservations(&self) -> Vec<TimedRectangle> {
        self.reservations.lock().clone()
    }

    /// Reservations that cover `now`.
    pub fn active_reservations(&self, now: f64) -> Vec<TimedRectangle> {
        self.filtered_reservations(|r| r.start_time() <= now && !r.is_expired(now))
    }

    /// Reservations that start after `now`.
    pub fn inactive_reservations(&self, now: f64) -> Vec<TimedRectangle> {
        self.filtered_reservations(|r| r.start_time() > now)
    }

    pub fn reservations_of(&self, agent: AgentId) -> Vec<TimedRectangle> {
        self.filtered_reservations(|r| r.owner() == Some(agent))
    }

    fn filtered_reservations<F>(&self, f: F) -> Vec<TimedRectangle>
    where
        F: Fn(&TimedRectangle) -> bool,
    {
        self.reservations.lock().iter().filter(|r| f(r)).cloned().collect()
    }
}

fn usable_area(config: &PlannerConfig) -> BBox {
    BBox::new(
        point2(config.margin, config.margin),
        point2(config.width - config.margin, config.height - config.margin),
    )
}
