pub mod theta_star;

mod node;

pub use theta_star::ThetaStarSolver;

use crate::error::PlanningResult;
use crate::map::ReservationMap;
use crate::path::Path;
use crate::point::OrientedPoint;
use crate::rectangle::TimedRectangle;
use crate::AgentId;

/// A single route query against a [`ReservationMap`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningRequest {
    pub start: OrientedPoint,
    pub target: OrientedPoint,
    pub start_time: f64,
    /// How long the target stays reserved after arrival. Zero or less reserves nothing.
    pub target_reservation_time: f64,
    pub agent: AgentId,
    /// Rectangles checked in addition to the reservations of the map.
    pub extra_reservations: Vec<TimedRectangle>,
    /// Lets the robot leave a start point that other robots still have reserved. Those reservations
    /// are skipped while waiting at the start and on the edges leaving it.
    pub ignore_starting_reservations: bool,
}

impl PlanningRequest {
    pub fn new(start: OrientedPoint, target: OrientedPoint, start_time: f64, agent: AgentId) -> Self {
        PlanningRequest {
            start,
            target,
            start_time,
            target_reservation_time: 0.0,
            agent,
            extra_reservations: Vec::new(),
            ignore_starting_reservations: false,
        }
    }

    pub fn with_target_reservation_time(mut self, time: f64) -> Self {
        self.target_reservation_time = time;
        self
    }

    pub fn ignoring_starting_reservations(mut self, ignore: bool) -> Self {
        self.ignore_starting_reservations = ignore;
        self
    }

    pub fn with_extra_reservations(mut self, extra: impl IntoIterator<Item = TimedRectangle>) -> Self {
        self.extra_reservations.extend(extra);
        self
    }
}

pub trait PathSolver {
    fn find_path(map: &ReservationMap, request: &PlanningRequest) -> PlanningResult<Path>;
}
