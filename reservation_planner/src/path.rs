use std::fmt;
use std::sync::Arc;

use nalgebra as na;

use crate::config::PlannerConfig;
use crate::error::InvalidPathConstruction;
use crate::hardware::HardwareProfile;
use crate::point::{angle_difference, direction_of, rotation_of, vec2, OrientedPoint, Point};
use crate::rectangle::TimedRectangle;
use crate::AgentId;

/// Footprint and timing parameters of the reservations generated for a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReservationSettings {
    pub robot_radius: f32,
    /// Seconds added on both ends of every reservation.
    pub time_margin: f64,
    pub max_reservation_length: f32,
    pub target_offset: f32,
    pub target_length_margin: f32,
    pub target_width_margin: f32,
}

impl From<&PlannerConfig> for ReservationSettings {
    fn from(config: &PlannerConfig) -> Self {
        ReservationSettings {
            robot_radius: config.robot_radius,
            time_margin: config.reservation_time_margin,
            max_reservation_length: config.max_reservation_length,
            target_offset: config.target_offset,
            target_length_margin: config.target_length_margin,
            target_width_margin: config.target_width_margin,
        }
    }
}

impl Default for ReservationSettings {
    fn default() -> Self {
        ReservationSettings::from(&PlannerConfig::default())
    }
}

/// A timed route through the map.
///
/// The robot waits `wait_times[i]` at `nodes[i]`, then turns towards `nodes[i + 1]` and drives there.
/// The turn is part of the following segment, and the turn out of the first node starts from the
/// heading of `start`. All costs are computed once on construction.
#[derive(Clone)]
pub struct Path {
    nodes: Vec<Point>,
    wait_times: Vec<f64>,
    departure_times: Vec<f64>,
    turning_times: Vec<f64>,

    distance: f32,
    duration: f64,
    battery_consumption: f64,

    start_time_offset: f64,
    start: OrientedPoint,
    end: OrientedPoint,
    target_reservation_time: f64,
    settings: ReservationSettings,
    hardware: Arc<dyn HardwareProfile>,
}

impl Path {
    pub fn new(
        start: OrientedPoint,
        end: OrientedPoint,
        nodes: Vec<Point>,
        wait_times: Vec<f64>,
        start_time_offset: f64,
        hardware: Arc<dyn HardwareProfile>,
    ) -> Result<Path, InvalidPathConstruction> {
        if nodes.len() != wait_times.len() {
            return Err(InvalidPathConstruction::MismatchedLengths {
                nodes: nodes.len(),
                wait_times: wait_times.len(),
            });
        }
        if nodes.len() < 2 {
            return Err(InvalidPathConstruction::TooFewNodes(nodes.len()));
        }
        if nodes[0] == nodes[1] {
            return Err(InvalidPathConstruction::degenerate(&nodes[0]));
        }
        if let Some((index, &value)) = wait_times
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(InvalidPathConstruction::InvalidWaitTime { index, value });
        }

        let mut departure_times = Vec::with_capacity(nodes.len());
        let mut turning_times = Vec::with_capacity(nodes.len() - 1);
        let mut distance = 0.0;
        let mut duration = 0.0;
        let mut battery_consumption = 0.0;
        let mut heading = start.o;

        for i in 0..nodes.len() {
            duration += wait_times[i];
            battery_consumption += hardware.idle_battery_consumption(wait_times[i]);
            // Leaving a node does not include turning, which belongs to the next segment.
            departure_times.push(start_time_offset + duration);

            if let Some(next) = nodes.get(i + 1) {
                let segment = next - nodes[i];
                let rotation = rotation_of(&segment);
                let length = segment.norm();

                let turning = hardware.turning_duration(angle_difference(heading, rotation));
                let driving = hardware.driving_duration(length);

                distance += length;
                duration += turning + driving;
                battery_consumption += hardware.driving_battery_consumption(turning);
                battery_consumption += hardware.driving_battery_consumption(driving);

                turning_times.push(turning);
                heading = rotation;
            }
        }

        Ok(Path {
            nodes,
            wait_times,
            departure_times,
            turning_times,
            distance,
            duration,
            battery_consumption,
            start_time_offset,
            start,
            end,
            target_reservation_time: 0.0,
            settings: ReservationSettings::default(),
            hardware,
        })
    }

    /// Reserve the target for `time` seconds after arrival.
    pub fn with_target_reservation_time(mut self, time: f64) -> Self {
        self.target_reservation_time = time;
        self
    }

    pub fn with_reservation_settings(mut self, settings: ReservationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn nodes(&self) -> &[Point] {
        &self.nodes
    }

    pub fn wait_times(&self) -> &[f64] {
        &self.wait_times
    }

    /// Absolute time the robot leaves each node.
    pub fn departure_times(&self) -> &[f64] {
        &self.departure_times
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Total seconds from the start time until the end of the wait at the last node.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn battery_consumption(&self) -> f64 {
        self.battery_consumption
    }

    pub fn start_time_offset(&self) -> f64 {
        self.start_time_offset
    }

    pub fn arrival_time(&self) -> f64 {
        self.start_time_offset + self.duration
    }

    pub fn start(&self) -> OrientedPoint {
        self.start
    }

    pub fn end(&self) -> OrientedPoint {
        self.end
    }

    pub fn target_reservation_time(&self) -> f64 {
        self.target_reservation_time
    }

    pub fn reservation_settings(&self) -> &ReservationSettings {
        &self.settings
    }

    pub fn hardware_profile(&self) -> &Arc<dyn HardwareProfile> {
        &self.hardware
    }

    /// Converts the path into the reservations `owner` needs to drive it: one for the first node and
    /// for every node with a wait, one or more per segment, and the dwell area at the target if
    /// requested.
    pub fn generate_reservations(&self, owner: AgentId) -> Vec<TimedRectangle> {
        let s = &self.settings;
        let size = 2.0 * s.robot_radius;
        let margin = s.time_margin;
        let mut reservations = Vec::new();

        for (i, window) in self.nodes.windows(2).enumerate() {
            let (from, to) = (window[0], window[1]);
            let segment = to - from;
            let length = segment.norm();
            let direction = segment / length;
            let rotation = rotation_of(&segment);

            let departure = self.departure_times[i];
            let arrival_at_node = departure - self.wait_times[i];
            let drive_start = departure + self.turning_times[i];

            if self.wait_times[i] > 0.0 || i == 0 {
                reservations.push(TimedRectangle::reservation(
                    from,
                    vec2(size, size),
                    rotation,
                    s.robot_radius,
                    arrival_at_node - margin,
                    drive_start + margin,
                    owner,
                ));
            }

            let count = (length / s.max_reservation_length).ceil().max(1.0) as usize;
            let piece = length / count as f32;
            for k in 0..count {
                let begin = from + direction * (k as f32 * piece);
                let end = from + direction * ((k + 1) as f32 * piece);
                let center = na::center(&begin, &end);

                // The robot turns in place at the start of the first piece.
                let start_time = if k == 0 {
                    departure - margin
                } else {
                    drive_start + self.hardware.driving_duration(k as f32 * piece) - margin
                };
                let end_time = drive_start + self.hardware.driving_duration((k + 1) as f32 * piece) + margin;

                reservations.push(TimedRectangle::reservation(
                    center,
                    vec2(piece + size, size),
                    rotation,
                    s.robot_radius,
                    start_time,
                    end_time,
                    owner,
                ));
            }
        }

        if self.target_reservation_time > 0.0 {
            let arrival = self.arrival_time();
            let last = self.nodes[self.nodes.len() - 1];
            let center = last + direction_of(self.end.o) * s.target_offset;
            let length = (s.robot_radius + s.target_offset + s.target_length_margin) * 2.0;
            let width = (s.robot_radius + s.target_width_margin) * 2.0;

            reservations.push(TimedRectangle::reservation(
                center,
                vec2(length, width),
                self.end.o,
                s.robot_radius,
                arrival - margin,
                arrival + self.target_reservation_time + margin,
                owner,
            ));
        }

        reservations
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Path")
            .field("nodes", &self.nodes)
            .field("wait_times", &self.wait_times)
            .field("departure_times", &self.departure_times)
            .field("distance", &self.distance)
            .field("duration", &self.duration)
            .field("battery_consumption", &self.battery_consumption)
            .field("start_time_offset", &self.start_time_offset)
            .finish()
    }
}
