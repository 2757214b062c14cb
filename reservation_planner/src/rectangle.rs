use std::f32::consts::FRAC_PI_2;

use crate::obstacle::{self, BBox, Obstacle};
use crate::point::{direction_of, vec2, Point, Vector};
use crate::utils::EPSILON;
use crate::AgentId;

/// Half open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeInterval {
    pub start: f64,
    pub end: f64,
}

impl TimeInterval {
    pub fn new(start: f64, end: f64) -> Self {
        assert!(end >= start, "time interval ends before it starts: [{}, {})", start, end);
        TimeInterval { start, end }
    }

    #[inline]
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.start < end && start < self.end
    }
}

/// An oriented rectangle that is either a permanent obstacle (no interval, no owner) or a reservation
/// of an agent for a bounded time interval.
///
/// All collision queries run against the *inflated* rectangle, which is grown by `inflation` on every
/// side so that a robot can be treated as a single point.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedRectangle {
    pos: Point,
    size: Vector,
    rotation: f32,
    inflation: f32,

    interval: Option<TimeInterval>,
    owner: Option<AgentId>,

    points_inflated: [Point; 4],
    points_non_inflated: [Point; 4],
    is_axis_aligned: bool,
    bbox_inflated: BBox,
}

impl TimedRectangle {
    /// A permanent obstacle. `size.x` is measured along `rotation`, `size.y` across it.
    pub fn obstacle(pos: Point, size: Vector, rotation: f32, inflation: f32) -> Self {
        Self::build(pos, size, rotation, inflation, None, None)
    }

    /// A reservation of `owner` for `[start_time, end_time)`.
    ///
    /// Panics if `end_time < start_time`.
    pub fn reservation(
        pos: Point,
        size: Vector,
        rotation: f32,
        inflation: f32,
        start_time: f64,
        end_time: f64,
        owner: AgentId,
    ) -> Self {
        Self::build(
            pos,
            size,
            rotation,
            inflation,
            Some(TimeInterval::new(start_time, end_time)),
            Some(owner),
        )
    }

    fn build(
        pos: Point,
        size: Vector,
        rotation: f32,
        inflation: f32,
        interval: Option<TimeInterval>,
        owner: Option<AgentId>,
    ) -> Self {
        let points_non_inflated = corners(&pos, &size, rotation);
        let points_inflated = corners(&pos, &(size + vec2(2.0 * inflation, 2.0 * inflation)), rotation);

        let quarter_turns = rotation / FRAC_PI_2;
        let is_axis_aligned = (quarter_turns - quarter_turns.round()).abs() < EPSILON;

        TimedRectangle {
            pos,
            size,
            rotation,
            inflation,
            interval,
            owner,
            points_inflated,
            points_non_inflated,
            is_axis_aligned,
            bbox_inflated: BBox::from_points(&points_inflated),
        }
    }

    pub fn points_inflated(&self) -> &[Point; 4] {
        &self.points_inflated
    }

    pub fn points_non_inflated(&self) -> &[Point; 4] {
        &self.points_non_inflated
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn size(&self) -> Vector {
        self.size
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn inflation(&self) -> f32 {
        self.inflation
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.is_axis_aligned
    }

    pub fn min_x_inflated(&self) -> f32 {
        self.bbox_inflated.min_corner.x
    }

    pub fn max_x_inflated(&self) -> f32 {
        self.bbox_inflated.max_corner.x
    }

    pub fn min_y_inflated(&self) -> f32 {
        self.bbox_inflated.min_corner.y
    }

    pub fn max_y_inflated(&self) -> f32 {
        self.bbox_inflated.max_corner.y
    }

    pub fn interval(&self) -> Option<TimeInterval> {
        self.interval
    }

    /// Start of the interval, `-inf` for permanent obstacles.
    pub fn start_time(&self) -> f64 {
        self.interval.map(|i| i.start).unwrap_or(f64::NEG_INFINITY)
    }

    /// End of the interval, `+inf` for permanent obstacles.
    pub fn end_time(&self) -> f64 {
        self.interval.map(|i| i.end).unwrap_or(f64::INFINITY)
    }

    /// Earliest time the space covered by this rectangle is free again.
    pub fn free_after(&self) -> f64 {
        self.end_time()
    }

    pub fn owner(&self) -> Option<AgentId> {
        self.owner
    }

    pub fn is_static(&self) -> bool {
        self.interval.is_none()
    }

    pub fn is_expired(&self, now: f64) -> bool {
        self.end_time() < now
    }

    /// Whether this rectangle blocks `agent` at some point in `[start, end]`. Reservations never block
    /// their own owner and permanent obstacles block everyone at all times.
    pub fn overlaps_time_range(&self, start: f64, end: f64, agent: AgentId) -> bool {
        if self.owner == Some(agent) {
            return false;
        }
        match self.interval {
            Some(interval) => interval.overlaps(start, end),
            None => true,
        }
    }

    /// Point test against the rectangle as it was given, without inflation.
    pub fn contains_non_inflated(&self, p: &Point) -> bool {
        obstacle::convex_polygon_contains(&self.points_non_inflated, p)
    }
}

impl Obstacle for TimedRectangle {
    fn is_inside(&self, p: &Point) -> bool {
        if !self.bbox_inflated.is_inside(p) {
            return false;
        }
        self.is_axis_aligned || obstacle::convex_polygon_contains(&self.points_inflated, p)
    }

    fn intersects_segment(&self, a: &Point, b: &Point) -> bool {
        if !self.bbox_inflated.intersects(&BBox::of_segment(a, b)) {
            return false;
        }

        if self.is_axis_aligned {
            self.bbox_inflated.intersects_segment(a, b)
        } else {
            obstacle::segment_intersects_convex_polygon(&self.points_inflated, a, b)
        }
    }
}

fn corners(pos: &Point, size: &Vector, rotation: f32) -> [Point; 4] {
    let dir = direction_of(rotation);
    let along = dir * (size.x / 2.0);
    let across = vec2(-dir.y, dir.x) * (size.y / 2.0);

    [
        pos - along - across,
        pos + along - across,
        pos + along + across,
        pos - along + across,
    ]
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_4;

    use super::*;
    use crate::point::point2;

    #[test]
    fn axis_aligned_corners() {
        let rect = TimedRectangle::obstacle(point2(1.0, 1.0), vec2(2.0, 1.0), 0.0, 0.5);
        assert!(rect.is_axis_aligned());
        assert!((rect.min_x_inflated() - -0.5).abs() < 1e-5);
        assert!((rect.max_x_inflated() - 2.5).abs() < 1e-5);
        assert!((rect.min_y_inflated() - 0.0).abs() < 1e-5);
        assert!((rect.max_y_inflated() - 2.0).abs() < 1e-5);
        assert!(rect.is_inside(&point2(2.4, 1.9)));
        assert!(!rect.contains_non_inflated(&point2(2.4, 1.9)));
    }

    #[test]
    fn quarter_turn_is_axis_aligned() {
        let rect = TimedRectangle::obstacle(point2(0.0, 0.0), vec2(4.0, 1.0), FRAC_PI_2, 0.0);
        assert!(rect.is_axis_aligned());
        assert!(rect.is_inside(&point2(0.0, 1.9)));
        assert!(!rect.is_inside(&point2(1.9, 0.0)));
    }

    #[test]
    fn rotated_rectangle_uses_exact_test() {
        let rect = TimedRectangle::obstacle(point2(0.0, 0.0), vec2(2.0, 2.0), FRAC_PI_4, 0.0);
        assert!(!rect.is_axis_aligned());
        // Inside the bounding box but outside the diamond.
        assert!(!rect.is_inside(&point2(1.2, 1.2)));
        assert!(rect.is_inside(&point2(1.3, 0.0)));
        assert!(!rect.intersects_segment(&point2(1.1, 1.3), &point2(1.3, 1.1)));
        assert!(rect.intersects_segment(&point2(-2.0, 0.0), &point2(2.0, 0.0)));
    }

    #[test]
    fn owner_never_blocks_itself() {
        let rect = TimedRectangle::reservation(point2(0.0, 0.0), vec2(1.0, 1.0), 0.0, 0.0, 10.0, 20.0, 3);
        assert!(rect.overlaps_time_range(15.0, 16.0, 4));
        assert!(!rect.overlaps_time_range(15.0, 16.0, 3));
        assert!(!rect.overlaps_time_range(20.0, 21.0, 4));
        assert!(!rect.overlaps_time_range(5.0, 10.0, 4));
        assert_eq!(rect.free_after(), 20.0);
    }

    #[test]
    fn static_obstacles_always_overlap() {
        let rect = TimedRectangle::obstacle(point2(0.0, 0.0), vec2(1.0, 1.0), 0.0, 0.0);
        assert!(rect.overlaps_time_range(-1e9, 1e9, 1));
        assert!(!rect.is_expired(1e12));
        assert_eq!(rect.free_after(), f64::INFINITY);
    }

    #[test]
    #[should_panic]
    fn reversed_interval_panics() {
        TimedRectangle::reservation(point2(0.0, 0.0), vec2(1.0, 1.0), 0.0, 0.0, 20.0, 10.0, 3);
    }
}
