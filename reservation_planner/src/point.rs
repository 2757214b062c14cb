use std::f32::consts::PI;

use nalgebra as na;

pub type Point = na::Point2<f32>;
pub type Vector = na::Vector2<f32>;

#[inline(always)]
pub fn point2(x: f32, y: f32) -> Point {
    na::Point2::new(x, y)
}

#[inline(always)]
pub fn vec2(x: f32, y: f32) -> Vector {
    na::Vector2::new(x, y)
}

/// A position together with a heading. The heading `o` is in radians, counter-clockwise from the
/// positive x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedPoint {
    pub x: f32,
    pub y: f32,
    pub o: f32,
}

impl OrientedPoint {
    pub fn new(x: f32, y: f32, o: f32) -> Self {
        OrientedPoint { x, y, o }
    }

    pub fn from_point(p: Point, o: f32) -> Self {
        OrientedPoint { x: p.x, y: p.y, o }
    }

    #[inline(always)]
    pub fn point(&self) -> Point {
        point2(self.x, self.y)
    }

    /// Unit vector pointing along the heading.
    pub fn direction(&self) -> Vector {
        direction_of(self.o)
    }
}

impl From<OrientedPoint> for Point {
    fn from(p: OrientedPoint) -> Point {
        p.point()
    }
}

pub fn direction_of(angle: f32) -> Vector {
    vec2(angle.cos(), angle.sin())
}

/// Heading of `v` in radians, in `(-PI, PI]`.
pub fn rotation_of(v: &Vector) -> f32 {
    v.y.atan2(v.x)
}

/// Absolute difference between two headings, wrapped into `[0, PI]`.
pub fn angle_difference(a: f32, b: f32) -> f32 {
    let diff = (b - a).rem_euclid(2.0 * PI);
    if diff > PI {
        2.0 * PI - diff
    } else {
        diff
    }
}
