use std::cmp::Ordering;
use std::ops::Range;

use nalgebra as na;
use rand::Rng;

use crate::point::Point;

pub(crate) const EPSILON: f32 = 1e-4;

pub(crate) fn gen_random_in_range<R: Rng + ?Sized>(rng: &mut R, range: Range<Point>) -> Point {
    let rand_vec = rng.gen::<na::Vector2<f32>>();
    let s = range.start.coords;
    let e = range.end.coords;
    na::Point::from(s + rand_vec.component_mul(&(e - s)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrdF64(pub f64);

impl Eq for OrdF64 {}

impl PartialOrd for OrdF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

pub trait ToOrd {
    fn to_ord(self) -> OrdF64;
}

impl ToOrd for f64 {
    #[inline(always)]
    fn to_ord(self) -> OrdF64 {
        OrdF64(self)
    }
}
