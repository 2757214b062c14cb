use itertools::Itertools;

use crate::point::{point2, Point, Vector};

pub trait Obstacle {
    fn is_inside(&self, p: &Point) -> bool;

    /// True if any point of the closed segment `a`-`b` lies in the obstacle.
    fn intersects_segment(&self, a: &Point, b: &Point) -> bool;
}

impl<T: Obstacle> Obstacle for &T {
    #[inline(always)]
    fn is_inside(&self, p: &Point) -> bool {
        (**self).is_inside(p)
    }

    #[inline(always)]
    fn intersects_segment(&self, a: &Point, b: &Point) -> bool {
        (**self).intersects_segment(a, b)
    }
}

/// Axis aligned box, inclusive on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_corner: Point,
    pub max_corner: Point,
}

impl BBox {
    pub fn new(min_corner: Point, max_corner: Point) -> BBox {
        BBox {
            min_corner,
            max_corner,
        }
    }

    pub fn from_points<'a, I>(points: I) -> BBox
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut min = point2(f32::INFINITY, f32::INFINITY);
        let mut max = point2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        BBox::new(min, max)
    }

    pub fn of_segment(a: &Point, b: &Point) -> BBox {
        BBox::from_points([a, b])
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.min_corner.x <= other.max_corner.x
            && other.min_corner.x <= self.max_corner.x
            && self.min_corner.y <= other.max_corner.y
            && other.min_corner.y <= self.max_corner.y
    }

    /// Slab test of the segment `a`-`b` against the box.
    fn slab_test(&self, a: &Point, b: &Point) -> bool {
        let dir = b - a;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for axis in 0..2 {
            let (origin, d) = (a[axis], dir[axis]);
            let (lo, hi) = (self.min_corner[axis], self.max_corner[axis]);

            if d.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return false;
                }
            } else {
                let t1 = (lo - origin) / d;
                let t2 = (hi - origin) / d;
                t_min = t_min.max(t1.min(t2));
                t_max = t_max.min(t1.max(t2));
                if t_min > t_max {
                    return false;
                }
            }
        }

        true
    }
}

impl Obstacle for BBox {
    fn is_inside(&self, p: &Point) -> bool {
        (self.min_corner.x..=self.max_corner.x).contains(&p.x)
            && (self.min_corner.y..=self.max_corner.y).contains(&p.y)
    }

    fn intersects_segment(&self, a: &Point, b: &Point) -> bool {
        self.slab_test(a, b)
    }
}

#[inline(always)]
fn cross(o: &Point, a: &Point, b: &Point) -> f32 {
    let oa: Vector = a - o;
    let ob: Vector = b - o;
    oa.x * ob.y - oa.y * ob.x
}

fn on_segment(a: &Point, b: &Point, p: &Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// True if the closed segments `a`-`b` and `c`-`d` share at least one point.
pub fn segments_intersect(a: &Point, b: &Point, c: &Point, d: &Point) -> bool {
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(c, d, a))
        || (d2 == 0.0 && on_segment(c, d, b))
        || (d3 == 0.0 && on_segment(a, b, c))
        || (d4 == 0.0 && on_segment(a, b, d))
}

/// Point in convex polygon test. The vertices may be in either winding order; the boundary counts as
/// inside.
pub fn convex_polygon_contains(vertices: &[Point], p: &Point) -> bool {
    let mut has_pos = false;
    let mut has_neg = false;

    for (v1, v2) in vertices.iter().circular_tuple_windows() {
        let c = cross(v1, v2, p);
        has_pos |= c > 0.0;
        has_neg |= c < 0.0;
        if has_pos && has_neg {
            return false;
        }
    }

    true
}

/// True if the segment touches the convex polygon, either by crossing one of its edges or by lying
/// inside of it.
pub fn segment_intersects_convex_polygon(vertices: &[Point], a: &Point, b: &Point) -> bool {
    if convex_polygon_contains(vertices, a) || convex_polygon_contains(vertices, b) {
        return true;
    }

    vertices
        .iter()
        .circular_tuple_windows()
        .any(|(v1, v2)| segments_intersect(a, b, v1, v2))
}
