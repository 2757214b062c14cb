use nalgebra as na;

use crate::HasCoords;

macro_rules! impl_default_with_new {
    (impl$(<$($generics:tt),*>)? Default for $($type:tt)*) => {
        impl$(<$($generics),*>)? Default for $($type)* {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

/// This trait defines an interface for any algorithm query in the KD-Tree. In a
/// KD-Tree, the `query` function takes a visitor that implements this trait as
/// well as a reference point that is used to navigate the tree. In the visitor,
/// this reference point is called `other`.
///
/// The `accept` function may modify the visitor in some way. The only way to
/// get nodes out of the tree is through the accept function, which also receives
/// the stable index of the node.
///
/// `radius_sq` should return the squared radius around the reference point that
/// still needs to be searched through. It is assumed to be non-increasing during
/// a single query.
///
/// The lifetime `'a` is the lifetime of the KD-Tree.
pub trait Visitor<'a, P, const N: usize> {
    /// The final result of the visitor.
    type Result;

    fn radius_sq(&self, other: &na::Point<f32, N>) -> f32;

    fn accept(&mut self, index: usize, point: &'a P, other: &na::Point<f32, N>);

    /// Consume the visitor into the final result.
    fn result(self) -> Self::Result;
}

/// A visitor that returns the nearest point to the reference point, together with its index.
pub struct NearestIndexedVisitor<'a, P> {
    min: Option<(usize, &'a P, f32)>,
}

impl<'a, P> NearestIndexedVisitor<'a, P> {
    pub fn new() -> Self {
        NearestIndexedVisitor { min: None }
    }
}

impl_default_with_new! { impl<'a, P> Default for NearestIndexedVisitor<'a, P> }

impl<'a, P, const N: usize> Visitor<'a, P, N> for NearestIndexedVisitor<'a, P>
where
    P: HasCoords<N>,
{
    type Result = Option<(usize, &'a P)>;

    fn radius_sq(&self, _: &na::Point<f32, N>) -> f32 {
        self.min
            .map(|(_, _, dist_sq)| dist_sq)
            .unwrap_or(f32::INFINITY)
    }

    fn accept(&mut self, index: usize, point: &'a P, other: &na::Point<f32, N>) {
        let dist_sq = na::distance_squared(&point.point(), other);
        let is_better = match self.min {
            Some((min_idx, _, min_dist)) => dist_sq < min_dist || (dist_sq == min_dist && index < min_idx),
            None => true,
        };
        if is_better {
            self.min.replace((index, point, dist_sq));
        }
    }

    fn result(self) -> Self::Result {
        self.min.map(|(idx, point, _)| (idx, point))
    }
}

/// A visitor that collects the indices of all points within `radius` of the reference point.
pub struct WithinRadiusIndicesVisitor {
    within_radius: Vec<usize>,
    radius: f32,
}

impl WithinRadiusIndicesVisitor {
    pub fn new(radius: f32) -> Self {
        WithinRadiusIndicesVisitor {
            within_radius: Vec::new(),
            radius,
        }
    }
}

impl<'a, P, const N: usize> Visitor<'a, P, N> for WithinRadiusIndicesVisitor
where
    P: HasCoords<N>,
{
    type Result = Vec<usize>;

    fn radius_sq(&self, _: &na::Point<f32, N>) -> f32 {
        self.radius.powi(2)
    }

    fn accept(&mut self, index: usize, point: &'a P, other: &na::Point<f32, N>) {
        if na::distance_squared(&point.point(), other) <= self.radius.powi(2) {
            self.within_radius.push(index);
        }
    }

    fn result(self) -> Vec<usize> {
        self.within_radius
    }
}
