pub mod visitor;

use nalgebra as na;

pub use visitor::Visitor;

use visitor::{NearestIndexedVisitor, WithinRadiusIndicesVisitor};

pub trait HasCoords<const N: usize> {
    fn coords(&self) -> [f32; N];

    fn point(&self) -> na::Point<f32, N> {
        self.coords().into()
    }

    fn get_coord(&self, axis: usize) -> f32 {
        self.coords()[axis]
    }
}

impl<const N: usize> HasCoords<N> for na::Point<f32, N> {
    #[inline]
    fn coords(&self) -> [f32; N] {
        let mut array = [0.0; N];
        array.copy_from_slice(self.coords.as_slice());
        array
    }
}

///
/// A K-D Tree that stores its nodes in a single vector. Every point keeps the index it was given on
/// insertion for the whole lifetime of the tree, so callers can use that index as a stable key into
/// their own tables. Points inserted one at a time may make the tree unbalanced.
///
#[derive(Debug, Clone)]
pub struct KDTree<P, const N: usize> {
    nodes: Vec<Node<P>>,
    root: Option<usize>,
}

#[derive(Debug, Clone)]
struct Node<P> {
    data: P,
    left: Option<usize>,
    right: Option<usize>,
}

impl<P> Node<P> {
    fn new(data: P) -> Self {
        Node {
            data,
            left: None,
            right: None,
        }
    }
}

impl<P, const N: usize> Default for KDTree<P, N> {
    fn default() -> Self {
        KDTree {
            nodes: Vec::new(),
            root: None,
        }
    }
}

impl<P, const N: usize> KDTree<P, N>
where
    P: HasCoords<N>,
{
    #[inline]
    pub fn new() -> KDTree<P, N> {
        KDTree::default()
    }

    /// Builds a balanced tree from `points`. The index of each point is its position in `points`.
    pub fn from_vec(points: Vec<P>) -> KDTree<P, N> {
        let mut nodes: Vec<Node<P>> = points.into_iter().map(Node::new).collect();
        let mut indices: Vec<usize> = (0..nodes.len()).collect();
        let root = build_balanced::<P, N>(&mut nodes, &mut indices, 0);
        KDTree { nodes, root }
    }

    /// Inserts a point into the tree and returns its index.
    pub fn insert(&mut self, p: P) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node::new(p));
        self.link(idx);
        idx
    }

    pub fn query<'a, V>(&'a self, p: &na::Point<f32, N>, mut vis: V) -> V::Result
    where
        V: Visitor<'a, P, N>,
    {
        if let Some(root) = self.root {
            self.query_node(root, &mut vis, p, 0);
        }
        vis.result()
    }

    pub fn find_nearest(&self, p: &na::Point<f32, N>) -> Option<&P> {
        self.query(p, NearestIndexedVisitor::new())
            .map(|(_, point)| point)
    }

    pub fn find_nearest_index(&self, p: &na::Point<f32, N>) -> Option<usize> {
        self.query(p, NearestIndexedVisitor::new())
            .map(|(idx, _)| idx)
    }

    pub fn find_indices_within_radius(&self, p: &na::Point<f32, N>, radius: f32) -> Vec<usize> {
        self.query(p, WithinRadiusIndicesVisitor::new(radius))
    }

    #[inline(always)]
    pub fn get_point(&self, idx: usize) -> &P {
        &self.nodes[idx].data
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn link(&mut self, idx: usize) {
        let mut curr = match self.root {
            Some(root) => root,
            None => {
                self.root = Some(idx);
                return;
            }
        };

        let mut depth = 0;
        loop {
            let axis = depth % N;
            let goes_left = self.nodes[idx].data.get_coord(axis) <= self.nodes[curr].data.get_coord(axis);
            let slot = if goes_left {
                &mut self.nodes[curr].left
            } else {
                &mut self.nodes[curr].right
            };

            match *slot {
                Some(child) => curr = child,
                None => {
                    *slot = Some(idx);
                    return;
                }
            }
            depth += 1;
        }
    }

    fn query_node<'a, V>(&'a self, idx: usize, visitor: &mut V, p: &na::Point<f32, N>, depth: usize)
    where
        V: Visitor<'a, P, N>,
    {
        let node = &self.nodes[idx];
        let axis = depth % N;

        let p_ax = p[axis];
        let m_ax = node.data.get_coord(axis);

        // We first follow the axis comparison to get a first candidate.
        let (fst, snd) = if p_ax <= m_ax {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(child) = fst {
            self.query_node(child, visitor, p, depth + 1);
        }

        if na::distance_squared(&node.data.point(), p) <= visitor.radius_sq(p) {
            visitor.accept(idx, &node.data, p);
        }

        if visitor.radius_sq(p) >= (p_ax - m_ax).powi(2) {
            if let Some(child) = snd {
                self.query_node(child, visitor, p, depth + 1);
            }
        }
    }
}

fn build_balanced<P, const N: usize>(
    nodes: &mut [Node<P>],
    indices: &mut [usize],
    depth: usize,
) -> Option<usize>
where
    P: HasCoords<N>,
{
    if indices.is_empty() {
        return None;
    }

    let axis = depth % N;
    indices.sort_unstable_by(|&a, &b| {
        nodes[a].data.get_coord(axis).total_cmp(&nodes[b].data.get_coord(axis))
    });

    // Everything equal to the median on this axis must end up on its left.
    let mut mid = indices.len() / 2;
    while mid + 1 < indices.len()
        && nodes[indices[mid + 1]].data.get_coord(axis) == nodes[indices[mid]].data.get_coord(axis)
    {
        mid += 1;
    }

    let median = indices[mid];
    let (left, rest) = indices.split_at_mut(mid);
    let right = &mut rest[1..];

    let left = build_balanced::<P, N>(nodes, left, depth + 1);
    let right = build_balanced::<P, N>(nodes, right, depth + 1);
    nodes[median].left = left;
    nodes[median].right = right;

    Some(median)
}
