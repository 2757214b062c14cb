use std::collections::HashMap;
use std::ops::{Index, IndexMut};

/// Search state of one waypoint.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SearchNode {
    pub(crate) waypoint: usize,
    /// Best known arrival time.
    pub(crate) arrival: f64,
    /// Arena index of the node this one is reached from.
    pub(crate) prev: Option<usize>,
    /// Absolute time the robot leaves `prev` towards this node.
    pub(crate) departure_from_prev: f64,
}

impl SearchNode {
    fn unreached(waypoint: usize) -> Self {
        SearchNode {
            waypoint,
            arrival: f64::INFINITY,
            prev: None,
            departure_from_prev: f64::INFINITY,
        }
    }
}

/// Holds every search node of a single planning call. Nodes refer to each other by index, and
/// there is exactly one node per waypoint.
#[derive(Debug, Default)]
pub(crate) struct SearchArena {
    nodes: Vec<SearchNode>,
    by_waypoint: HashMap<usize, usize>,
}

impl SearchArena {
    pub(crate) fn new() -> Self {
        SearchArena::default()
    }

    pub(crate) fn get_or_insert(&mut self, waypoint: usize) -> usize {
        let nodes = &mut self.nodes;
        *self.by_waypoint.entry(waypoint).or_insert_with(|| {
            nodes.push(SearchNode::unreached(waypoint));
            nodes.len() - 1
        })
    }

    /// Arena indices from the root of the chain that ends at `idx`, root first.
    pub(crate) fn chain(&self, idx: usize) -> Vec<usize> {
        let mut chain = vec![idx];
        let mut curr = idx;
        while let Some(prev) = self.nodes[curr].prev {
            debug_assert!(chain.len() <= self.nodes.len(), "cycle in predecessor chain");
            chain.push(prev);
            curr = prev;
        }
        chain.reverse();
        chain
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl Index<usize> for SearchArena {
    type Output = SearchNode;

    fn index(&self, idx: usize) -> &SearchNode {
        &self.nodes[idx]
    }
}

impl IndexMut<usize> for SearchArena {
    fn index_mut(&mut self, idx: usize) -> &mut SearchNode {
        &mut self.nodes[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_node_per_waypoint() {
        let mut arena = SearchArena::new();
        let a = arena.get_or_insert(12);
        let b = arena.get_or_insert(3);
        assert_eq!(arena.get_or_insert(12), a);
        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena[b].waypoint, 3);
        assert_eq!(arena[b].arrival, f64::INFINITY);
    }

    #[test]
    fn chain_starts_at_root() {
        let mut arena = SearchArena::new();
        let root = arena.get_or_insert(0);
        let mid = arena.get_or_insert(1);
        let leaf = arena.get_or_insert(2);
        arena[mid].prev = Some(root);
        arena[leaf].prev = Some(mid);

        assert_eq!(arena.chain(leaf), vec![root, mid, leaf]);
        assert_eq!(arena.chain(root), vec![root]);
    }
}
