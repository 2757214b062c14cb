use thiserror::Error;

use crate::point::Point;

/// Reasons a [`Path`](crate::path::Path) cannot be built from a node sequence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidPathConstruction {
    #[error("got {nodes} nodes but {wait_times} wait times")]
    MismatchedLengths { nodes: usize, wait_times: usize },

    #[error("a path needs at least 2 nodes, got {0}")]
    TooFewNodes(usize),

    #[error("the first two nodes are identical ({x}, {y})")]
    DegenerateFirstSegment { x: f32, y: f32 },

    #[error("wait time {value} at node {index} is negative or not finite")]
    InvalidWaitTime { index: usize, value: f64 },
}

impl InvalidPathConstruction {
    pub(crate) fn degenerate(p: &Point) -> Self {
        InvalidPathConstruction::DegenerateFirstSegment { x: p.x, y: p.y }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    #[error("point ({x}, {y}) is not close to any waypoint of the map")]
    EndpointNotInGraph { x: f32, y: f32 },

    #[error("no feasible path from ({from_x}, {from_y}) to ({to_x}, {to_y}) under the current reservations")]
    NoFeasiblePath {
        from_x: f32,
        from_y: f32,
        to_x: f32,
        to_y: f32,
    },

    #[error("start and target coincide at ({x}, {y})")]
    DegenerateRoute { x: f32, y: f32 },

    #[error("invalid path: {0}")]
    InvalidPath(#[from] InvalidPathConstruction),
}

impl PlanningError {
    pub(crate) fn not_in_graph(p: &Point) -> Self {
        PlanningError::EndpointNotInGraph { x: p.x, y: p.y }
    }

    pub(crate) fn no_feasible_path(from: &Point, to: &Point) -> Self {
        PlanningError::NoFeasiblePath {
            from_x: from.x,
            from_y: from.y,
            to_x: to.x,
            to_y: to.y,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not parse planner configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid planner configuration: {0}")]
    Invalid(String),
}

pub type PlanningResult<T> = Result<T, PlanningError>;
