pub mod builder;
pub mod config;
pub mod error;
pub mod graph;
pub mod hardware;
pub mod logger;
pub mod map;
pub mod obstacle;
pub mod path;
pub mod point;
pub mod rectangle;
pub mod solvers;

mod utils;

pub use builder::ReservationMapBuilder;
pub use config::PlannerConfig;
pub use error::{ConfigError, InvalidPathConstruction, PlanningError, PlanningResult};
pub use hardware::{HardwareProfile, LinearHardwareProfile};
pub use logger::{DynLogger, LogAdapter, NoopLogger, PlanningLogger};
pub use map::{Endpoint, ReservationMap, TimedLineOfSightResult, Tray};
pub use path::{Path, ReservationSettings};
pub use point::{OrientedPoint, Point};
pub use rectangle::TimedRectangle;
pub use solvers::{PathSolver, PlanningRequest, ThetaStarSolver};

/// Identifies a robot. Reservations are owned by exactly one agent.
pub type AgentId = u32;
