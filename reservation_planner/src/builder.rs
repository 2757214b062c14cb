use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::error::ConfigError;
use crate::graph::WaypointGraph;
use crate::hardware::{HardwareProfile, LinearHardwareProfile};
use crate::logger::{default_logger, DynLogger};
use crate::map::ReservationMap;
use crate::point::{Point, Vector};
use crate::rectangle::TimedRectangle;

/// Fluent construction of a [`ReservationMap`].
pub struct ReservationMapBuilder {
    config: PlannerConfig,
    obstacles: Vec<TimedRectangle>,
    // Boxes inflated by the robot radius once the configuration is final.
    boxes: Vec<(Point, Vector, f32)>,
    graph: Option<WaypointGraph>,
    hardware: Option<Arc<dyn HardwareProfile>>,
    logger: Option<DynLogger>,
}

impl Default for ReservationMapBuilder {
    fn default() -> Self {
        ReservationMapBuilder::new()
    }
}

impl ReservationMapBuilder {
    pub fn new() -> ReservationMapBuilder {
        ReservationMapBuilder::from_config(PlannerConfig::default())
    }

    pub fn from_config(config: PlannerConfig) -> ReservationMapBuilder {
        ReservationMapBuilder {
            config,
            obstacles: Vec::new(),
            boxes: Vec::new(),
            graph: None,
            hardware: None,
            logger: None,
        }
    }

    pub fn from_toml_str(source: &str) -> Result<ReservationMapBuilder, ConfigError> {
        Ok(ReservationMapBuilder::from_config(PlannerConfig::from_toml_str(source)?))
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.config.margin = margin;
        self
    }

    pub fn with_robot_radius(mut self, radius: f32) -> Self {
        self.config.robot_radius = radius;
        self
    }

    pub fn with_grid_resolution(mut self, resolution: f32) -> Self {
        self.config.grid_resolution = resolution;
        self
    }

    pub fn with_max_adjacency_distance(mut self, distance: f32) -> Self {
        self.config.max_adjacency_distance = distance;
        self
    }

    pub fn with_snap_tolerance(mut self, tolerance: f32) -> Self {
        self.config.snap_tolerance = tolerance;
        self
    }

    /// Adds an obstacle exactly as given, with its own inflation.
    pub fn add_obstacle(mut self, obstacle: TimedRectangle) -> Self {
        assert!(obstacle.is_static(), "obstacles cannot have a time interval");
        self.obstacles.push(obstacle);
        self
    }

    pub fn extend_obstacles(mut self, obstacles: impl IntoIterator<Item = TimedRectangle>) -> Self {
        for obstacle in obstacles {
            self = self.add_obstacle(obstacle);
        }
        self
    }

    /// Adds a box that is inflated by the robot radius.
    pub fn add_box(mut self, center: Point, size: Vector, rotation: f32) -> Self {
        self.boxes.push((center, size, rotation));
        self
    }

    /// Use `graph` instead of the grid graph.
    pub fn with_graph(mut self, graph: WaypointGraph) -> Self {
        self.graph.replace(graph);
        self
    }

    pub fn with_hardware_profile(mut self, hardware: Arc<dyn HardwareProfile>) -> Self {
        self.hardware.replace(hardware);
        self
    }

    pub fn with_logger(mut self, logger: DynLogger) -> Self {
        self.logger.replace(logger);
        self
    }

    pub fn get_config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn get_obstacles(&self) -> Vec<TimedRectangle> {
        let radius = self.config.robot_radius;
        self.obstacles
            .iter()
            .cloned()
            .chain(
                self.boxes
                    .iter()
                    .map(|&(center, size, rotation)| TimedRectangle::obstacle(center, size, rotation, radius)),
            )
            .collect()
    }

    /// Defaults to a robot driving at 1 m/s and turning at 1 rad/s.
    pub fn get_hardware_profile(&self) -> Arc<dyn HardwareProfile> {
        self.hardware
            .clone()
            .unwrap_or_else(|| Arc::new(LinearHardwareProfile::new(1.0, 1.0)))
    }

    pub fn get_logger(&self) -> DynLogger {
        self.logger.clone().unwrap_or_else(default_logger)
    }

    pub fn build(self) -> Result<ReservationMap, ConfigError> {
        self.config.validate()?;

        let obstacles = self.get_obstacles();
        let hardware = self.get_hardware_profile();
        let logger = self.get_logger();

        Ok(match self.graph {
            Some(graph) => ReservationMap::with_graph(self.config, obstacles, graph, hardware, logger),
            None => ReservationMap::new(self.config, obstacles, hardware, logger),
        })
    }
}
