use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Map and planner settings. Every field is optional in the TOML source and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Map extent along x (meters). The map spans `[0, width]`.
    pub width: f32,
    /// Map extent along y (meters). The map spans `[0, height]`.
    pub height: f32,
    /// Border that is never used by waypoints or random points.
    pub margin: f32,

    pub robot_radius: f32,
    /// Distance between neighbouring waypoints of the grid graph.
    pub grid_resolution: f32,
    /// Waypoints farther apart than this are never connected directly.
    pub max_adjacency_distance: f32,
    /// Maximum distance between a query endpoint and its nearest waypoint.
    pub snap_tolerance: f32,

    /// Seconds added on both ends of every reservation.
    pub reservation_time_margin: f64,
    /// Long segments are split into reservations of at most this length.
    pub max_reservation_length: f32,
    /// A route must leave a reserved area this many seconds before the reservation starts.
    pub upcoming_obstacle_clearance: f64,
    /// How long the start point is checked for foreign reservations before the search starts.
    pub initial_wait_probe: f64,
    /// Distance between a tray and the point a robot approaches it from.
    pub tray_approach_distance: f32,

    /// Forward offset of the dwell reservation at the target.
    pub target_offset: f32,
    pub target_length_margin: f32,
    pub target_width_margin: f32,

    pub random_point_attempts: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            width: 10.0,
            height: 10.0,
            margin: 0.0,
            robot_radius: 0.25,
            grid_resolution: 0.5,
            max_adjacency_distance: 0.75,
            snap_tolerance: 1.0,
            reservation_time_margin: 0.25,
            max_reservation_length: 1.0,
            upcoming_obstacle_clearance: 0.5,
            initial_wait_probe: 0.5,
            tray_approach_distance: 0.5,
            target_offset: 0.3,
            target_length_margin: 0.08,
            target_width_margin: 0.2,
            random_point_attempts: 1000,
        }
    }
}

impl PlannerConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("robot_radius", self.robot_radius),
            ("grid_resolution", self.grid_resolution),
            ("max_adjacency_distance", self.max_adjacency_distance),
            ("max_reservation_length", self.max_reservation_length),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("`{}` must be positive, was {}", name, value)));
            }
        }

        let non_negative = [
            ("margin", self.margin as f64),
            ("snap_tolerance", self.snap_tolerance as f64),
            ("reservation_time_margin", self.reservation_time_margin),
            ("upcoming_obstacle_clearance", self.upcoming_obstacle_clearance),
            ("initial_wait_probe", self.initial_wait_probe),
            ("tray_approach_distance", self.tray_approach_distance as f64),
            ("target_offset", self.target_offset as f64),
            ("target_length_margin", self.target_length_margin as f64),
            ("target_width_margin", self.target_width_margin as f64),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Invalid(format!("`{}` must not be negative, was {}", name, value)));
            }
        }

        if 2.0 * self.margin >= self.width.min(self.height) {
            return Err(ConfigError::Invalid(format!(
                "margin {} leaves no usable area in a {}x{} map",
                self.margin, self.width, self.height
            )));
        }

        if self.random_point_attempts == 0 {
            return Err(ConfigError::Invalid("`random_point_attempts` must be at least 1".to_owned()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_gives_defaults() {
        let config = PlannerConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn partial_source_overrides_fields() {
        let config = PlannerConfig::from_toml_str("width = 25.0\nrobot_radius = 0.4\n").unwrap();
        assert_eq!(config.width, 25.0);
        assert_eq!(config.robot_radius, 0.4);
        assert_eq!(config.height, PlannerConfig::default().height);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            PlannerConfig::from_toml_str("grid_resolution = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PlannerConfig::from_toml_str("margin = 6.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PlannerConfig::from_toml_str("width = \"wide\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
