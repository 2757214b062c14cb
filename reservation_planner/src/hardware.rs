use serde::Deserialize;

/// Timing and battery model of a robot. All functions must be monotonic non-decreasing in their input.
pub trait HardwareProfile: Send + Sync {
    /// Seconds needed to drive `distance` meters in a straight line.
    fn driving_duration(&self, distance: f32) -> f64;

    /// Seconds needed to turn in place by `angle` radians (absolute value).
    fn turning_duration(&self, angle: f32) -> f64;

    fn driving_battery_consumption(&self, duration: f64) -> f64;

    fn idle_battery_consumption(&self, duration: f64) -> f64;
}

/// Constant speed and constant consumption rate model.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LinearHardwareProfile {
    /// m/s
    pub max_driving_speed: f32,
    /// rad/s
    pub max_turning_speed: f32,
    /// Battery percent per second while driving or turning.
    #[serde(default)]
    pub driving_consumption_rate: f64,
    /// Battery percent per second while standing still.
    #[serde(default)]
    pub idle_consumption_rate: f64,
}

impl LinearHardwareProfile {
    pub fn new(max_driving_speed: f32, max_turning_speed: f32) -> Self {
        assert!(max_driving_speed > 0.0, "driving speed must be positive, was {}", max_driving_speed);
        assert!(max_turning_speed > 0.0, "turning speed must be positive, was {}", max_turning_speed);
        LinearHardwareProfile {
            max_driving_speed,
            max_turning_speed,
            driving_consumption_rate: 0.0,
            idle_consumption_rate: 0.0,
        }
    }

    pub fn with_consumption(mut self, driving_rate: f64, idle_rate: f64) -> Self {
        self.driving_consumption_rate = driving_rate;
        self.idle_consumption_rate = idle_rate;
        self
    }
}

impl HardwareProfile for LinearHardwareProfile {
    fn driving_duration(&self, distance: f32) -> f64 {
        (distance.abs() / self.max_driving_speed) as f64
    }

    fn turning_duration(&self, angle: f32) -> f64 {
        (angle.abs() / self.max_turning_speed) as f64
    }

    fn driving_battery_consumption(&self, duration: f64) -> f64 {
        duration.max(0.0) * self.driving_consumption_rate
    }

    fn idle_battery_consumption(&self, duration: f64) -> f64 {
        duration.max(0.0) * self.idle_consumption_rate
    }
}
