use std::sync::Arc;

/// Logging port of the planner. The map and the planner only ever log through this trait so that the
/// embedding application decides where messages end up.
pub trait PlanningLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn PlanningLogger>;

/// Forwards every message to the `log` facade under the `reservation_planner` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAdapter;

impl PlanningLogger for LogAdapter {
    fn info(&self, msg: &str) {
        log::info!(target: "reservation_planner", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!(target: "reservation_planner", "{}", msg);
    }

    fn error(&self, msg: &str) {
        log::error!(target: "reservation_planner", "{}", msg);
    }
}

/// Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl PlanningLogger for NoopLogger {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

pub fn default_logger() -> DynLogger {
    Arc::new(LogAdapter)
}
