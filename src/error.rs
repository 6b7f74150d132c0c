use crate::types::{TargetId, WaypointId};

/// Errors produced by the planning core.
///
/// Configuration errors are raised at construction time; lookup errors are
/// raised when an operation addresses an entity the technique or route does
/// not own. The core performs no I/O, so nothing here is retryable.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("constraint out of range: {name} must be {requirement}, got {value}")]
    InvalidConstraint {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },

    #[error("shot parameter out of range: {name} must be {requirement}, got {value}")]
    InvalidParameter {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },

    #[error("no target {0:?} in this technique")]
    UnknownTarget(TargetId),

    #[error("no waypoint {0:?} here")]
    UnknownWaypoint(WaypointId),

    #[error("no technique at index {0}")]
    UnknownTechnique(usize),

    #[error("waypoint index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, PlanError>;
