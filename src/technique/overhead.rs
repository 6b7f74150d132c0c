//! Overhead shot: the drone parks directly above the target.

use crate::error::{PlanError, Result};
use crate::target::Target;
use crate::waypoint::Waypoint;

/// Parameters of an overhead shot.
///
/// The drone hovers `height_over_target` meters straight above the target,
/// looking down. Since the camera is vertical, its bearing is free: with
/// `constant_bearing` it is fixed at `bearing`; otherwise each waypoint is
/// chained, aiming the previous waypoint's camera at the new one so the shot
/// pans along the flight path.
#[derive(Debug, Clone, Copy)]
pub struct OverheadShot {
    height_over_target: f64,
    bearing: f64,
    hover_time: f64,
    constant_bearing: bool,
}

impl OverheadShot {
    pub fn new(
        height_over_target: f64,
        bearing: f64,
        hover_time: f64,
        constant_bearing: bool,
    ) -> Result<Self> {
        if !(hover_time >= 0.0) {
            return Err(PlanError::InvalidParameter {
                name: "hover_time",
                requirement: ">= 0",
                value: hover_time,
            });
        }
        Ok(OverheadShot {
            height_over_target,
            bearing,
            hover_time,
            constant_bearing,
        })
    }

    /// Height of the drone over the target, in meters.
    pub fn height_over_target(&self) -> f64 {
        self.height_over_target
    }

    /// Camera bearing used when the shot is not chained, in degrees.
    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    /// Seconds the drone holds the shot.
    pub fn hover_time(&self) -> f64 {
        self.hover_time
    }

    /// Whether every waypoint keeps the configured bearing instead of
    /// panning towards the next one.
    pub fn constant_bearing(&self) -> bool {
        self.constant_bearing
    }

    /// Places the single waypoint of an overhead shot above `target`. The
    /// chained-bearing pass happens at insertion, when the predecessor is
    /// known.
    pub(crate) fn waypoints_for(&self, target: &Target) -> Vec<Waypoint> {
        let mut waypoint = Waypoint::from_target(target);
        waypoint.set_height(target.height() + self.height_over_target);
        waypoint.set_active_time(self.hover_time);
        waypoint.focus(target.position());
        waypoint.set_bearing(self.bearing);

        vec![waypoint]
    }
}
