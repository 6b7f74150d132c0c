//! Crane shot: the camera hangs off the target at a fixed distance and
//! elevation angle, like the head of a camera crane.

use crate::error::{PlanError, Result};
use crate::target::Target;
use crate::waypoint::Waypoint;

/// Parameters of a crane shot.
///
/// The drone sits on a sphere centered on the target: `distance` is the
/// radius (and therefore the focal distance), `attitude` picks which side of
/// the target is framed (degrees clockwise from true north), and `angle` is
/// the elevation over the target: 0 is level with it, 90 is directly
/// overhead.
#[derive(Debug, Clone, Copy)]
pub struct CraneShot {
    distance: f64,
    attitude: f64,
    angle: f64,
    hover_time: f64,
}

impl CraneShot {
    pub fn new(distance: f64, attitude: f64, angle: f64, hover_time: f64) -> Result<Self> {
        if !(distance >= 0.0) {
            return Err(PlanError::InvalidParameter {
                name: "distance",
                requirement: ">= 0",
                value: distance,
            });
        }
        if !(hover_time >= 0.0) {
            return Err(PlanError::InvalidParameter {
                name: "hover_time",
                requirement: ">= 0",
                value: hover_time,
            });
        }
        Ok(CraneShot {
            distance,
            attitude,
            angle,
            hover_time,
        })
    }

    /// Radius of the shot in meters; equals the waypoint's focal distance.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Shot direction from the target, degrees clockwise from true north.
    pub fn attitude(&self) -> f64 {
        self.attitude
    }

    /// Elevation over the target in degrees: 0 level, 90 overhead.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Seconds the drone holds the shot.
    pub fn hover_time(&self) -> f64 {
        self.hover_time
    }

    /// Places the single waypoint of a crane shot around `target`.
    pub(crate) fn waypoints_for(&self, target: &Target) -> Vec<Waypoint> {
        let horizontal = self.distance * self.angle.to_radians().cos();
        let vertical = self.distance * self.angle.to_radians().sin();

        let mut waypoint = Waypoint::from_target(target);
        waypoint.set_height(target.height() + vertical);
        waypoint.move_by(horizontal, self.attitude);
        waypoint.focus(target.position());
        waypoint.set_active_time(self.hover_time);

        vec![waypoint]
    }
}
