//! Points the drone actually flies through.

use serde::Deserialize;

use crate::target::Target;
use crate::types::{Position, TargetId, WaypointId};

/// Discrete action taken by the aircraft at a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    StartRecording,
    StopRecording,
    TakeImage,
    Nothing,
}

impl Default for Action {
    fn default() -> Self {
        Action::Nothing
    }
}

/// A point in the flight path, with the camera pose to hold there.
///
/// A waypoint shares the positional core of a [`Target`] (position, active
/// and travel time) and adds the camera orientation: pitch in [-90, 0]
/// degrees, bearing in degrees from true north, and the focal distance to
/// the point of interest. `associated_target` is a back-reference to the
/// target that produced this waypoint; it is `None` for waypoints outside
/// any technique's bookkeeping, such as the route's home point.
#[derive(Debug, Clone)]
pub struct Waypoint {
    id: WaypointId,
    position: Position,
    active_time: f64,
    travel_time: f64,
    pitch: f64,
    bearing: f64,
    focal_distance: f64,
    action: Action,
    associated_target: Option<TargetId>,
}

impl Waypoint {
    /// Creates a free-standing waypoint with a level camera and no action.
    pub fn new(position: Position) -> Self {
        Waypoint {
            id: WaypointId::new(),
            position,
            active_time: 0.0,
            travel_time: 0.0,
            pitch: 0.0,
            bearing: 0.0,
            focal_distance: 0.0,
            action: Action::Nothing,
            associated_target: None,
        }
    }

    /// Creates a waypoint on top of a target: same position and travel time,
    /// back-reference set to the target.
    pub fn from_target(target: &Target) -> Self {
        let mut waypoint = Waypoint::new(*target.position());
        waypoint.travel_time = target.travel_time();
        waypoint.associated_target = Some(target.id());
        waypoint
    }

    pub fn id(&self) -> WaypointId {
        self.id
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn latitude(&self) -> f64 {
        self.position.latitude()
    }

    pub fn longitude(&self) -> f64 {
        self.position.longitude()
    }

    pub fn height(&self) -> f64 {
        self.position.height()
    }

    /// Seconds the drone holds this waypoint before moving on.
    pub fn active_time(&self) -> f64 {
        self.active_time
    }

    /// Seconds to fly here from the previous waypoint.
    pub fn travel_time(&self) -> f64 {
        self.travel_time
    }

    /// Camera pitch in degrees, 0 (level) to -90 (straight down).
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Camera bearing in degrees clockwise from true north.
    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    /// Distance between the camera and its point of interest, in meters.
    pub fn focal_distance(&self) -> f64 {
        self.focal_distance
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn associated_target(&self) -> Option<TargetId> {
        self.associated_target
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn set_height(&mut self, height: f64) {
        self.position.set_height(height);
    }

    pub fn set_active_time(&mut self, active_time: f64) {
        self.active_time = active_time;
    }

    pub fn set_travel_time(&mut self, travel_time: f64) {
        self.travel_time = travel_time;
    }

    /// Sets the camera pitch, clamped into [-90, 0].
    pub fn set_pitch(&mut self, pitch: f64) {
        self.pitch = pitch.max(-90.0).min(0.0);
    }

    pub fn set_bearing(&mut self, bearing: f64) {
        self.bearing = bearing;
    }

    pub fn set_focal_distance(&mut self, focal_distance: f64) {
        self.focal_distance = focal_distance;
    }

    pub fn set_action(&mut self, action: Action) {
        self.action = action;
    }

    pub fn set_associated_target(&mut self, target: Option<TargetId>) {
        self.associated_target = target;
    }

    /// Relocates the waypoint horizontally, keeping its height.
    pub fn move_by(&mut self, distance: f64, heading: f64) {
        self.position = self.position.offset_by(distance, heading);
    }

    /// Aims the camera at `poi`: sets focal distance, bearing and pitch in
    /// one step.
    pub fn focus(&mut self, poi: &Position) {
        self.focal_distance = self.position.distance_to(poi);
        self.bearing = self.position.bearing_towards(poi);
        self.pitch = self.position.pitch_towards(poi);
    }
}
