//! Points of interest that the camera frames.

use geo::Point;

use crate::types::{Position, TargetId};

/// A point of interest in a recording route.
///
/// Targets are what the camera looks at; they are not flown to directly.
/// Shot techniques derive the actual [`Waypoint`](crate::Waypoint)s from
/// them. A target is plain data: reactive behavior (waypoint recomputation,
/// active-time derivation) attaches once a technique owns it, and edits then
/// go through the owning [`Technique`](crate::Technique).
///
/// `travel_time` is the time to fly from the previous active target to this
/// one; `active_time` is the total time this target holds the camera's
/// attention, derived from its waypoints by the owning technique.
#[derive(Debug, Clone)]
pub struct Target {
    id: TargetId,
    position: Position,
    active_time: f64,
    travel_time: f64,
}

impl Target {
    /// Creates a target at the given position with zero active and travel
    /// time.
    pub fn new(position: Position) -> Self {
        Target {
            id: TargetId::new(),
            position,
            active_time: 0.0,
            travel_time: 0.0,
        }
    }

    /// Creates a target with a travel time from the previous active target.
    pub fn with_travel_time(position: Position, travel_time: f64) -> Self {
        Target {
            travel_time,
            ..Target::new(position)
        }
    }

    pub fn id(&self) -> TargetId {
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

    /// Seconds this target is the object of attention.
    pub fn active_time(&self) -> f64 {
        self.active_time
    }

    /// Seconds to fly here from the previous active target.
    pub fn travel_time(&self) -> f64 {
        self.travel_time
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn set_point(&mut self, point: Point<f64>) {
        self.position.set_point(point);
    }

    pub fn set_latitude(&mut self, latitude: f64) {
        self.position.set_latitude(latitude);
    }

    pub fn set_longitude(&mut self, longitude: f64) {
        self.position.set_longitude(longitude);
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

    /// Relocates the target `distance` meters along `heading` (degrees
    /// clockwise from true north). Height is unchanged.
    pub fn move_by(&mut self, distance: f64, heading: f64) {
        self.position = self.position.offset_by(distance, heading);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_by_travels_the_requested_distance() {
        let mut target = Target::new(Position::new(43.37, -8.4, 5.0));
        let start = *target.position();
        target.move_by(120.0, 45.0);
        let travelled = start.horizontal_distance_to(target.position());
        assert!((travelled - 120.0).abs() < 1e-6, "travelled {}", travelled);
        assert_eq!(target.height(), 5.0);
    }

    #[test]
    fn axis_setters_move_one_coordinate() {
        let mut target = Target::new(Position::new(43.37, -8.4, 5.0));
        target.set_latitude(43.40);
        assert_eq!(target.latitude(), 43.40);
        assert_eq!(target.longitude(), -8.4);
        target.set_longitude(-8.39);
        assert_eq!(target.longitude(), -8.39);
        assert_eq!(target.latitude(), 43.40);
        assert_eq!(target.height(), 5.0);
    }

    #[test]
    fn move_by_zero_stays_put() {
        let mut target = Target::new(Position::new(43.37, -8.4, 0.0));
        let start = *target.position();
        target.move_by(0.0, 270.0);
        assert!(start.horizontal_distance_to(target.position()) < 1e-9);
    }
}
