//! Shared value types: positions and entity identities.

use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Point;

use crate::geodesy;

static LAST_TARGET_ID: AtomicUsize = AtomicUsize::new(0);
static LAST_WAYPOINT_ID: AtomicUsize = AtomicUsize::new(0);

/// Identity of a target. Identity is per-instance, not per-value: two targets
/// at the same coordinates are still distinct entities.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TargetId(usize);

impl TargetId {
    pub fn new() -> Self {
        let id = LAST_TARGET_ID.fetch_add(1, Ordering::SeqCst);
        TargetId(id)
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of a waypoint.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct WaypointId(usize);

impl WaypointId {
    pub fn new() -> Self {
        let id = LAST_WAYPOINT_ID.fetch_add(1, Ordering::SeqCst);
        WaypointId(id)
    }
}

impl Default for WaypointId {
    fn default() -> Self {
        Self::new()
    }
}

/// A spot in the flight volume: a point on the globe plus a height in meters
/// relative to the takeoff point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    point: Point<f64>,

    /// Height in meters relative to takeoff.
    height: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64, height: f64) -> Self {
        Position {
            point: Point::new(longitude, latitude),
            height,
        }
    }

    pub fn point(&self) -> Point<f64> {
        self.point
    }

    pub fn latitude(&self) -> f64 {
        self.point.y()
    }

    pub fn longitude(&self) -> f64 {
        self.point.x()
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_point(&mut self, point: Point<f64>) {
        self.point = point;
    }

    pub fn set_latitude(&mut self, latitude: f64) {
        self.point = Point::new(self.point.x(), latitude);
    }

    pub fn set_longitude(&mut self, longitude: f64) {
        self.point = Point::new(longitude, self.point.y());
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height;
    }

    /// Position reached by travelling `distance` meters horizontally on the
    /// given heading. Height is unchanged.
    pub fn offset_by(&self, distance: f64, heading: f64) -> Position {
        Position {
            point: geodesy::destination(self.point, distance, heading),
            height: self.height,
        }
    }

    /// Height of this position over `other`, in meters. Positive means this
    /// position is above.
    pub fn height_over(&self, other: &Position) -> f64 {
        self.height - other.height
    }

    /// Distance to `other` as projected onto the surface, in meters.
    pub fn horizontal_distance_to(&self, other: &Position) -> f64 {
        geodesy::distance(self.point, other.point)
    }

    /// 3-D distance to `other`: the hypotenuse of the height difference and
    /// the horizontal great-circle distance.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let height = self.height_over(other);
        let horizontal = self.horizontal_distance_to(other);
        height.hypot(horizontal)
    }

    /// Initial bearing towards `other` in degrees from true north, [0, 360).
    /// Zero by convention when both points coincide.
    pub fn bearing_towards(&self, other: &Position) -> f64 {
        if self.point == other.point {
            0.0
        } else {
            geodesy::initial_bearing(self.point, other.point)
        }
    }

    /// Camera pitch that aims from this position at `other`, in degrees
    /// within [-90, 0]. Zero when `other` is level with or above this
    /// position; -90 when `other` is directly below.
    pub fn pitch_towards(&self, other: &Position) -> f64 {
        let height = self.height_over(other);
        if height <= 0.0 {
            return 0.0;
        }
        let horizontal = self.horizontal_distance_to(other);
        if horizontal == 0.0 {
            -90.0
        } else {
            -(height / horizontal).atan().to_degrees()
        }
    }
}
