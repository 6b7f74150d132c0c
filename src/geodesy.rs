//! Great-circle helpers on top of the `geo` crate.
//!
//! Everything downstream works in meters and degrees; this module is the only
//! place that talks to the geodesy library, so the conventions (initial
//! bearings normalized to [0, 360), headings clockwise from true north) are
//! pinned down here.

use geo::prelude::*;
use geo::Point;

/// Great-circle distance between two points, in meters.
pub fn distance(a: Point<f64>, b: Point<f64>) -> f64 {
    a.haversine_distance(&b)
}

/// Initial bearing of the great-circle path from `a` to `b`, in degrees
/// clockwise from true north, normalized to [0, 360).
pub fn initial_bearing(a: Point<f64>, b: Point<f64>) -> f64 {
    normalize_degrees(a.bearing(b))
}

/// Point reached by travelling `distance_m` meters from `origin` on the given
/// heading (degrees clockwise from true north).
pub fn destination(origin: Point<f64>, distance_m: f64, heading: f64) -> Point<f64> {
    origin.haversine_destination(heading, distance_m)
}

/// Wraps an angle in degrees into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Smallest rotation between two bearings, in degrees within [0, 180].
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let delta = (b - a).rem_euclid(360.0);
    if delta > 180.0 {
        360.0 - delta
    } else {
        delta
    }
}
