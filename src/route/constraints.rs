//! Physical limits bounding feasible route timing.

use crate::error::{PlanError, Result};

/// Flight envelope of the aircraft.
///
/// Speeds and rates bound the minimum time between consecutive waypoints;
/// the height band and `max_distance` (radius of a cylinder centered on the
/// home point) describe the allowed flight volume. Heights are relative to
/// takeoff and may be negative.
#[derive(Debug, Clone, Copy)]
pub struct Constraints {
    max_speed: f64,
    max_pitch_speed: f64,
    max_bearing_speed: f64,
    min_height: f64,
    max_height: f64,
    max_distance: f64,
}

impl Constraints {
    /// Validates and builds a flight envelope. Speeds, rates and the
    /// distance radius must be strictly positive, and the height band must
    /// not be empty.
    pub fn new(
        max_speed: f64,
        max_pitch_speed: f64,
        max_bearing_speed: f64,
        min_height: f64,
        max_height: f64,
        max_distance: f64,
    ) -> Result<Self> {
        fn positive(name: &'static str, value: f64) -> Result<f64> {
            if value > 0.0 {
                Ok(value)
            } else {
                Err(PlanError::InvalidConstraint {
                    name,
                    requirement: "> 0",
                    value,
                })
            }
        }

        let constraints = Constraints {
            max_speed: positive("max_speed", max_speed)?,
            max_pitch_speed: positive("max_pitch_speed", max_pitch_speed)?,
            max_bearing_speed: positive("max_bearing_speed", max_bearing_speed)?,
            min_height,
            max_height,
            max_distance: positive("max_distance", max_distance)?,
        };

        if min_height >= max_height {
            return Err(PlanError::InvalidConstraint {
                name: "min_height",
                requirement: "< max_height",
                value: min_height,
            });
        }

        Ok(constraints)
    }

    /// Maximum flight speed, m/s.
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Maximum camera pitch rate, deg/s.
    pub fn max_pitch_speed(&self) -> f64 {
        self.max_pitch_speed
    }

    /// Maximum camera bearing rate, deg/s.
    pub fn max_bearing_speed(&self) -> f64 {
        self.max_bearing_speed
    }

    /// Lower edge of the height band, meters relative to takeoff.
    pub fn min_height(&self) -> f64 {
        self.min_height
    }

    /// Upper edge of the height band, meters relative to takeoff.
    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    /// Radius of the allowed cylinder around home, meters.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_sane_envelope() {
        let constraints = Constraints::new(5.0, 10.0, 30.0, -5.0, 120.0, 500.0).unwrap();
        assert_eq!(constraints.max_speed(), 5.0);
        assert_eq!(constraints.min_height(), -5.0);
    }

    #[test]
    fn rejects_non_positive_speeds() {
        assert!(matches!(
            Constraints::new(0.0, 10.0, 30.0, 0.0, 100.0, 500.0),
            Err(PlanError::InvalidConstraint { name: "max_speed", .. })
        ));
        assert!(matches!(
            Constraints::new(5.0, -1.0, 30.0, 0.0, 100.0, 500.0),
            Err(PlanError::InvalidConstraint { name: "max_pitch_speed", .. })
        ));
    }

    #[test]
    fn rejects_an_empty_height_band() {
        assert!(Constraints::new(5.0, 10.0, 30.0, 50.0, 50.0, 500.0).is_err());
    }

    #[test]
    fn heights_may_be_negative() {
        assert!(Constraints::new(5.0, 10.0, 30.0, -20.0, -1.0, 500.0).is_ok());
    }
}
