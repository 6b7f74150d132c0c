//! Declarative plan files: the JSON input the planner binary consumes.
//!
//! A plan names the home point, the flight envelope and a list of
//! techniques with their targets; [`Plan::build`] turns it into a live
//! [`Route`] with every derived waypoint and travel-time floor in place.

use serde::Deserialize;

use crate::error::Result;
use crate::route::{Constraints, Route};
use crate::target::Target;
use crate::technique::{CraneShot, OverheadShot, ShotKind, Technique};
use crate::types::Position;
use crate::waypoint::{Action, Waypoint};

#[derive(Debug, Deserialize)]
pub struct Plan {
    pub home: PositionSpec,
    pub constraints: ConstraintsSpec,
    pub techniques: Vec<TechniqueSpec>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PositionSpec {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub height: f64,
}

impl PositionSpec {
    fn position(&self) -> Position {
        Position::new(self.latitude, self.longitude, self.height)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ConstraintsSpec {
    pub max_speed: f64,
    pub max_pitch_speed: f64,
    pub max_bearing_speed: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub max_distance: f64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TechniqueSpec {
    Crane {
        distance: f64,
        attitude: f64,
        angle: f64,
        hover_time: f64,
        targets: Vec<TargetSpec>,
    },
    Overhead {
        height_over_target: f64,
        bearing: f64,
        hover_time: f64,
        #[serde(default)]
        constant_bearing: bool,
        targets: Vec<TargetSpec>,
    },
}

#[derive(Debug, Deserialize)]
pub struct TargetSpec {
    #[serde(flatten)]
    pub position: PositionSpec,

    /// Seconds to fly here from the previous active target.
    #[serde(default)]
    pub travel_time: f64,

    /// Action applied to each waypoint this target derives.
    #[serde(default)]
    pub action: Option<Action>,
}

impl Plan {
    /// Builds the live route: validates the envelope and shot parameters,
    /// derives every waypoint and lets the route enforce its travel-time
    /// floors.
    pub fn build(&self) -> Result<Route> {
        let constraints = Constraints::new(
            self.constraints.max_speed,
            self.constraints.max_pitch_speed,
            self.constraints.max_bearing_speed,
            self.constraints.min_height,
            self.constraints.max_height,
            self.constraints.max_distance,
        )?;
        let home = Waypoint::new(self.home.position());
        let mut route = Route::new(home, constraints);

        for spec in &self.techniques {
            let (kind, targets) = match spec {
                TechniqueSpec::Crane {
                    distance,
                    attitude,
                    angle,
                    hover_time,
                    targets,
                } => (
                    ShotKind::Crane(CraneShot::new(*distance, *attitude, *angle, *hover_time)?),
                    targets,
                ),
                TechniqueSpec::Overhead {
                    height_over_target,
                    bearing,
                    hover_time,
                    constant_bearing,
                    targets,
                } => (
                    ShotKind::Overhead(OverheadShot::new(
                        *height_over_target,
                        *bearing,
                        *hover_time,
                        *constant_bearing,
                    )?),
                    targets,
                ),
            };

            let mut technique = Technique::new(kind);
            for target in targets {
                let id = technique.add_target(Target::with_travel_time(
                    target.position.position(),
                    target.travel_time,
                ));
                if let Some(action) = target.action {
                    let waypoints: Vec<_> =
                        technique.waypoints_of(id).map(Waypoint::id).collect();
                    for waypoint in waypoints {
                        technique.set_waypoint_action(waypoint, action)?;
                    }
                }
            }
            route.add_technique(technique);
        }

        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = r#"{
        "home": { "latitude": 43.37, "longitude": -8.4 },
        "constraints": {
            "max_speed": 5.0,
            "max_pitch_speed": 10.0,
            "max_bearing_speed": 30.0,
            "min_height": -10.0,
            "max_height": 120.0,
            "max_distance": 1000.0
        },
        "techniques": [
            {
                "kind": "crane",
                "distance": 10.0,
                "attitude": 0.0,
                "angle": 90.0,
                "hover_time": 5.0,
                "targets": [
                    { "latitude": 43.371, "longitude": -8.401, "action": "start_recording" },
                    { "latitude": 43.372, "longitude": -8.402 }
                ]
            },
            {
                "kind": "overhead",
                "height_over_target": 20.0,
                "bearing": 45.0,
                "hover_time": 3.0,
                "constant_bearing": true,
                "targets": [
                    { "latitude": 43.373, "longitude": -8.403, "height": 2.0 }
                ]
            }
        ]
    }"#;

    #[test]
    fn builds_a_route_from_json() {
        let plan: Plan = serde_json::from_str(PLAN).unwrap();
        let route = plan.build().unwrap();

        assert_eq!(route.techniques().len(), 2);
        // home + 2 crane waypoints + 1 overhead waypoint
        assert_eq!(route.route_points().count(), 4);

        let crane = route.technique(0).unwrap();
        assert_eq!(crane.waypoints()[0].action(), Action::StartRecording);
        let overhead = route.technique(1).unwrap();
        assert_eq!(overhead.waypoints()[0].height(), 22.0);
        assert_eq!(overhead.waypoints()[0].bearing(), 45.0);
    }

    #[test]
    fn plan_travel_floors_are_in_force() {
        let plan: Plan = serde_json::from_str(PLAN).unwrap();
        let route = plan.build().unwrap();

        let points: Vec<&Waypoint> = route.route_points().collect();
        for pair in points.windows(2) {
            let floor = route.min_travel_time_between(pair[0], pair[1]);
            assert!(
                pair[1].travel_time() >= floor - 1e-9,
                "travel {} under floor {}",
                pair[1].travel_time(),
                floor
            );
        }
    }

    #[test]
    fn a_bad_envelope_fails_the_build() {
        let mut plan: Plan = serde_json::from_str(PLAN).unwrap();
        plan.constraints.max_speed = 0.0;
        assert!(plan.build().is_err());
    }
}
