//! End-to-end checks of the planning invariants: active-time aggregation,
//! travel-time floors and recording-span well-formedness survive arbitrary
//! edits routed through a live `Route`.

use recording_route::{
    Action, Constraints, CraneShot, OverheadShot, Position, Route, ShotKind, Target, Technique,
    Waypoint,
};

fn constraints() -> Constraints {
    Constraints::new(5.0, 10.0, 30.0, -10.0, 120.0, 2000.0).unwrap()
}

fn build_route() -> Route {
    let home = Waypoint::new(Position::new(43.3700, -8.4000, 0.0));
    let mut route = Route::new(home, constraints());

    let mut crane = Technique::new(ShotKind::Crane(
        CraneShot::new(15.0, 90.0, 30.0, 5.0).unwrap(),
    ));
    crane.add_target(Target::new(Position::new(43.3710, -8.4010, 0.0)));
    crane.add_target(Target::with_travel_time(
        Position::new(43.3720, -8.4020, 3.0),
        8.0,
    ));
    route.add_technique(crane);

    let mut overhead = Technique::new(ShotKind::Overhead(
        OverheadShot::new(25.0, 0.0, 4.0, false).unwrap(),
    ));
    overhead.add_target(Target::new(Position::new(43.3730, -8.4030, 0.0)));
    overhead.add_target(Target::new(Position::new(43.3740, -8.4040, 0.0)));
    route.add_technique(overhead);

    route
}

fn assert_aggregation_holds(route: &Route) {
    for technique in route.techniques() {
        for target in technique.targets() {
            let derived = technique.derived_active_time(target.id());
            assert!(
                (target.active_time() - derived).abs() < 1e-9,
                "target {:?}: active {} != derived {}",
                target.id(),
                target.active_time(),
                derived
            );
        }
    }
}

fn assert_floors_hold(route: &Route) {
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

fn assert_well_formed(route: &Route) {
    let mut recording = false;
    for waypoint in route.route_points() {
        match waypoint.action() {
            Action::StartRecording => {
                assert!(!recording, "start inside a recording span");
                recording = true;
            }
            Action::StopRecording => {
                assert!(recording, "stop outside a recording span");
                recording = false;
            }
            Action::TakeImage => assert!(!recording, "still image inside a span"),
            Action::Nothing => {}
        }
    }
    assert!(!recording, "sequence ends still recording");
}

#[test]
fn a_fresh_route_satisfies_every_invariant() {
    let route = build_route();
    assert_eq!(route.route_points().count(), 5);
    assert_aggregation_holds(&route);
    assert_floors_hold(&route);
}

#[test]
fn edits_preserve_aggregation_and_floor_the_rebuilt_waypoint() {
    let mut route = build_route();
    let target = route.technique(0).unwrap().targets()[1].id();

    route
        .edit_technique(0, |technique| technique.move_target(target, 400.0, 270.0))
        .unwrap()
        .unwrap();

    assert_aggregation_holds(&route);

    // the rebuilt waypoint is floored against its predecessor; waypoints
    // further down the plan keep the travel times they already had
    let technique = route.technique(0).unwrap();
    let rebuilt = technique
        .waypoints()
        .iter()
        .find(|waypoint| waypoint.associated_target() == Some(target))
        .unwrap();
    let index = technique.waypoint_index(rebuilt.id()).unwrap();
    assert!(index > 0);
    let predecessor = &technique.waypoints()[index - 1];
    let floor = route.min_travel_time_between(predecessor, rebuilt);
    assert!(
        rebuilt.travel_time() >= floor - 1e-9,
        "travel {} under floor {}",
        rebuilt.travel_time(),
        floor
    );
}

#[test]
fn waypoint_edits_flow_back_into_the_target() {
    let mut route = build_route();
    let waypoint = route.technique(1).unwrap().waypoints()[1].id();

    route
        .edit_technique(1, |technique| {
            technique.set_waypoint_active_time(waypoint, 11.0)
        })
        .unwrap()
        .unwrap();

    assert_aggregation_holds(&route);
}

#[test]
fn removing_a_target_keeps_the_rest_of_the_plan_sound() {
    let mut route = build_route();
    let target = route.technique(0).unwrap().targets()[0].id();

    route
        .edit_technique(0, |technique| technique.remove_target(target))
        .unwrap()
        .unwrap();

    assert_eq!(route.route_points().count(), 4);
    assert_aggregation_holds(&route);
}

#[test]
fn repaired_actions_are_well_formed_and_stable() {
    let mut route = build_route();

    // scatter a deliberately broken action script over the sequence
    let ids: Vec<_> = route
        .technique(0)
        .unwrap()
        .waypoints()
        .iter()
        .map(Waypoint::id)
        .collect();
    route
        .edit_technique(0, |technique| {
            technique.set_waypoint_action(ids[0], Action::StopRecording)?;
            technique.set_waypoint_action(ids[1], Action::StartRecording)
        })
        .unwrap()
        .unwrap();
    let ids: Vec<_> = route
        .technique(1)
        .unwrap()
        .waypoints()
        .iter()
        .map(Waypoint::id)
        .collect();
    route
        .edit_technique(1, |technique| {
            technique.set_waypoint_action(ids[0], Action::TakeImage)?;
            technique.set_waypoint_action(ids[1], Action::StartRecording)
        })
        .unwrap()
        .unwrap();

    route.fix_actions();
    assert_well_formed(&route);

    let once: Vec<Action> = route.route_points().map(Waypoint::action).collect();
    route.fix_actions();
    let twice: Vec<Action> = route.route_points().map(Waypoint::action).collect();
    assert_eq!(once, twice);
}

#[test]
fn is_recording_matches_the_repaired_script() {
    let mut route = build_route();
    let start = route.technique(0).unwrap().waypoints()[0].id();
    let stop = route.technique(1).unwrap().waypoints()[0].id();

    route
        .edit_technique(0, |technique| {
            technique.set_waypoint_action(start, Action::StartRecording)
        })
        .unwrap()
        .unwrap();
    route
        .edit_technique(1, |technique| {
            technique.set_waypoint_action(stop, Action::StopRecording)
        })
        .unwrap()
        .unwrap();
    route.fix_actions();

    assert!(!route.is_recording(route.home().id()).unwrap());
    assert!(route.is_recording(start).unwrap());
    assert!(!route.is_recording(stop).unwrap());
}
