//! Shot techniques: each technique owns an ordered set of targets, derives
//! the waypoints that film them, and keeps both in step as they are edited.

mod crane;
mod overhead;

pub use crane::CraneShot;
pub use overhead::OverheadShot;

use crate::error::{PlanError, Result};
use crate::target::Target;
use crate::types::{Position, TargetId, WaypointId};
use crate::waypoint::{Action, Waypoint};

/// Placement algorithm of a technique. Adding a new shot pattern means
/// adding a variant here.
#[derive(Debug, Clone, Copy)]
pub enum ShotKind {
    Crane(CraneShot),
    Overhead(OverheadShot),
}

impl ShotKind {
    fn waypoints_for(&self, target: &Target) -> Vec<Waypoint> {
        match self {
            ShotKind::Crane(shot) => shot.waypoints_for(target),
            ShotKind::Overhead(shot) => shot.waypoints_for(target),
        }
    }

    /// Whether newly derived waypoints re-aim their predecessor's camera.
    fn chains_bearing(&self) -> bool {
        matches!(self, ShotKind::Overhead(shot) if !shot.constant_bearing())
    }
}

/// Change notification recorded by a technique.
///
/// Events accumulate in the technique's outbox in the order the mutations
/// happened and are drained by the owner (normally the
/// [`Route`](crate::Route)) with [`Technique::take_events`]. Removal events
/// carry the removed entity by value since it can no longer be looked up.
#[derive(Debug, Clone)]
pub enum TechniqueEvent {
    TargetAdded(TargetId),
    TargetChanged(TargetId),
    TargetRemoved(Target),
    WaypointAdded(WaypointId),
    WaypointChanged(WaypointId),
    WaypointRemoved(Waypoint),
    ParametersChanged,
}

/// One shot technique: a placement algorithm plus the targets and waypoints
/// it currently owns.
///
/// Waypoint order is flight order. The target-to-waypoint mapping is derived
/// from each waypoint's back-reference, so the union of all per-target
/// waypoint lists is always exactly the waypoint list itself.
///
/// Every mutation re-establishes the active-time invariant: a target's
/// active time equals the sum of its waypoints' active times plus the travel
/// times of all but the first of them (travel into the first waypoint is the
/// target's own travel time).
pub struct Technique {
    kind: ShotKind,
    targets: Vec<Target>,
    waypoints: Vec<Waypoint>,
    events: Vec<TechniqueEvent>,
}

impl Technique {
    pub fn new(kind: ShotKind) -> Self {
        Technique {
            kind,
            targets: Vec::new(),
            waypoints: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn params(&self) -> &ShotKind {
        &self.kind
    }

    /// Replaces the shot parameters. Owned waypoints are not recomputed;
    /// the owner decides what a parameter change means for existing shots.
    pub fn set_params(&mut self, kind: ShotKind) {
        self.kind = kind;
        self.events.push(TechniqueEvent::ParametersChanged);
    }

    // ── Queries ──

    /// Targets in insertion order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Waypoints in flight order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Waypoints derived from `target`, in flight order.
    pub fn waypoints_of(&self, target: TargetId) -> impl Iterator<Item = &Waypoint> + '_ {
        self.waypoints
            .iter()
            .filter(move |waypoint| waypoint.associated_target() == Some(target))
    }

    pub fn target(&self, id: TargetId) -> Result<&Target> {
        self.targets
            .iter()
            .find(|target| target.id() == id)
            .ok_or(PlanError::UnknownTarget(id))
    }

    pub fn waypoint(&self, id: WaypointId) -> Result<&Waypoint> {
        self.waypoints
            .iter()
            .find(|waypoint| waypoint.id() == id)
            .ok_or(PlanError::UnknownWaypoint(id))
    }

    /// Position of a waypoint in this technique's flight order.
    pub fn waypoint_index(&self, id: WaypointId) -> Option<usize> {
        self.waypoints.iter().position(|waypoint| waypoint.id() == id)
    }

    /// Active time of `target` as derived from its waypoints: the sum of
    /// their active times plus every travel time but the first.
    pub fn derived_active_time(&self, target: TargetId) -> f64 {
        self.waypoints_of(target)
            .enumerate()
            .map(|(index, waypoint)| {
                waypoint.active_time()
                    + if index > 0 { waypoint.travel_time() } else { 0.0 }
            })
            .sum()
    }

    /// Drains the pending change notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<TechniqueEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Targets ──

    /// Takes ownership of `target`, derives its waypoints, appends them to
    /// the flight order and sets the target's active time from them.
    pub fn add_target(&mut self, mut target: Target) -> TargetId {
        let id = target.id();
        debug!(?id, "adding target to technique");

        let insert_at = self.waypoints.len();
        let waypoints = self.derive_waypoints(&target, insert_at);
        self.insert_derived(insert_at, waypoints);

        target.set_active_time(self.derived_active_time(id));
        self.targets.push(target);
        self.events.push(TechniqueEvent::TargetAdded(id));
        id
    }

    /// Removes `target` and every waypoint derived from it.
    pub fn remove_target(&mut self, id: TargetId) -> Result<Target> {
        let position = self
            .targets
            .iter()
            .position(|target| target.id() == id)
            .ok_or(PlanError::UnknownTarget(id))?;
        debug!(?id, "removing target from technique");

        // The target leaves the list first so waypoint removal does not try
        // to refresh its active time.
        let target = self.targets.remove(position);
        let mapped: Vec<WaypointId> = self.waypoints_of(id).map(Waypoint::id).collect();
        for waypoint in mapped {
            if let Some(index) = self.waypoint_index(waypoint) {
                self.remove_waypoint_at(index);
            }
        }

        self.events.push(TechniqueEvent::TargetRemoved(target.clone()));
        Ok(target)
    }

    /// Moves `target` to a new position and rebuilds its waypoints in place.
    pub fn set_target_position(&mut self, id: TargetId, position: Position) -> Result<()> {
        self.target_mut(id)?.set_position(position);
        self.rebuild_target(id)
    }

    /// Changes the latitude of `target` and rebuilds its waypoints in place.
    pub fn set_target_latitude(&mut self, id: TargetId, latitude: f64) -> Result<()> {
        self.target_mut(id)?.set_latitude(latitude);
        self.rebuild_target(id)
    }

    /// Changes the longitude of `target` and rebuilds its waypoints in place.
    pub fn set_target_longitude(&mut self, id: TargetId, longitude: f64) -> Result<()> {
        self.target_mut(id)?.set_longitude(longitude);
        self.rebuild_target(id)
    }

    /// Changes the height of `target` and rebuilds its waypoints in place.
    pub fn set_target_height(&mut self, id: TargetId, height: f64) -> Result<()> {
        self.target_mut(id)?.set_height(height);
        self.rebuild_target(id)
    }

    /// Displaces `target` by `distance` meters on `heading` and rebuilds its
    /// waypoints in place.
    pub fn move_target(&mut self, id: TargetId, distance: f64, heading: f64) -> Result<()> {
        self.target_mut(id)?.move_by(distance, heading);
        self.rebuild_target(id)
    }

    /// Changes the time to travel into `target`. The first derived waypoint
    /// carries that same travel time, so it is kept in step; waypoints are
    /// not rebuilt.
    pub fn set_target_travel_time(&mut self, id: TargetId, travel_time: f64) -> Result<()> {
        self.target_mut(id)?.set_travel_time(travel_time);
        let first = self.waypoints_of(id).next().map(Waypoint::id);
        if let Some(first) = first {
            if let Some(index) = self.waypoint_index(first) {
                self.waypoints[index].set_travel_time(travel_time);
                self.events.push(TechniqueEvent::WaypointChanged(first));
            }
        }
        self.events.push(TechniqueEvent::TargetChanged(id));
        Ok(())
    }

    // ── Waypoints ──

    /// Appends a waypoint to the flight order.
    pub fn add_waypoint(&mut self, waypoint: Waypoint) -> WaypointId {
        let id = waypoint.id();
        let target = waypoint.associated_target();
        self.waypoints.push(waypoint);
        self.events.push(TechniqueEvent::WaypointAdded(id));
        if let Some(target) = target {
            self.refresh_active_time(target);
        }
        id
    }

    /// Inserts a waypoint at the given position in the flight order.
    pub fn insert_waypoint(&mut self, index: usize, waypoint: Waypoint) -> Result<WaypointId> {
        if index > self.waypoints.len() {
            return Err(PlanError::IndexOutOfBounds {
                index,
                len: self.waypoints.len(),
            });
        }
        let id = waypoint.id();
        let target = waypoint.associated_target();
        self.waypoints.insert(index, waypoint);
        self.events.push(TechniqueEvent::WaypointAdded(id));
        if let Some(target) = target {
            self.refresh_active_time(target);
        }
        Ok(id)
    }

    /// Removes a waypoint from the flight order and from its target's
    /// bookkeeping.
    pub fn remove_waypoint(&mut self, id: WaypointId) -> Result<Waypoint> {
        let index = self
            .waypoint_index(id)
            .ok_or(PlanError::UnknownWaypoint(id))?;
        Ok(self.remove_waypoint_at(index))
    }

    pub fn set_waypoint_action(&mut self, id: WaypointId, action: Action) -> Result<()> {
        self.change_waypoint(id, |waypoint| waypoint.set_action(action))
    }

    pub fn set_waypoint_active_time(&mut self, id: WaypointId, active_time: f64) -> Result<()> {
        self.change_waypoint(id, |waypoint| waypoint.set_active_time(active_time))
    }

    pub fn set_waypoint_travel_time(&mut self, id: WaypointId, travel_time: f64) -> Result<()> {
        self.change_waypoint(id, |waypoint| waypoint.set_travel_time(travel_time))
    }

    pub fn set_waypoint_bearing(&mut self, id: WaypointId, bearing: f64) -> Result<()> {
        self.change_waypoint(id, |waypoint| waypoint.set_bearing(bearing))
    }

    pub fn set_waypoint_pitch(&mut self, id: WaypointId, pitch: f64) -> Result<()> {
        self.change_waypoint(id, |waypoint| waypoint.set_pitch(pitch))
    }

    /// Re-aims a waypoint's camera at `poi`.
    pub fn focus_waypoint(&mut self, id: WaypointId, poi: &Position) -> Result<()> {
        self.change_waypoint(id, |waypoint| waypoint.focus(poi))
    }

    // ── Internals ──

    fn target_mut(&mut self, id: TargetId) -> Result<&mut Target> {
        self.targets
            .iter_mut()
            .find(|target| target.id() == id)
            .ok_or(PlanError::UnknownTarget(id))
    }

    /// Applies an edit to one waypoint, then re-derives the owning target's
    /// active time. No structural change.
    fn change_waypoint(&mut self, id: WaypointId, edit: impl FnOnce(&mut Waypoint)) -> Result<()> {
        let index = self
            .waypoint_index(id)
            .ok_or(PlanError::UnknownWaypoint(id))?;
        edit(&mut self.waypoints[index]);
        let target = self.waypoints[index].associated_target();
        self.events.push(TechniqueEvent::WaypointChanged(id));
        if let Some(target) = target {
            self.refresh_active_time(target);
        }
        Ok(())
    }

    fn remove_waypoint_at(&mut self, index: usize) -> Waypoint {
        let mut waypoint = self.waypoints.remove(index);
        let target = waypoint.associated_target();
        waypoint.set_associated_target(None);
        self.events
            .push(TechniqueEvent::WaypointRemoved(waypoint.clone()));
        if let Some(target) = target {
            self.refresh_active_time(target);
        }
        waypoint
    }

    /// Runs the placement algorithm for `target` and applies the
    /// chained-bearing pass against the waypoint that will precede the
    /// insertion point.
    fn derive_waypoints(&mut self, target: &Target, insert_at: usize) -> Vec<Waypoint> {
        let mut waypoints = self.kind.waypoints_for(target);
        for waypoint in &mut waypoints {
            waypoint.set_associated_target(Some(target.id()));
        }

        if self.kind.chains_bearing() && insert_at > 0 {
            if let Some(first) = waypoints.first_mut() {
                let previous = &mut self.waypoints[insert_at - 1];
                let bearing = previous.position().bearing_towards(first.position());
                previous.set_bearing(bearing);
                let previous_id = previous.id();
                first.set_bearing(bearing);
                self.events.push(TechniqueEvent::WaypointChanged(previous_id));
            }
        }

        waypoints
    }

    fn insert_derived(&mut self, at: usize, waypoints: Vec<Waypoint>) {
        for (offset, waypoint) in waypoints.into_iter().enumerate() {
            let id = waypoint.id();
            self.waypoints.insert(at + offset, waypoint);
            self.events.push(TechniqueEvent::WaypointAdded(id));
        }
    }

    /// Discards the waypoints derived from `target` and derives fresh ones
    /// at the position where the first old waypoint sat, preserving flight
    /// order.
    fn rebuild_target(&mut self, id: TargetId) -> Result<()> {
        trace!(?id, "rebuilding waypoints of target");
        let old: Vec<WaypointId> = self.waypoints_of(id).map(Waypoint::id).collect();
        let insert_at = old
            .first()
            .and_then(|first| self.waypoint_index(*first))
            .unwrap_or_else(|| self.waypoints.len());

        for waypoint in &old {
            if let Some(index) = self.waypoint_index(*waypoint) {
                self.remove_waypoint_at(index);
            }
        }

        let target = self.target(id)?.clone();
        let waypoints = self.derive_waypoints(&target, insert_at);
        self.insert_derived(insert_at, waypoints);

        self.refresh_active_time(id);
        self.events.push(TechniqueEvent::TargetChanged(id));
        Ok(())
    }

    /// Re-establishes the active-time invariant for `target`. Quietly does
    /// nothing if the target is not owned (it may be mid-removal).
    fn refresh_active_time(&mut self, id: TargetId) {
        let derived = self.derived_active_time(id);
        if let Some(target) = self.targets.iter_mut().find(|target| target.id() == id) {
            if target.active_time() != derived {
                target.set_active_time(derived);
                self.events.push(TechniqueEvent::TargetChanged(id));
            }
        }
    }
}
