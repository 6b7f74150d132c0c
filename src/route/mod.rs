//! The complete recording route: every technique's waypoints flattened into
//! one flight sequence, bounded by the aircraft's physical constraints.

mod constraints;

pub use constraints::Constraints;

use crate::error::{PlanError, Result};
use crate::geodesy;
use crate::target::Target;
use crate::technique::{Technique, TechniqueEvent};
use crate::types::{TargetId, WaypointId};
use crate::waypoint::{Action, Waypoint};

/// Push-based change interface for the map/UI layer.
///
/// The route calls into this after every mutation has settled; it never
/// pulls. Registering an observer replaces any previous one.
pub trait RouteObserver {
    fn target_added(&mut self, _target: &Target) {}
    fn target_changed(&mut self, _target: &Target) {}
    fn target_removed(&mut self, _target: &Target) {}
    fn waypoint_added(&mut self, _waypoint: &Waypoint) {}
    fn waypoint_changed(&mut self, _waypoint: &Waypoint) {}
    fn waypoint_removed(&mut self, _waypoint: &Waypoint) {}
    fn parameters_changed(&mut self, _technique: usize) {}
}

/// An ordered flight plan: the home point, the techniques in flight order,
/// and the constraints that bound feasible timing.
///
/// The global waypoint sequence is always home followed by each technique's
/// waypoints in technique order. The route reacts to every change its
/// techniques report: newly inserted waypoints get their travel time raised
/// to the physical minimum against their predecessor (never lowered), and
/// all events are forwarded to the registered [`RouteObserver`].
pub struct Route {
    home: Waypoint,
    techniques: Vec<Technique>,
    constraints: Constraints,
    observer: Option<Box<dyn RouteObserver>>,
}

impl Route {
    /// Builds a route around a home waypoint. Home is always the first
    /// point of the flight sequence and belongs to no technique.
    pub fn new(mut home: Waypoint, constraints: Constraints) -> Self {
        home.set_associated_target(None);
        Route {
            home,
            techniques: Vec::new(),
            constraints,
            observer: None,
        }
    }

    pub fn home(&self) -> &Waypoint {
        &self.home
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn techniques(&self) -> &[Technique] {
        &self.techniques
    }

    pub fn technique(&self, index: usize) -> Result<&Technique> {
        self.techniques
            .get(index)
            .ok_or(PlanError::UnknownTechnique(index))
    }

    /// Registers the external observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: Box<dyn RouteObserver>) {
        self.observer = Some(observer);
    }

    /// Appends a technique to the flight order and takes over its change
    /// stream. Added-events are replayed for everything the technique
    /// already owns, so an observer registered before this call sees the
    /// pre-existing content too, and travel-time floors are enforced on all
    /// of its waypoints.
    pub fn add_technique(&mut self, mut technique: Technique) -> usize {
        // Whatever notifications piled up before this route owned the
        // technique went to its previous audience.
        technique.take_events();

        let index = self.techniques.len();
        let targets: Vec<TargetId> = technique.targets().iter().map(Target::id).collect();
        let waypoints: Vec<WaypointId> = technique.waypoints().iter().map(Waypoint::id).collect();
        debug!(
            index,
            targets = targets.len(),
            waypoints = waypoints.len(),
            "adding technique to route"
        );
        self.techniques.push(technique);

        for target in targets {
            self.notify(index, &TechniqueEvent::TargetAdded(target));
        }
        for waypoint in waypoints {
            self.enforce_travel_floor(index, waypoint);
            self.notify(index, &TechniqueEvent::WaypointAdded(waypoint));
            self.dispatch(index);
        }
        index
    }

    /// Edits a technique in place. The closure mutates the technique through
    /// its normal API; once it returns, the route reacts to everything that
    /// changed and forwards the notifications to the observer.
    pub fn edit_technique<R>(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut Technique) -> R,
    ) -> Result<R> {
        let technique = self
            .techniques
            .get_mut(index)
            .ok_or(PlanError::UnknownTechnique(index))?;
        let out = edit(technique);
        self.dispatch(index);
        Ok(out)
    }

    /// Changes the action taken at the home point.
    pub fn set_home_action(&mut self, action: Action) {
        self.home.set_action(action);
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.waypoint_changed(&self.home);
        }
    }

    /// The authoritative global flight sequence: home first, then every
    /// technique's waypoints in flight order.
    pub fn route_points(&self) -> impl Iterator<Item = &Waypoint> {
        std::iter::once(&self.home).chain(
            self.techniques
                .iter()
                .flat_map(|technique| technique.waypoints().iter()),
        )
    }

    /// Total plan duration in seconds: travel plus hold time over the whole
    /// sequence.
    pub fn total_duration(&self) -> f64 {
        self.route_points()
            .map(|waypoint| waypoint.travel_time() + waypoint.active_time())
            .sum()
    }

    /// Fastest physically possible traversal between two waypoints, in
    /// seconds. This is a lower bound, never an estimate: the max of the
    /// times dictated by flight speed, bearing rate and pitch rate.
    pub fn min_travel_time_between(&self, origin: &Waypoint, destination: &Waypoint) -> f64 {
        let distance_time =
            origin.position().distance_to(destination.position()) / self.constraints.max_speed();
        let bearing_time = geodesy::angular_separation(origin.bearing(), destination.bearing())
            / self.constraints.max_bearing_speed();
        let pitch_time =
            (origin.pitch() - destination.pitch()).abs() / self.constraints.max_pitch_speed();
        distance_time.max(bearing_time).max(pitch_time)
    }

    /// Repairs the action sequence so recording spans are well formed.
    ///
    /// One left-to-right sweep: outside a span, a stop is rewritten to
    /// nothing; inside a span, everything but the closing stop is rewritten
    /// to nothing (a mid-recording still is suppressed, not an error). A
    /// span left open at the end of the sequence is closed by forcing the
    /// last waypoint to stop recording, unless that waypoint is the start
    /// itself, which is erased instead. Running this twice is a no-op.
    pub fn fix_actions(&mut self) {
        let slots = self.action_slots();
        let mut recording = false;

        for &(technique, id, action) in &slots {
            let fixed = if recording {
                match action {
                    Action::StopRecording => {
                        recording = false;
                        Action::StopRecording
                    }
                    // anything else inside a span is illegal
                    _ => Action::Nothing,
                }
            } else {
                match action {
                    Action::StartRecording => {
                        recording = true;
                        Action::StartRecording
                    }
                    Action::StopRecording => Action::Nothing,
                    other => other,
                }
            };
            if fixed != action {
                debug!(?id, ?action, ?fixed, "rewriting illegal action");
                self.set_action_at(technique, id, fixed);
            }
        }

        if recording {
            if let Some(&(technique, id, _)) = slots.last() {
                let forced = if self.action_at(technique, id) == Action::StartRecording {
                    // the span opened on the very last waypoint; erase it
                    Action::Nothing
                } else {
                    Action::StopRecording
                };
                debug!(?id, ?forced, "closing the recording span left open");
                self.set_action_at(technique, id, forced);
            }
        }
    }

    /// Replays the recording state machine up to and including the given
    /// waypoint, without mutating anything.
    pub fn is_recording(&self, id: WaypointId) -> Result<bool> {
        let mut recording = false;
        for waypoint in self.route_points() {
            match waypoint.action() {
                Action::StartRecording if !recording => recording = true,
                Action::StopRecording if recording => recording = false,
                _ => {}
            }
            if waypoint.id() == id {
                return Ok(recording);
            }
        }
        Err(PlanError::UnknownWaypoint(id))
    }

    // ── Internals ──

    /// Global sequence snapshot as (technique, waypoint, action) slots;
    /// `None` for the home point.
    fn action_slots(&self) -> Vec<(Option<usize>, WaypointId, Action)> {
        let mut slots = vec![(None, self.home.id(), self.home.action())];
        for (index, technique) in self.techniques.iter().enumerate() {
            for waypoint in technique.waypoints() {
                slots.push((Some(index), waypoint.id(), waypoint.action()));
            }
        }
        slots
    }

    fn action_at(&self, technique: Option<usize>, id: WaypointId) -> Action {
        match technique {
            None => self.home.action(),
            Some(index) => self.techniques[index]
                .waypoint(id)
                .map(Waypoint::action)
                .unwrap_or(Action::Nothing),
        }
    }

    fn set_action_at(&mut self, technique: Option<usize>, id: WaypointId, action: Action) {
        match technique {
            None => {
                self.home.set_action(action);
                if let Some(observer) = self.observer.as_deref_mut() {
                    observer.waypoint_changed(&self.home);
                }
            }
            Some(index) => {
                if let Err(error) = self.techniques[index].set_waypoint_action(id, action) {
                    warn!(%error, "waypoint vanished while repairing actions");
                }
                self.dispatch(index);
            }
        }
    }

    /// Drains a technique's outbox, reacting to insertions and pushing every
    /// event to the observer. Loops until reactions stop producing events.
    fn dispatch(&mut self, index: usize) {
        loop {
            let events = self.techniques[index].take_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                if let TechniqueEvent::WaypointAdded(id) = event {
                    self.enforce_travel_floor(index, id);
                }
                self.notify(index, &event);
            }
        }
    }

    /// Raises a newly inserted waypoint's travel time to the minimum imposed
    /// by the constraints against its predecessor in the global sequence.
    /// Travel time is only ever raised here, never lowered.
    fn enforce_travel_floor(&mut self, index: usize, id: WaypointId) {
        let technique = &self.techniques[index];
        let position = match technique.waypoint_index(id) {
            Some(position) => position,
            None => return,
        };

        let predecessor = if position > 0 {
            technique.waypoints()[position - 1].clone()
        } else {
            // last waypoint of the nearest earlier non-empty technique,
            // falling back to home, which is always first
            self.techniques[..index]
                .iter()
                .rev()
                .find_map(|technique| technique.waypoints().last())
                .cloned()
                .unwrap_or_else(|| self.home.clone())
        };

        let waypoint = &self.techniques[index].waypoints()[position];
        let floor = self.min_travel_time_between(&predecessor, waypoint);
        if waypoint.travel_time() < floor {
            debug!(?id, floor, "raising travel time to the physical minimum");
            if let Err(error) = self.techniques[index].set_waypoint_travel_time(id, floor) {
                warn!(%error, "waypoint vanished while enforcing travel floor");
            }
        }
    }

    /// Resolves an event against the current state and pushes it to the
    /// observer. Events whose entity is already gone again are dropped.
    fn notify(&mut self, index: usize, event: &TechniqueEvent) {
        let observer = match self.observer.as_deref_mut() {
            Some(observer) => observer,
            None => return,
        };
        let technique = &self.techniques[index];
        match event {
            TechniqueEvent::TargetAdded(id) => match technique.target(*id) {
                Ok(target) => observer.target_added(target),
                Err(_) => trace!(?id, "dropping stale target-added event"),
            },
            TechniqueEvent::TargetChanged(id) => match technique.target(*id) {
                Ok(target) => observer.target_changed(target),
                Err(_) => trace!(?id, "dropping stale target-changed event"),
            },
            TechniqueEvent::TargetRemoved(target) => observer.target_removed(target),
            TechniqueEvent::WaypointAdded(id) => match technique.waypoint(*id) {
                Ok(waypoint) => observer.waypoint_added(waypoint),
                Err(_) => trace!(?id, "dropping stale waypoint-added event"),
            },
            TechniqueEvent::WaypointChanged(id) => match technique.waypoint(*id) {
                Ok(waypoint) => observer.waypoint_changed(waypoint),
                Err(_) => trace!(?id, "dropping stale waypoint-changed event"),
            },
            TechniqueEvent::WaypointRemoved(waypoint) => observer.waypoint_removed(waypoint),
            TechniqueEvent::ParametersChanged => observer.parameters_changed(index),
        }
    }
}
