//! Camera flight-path planning for recording drones.
//!
//! A plan is built from points of interest ([`Target`]s) and shot patterns
//! ([`Technique`]s) that derive the actual flight [`Waypoint`]s; a [`Route`]
//! flattens every technique into one global sequence, keeps travel times
//! above the physical minimum allowed by its [`Constraints`], and repairs
//! the start/stop-recording action sequence after arbitrary edits.
//!
//! All of it is synchronous and single-threaded: every mutation, including
//! the cascaded reactions it triggers, completes before the call returns.

#[macro_use]
extern crate tracing;

pub mod error;
pub mod geodesy;
pub mod plan;
pub mod route;
pub mod target;
pub mod technique;
pub mod types;
pub mod waypoint;

pub use error::{PlanError, Result};
pub use plan::Plan;
pub use route::{Constraints, Route, RouteObserver};
pub use target::Target;
pub use technique::{CraneShot, OverheadShot, ShotKind, Technique, TechniqueEvent};
pub use types::{Position, TargetId, WaypointId};
pub use waypoint::{Action, Waypoint};
