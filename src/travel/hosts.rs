//! Capability traits the engine consumes from a host game.
//!
//! Waygate never inspects host type metadata itself; everything the
//! original "find the field by name" reflection glue did is pushed
//! behind these seams. An adapter per host implements the traits; the
//! crate ships a deterministic in-memory implementation in [`crate::sim`]
//! for tests and the CLI demo.
//!
//! All traits are object-safe, `Send + Sync`, and synchronous: waiting,
//! polling, and retrying are the orchestrators' job, so adapters stay
//! thin wrappers over host API calls.

use thiserror::Error;

use crate::travel::errors::SceneError;
use crate::travel::types::{PhysicsSnapshot, Point};

/// Snapshot of a scene object at lookup time.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRef {
    pub name: String,
    pub position: Point,
    /// UI widgets are skipped by the root-object placement heuristic.
    pub is_ui: bool,
}

impl ObjectRef {
    pub fn new(name: impl Into<String>, position: Point) -> Self {
        Self {
            name: name.into(),
            position,
            is_ui: false,
        }
    }

    pub fn ui(name: impl Into<String>, position: Point) -> Self {
        Self {
            name: name.into(),
            position,
            is_ui: true,
        }
    }
}

/// A downward ray intersection with world geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Point,
    /// Distance from the ray origin to the hit.
    pub distance: f32,
}

/// Raw physics flags as the host reports them. [`PhysicsSnapshot`] is
/// the same data captured for restoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionState {
    pub collision_enabled: bool,
    pub kinematic: bool,
}

impl From<CollisionState> for PhysicsSnapshot {
    fn from(state: CollisionState) -> Self {
        Self {
            collision_enabled: state.collision_enabled,
            kinematic: state.kinematic,
        }
    }
}

impl From<PhysicsSnapshot> for CollisionState {
    fn from(snapshot: PhysicsSnapshot) -> Self {
        Self {
            collision_enabled: snapshot.collision_enabled,
            kinematic: snapshot.kinematic,
        }
    }
}

/// Handle for one asynchronous area load. Polled by the scene
/// transition controller; the host owns actual load scheduling.
pub trait AreaLoadHandle: Send {
    /// Load progress in `0.0..=1.0`. Hosts may park near 0.9 until
    /// activation is allowed.
    fn progress(&self) -> f32;

    /// True once the load is complete enough to activate.
    fn is_ready(&self) -> bool;

    /// Permit the host to swap the loaded area in.
    fn allow_activation(&mut self);

    /// True once the area is live. Some hosts report this unreliably;
    /// the controller treats it as best-effort.
    fn is_activated(&self) -> bool;
}

/// Scene-graph access: current area, async loads, object lookup.
pub trait SceneHost: Send + Sync {
    /// Id of the currently active area, if the host exposes one.
    fn current_area_id(&self) -> Option<String>;

    /// Begin loading `area_id`. Returns a pollable handle, or
    /// [`SceneError::LoadFailed`] when the load cannot start at all.
    fn begin_area_load(&self, area_id: &str) -> Result<Box<dyn AreaLoadHandle>, SceneError>;

    /// Find a live scene object by exact name.
    fn find_object_by_name(&self, name: &str) -> Option<ObjectRef>;

    /// Root objects of an area, in host order.
    fn root_objects(&self, area_id: &str) -> Vec<ObjectRef>;
}

/// Physics-world access: queries plus the single movable actor's
/// transform and physics flags. Actor accessors return `Option`/`bool`
/// so adapters can express "actor gone" without panicking; callers
/// convert that into a typed `ActorLost` error.
pub trait PhysicsHost: Send + Sync {
    /// First solid surface hit casting straight down from `origin`.
    fn raycast_down(&self, origin: Point, max_distance: f32) -> Option<RayHit>;

    /// True when any collider other than the actor's own overlaps a
    /// sphere at `center`.
    fn overlap_any(&self, center: Point, radius: f32, ignore_actor: bool) -> bool;

    /// Closest walkable navigation-mesh position within `radius`.
    fn nearest_navmesh_point(&self, center: Point, radius: f32) -> Option<Point>;

    fn actor_position(&self) -> Option<Point>;

    /// Returns `false` when the actor no longer exists.
    fn set_actor_position(&self, position: Point) -> bool;

    fn collision_state(&self) -> Option<CollisionState>;

    /// Returns `false` when the actor no longer exists.
    fn set_collision_state(&self, state: CollisionState) -> bool;

    /// Apply a small downward motion through the host's movement path so
    /// grounding collision checks fire. Returns `false` on actor loss.
    fn apply_downward_motion(&self, distance: f32) -> bool;
}

/// Failures an economy host can report for a mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EconomyError {
    /// The host has no way to change balances.
    #[error("economy host does not support mutation")]
    NotSupported,

    /// The host faulted; whether the mutation applied is unknown.
    #[error("economy host unavailable: {0}")]
    Unavailable(String),
}

/// The host's real currency system. Waygate assumes nothing about its
/// shape beyond balance/withdraw/deposit semantics; each call is atomic
/// on the host side.
pub trait EconomyHost: Send + Sync {
    /// Best-effort read. `None` means "could not determine", never
    /// "zero".
    fn balance(&self) -> Option<i64>;

    fn withdraw(&self, amount: i64) -> Result<(), EconomyError>;

    fn deposit(&self, amount: i64) -> Result<(), EconomyError>;
}
