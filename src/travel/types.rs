use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const VISIT_SCHEMA_VERSION: u8 = 1;

/// A position in world space. Host engines differ on handedness and
/// units; waygate treats coordinates as opaque apart from Y being "up".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Same X/Z with a replacement height.
    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }

    /// Shift straight up (negative values shift down).
    pub fn raised(self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }

    /// Distance ignoring the vertical axis, used for "same spot" checks.
    pub fn horizontal_distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// How a destination's world position is found.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Look up a scene object by name and use its position.
    NamedObject { name: String },
    /// Fixed world coordinates from configuration.
    Coordinates { x: f32, y: f32, z: f32 },
    /// No anchor; placement relies on area heuristics.
    Unset,
}

impl Default for Anchor {
    fn default() -> Self {
        Self::Unset
    }
}

impl Anchor {
    pub fn coordinates(x: f32, y: f32, z: f32) -> Self {
        Self::Coordinates { x, y, z }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::NamedObject { name: name.into() }
    }

    /// Explicit coordinates as a point, when present.
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Coordinates { x, y, z } => Some(Point::new(*x, *y, *z)),
            _ => None,
        }
    }
}

/// A named fast-travel target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    /// Unique key; lookups are case-insensitive.
    pub id: String,
    /// Display name shown to players.
    pub name: String,
    #[serde(default)]
    pub anchor: Anchor,
    /// Area to load before placement, if travel crosses an area boundary.
    #[serde(default)]
    pub area_id: Option<String>,
    /// Travel price; `None` falls back to the catalog default.
    #[serde(default)]
    pub price: Option<i64>,
    /// Whether the destination is currently selectable. Distinct from
    /// "has been visited", which lives in [`VisitedSet`].
    #[serde(default = "default_unlocked")]
    pub unlocked: bool,
}

fn default_unlocked() -> bool {
    true
}

impl Destination {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            anchor: Anchor::Unset,
            area_id: None,
            price: None,
            unlocked: true,
        }
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_area(mut self, area_id: impl Into<String>) -> Self {
        self.area_id = Some(area_id.into());
        self
    }

    pub fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn locked(mut self) -> Self {
        self.unlocked = false;
        self
    }

    /// A destination with no anchor and no area gives the resolver
    /// nothing to work with, so it can never be selected.
    pub fn selectable(&self) -> bool {
        if !self.unlocked {
            return false;
        }
        !(self.anchor == Anchor::Unset && self.area_id.is_none())
    }
}

/// One travel attempt's placement input. Built per attempt and consumed
/// by the resolver; never retained.
#[derive(Debug, Clone)]
pub struct PlacementRequest {
    pub destination: Destination,
    /// Coordinate hint: authoritative for X/Z, vertical baseline for Y.
    /// Hints always beat anchor heuristics.
    pub hint: Option<Point>,
}

impl PlacementRequest {
    pub fn new(destination: Destination) -> Self {
        Self {
            destination,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: Point) -> Self {
        self.hint = Some(hint);
        self
    }
}

/// Physics flags captured when an actor's physics is suspended, restored
/// verbatim on resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsSnapshot {
    pub collision_enabled: bool,
    pub kinematic: bool,
}

/// Destinations the actor has reached at least once. Append-only: ids
/// are inserted on first successful travel and never removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisitedSet {
    ids: BTreeSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visit. Returns `true` when the id was newly inserted;
    /// marking an already-visited destination is a no-op.
    pub fn mark_visited(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_ascii_lowercase())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(&id.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// Why a travel transaction aborted before (or without) relocating the
/// actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The destination id matched nothing in the catalog.
    UnknownDestination,
    /// Locked, or no anchor and no area to search.
    Unselectable,
    /// Balance was known and below the effective price.
    InsufficientFunds,
    /// No placement target could be resolved.
    NoTarget,
    /// The destination area failed to even begin loading.
    SceneLoadFailed,
    /// Placement attempts were exhausted.
    PlacementFailed,
    /// The actor disappeared mid-operation.
    ActorLost,
    /// Another travel transaction is already running for this actor.
    TravelInProgress,
}

/// Terminal result of one travel transaction. Always reported to the
/// caller; never silently swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TravelOutcome {
    /// Placement and charge both succeeded.
    Complete,
    /// The actor arrived but the charge failed. Travel is not reversed;
    /// reported distinctly so callers can tell the actor did move.
    ChargeFailedAfterPlacement,
    Aborted(AbortReason),
}

impl TravelOutcome {
    pub fn is_arrival(&self) -> bool {
        matches!(self, Self::Complete | Self::ChargeFailedAfterPlacement)
    }

    /// Short human-readable message for each terminal state.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Complete => "Travel complete.",
            Self::ChargeFailedAfterPlacement => {
                "Arrived, but the fare could not be collected."
            }
            Self::Aborted(reason) => match reason {
                AbortReason::UnknownDestination => "No such destination.",
                AbortReason::Unselectable => "That destination is not available.",
                AbortReason::InsufficientFunds => "Not enough funds for the fare.",
                AbortReason::NoTarget => "No arrival point could be found.",
                AbortReason::SceneLoadFailed => "The destination area failed to load.",
                AbortReason::PlacementFailed => "Arrival placement failed.",
                AbortReason::ActorLost => "Traveler vanished mid-journey.",
                AbortReason::TravelInProgress => "A journey is already underway.",
            },
        }
    }
}

impl std::fmt::Display for TravelOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
