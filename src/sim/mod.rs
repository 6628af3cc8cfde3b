//! Deterministic in-memory host world.
//!
//! Implements all three capability traits over one shared state so the
//! CLI can demonstrate a full travel transaction without a game engine,
//! and so tests can script host behavior precisely: flat ground with
//! obstacles, areas whose loads take a fixed number of polls, a wallet
//! with configurable failure modes, an actor that can be destroyed
//! mid-flight, and teleports that can be deflected to exercise the
//! retry loop.
//!
//! Everything is keyed off explicit state; nothing here is random or
//! time-dependent, so test runs are reproducible.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::travel::errors::SceneError;
use crate::travel::hosts::{
    AreaLoadHandle, CollisionState, EconomyError, EconomyHost, ObjectRef, PhysicsHost, RayHit,
    SceneHost,
};
use crate::travel::types::Point;

const DEFAULT_LOAD_POLLS: u32 = 3;

#[derive(Clone)]
pub struct SimWorld {
    state: Arc<Mutex<SimState>>,
}

struct SimState {
    ground_y: Option<f32>,
    obstacles: Vec<(Point, f32)>,
    navmesh: Vec<Point>,
    areas: BTreeMap<String, SimArea>,
    current_area: Option<String>,
    actor: SimActor,
    wallet: SimWallet,
    stall_activation: bool,
    /// Remaining deflected teleports and the offset applied to each.
    deflections: Option<(u32, Point)>,
}

struct SimArea {
    objects: Vec<ObjectRef>,
    load_polls: u32,
    load_count: u32,
}

impl SimArea {
    fn new() -> Self {
        Self {
            objects: Vec::new(),
            load_polls: DEFAULT_LOAD_POLLS,
            load_count: 0,
        }
    }
}

struct SimActor {
    alive: bool,
    position: Point,
    collision: CollisionState,
}

#[derive(Clone)]
enum WalletMode {
    Normal,
    /// No mutation path at all.
    Frozen,
    /// Every mutation reports failure; `applies` controls whether it
    /// secretly went through anyway (the ambiguous-debit case).
    Faulty { message: String, applies: bool },
}

struct SimWallet {
    balance: Option<i64>,
    mode: WalletMode,
    withdraw_calls: u32,
    deposit_calls: u32,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                ground_y: None,
                obstacles: Vec::new(),
                navmesh: Vec::new(),
                areas: BTreeMap::new(),
                current_area: None,
                actor: SimActor {
                    alive: true,
                    position: Point::default(),
                    collision: CollisionState {
                        collision_enabled: true,
                        kinematic: false,
                    },
                },
                wallet: SimWallet {
                    balance: Some(0),
                    mode: WalletMode::Normal,
                    withdraw_calls: 0,
                    deposit_calls: 0,
                },
                stall_activation: false,
                deflections: None,
            })),
        }
    }

    /// Infinite flat ground at height `y`.
    pub fn with_flat_ground(self, y: f32) -> Self {
        self.state.lock().unwrap().ground_y = Some(y);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimState> {
        self.state.lock().unwrap()
    }

    // --- world setup -----------------------------------------------------

    pub fn add_area(&self, area_id: &str) {
        self.lock()
            .areas
            .entry(area_id.to_string())
            .or_insert_with(SimArea::new);
    }

    /// Number of progress polls a load of `area_id` takes to finish.
    pub fn set_load_polls(&self, area_id: &str, polls: u32) {
        let mut state = self.lock();
        state
            .areas
            .entry(area_id.to_string())
            .or_insert_with(SimArea::new)
            .load_polls = polls.max(1);
    }

    pub fn add_object(&self, area_id: &str, name: &str, position: Point) {
        let mut state = self.lock();
        state
            .areas
            .entry(area_id.to_string())
            .or_insert_with(SimArea::new)
            .objects
            .push(ObjectRef::new(name, position));
    }

    pub fn add_ui_object(&self, area_id: &str, name: &str, position: Point) {
        let mut state = self.lock();
        state
            .areas
            .entry(area_id.to_string())
            .or_insert_with(SimArea::new)
            .objects
            .push(ObjectRef::ui(name, position));
    }

    pub fn set_current_area(&self, area_id: &str) {
        self.add_area(area_id);
        self.lock().current_area = Some(area_id.to_string());
    }

    pub fn add_obstacle(&self, center: Point, radius: f32) {
        self.lock().obstacles.push((center, radius));
    }

    pub fn add_navmesh_point(&self, point: Point) {
        self.lock().navmesh.push(point);
    }

    /// Make the host stop reporting activation; loads still swap the
    /// area in (some engines activate without ever saying so).
    pub fn stall_activation(&self, stalled: bool) {
        self.lock().stall_activation = stalled;
    }

    // --- actor controls --------------------------------------------------

    pub fn destroy_actor(&self) {
        self.lock().actor.alive = false;
    }

    pub fn actor_pos(&self) -> Option<Point> {
        let state = self.lock();
        state.actor.alive.then_some(state.actor.position)
    }

    pub fn actor_collision(&self) -> CollisionState {
        self.lock().actor.collision
    }

    /// Deflect the next `count` teleports by `offset`, simulating a host
    /// movement controller snapping the actor elsewhere.
    pub fn deflect_next_teleports(&self, count: u32, offset: Point) {
        self.lock().deflections = Some((count, offset));
    }

    // --- wallet controls -------------------------------------------------

    pub fn set_balance(&self, balance: i64) {
        self.lock().wallet.balance = Some(balance);
    }

    /// Balance becomes unreadable ("could not determine"), mutations
    /// still work.
    pub fn clear_balance(&self) {
        self.lock().wallet.balance = None;
    }

    pub fn wallet_balance(&self) -> Option<i64> {
        self.lock().wallet.balance
    }

    /// Economy stops supporting mutation entirely.
    pub fn freeze_economy(&self) {
        self.lock().wallet.mode = WalletMode::Frozen;
    }

    /// Every mutation reports `message` as a fault. When `applies` is
    /// true the mutation secretly goes through first.
    pub fn fail_economy(&self, message: &str, applies: bool) {
        self.lock().wallet.mode = WalletMode::Faulty {
            message: message.to_string(),
            applies,
        };
    }

    pub fn withdraw_calls(&self) -> u32 {
        self.lock().wallet.withdraw_calls
    }

    pub fn deposit_calls(&self) -> u32 {
        self.lock().wallet.deposit_calls
    }

    pub fn load_count(&self, area_id: &str) -> u32 {
        self.lock()
            .areas
            .get(area_id)
            .map(|area| area.load_count)
            .unwrap_or(0)
    }
}

// --- scene -------------------------------------------------------------

struct SimLoadHandle {
    state: Arc<Mutex<SimState>>,
    area_id: String,
    polls_needed: u32,
    progress: Mutex<u32>,
    activation_allowed: bool,
}

impl AreaLoadHandle for SimLoadHandle {
    fn progress(&self) -> f32 {
        let mut polls = self.progress.lock().unwrap();
        if *polls < self.polls_needed {
            *polls += 1;
        }
        *polls as f32 / self.polls_needed as f32
    }

    fn is_ready(&self) -> bool {
        *self.progress.lock().unwrap() >= self.polls_needed
    }

    fn allow_activation(&mut self) {
        self.activation_allowed = true;
        // The area swaps in regardless of whether activation is ever
        // reported back; that mirrors hosts with unreliable signals.
        self.state.lock().unwrap().current_area = Some(self.area_id.clone());
    }

    fn is_activated(&self) -> bool {
        if self.state.lock().unwrap().stall_activation {
            return false;
        }
        self.activation_allowed
    }
}

impl SceneHost for SimWorld {
    fn current_area_id(&self) -> Option<String> {
        self.lock().current_area.clone()
    }

    fn begin_area_load(&self, area_id: &str) -> Result<Box<dyn AreaLoadHandle>, SceneError> {
        let mut state = self.lock();
        let Some(area) = state.areas.get_mut(area_id) else {
            return Err(SceneError::LoadFailed(format!(
                "area '{}' is not registered",
                area_id
            )));
        };
        area.load_count += 1;
        let polls_needed = area.load_polls;
        Ok(Box::new(SimLoadHandle {
            state: self.state.clone(),
            area_id: area_id.to_string(),
            polls_needed,
            progress: Mutex::new(0),
            activation_allowed: false,
        }))
    }

    fn find_object_by_name(&self, name: &str) -> Option<ObjectRef> {
        let state = self.lock();
        let area = state.areas.get(state.current_area.as_deref()?)?;
        area.objects.iter().find(|o| o.name == name).cloned()
    }

    fn root_objects(&self, area_id: &str) -> Vec<ObjectRef> {
        self.lock()
            .areas
            .get(area_id)
            .map(|area| area.objects.clone())
            .unwrap_or_default()
    }
}

// --- physics -----------------------------------------------------------

fn distance(a: Point, b: Point) -> f32 {
    let dy = a.y - b.y;
    (a.horizontal_distance(b).powi(2) + dy * dy).sqrt()
}

impl PhysicsHost for SimWorld {
    fn raycast_down(&self, origin: Point, max_distance: f32) -> Option<RayHit> {
        let ground_y = self.lock().ground_y?;
        let drop = origin.y - ground_y;
        if drop < 0.0 || drop > max_distance {
            return None;
        }
        Some(RayHit {
            point: origin.with_y(ground_y),
            distance: drop,
        })
    }

    fn overlap_any(&self, center: Point, radius: f32, _ignore_actor: bool) -> bool {
        self.lock()
            .obstacles
            .iter()
            .any(|(at, r)| distance(center, *at) < r + radius)
    }

    fn nearest_navmesh_point(&self, center: Point, radius: f32) -> Option<Point> {
        let state = self.lock();
        state
            .navmesh
            .iter()
            .copied()
            .filter(|p| distance(center, *p) <= radius)
            .min_by(|a, b| {
                distance(center, *a)
                    .partial_cmp(&distance(center, *b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    fn actor_position(&self) -> Option<Point> {
        self.actor_pos()
    }

    fn set_actor_position(&self, position: Point) -> bool {
        let mut state = self.lock();
        if !state.actor.alive {
            return false;
        }
        let landed = match state.deflections {
            Some((remaining, offset)) if remaining > 0 => {
                state.deflections = Some((remaining - 1, offset));
                Point::new(
                    position.x + offset.x,
                    position.y + offset.y,
                    position.z + offset.z,
                )
            }
            _ => position,
        };
        state.actor.position = landed;
        true
    }

    fn collision_state(&self) -> Option<CollisionState> {
        let state = self.lock();
        state.actor.alive.then_some(state.actor.collision)
    }

    fn set_collision_state(&self, new: CollisionState) -> bool {
        let mut state = self.lock();
        if !state.actor.alive {
            return false;
        }
        state.actor.collision = new;
        true
    }

    fn apply_downward_motion(&self, distance: f32) -> bool {
        let mut state = self.lock();
        if !state.actor.alive {
            return false;
        }
        let mut y = state.actor.position.y - distance;
        if let Some(ground_y) = state.ground_y {
            // The simulated controller never tunnels through the floor.
            y = y.max(ground_y);
        }
        state.actor.position.y = y;
        true
    }
}

// --- economy -----------------------------------------------------------

impl SimWorld {
    fn mutate_wallet(
        &self,
        delta: i64,
        call_counter: impl FnOnce(&mut SimWallet) -> &mut u32,
    ) -> Result<(), EconomyError> {
        let mut state = self.lock();
        *call_counter(&mut state.wallet) += 1;
        let mode = state.wallet.mode.clone();
        match mode {
            WalletMode::Normal => {
                if let Some(balance) = state.wallet.balance.as_mut() {
                    *balance += delta;
                }
                Ok(())
            }
            WalletMode::Frozen => Err(EconomyError::NotSupported),
            WalletMode::Faulty { message, applies } => {
                if applies {
                    if let Some(balance) = state.wallet.balance.as_mut() {
                        *balance += delta;
                    }
                }
                Err(EconomyError::Unavailable(message))
            }
        }
    }
}

impl EconomyHost for SimWorld {
    fn balance(&self) -> Option<i64> {
        self.lock().wallet.balance
    }

    fn withdraw(&self, amount: i64) -> Result<(), EconomyError> {
        self.mutate_wallet(-amount, |wallet| &mut wallet.withdraw_calls)
    }

    fn deposit(&self, amount: i64) -> Result<(), EconomyError> {
        self.mutate_wallet(amount, |wallet| &mut wallet.deposit_calls)
    }
}
