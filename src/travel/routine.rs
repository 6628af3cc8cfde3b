//! Safe placement: physically relocate the actor without letting the
//! engine's collision response fling it.
//!
//! The routine is a single-task cooperative state machine:
//!
//! ```text
//! Idle -> PhysicsSuspended -> PositionSet -> Settling -> PhysicsResumed -> Done
//!   (Failed from any state when the actor is lost)
//! ```
//!
//! After the teleport the engine needs a couple of simulation steps to
//! settle transforms, then one small downward nudge so grounding
//! collision checks fire again. If the settled position still overlaps
//! geometry, a bounded raise-and-retest loop steps upward looking for
//! clearance; running out of raise budget is non-fatal.

use log::{debug, warn};
use tokio::time::{sleep, Duration};

use crate::config::PlacementConfig;
use crate::travel::actor::ActorController;
use crate::travel::errors::PlacementError;
use crate::travel::placement::PlacementResolver;
use crate::travel::types::{PlacementRequest, Point};
use crate::travel::world::WorldQuery;

/// Progress of one safe placement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementPhase {
    Idle,
    PhysicsSuspended,
    PositionSet,
    Settling,
    PhysicsResumed,
    Done,
    Failed,
}

pub struct SafePlacementRoutine<'a> {
    actor: &'a mut ActorController,
    world: &'a WorldQuery,
    config: &'a PlacementConfig,
    phase: PlacementPhase,
}

impl<'a> SafePlacementRoutine<'a> {
    pub fn new(
        actor: &'a mut ActorController,
        world: &'a WorldQuery,
        config: &'a PlacementConfig,
    ) -> Self {
        Self {
            actor,
            world,
            config,
            phase: PlacementPhase::Idle,
        }
    }

    fn advance(&mut self, next: PlacementPhase) {
        debug!("placement phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    /// Run the full suspend/set/settle/resume sequence toward `target`.
    /// Returns the actor's final position.
    pub async fn run(mut self, target: Point) -> Result<Point, PlacementError> {
        let snapshot = match self.actor.suspend_physics() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.advance(PlacementPhase::Failed);
                return Err(e);
            }
        };
        self.advance(PlacementPhase::PhysicsSuspended);

        if let Err(e) = self.actor.set_position(target) {
            self.advance(PlacementPhase::Failed);
            return Err(e);
        }
        self.advance(PlacementPhase::PositionSet);

        self.advance(PlacementPhase::Settling);
        let tick = Duration::from_millis(self.config.settle_tick_ms);
        for _ in 0..self.config.settle_ticks {
            sleep(tick).await;
        }
        if let Err(e) = self.actor.nudge_down(self.config.nudge_distance) {
            self.advance(PlacementPhase::Failed);
            return Err(e);
        }
        sleep(tick).await;

        let mut settled = match self.actor.position() {
            Ok(position) => position,
            Err(e) => {
                self.advance(PlacementPhase::Failed);
                return Err(e);
            }
        };

        if !self.world.is_clear(settled, self.config.clearance_radius) {
            match self.find_clear_above(settled) {
                Some(clear) => {
                    if let Err(e) = self.actor.set_position(clear) {
                        self.advance(PlacementPhase::Failed);
                        return Err(e);
                    }
                    settled = clear;
                }
                None => {
                    warn!(
                        "still overlapping geometry at {} after {:.2} raise budget; keeping position",
                        settled, self.config.raise_limit
                    );
                }
            }
        }

        if let Err(e) = self.actor.resume_physics(snapshot) {
            self.advance(PlacementPhase::Failed);
            return Err(e);
        }
        self.advance(PlacementPhase::PhysicsResumed);

        self.advance(PlacementPhase::Done);
        Ok(settled)
    }

    /// Step upward in fixed increments retesting clearance; first clear
    /// step wins.
    fn find_clear_above(&self, from: Point) -> Option<Point> {
        let steps = (self.config.raise_limit / self.config.raise_step).floor() as u32;
        for step in 1..=steps {
            let candidate = from.raised(self.config.raise_step * step as f32);
            if self.world.is_clear(candidate, self.config.clearance_radius) {
                debug!(
                    "cleared overlap by raising {:.2} to {}",
                    self.config.raise_step * step as f32,
                    candidate
                );
                return Some(candidate);
            }
        }
        None
    }
}

/// Bounded retry around resolve-then-place. Each attempt resolves a
/// fresh target; a placement "sticks" when the actor ends up within
/// `acceptance_radius` of it (hosts with their own movement controllers
/// sometimes snap a teleport elsewhere). `NoTarget` and `ActorLost`
/// abort immediately: the named-object timeout is already bounded, and
/// nothing may mutate a lost actor.
pub async fn place_with_retries(
    resolver: &PlacementResolver,
    actor: &mut ActorController,
    world: &WorldQuery,
    config: &PlacementConfig,
    request: &PlacementRequest,
) -> Result<Point, PlacementError> {
    let mut attempt = 1u32;
    loop {
        let target = resolver.resolve(request).await?;
        let routine = SafePlacementRoutine::new(actor, world, config);
        let landed = routine.run(target).await?;

        let miss = landed.horizontal_distance(target);
        if miss <= config.acceptance_radius {
            return Ok(landed);
        }
        warn!(
            "placement attempt {} landed {:.2} units from target {}",
            attempt, miss, target
        );

        if attempt >= config.max_attempts {
            return Err(PlacementError::AttemptsExhausted { attempts: attempt });
        }
        let delay = config.retry_base_delay_ms + config.retry_delay_step_ms * u64::from(attempt);
        sleep(Duration::from_millis(delay)).await;
        attempt += 1;
    }
}
