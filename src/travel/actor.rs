//! The movable actor: position access and physics suspend/resume.
//!
//! Teleporting with live physics lets the engine's collision response
//! fling the actor, so placement suspends collision first and restores
//! the exact prior state afterwards. Actor loss (destroyed mid-flight)
//! surfaces as [`PlacementError::ActorLost`] at every call site; nothing
//! mutates after loss.

use std::sync::Arc;

use log::debug;

use crate::travel::errors::PlacementError;
use crate::travel::hosts::PhysicsHost;
use crate::travel::types::{PhysicsSnapshot, Point};

pub struct ActorController {
    physics: Arc<dyn PhysicsHost>,
    /// Snapshot taken at first suspension; present while suspended.
    suspended: Option<PhysicsSnapshot>,
}

impl ActorController {
    pub fn new(physics: Arc<dyn PhysicsHost>) -> Self {
        Self {
            physics,
            suspended: None,
        }
    }

    pub fn position(&self) -> Result<Point, PlacementError> {
        self.physics
            .actor_position()
            .ok_or(PlacementError::ActorLost)
    }

    pub fn set_position(&mut self, position: Point) -> Result<(), PlacementError> {
        if self.physics.set_actor_position(position) {
            Ok(())
        } else {
            Err(PlacementError::ActorLost)
        }
    }

    /// Disable collision response and capture the prior state for later
    /// restoration. Idempotent: while already suspended this returns the
    /// snapshot taken at first suspension without touching the host again.
    pub fn suspend_physics(&mut self) -> Result<PhysicsSnapshot, PlacementError> {
        if let Some(snapshot) = self.suspended {
            return Ok(snapshot);
        }
        let state = self
            .physics
            .collision_state()
            .ok_or(PlacementError::ActorLost)?;
        let snapshot = PhysicsSnapshot::from(state);
        let suspended_state = crate::travel::hosts::CollisionState {
            collision_enabled: false,
            kinematic: true,
        };
        if !self.physics.set_collision_state(suspended_state) {
            return Err(PlacementError::ActorLost);
        }
        debug!(
            "actor physics suspended (was collision={} kinematic={})",
            snapshot.collision_enabled, snapshot.kinematic
        );
        self.suspended = Some(snapshot);
        Ok(snapshot)
    }

    /// Restore exactly the state captured at suspension.
    pub fn resume_physics(&mut self, snapshot: PhysicsSnapshot) -> Result<(), PlacementError> {
        if !self.physics.set_collision_state(snapshot.into()) {
            return Err(PlacementError::ActorLost);
        }
        debug!(
            "actor physics resumed (collision={} kinematic={})",
            snapshot.collision_enabled, snapshot.kinematic
        );
        self.suspended = None;
        Ok(())
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.is_some()
    }

    /// Small controlled downward motion while physics probing is active,
    /// forcing grounding collision checks to fire once after teleport.
    pub fn nudge_down(&mut self, distance: f32) -> Result<(), PlacementError> {
        if self.physics.apply_downward_motion(distance) {
            Ok(())
        } else {
            Err(PlacementError::ActorLost)
        }
    }
}
