//! World geometry queries used to ground and validate teleport targets.
//! Pure reads against current world state; failure is "no result",
//! never a panic or error.

use std::sync::Arc;

use crate::config::PlacementConfig;
use crate::travel::hosts::PhysicsHost;
use crate::travel::types::Point;

/// Answers "what is the ground below this point", "is there walkable
/// surface nearby", and "is this point clear of obstacles".
#[derive(Clone)]
pub struct WorldQuery {
    physics: Arc<dyn PhysicsHost>,
    probe_height: f32,
    probe_distance: f32,
    ground_clearance: f32,
}

impl WorldQuery {
    pub fn new(physics: Arc<dyn PhysicsHost>, config: &PlacementConfig) -> Self {
        Self {
            physics,
            probe_height: config.probe_height,
            probe_distance: config.probe_distance,
            ground_clearance: config.ground_clearance,
        }
    }

    /// Cast downward from a fixed height above `point` and return the
    /// first solid-surface intersection, offset slightly upward so the
    /// actor does not interpenetrate the surface. `None` when nothing
    /// solid lies within range.
    pub fn find_ground(&self, point: Point) -> Option<Point> {
        let origin = point.raised(self.probe_height);
        let hit = self.physics.raycast_down(origin, self.probe_distance)?;
        Some(hit.point.raised(self.ground_clearance))
    }

    /// Closest walkable navigation-mesh location within `search_radius`.
    /// Used when ray grounding fails, e.g. indoors with no flat ray path.
    pub fn find_nearest_walkable(&self, point: Point, search_radius: f32) -> Option<Point> {
        self.physics.nearest_navmesh_point(point, search_radius)
    }

    /// True when no collider other than the actor's own overlaps a
    /// sphere of `check_radius` at `point`.
    pub fn is_clear(&self, point: Point, check_radius: f32) -> bool {
        !self.physics.overlap_any(point, check_radius, true)
    }
}
