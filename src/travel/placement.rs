//! Resolves a travel request into a single authoritative world position.
//!
//! Strategies are tried in a fixed priority order; configuration-sourced
//! coordinates always beat name-matching heuristics, because config is
//! more trustworthy than name heuristics:
//!
//! 1. Explicit coordinate hint (authoritative X/Z, vertical baseline).
//! 2. Named anchor object, polled up to a bounded timeout.
//! 3. Explicit anchor coordinates.
//! 4. Known spawn-anchor names, then the first non-UI root object.
//!
//! Whatever the strategy, the base point is then refined against world
//! geometry: grounded via raycast (clamped to the hint's elevation band
//! when a hint exists), navmesh fallback, or kept as-is for the safe
//! placement routine's overlap-raise pass to correct.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::time::{sleep, Instant};

use crate::config::PlacementConfig;
use crate::logutil::escape_log;
use crate::travel::errors::PlacementError;
use crate::travel::hosts::SceneHost;
use crate::travel::types::{Anchor, PlacementRequest, Point};
use crate::travel::world::WorldQuery;

pub struct PlacementResolver {
    scene: Arc<dyn SceneHost>,
    world: WorldQuery,
    config: PlacementConfig,
    spawn_anchor_names: Vec<String>,
}

impl PlacementResolver {
    pub fn new(
        scene: Arc<dyn SceneHost>,
        world: WorldQuery,
        config: PlacementConfig,
        spawn_anchor_names: Vec<String>,
    ) -> Self {
        Self {
            scene,
            world,
            config,
            spawn_anchor_names,
        }
    }

    /// Compute the target position for one placement attempt.
    pub async fn resolve(&self, request: &PlacementRequest) -> Result<Point, PlacementError> {
        let base = self
            .base_point(request)
            .await
            .ok_or(PlacementError::NoTarget)?;
        // The elevation baseline for grounding: an explicit hint, or the
        // configured anchor coordinates when no hint was supplied.
        let baseline = request
            .hint
            .or_else(|| request.destination.anchor.as_point());
        Ok(self.refine(base, baseline))
    }

    async fn base_point(&self, request: &PlacementRequest) -> Option<Point> {
        // Hints short-circuit anchor resolution entirely.
        if let Some(hint) = request.hint {
            debug!("placement base from hint {}", hint);
            return Some(hint);
        }

        match &request.destination.anchor {
            Anchor::NamedObject { name } => {
                if let Some(position) = self.poll_named_object(name).await {
                    return Some(position);
                }
                // Timed out; fall through to the heuristics below.
            }
            Anchor::Coordinates { .. } => {
                let point = request.destination.anchor.as_point()?;
                debug!("placement base from configured coordinates {}", point);
                return Some(point);
            }
            Anchor::Unset => {}
        }

        self.heuristic_point(request)
    }

    /// Poll for a named scene object up to the configured timeout. The
    /// object may still be initializing right after an area load, so a
    /// single lookup is not enough.
    async fn poll_named_object(&self, name: &str) -> Option<Point> {
        let deadline = Instant::now() + Duration::from_millis(self.config.named_object_timeout_ms);
        let interval = Duration::from_millis(self.config.named_object_poll_ms);

        loop {
            if let Some(object) = self.scene.find_object_by_name(name) {
                debug!(
                    "placement base from anchor object '{}' at {}",
                    escape_log(name),
                    object.position
                );
                return Some(object.position);
            }
            if Instant::now() >= deadline {
                warn!(
                    "anchor object '{}' did not appear within {}ms",
                    escape_log(name),
                    self.config.named_object_timeout_ms
                );
                return None;
            }
            sleep(interval).await;
        }
    }

    /// Last-resort strategies: well-known spawn anchor names, then the
    /// first non-UI root object of the target area.
    fn heuristic_point(&self, request: &PlacementRequest) -> Option<Point> {
        for name in &self.spawn_anchor_names {
            if let Some(object) = self.scene.find_object_by_name(name) {
                debug!(
                    "placement base from spawn anchor '{}' at {}",
                    escape_log(name),
                    object.position
                );
                return Some(object.position);
            }
        }

        let area_id = request
            .destination
            .area_id
            .clone()
            .or_else(|| self.scene.current_area_id())?;
        let root = self
            .scene
            .root_objects(&area_id)
            .into_iter()
            .find(|object| !object.is_ui)?;
        debug!(
            "placement base from root object '{}' in area '{}'",
            escape_log(&root.name),
            escape_log(&area_id)
        );
        Some(root.position)
    }

    /// Ground the base point against world geometry.
    fn refine(&self, base: Point, baseline: Option<Point>) -> Point {
        if let Some(ground) = self.world.find_ground(base) {
            let y = match baseline {
                // A raycast far below the expected elevation means the
                // ray passed into a different floor (a basement under
                // the plaza); clamp to the baseline's band instead.
                Some(baseline) => ground.y.clamp(
                    baseline.y - self.config.vertical_tolerance,
                    baseline.y + self.config.vertical_tolerance,
                ),
                None => ground.y,
            };
            return base.with_y(y);
        }

        if let Some(walkable) = self
            .world
            .find_nearest_walkable(base, self.config.walkable_search_radius)
        {
            debug!("no ground hit; using nearest walkable {}", walkable);
            return walkable;
        }

        // Keep the un-grounded base; the placement routine's raise
        // pass handles fine correction.
        debug!("no ground or walkable surface near {}; keeping base", base);
        base
    }
}
