//! Asynchronous area loading ahead of placement.
//!
//! The controller walks one load through
//! `NotStarted -> Loading -> ReadyToActivate -> Activating -> Settled`
//! (`Failed` only when the host refuses to even begin the load). The
//! host engine owns load completion, so the load itself is never timed
//! out: a stalled load gets a soft watchdog warning per window and the
//! wait continues. Activation is also best-effort: some hosts report
//! completion unreliably, so after the activation timeout the controller
//! proceeds anyway.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::{sleep, Instant};

use crate::config::SceneConfig;
use crate::logutil::escape_log;
use crate::travel::errors::SceneError;
use crate::travel::hosts::SceneHost;

/// Progress of one area transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    NotStarted,
    Loading,
    ReadyToActivate,
    Activating,
    Settled,
    Failed,
}

pub struct SceneTransitionController {
    scene: Arc<dyn SceneHost>,
    config: SceneConfig,
    phase: TransitionPhase,
}

impl SceneTransitionController {
    pub fn new(scene: Arc<dyn SceneHost>, config: SceneConfig) -> Self {
        Self {
            scene,
            config,
            phase: TransitionPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    fn advance(&mut self, next: TransitionPhase) {
        debug!("scene transition {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    /// Load `area_id` and wait until it is safe to look up objects and
    /// place the actor there.
    pub async fn transition_to(&mut self, area_id: &str) -> Result<(), SceneError> {
        if self.scene.current_area_id().as_deref() == Some(area_id) {
            debug!("already in area '{}'; skipping load", escape_log(area_id));
            self.advance(TransitionPhase::Settled);
            return Ok(());
        }

        let mut handle = match self.scene.begin_area_load(area_id) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("area '{}' load refused: {}", escape_log(area_id), e);
                self.advance(TransitionPhase::Failed);
                return Err(e);
            }
        };
        self.advance(TransitionPhase::Loading);

        let poll = Duration::from_millis(self.config.progress_poll_ms);
        let watchdog = Duration::from_millis(self.config.load_watchdog_ms);
        let mut last_logged = -1.0f32;
        let mut last_progress = -1.0f32;
        let mut last_movement = Instant::now();

        loop {
            let progress = handle.progress();
            if (progress - last_logged).abs() > self.config.progress_log_delta {
                info!(
                    "loading area '{}': {:.0}%",
                    escape_log(area_id),
                    progress * 100.0
                );
                last_logged = progress;
            }
            if (progress - last_progress).abs() > f32::EPSILON {
                last_progress = progress;
                last_movement = Instant::now();
            } else if last_movement.elapsed() >= watchdog {
                // Soft watchdog only; the host owns load completion.
                warn!(
                    "area '{}' load stalled at {:.0}% for {}s; still waiting",
                    escape_log(area_id),
                    progress * 100.0,
                    watchdog.as_secs()
                );
                last_movement = Instant::now();
            }
            if handle.is_ready() {
                break;
            }
            sleep(poll).await;
        }
        self.advance(TransitionPhase::ReadyToActivate);

        handle.allow_activation();
        self.advance(TransitionPhase::Activating);
        let deadline = Instant::now() + Duration::from_millis(self.config.activation_timeout_ms);
        while !handle.is_activated() {
            if Instant::now() >= deadline {
                warn!(
                    "area '{}' did not report activation within {}ms; proceeding anyway",
                    escape_log(area_id),
                    self.config.activation_timeout_ms
                );
                break;
            }
            sleep(poll).await;
        }

        // Grace period: newly loaded objects get a chance to run their
        // initialization before any lookup or placement touches them.
        let grace_end = Instant::now() + Duration::from_millis(self.config.settle_grace_ms);
        while Instant::now() < grace_end {
            sleep(poll.min(grace_end - Instant::now())).await;
        }
        self.advance(TransitionPhase::Settled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimWorld;

    #[tokio::test(start_paused = true)]
    async fn test_transition_reaches_settled() {
        let sim = Arc::new(SimWorld::new());
        sim.add_area("harbor_district");

        let mut controller = SceneTransitionController::new(sim.clone(), SceneConfig::default());
        controller.transition_to("harbor_district").await.unwrap();
        assert_eq!(controller.phase(), TransitionPhase::Settled);
        assert_eq!(sim.current_area_id().as_deref(), Some("harbor_district"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_area_fails_to_start() {
        let sim = Arc::new(SimWorld::new());
        let mut controller = SceneTransitionController::new(sim.clone(), SceneConfig::default());
        let result = controller.transition_to("atlantis").await;
        assert!(matches!(result, Err(SceneError::LoadFailed(_))));
        assert_eq!(controller.phase(), TransitionPhase::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skips_load_when_already_in_area() {
        let sim = Arc::new(SimWorld::new());
        sim.add_area("plaza");
        sim.set_current_area("plaza");

        let mut controller = SceneTransitionController::new(sim.clone(), SceneConfig::default());
        controller.transition_to("plaza").await.unwrap();
        assert_eq!(controller.phase(), TransitionPhase::Settled);
        assert_eq!(sim.load_count("plaza"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activation_timeout_proceeds_anyway() {
        let sim = Arc::new(SimWorld::new());
        sim.add_area("keep");
        sim.stall_activation(true);

        let started = tokio::time::Instant::now();
        let mut controller = SceneTransitionController::new(sim.clone(), SceneConfig::default());
        controller.transition_to("keep").await.unwrap();

        assert_eq!(controller.phase(), TransitionPhase::Settled);
        // Waited out the 12s activation window before giving up on the
        // host's activation signal.
        assert!(started.elapsed() >= Duration::from_millis(12_000));
    }
}
