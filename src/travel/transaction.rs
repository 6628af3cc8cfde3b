//! The travel transaction: validate funds, move the actor, then charge.
//!
//! Ordering is the heart of the contract. Currency is debited only
//! after placement has confirmed success, so a failed journey never
//! costs anything. The inverse failure (arrival followed by a failed
//! charge) is reported distinctly as [`TravelOutcome::ChargeFailedAfterPlacement`]
//! and the travel is not reversed: undoing a scene transition is far
//! riskier than losing revenue.
//!
//! One transaction at a time: the actor's physics suspend/resume is not
//! reentrant-safe, so an overlapping request is rejected, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::logutil::escape_log;
use crate::travel::actor::ActorController;
use crate::travel::catalog::DestinationCatalog;
use crate::travel::errors::{LedgerError, PlacementError};
use crate::travel::hosts::{EconomyHost, PhysicsHost, SceneHost};
use crate::travel::ledger::CurrencyLedger;
use crate::travel::placement::PlacementResolver;
use crate::travel::routine::place_with_retries;
use crate::travel::scene::SceneTransitionController;
use crate::travel::types::{
    AbortReason, Destination, PlacementRequest, Point, TravelOutcome, VisitedSet,
};
use crate::travel::world::WorldQuery;

/// Progress of one travel transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelPhase {
    Validating,
    Placing,
    Charging,
    Complete,
    Aborted,
}

pub struct TravelService {
    scene: Arc<dyn SceneHost>,
    physics: Arc<dyn PhysicsHost>,
    ledger: CurrencyLedger,
    config: Config,
    in_flight: AtomicBool,
}

/// RAII release of the in-flight flag on every exit path.
struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then_some(Self(flag))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TravelService {
    pub fn new(
        scene: Arc<dyn SceneHost>,
        physics: Arc<dyn PhysicsHost>,
        economy: Arc<dyn EconomyHost>,
        config: Config,
    ) -> Self {
        Self {
            scene,
            physics,
            ledger: CurrencyLedger::new(economy),
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn ledger(&self) -> &CurrencyLedger {
        &self.ledger
    }

    /// Run one travel transaction to `destination_id`. The catalog and
    /// visited set are owned by the caller; `hint` overrides anchor
    /// resolution when supplied.
    pub async fn travel(
        &self,
        catalog: &DestinationCatalog,
        visited: &mut VisitedSet,
        destination_id: &str,
        hint: Option<Point>,
    ) -> TravelOutcome {
        let Some(_guard) = FlightGuard::acquire(&self.in_flight) else {
            warn!(
                "rejecting travel to '{}': another journey is in flight",
                escape_log(destination_id)
            );
            return TravelOutcome::Aborted(AbortReason::TravelInProgress);
        };

        let tx = Uuid::new_v4();
        info!(
            "[{}] travel requested to '{}'",
            tx,
            escape_log(destination_id)
        );

        // Validating: no side effects until this phase passes.
        debug!("[{}] phase {:?}", tx, TravelPhase::Validating);
        let Some(destination) = catalog.get(destination_id).cloned() else {
            return self.abort(tx, AbortReason::UnknownDestination);
        };
        if !destination.selectable() {
            return self.abort(tx, AbortReason::Unselectable);
        }
        let price = catalog.effective_price(&destination);
        if price > 0 {
            // An unknown balance permits the attempt; the debit itself
            // is the arbiter then.
            if let Some(balance) = self.ledger.balance() {
                if balance < price {
                    info!(
                        "[{}] balance {} below fare {} for '{}'",
                        tx, balance, price, destination.id
                    );
                    return self.abort(tx, AbortReason::InsufficientFunds);
                }
            }
        }

        debug!("[{}] phase {:?}", tx, TravelPhase::Placing);
        if let Err(reason) = self.place(&tx, &destination, hint).await {
            return self.abort(tx, reason);
        }

        debug!("[{}] phase {:?}", tx, TravelPhase::Charging);
        let outcome = self.charge(&tx, price);

        if outcome.is_arrival() && visited.mark_visited(&destination.id) {
            info!("[{}] first visit to '{}'", tx, escape_log(&destination.id));
        }
        info!("[{}] {}", tx, outcome.message());
        outcome
    }

    /// Scene transition (when needed) plus the resolve/place retry loop.
    async fn place(
        &self,
        tx: &Uuid,
        destination: &Destination,
        hint: Option<Point>,
    ) -> Result<(), AbortReason> {
        if let Some(area_id) = &destination.area_id {
            let mut controller =
                SceneTransitionController::new(self.scene.clone(), self.config.scene.clone());
            if let Err(e) = controller.transition_to(area_id).await {
                warn!("[{}] scene transition failed: {}", tx, e);
                return Err(AbortReason::SceneLoadFailed);
            }
        }

        let world = WorldQuery::new(self.physics.clone(), &self.config.placement);
        let mut actor = ActorController::new(self.physics.clone());
        let resolver = PlacementResolver::new(
            self.scene.clone(),
            world.clone(),
            self.config.placement.clone(),
            self.config.catalog.spawn_anchor_names.clone(),
        );

        let request = PlacementRequest {
            destination: destination.clone(),
            hint,
        };
        match place_with_retries(&resolver, &mut actor, &world, &self.config.placement, &request)
            .await
        {
            Ok(landed) => {
                info!("[{}] placed at {}", tx, landed);
                Ok(())
            }
            Err(PlacementError::NoTarget) => Err(AbortReason::NoTarget),
            Err(PlacementError::ActorLost) => Err(AbortReason::ActorLost),
            Err(PlacementError::AttemptsExhausted { attempts }) => {
                warn!("[{}] placement gave up after {} attempts", tx, attempts);
                Err(AbortReason::PlacementFailed)
            }
        }
    }

    /// Collect the fare after a confirmed arrival. Never turns a
    /// successful journey back into a failure.
    fn charge(&self, tx: &Uuid, price: i64) -> TravelOutcome {
        if price <= 0 {
            return TravelOutcome::Complete;
        }
        let balance_before = self.ledger.balance();
        match self.ledger.debit(price) {
            Ok(()) => {
                info!("[{}] fare {} collected", tx, price);
                TravelOutcome::Complete
            }
            Err(LedgerError::Host(message)) => {
                // The host faulted mid-mutation; the debit may still have
                // applied. Check what the balance says and refund if so.
                warn!("[{}] fare collection faulted: {}", tx, message);
                self.reconcile_ambiguous_debit(tx, price, balance_before);
                TravelOutcome::ChargeFailedAfterPlacement
            }
            Err(e) => {
                warn!("[{}] fare collection failed: {}", tx, e);
                TravelOutcome::ChargeFailedAfterPlacement
            }
        }
    }

    fn reconcile_ambiguous_debit(&self, tx: &Uuid, price: i64, balance_before: Option<i64>) {
        let (Some(before), Some(after)) = (balance_before, self.ledger.balance()) else {
            return;
        };
        if after > before - price {
            return;
        }
        match self.ledger.credit(price) {
            Ok(()) => info!("[{}] refunded {} after ambiguous debit", tx, price),
            Err(e) => error!(
                "[{}] refund of {} failed after ambiguous debit ({}); manual reconciliation required",
                tx, price, e
            ),
        }
    }

    fn abort(&self, tx: Uuid, reason: AbortReason) -> TravelOutcome {
        let outcome = TravelOutcome::Aborted(reason);
        info!("[{}] {}", tx, outcome.message());
        outcome
    }
}
