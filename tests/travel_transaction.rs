//! End-to-end travel transaction scenarios: fare validation, placement,
//! charging order, and visited tracking.

mod common;

use common::{sample_catalog, sample_world, travel_service};
use waygate::travel::{AbortReason, Anchor, Destination, Point, TravelOutcome, VisitedSet};

#[tokio::test(start_paused = true)]
async fn riverside_journey_completes_and_charges_fare() {
    let sim = sample_world(100);
    let catalog = sample_catalog();
    let mut visited = VisitedSet::new();

    let outcome = travel_service(&sim)
        .travel(&catalog, &mut visited, "Riverside", None)
        .await;

    assert_eq!(outcome, TravelOutcome::Complete);
    assert_eq!(sim.wallet_balance(), Some(50));
    assert!(visited.contains("riverside"));

    let position = sim.actor_pos().expect("actor alive");
    assert_eq!(position.x, 10.0);
    assert_eq!(position.z, 20.0);
}

#[tokio::test(start_paused = true)]
async fn insufficient_funds_aborts_before_any_side_effect() {
    let sim = sample_world(10);
    let catalog = sample_catalog();
    let mut visited = VisitedSet::new();
    let origin = sim.actor_pos().unwrap();

    let outcome = travel_service(&sim)
        .travel(&catalog, &mut visited, "riverside", None)
        .await;

    assert_eq!(outcome, TravelOutcome::Aborted(AbortReason::InsufficientFunds));
    assert_eq!(sim.actor_pos().unwrap(), origin);
    assert!(visited.is_empty());
    assert_eq!(sim.withdraw_calls(), 0);
    assert_eq!(sim.load_count("riverside_island"), 0);
}

#[tokio::test(start_paused = true)]
async fn missing_anchor_object_times_out_to_no_target() {
    let sim = sample_world(1000);
    // "harbor" anchors on Anchor_Harbor, which is never spawned.
    let catalog = sample_catalog();
    let mut visited = VisitedSet::new();

    let outcome = travel_service(&sim)
        .travel(&catalog, &mut visited, "harbor", None)
        .await;

    assert_eq!(outcome, TravelOutcome::Aborted(AbortReason::NoTarget));
    assert!(visited.is_empty());
    assert_eq!(sim.withdraw_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn unsupported_charge_still_counts_as_arrival() {
    let sim = sample_world(1000);
    sim.freeze_economy();
    let catalog = sample_catalog();
    let mut visited = VisitedSet::new();

    let outcome = travel_service(&sim)
        .travel(&catalog, &mut visited, "riverside", None)
        .await;

    // The actor did move; the outcome says so distinctly and the
    // destination still counts as visited.
    assert_eq!(outcome, TravelOutcome::ChargeFailedAfterPlacement);
    let position = sim.actor_pos().unwrap();
    assert_eq!(position.x, 10.0);
    assert_eq!(position.z, 20.0);
    assert!(visited.contains("riverside"));
}

#[tokio::test(start_paused = true)]
async fn placement_failure_never_touches_the_wallet() {
    let sim = sample_world(1000);
    // Every teleport lands far away, so all attempts miss.
    sim.deflect_next_teleports(100, Point::new(500.0, 0.0, 0.0));
    let catalog = sample_catalog();
    let mut visited = VisitedSet::new();

    let outcome = travel_service(&sim)
        .travel(&catalog, &mut visited, "riverside", None)
        .await;

    assert_eq!(outcome, TravelOutcome::Aborted(AbortReason::PlacementFailed));
    assert_eq!(sim.withdraw_calls(), 0);
    assert_eq!(sim.wallet_balance(), Some(1000));
    assert!(visited.is_empty());
}

#[tokio::test(start_paused = true)]
async fn unknown_balance_permits_the_attempt() {
    let sim = sample_world(0);
    sim.clear_balance();
    let catalog = sample_catalog();
    let mut visited = VisitedSet::new();

    let outcome = travel_service(&sim)
        .travel(&catalog, &mut visited, "riverside", None)
        .await;

    // "Could not determine" is not "insufficient"; the debit decides.
    assert_eq!(outcome, TravelOutcome::Complete);
    assert_eq!(sim.withdraw_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn ambiguous_debit_is_refunded() {
    let sim = sample_world(100);
    // The wallet faults on every mutation but secretly applies it.
    sim.fail_economy("ledger offline", true);
    let catalog = sample_catalog();
    let mut visited = VisitedSet::new();

    let outcome = travel_service(&sim)
        .travel(&catalog, &mut visited, "riverside", None)
        .await;

    assert_eq!(outcome, TravelOutcome::ChargeFailedAfterPlacement);
    // The balance dropped, so a compensating credit was issued.
    assert_eq!(sim.deposit_calls(), 1);
    assert_eq!(sim.wallet_balance(), Some(100));
}

#[tokio::test(start_paused = true)]
async fn destroyed_actor_aborts_without_charge() {
    let sim = sample_world(1000);
    sim.destroy_actor();
    let catalog = sample_catalog();
    let mut visited = VisitedSet::new();

    let outcome = travel_service(&sim)
        .travel(&catalog, &mut visited, "riverside", None)
        .await;

    assert_eq!(outcome, TravelOutcome::Aborted(AbortReason::ActorLost));
    assert_eq!(sim.withdraw_calls(), 0);
    assert!(visited.is_empty());
}

#[tokio::test(start_paused = true)]
async fn free_destination_skips_the_economy_entirely() {
    let sim = sample_world(0);
    sim.freeze_economy();
    let mut catalog = sample_catalog();
    catalog.merge(
        Destination::new("overlook", "The Overlook")
            .with_anchor(Anchor::coordinates(5.0, 0.0, 5.0))
            .with_price(0),
    );
    let mut visited = VisitedSet::new();

    let outcome = travel_service(&sim)
        .travel(&catalog, &mut visited, "overlook", None)
        .await;

    assert_eq!(outcome, TravelOutcome::Complete);
    assert_eq!(sim.withdraw_calls(), 0);
    assert!(visited.contains("overlook"));
}

#[tokio::test(start_paused = true)]
async fn visiting_twice_records_once() {
    let sim = sample_world(1000);
    let catalog = sample_catalog();
    let mut visited = VisitedSet::new();
    let service = travel_service(&sim);

    let first = service
        .travel(&catalog, &mut visited, "riverside", None)
        .await;
    let second = service
        .travel(&catalog, &mut visited, "riverside", None)
        .await;

    assert_eq!(first, TravelOutcome::Complete);
    assert_eq!(second, TravelOutcome::Complete);
    assert_eq!(visited.len(), 1);
}
