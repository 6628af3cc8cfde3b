//! Safe placement routine and its caller-level retry policy.

use std::sync::Arc;
use std::time::Duration;

use waygate::config::PlacementConfig;
use waygate::sim::SimWorld;
use waygate::travel::{
    place_with_retries, ActorController, Anchor, CollisionState, Destination, PhysicsHost,
    PlacementError, PlacementRequest, PlacementResolver, Point, SafePlacementRoutine, WorldQuery,
};

fn harness(sim: &Arc<SimWorld>) -> (PlacementConfig, WorldQuery, ActorController) {
    let config = PlacementConfig::default();
    let world = WorldQuery::new(sim.clone(), &config);
    let actor = ActorController::new(sim.clone());
    (config, world, actor)
}

fn resolver_for(sim: &Arc<SimWorld>, config: &PlacementConfig) -> PlacementResolver {
    let world = WorldQuery::new(sim.clone(), config);
    PlacementResolver::new(sim.clone(), world, config.clone(), Vec::new())
}

#[tokio::test(start_paused = true)]
async fn physics_state_is_restored_for_a_kinematic_actor() {
    let sim = Arc::new(SimWorld::new().with_flat_ground(0.0));
    // An actor that was already kinematic with collision off stays that
    // way after placement.
    let unusual = CollisionState {
        collision_enabled: false,
        kinematic: true,
    };
    assert!(sim.set_collision_state(unusual));

    let (config, world, mut actor) = harness(&sim);
    let routine = SafePlacementRoutine::new(&mut actor, &world, &config);
    routine.run(Point::new(3.0, 1.0, 3.0)).await.unwrap();

    assert_eq!(sim.actor_collision(), unusual);
}

#[tokio::test(start_paused = true)]
async fn overlap_beyond_raise_budget_keeps_position_non_fatally() {
    let sim = Arc::new(SimWorld::new().with_flat_ground(0.0));
    // A huge obstacle no 2-unit raise can escape.
    sim.add_obstacle(Point::new(10.0, 0.0, 10.0), 10.0);

    let (config, world, mut actor) = harness(&sim);
    let routine = SafePlacementRoutine::new(&mut actor, &world, &config);
    let landed = routine.run(Point::new(10.0, 0.5, 10.0)).await.unwrap();

    // Still inside the obstacle, but the routine completed and physics
    // came back.
    assert!(!world.is_clear(landed, config.clearance_radius));
    assert!(sim.actor_collision().collision_enabled);
}

#[tokio::test(start_paused = true)]
async fn one_deflected_teleport_is_recovered_by_retry() {
    let sim = Arc::new(SimWorld::new().with_flat_ground(0.0));
    sim.deflect_next_teleports(1, Point::new(300.0, 0.0, 0.0));

    let (config, world, mut actor) = harness(&sim);
    let resolver = resolver_for(&sim, &config);
    let destination =
        Destination::new("riverside", "Riverside").with_anchor(Anchor::coordinates(10.0, 0.0, 20.0));
    let request = PlacementRequest::new(destination);

    let landed = place_with_retries(&resolver, &mut actor, &world, &config, &request)
        .await
        .unwrap();
    assert_eq!(landed.x, 10.0);
    assert_eq!(landed.z, 20.0);
}

#[tokio::test(start_paused = true)]
async fn persistent_deflection_exhausts_three_attempts_with_backoff() {
    let sim = Arc::new(SimWorld::new().with_flat_ground(0.0));
    sim.deflect_next_teleports(100, Point::new(300.0, 0.0, 0.0));

    let (config, world, mut actor) = harness(&sim);
    let resolver = resolver_for(&sim, &config);
    let destination =
        Destination::new("riverside", "Riverside").with_anchor(Anchor::coordinates(10.0, 0.0, 20.0));
    let request = PlacementRequest::new(destination);

    let started = tokio::time::Instant::now();
    let result = place_with_retries(&resolver, &mut actor, &world, &config, &request).await;

    assert_eq!(result, Err(PlacementError::AttemptsExhausted { attempts: 3 }));
    // Two backoff waits: 250+150*1 and 250+150*2 milliseconds.
    assert!(started.elapsed() >= Duration::from_millis(400 + 550));
}

#[tokio::test(start_paused = true)]
async fn actor_destroyed_mid_flight_aborts_immediately() {
    let sim = Arc::new(SimWorld::new().with_flat_ground(0.0));
    sim.destroy_actor();

    let (config, world, mut actor) = harness(&sim);
    let resolver = resolver_for(&sim, &config);
    let destination =
        Destination::new("riverside", "Riverside").with_anchor(Anchor::coordinates(10.0, 0.0, 20.0));
    let request = PlacementRequest::new(destination);

    let result = place_with_retries(&resolver, &mut actor, &world, &config, &request).await;
    assert_eq!(result, Err(PlacementError::ActorLost));
}
