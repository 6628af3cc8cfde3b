//! Placement resolution: strategy priority, anchor polling, heuristic
//! fallbacks, and grounding refinement.

use std::sync::Arc;
use std::time::Duration;

use waygate::config::PlacementConfig;
use waygate::sim::SimWorld;
use waygate::travel::{
    Anchor, Destination, PlacementError, PlacementRequest, PlacementResolver, Point, WorldQuery,
};

fn resolver_for(sim: &Arc<SimWorld>) -> PlacementResolver {
    let config = PlacementConfig::default();
    let world = WorldQuery::new(sim.clone(), &config);
    PlacementResolver::new(
        sim.clone(),
        world,
        config,
        vec!["SpawnPoint".to_string(), "PlayerSpawn".to_string()],
    )
}

#[tokio::test]
async fn explicit_coordinates_keep_xz_and_ground_within_tolerance() {
    // Ground well below the anchor, but within the ray's reach.
    let sim = Arc::new(SimWorld::new().with_flat_ground(-120.0));
    let destination =
        Destination::new("riverside", "Riverside").with_anchor(Anchor::coordinates(10.0, 0.0, 20.0));

    let resolved = resolver_for(&sim)
        .resolve(&PlacementRequest::new(destination))
        .await
        .unwrap();

    assert_eq!(resolved.x, 10.0);
    assert_eq!(resolved.z, 20.0);
    // The raycast found -120 but the anchor sits at 0 with a ±100
    // tolerance, so the result clamps to the band edge.
    assert!((resolved.y - (-100.0)).abs() < 1e-3);
}

#[tokio::test]
async fn hint_overrides_a_live_named_anchor() {
    let sim = Arc::new(SimWorld::new().with_flat_ground(0.0));
    sim.set_current_area("plaza");
    sim.add_object("plaza", "Anchor_Plaza", Point::new(90.0, 0.0, 90.0));

    let destination =
        Destination::new("plaza", "Plaza").with_anchor(Anchor::named("Anchor_Plaza"));
    let request =
        PlacementRequest::new(destination).with_hint(Point::new(4.0, 2.0, 8.0));

    let resolved = resolver_for(&sim).resolve(&request).await.unwrap();
    assert_eq!(resolved.x, 4.0);
    assert_eq!(resolved.z, 8.0);
}

#[tokio::test(start_paused = true)]
async fn named_anchor_appearing_late_is_found_by_polling() {
    let sim = Arc::new(SimWorld::new().with_flat_ground(0.0));
    sim.set_current_area("docks");

    let spawner = sim.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(700)).await;
        spawner.add_object("docks", "Anchor_Docks", Point::new(33.0, 0.0, 44.0));
    });

    let destination =
        Destination::new("docks", "The Docks").with_anchor(Anchor::named("Anchor_Docks"));
    let resolved = resolver_for(&sim)
        .resolve(&PlacementRequest::new(destination))
        .await
        .unwrap();

    assert_eq!(resolved.x, 33.0);
    assert_eq!(resolved.z, 44.0);
}

#[tokio::test]
async fn spawn_anchor_heuristic_covers_unanchored_destinations() {
    let sim = Arc::new(SimWorld::new().with_flat_ground(0.0));
    sim.set_current_area("free_town");
    sim.add_object("free_town", "PlayerSpawn", Point::new(7.0, 0.0, 7.0));

    let destination = Destination::new("free_town", "Free Town").with_area("free_town");
    let resolved = resolver_for(&sim)
        .resolve(&PlacementRequest::new(destination))
        .await
        .unwrap();

    assert_eq!(resolved.x, 7.0);
    assert_eq!(resolved.z, 7.0);
}

#[tokio::test]
async fn root_object_fallback_skips_ui_widgets() {
    let sim = Arc::new(SimWorld::new().with_flat_ground(0.0));
    sim.add_ui_object("keep", "LoadingOverlay", Point::new(0.0, 0.0, 0.0));
    sim.add_object("keep", "KeepCourtyard", Point::new(12.0, 0.0, 34.0));

    let destination = Destination::new("keep", "The Keep").with_area("keep");
    let resolved = resolver_for(&sim)
        .resolve(&PlacementRequest::new(destination))
        .await
        .unwrap();

    assert_eq!(resolved.x, 12.0);
    assert_eq!(resolved.z, 34.0);
}

#[tokio::test]
async fn navmesh_fallback_when_no_ray_ground_exists() {
    // No ground plane at all (an interior with no flat ray path).
    let sim = Arc::new(SimWorld::new());
    sim.add_navmesh_point(Point::new(2.5, 1.0, 3.5));

    let destination =
        Destination::new("cellar", "The Cellar").with_anchor(Anchor::coordinates(2.0, 1.0, 3.0));
    let resolved = resolver_for(&sim)
        .resolve(&PlacementRequest::new(destination))
        .await
        .unwrap();

    assert_eq!(resolved, Point::new(2.5, 1.0, 3.5));
}

#[tokio::test]
async fn ungroundable_base_point_is_kept_for_fine_correction() {
    // No ground, no navmesh: the resolver hands the raw point to the
    // placement routine rather than failing.
    let sim = Arc::new(SimWorld::new());
    let destination =
        Destination::new("skybox", "Skybox").with_anchor(Anchor::coordinates(1.0, 99.0, 1.0));

    let resolved = resolver_for(&sim)
        .resolve(&PlacementRequest::new(destination))
        .await
        .unwrap();
    assert_eq!(resolved, Point::new(1.0, 99.0, 1.0));
}

#[tokio::test(start_paused = true)]
async fn nothing_resolvable_is_a_typed_no_target() {
    let sim = Arc::new(SimWorld::new().with_flat_ground(0.0));
    sim.add_area("nowhere");

    let destination = Destination::new("nowhere", "Nowhere").with_area("nowhere");
    let result = resolver_for(&sim)
        .resolve(&PlacementRequest::new(destination))
        .await;
    assert_eq!(result, Err(PlacementError::NoTarget));
}
