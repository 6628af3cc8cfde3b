//! Destination catalog construction from seed files, merge semantics,
//! and the selectability invariant end to end.

mod common;

use common::{sample_world, travel_service};
use waygate::travel::{
    load_destinations_from_json, AbortReason, Anchor, Destination, DestinationCatalog,
    TravelOutcome, VisitedSet,
};

#[test]
fn seed_file_builds_a_catalog_with_backfill() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("destinations.json");
    std::fs::write(
        &path,
        r#"[
            {"id": "riverside", "name": "Riverside",
             "anchor": {"coordinates": {"x": 10.0, "y": 0.0, "z": 20.0}},
             "area": "riverside_island", "price": 50},
            {"id": "harbor", "name": "Old Harbor",
             "anchor": {"named_object": {"name": "Anchor_Harbor"}}}
        ]"#,
    )
    .unwrap();

    let seeds = load_destinations_from_json(&path).unwrap();
    let mut catalog = DestinationCatalog::from_seeds(seeds, 100);

    // A later defaults pass backfills harbor's missing area; riverside's
    // explicit price survives.
    catalog.merge(
        Destination::new("harbor", "Harbor (defaults)")
            .with_area("harbor_district")
            .with_price(75),
    );
    catalog.merge(Destination::new("riverside", "Riverside (defaults)").with_price(999));

    let harbor = catalog.get("harbor").unwrap();
    assert_eq!(harbor.name, "Old Harbor");
    assert_eq!(harbor.area_id.as_deref(), Some("harbor_district"));
    assert_eq!(harbor.price, Some(75));

    let riverside = catalog.get("riverside").unwrap();
    assert_eq!(riverside.price, Some(50));
    assert_eq!(catalog.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn anchorless_arealess_destination_is_never_selectable() {
    let sim = sample_world(10_000);
    let mut catalog = DestinationCatalog::new(100);
    catalog.merge(Destination::new("void", "The Void"));
    let mut visited = VisitedSet::new();

    let outcome = travel_service(&sim)
        .travel(&catalog, &mut visited, "void", None)
        .await;

    assert_eq!(outcome, TravelOutcome::Aborted(AbortReason::Unselectable));
    assert_eq!(sim.withdraw_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn unlocking_a_destination_makes_it_travelable() {
    let sim = sample_world(1000);
    sim.add_object(
        "vault_depths",
        "Anchor_Vault",
        waygate::travel::Point::new(60.0, 0.0, 60.0),
    );
    let mut catalog = DestinationCatalog::new(100);
    let mut vault = Destination::new("sunken_vault", "Sunken Vault")
        .with_anchor(Anchor::named("Anchor_Vault"))
        .with_area("vault_depths")
        .with_price(200);
    vault.unlocked = false;
    catalog.merge(vault);
    let mut visited = VisitedSet::new();
    let service = travel_service(&sim);

    let locked_outcome = service
        .travel(&catalog, &mut visited, "sunken_vault", None)
        .await;
    assert_eq!(locked_outcome, TravelOutcome::Aborted(AbortReason::Unselectable));

    // Unlock is an ordinary catalog mutation by the owner.
    let mut unlocked = catalog.get("sunken_vault").unwrap().clone();
    unlocked.unlocked = true;
    let mut catalog = DestinationCatalog::new(100);
    catalog.merge(unlocked);

    let outcome = service
        .travel(&catalog, &mut visited, "sunken_vault", None)
        .await;
    assert_eq!(outcome, TravelOutcome::Complete);
    assert!(visited.contains("sunken_vault"));
}
