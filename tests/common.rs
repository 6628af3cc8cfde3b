//! Test utilities & fixtures.
//! Builds simulation worlds and services for the integration suites.
//! Tests that mutate wallet or world state should build their own sim.

#![allow(dead_code)] // Each suite links this module and uses a subset.

use std::sync::Arc;

use waygate::config::Config;
use waygate::sim::SimWorld;
use waygate::travel::{sample_destinations, DestinationCatalog, TravelService};

/// Flat world containing every sample area, actor at the origin.
pub fn sample_world(balance: i64) -> Arc<SimWorld> {
    let sim = Arc::new(SimWorld::new().with_flat_ground(0.0));
    sim.set_balance(balance);
    for area in [
        "riverside_island",
        "harbor_district",
        "highlands",
        "vault_depths",
    ] {
        sim.add_area(area);
    }
    sim
}

/// The shipped sample destinations under the default fare.
pub fn sample_catalog() -> DestinationCatalog {
    DestinationCatalog::from_seeds(sample_destinations(), 100)
}

/// A travel service wired to every capability of `sim`, with default
/// configuration.
pub fn travel_service(sim: &Arc<SimWorld>) -> TravelService {
    TravelService::new(sim.clone(), sim.clone(), sim.clone(), Config::default())
}
