//! The travel engine: destination catalog, placement pipeline, scene
//! transitions, and the transactional fare flow, all expressed over the
//! capability traits in [`hosts`] so the same core runs against any
//! host adapter (or the in-memory [`crate::sim`] world).

pub mod actor;
pub mod catalog;
pub mod errors;
pub mod hosts;
pub mod ledger;
pub mod placement;
pub mod routine;
pub mod scene;
pub mod seed_loader;
pub mod storage;
pub mod transaction;
pub mod types;
pub mod world;

pub use actor::ActorController;
pub use catalog::{sample_destinations, DestinationCatalog};
pub use errors::{LedgerError, PlacementError, SceneError, StoreError};
pub use hosts::{
    AreaLoadHandle, CollisionState, EconomyError, EconomyHost, ObjectRef, PhysicsHost, RayHit,
    SceneHost,
};
pub use ledger::CurrencyLedger;
pub use placement::PlacementResolver;
pub use routine::{place_with_retries, PlacementPhase, SafePlacementRoutine};
pub use scene::{SceneTransitionController, TransitionPhase};
pub use seed_loader::{load_destinations_from_json, write_destinations_to_json, DestinationSeed};
pub use storage::{VisitRecord, VisitedStore, VisitedStoreBuilder};
pub use transaction::{TravelPhase, TravelService};
pub use types::*;
pub use world::WorldQuery;
