//! # Waygate - Safe Teleport Placement and Travel Transactions
//!
//! Waygate is an engine-agnostic fast-travel core for game worlds: it
//! resolves a named destination to a world position, loads the target
//! area, places an actor safely (physics suspended, grounded, cleared
//! of overlaps), and collects the fare only after arrival is confirmed.
//!
//! ## Features
//!
//! - **Capability Seams**: The host engine is reached only through the
//!   `SceneHost` / `PhysicsHost` / `EconomyHost` traits; adapters stay
//!   thin and the core never inspects host internals.
//! - **Safe Placement**: Suspend physics, teleport, settle, nudge, and
//!   raise out of overlapping geometry before restoring the exact prior
//!   physics state.
//! - **Transactional Fares**: Currency is debited only on confirmed
//!   arrival; ambiguous debits are reconciled with a refund, and a
//!   failed charge after arrival is reported distinctly.
//! - **Data-Driven Destinations**: JSON seed files merge into an
//!   explicitly owned catalog; visited state persists in a sled store.
//! - **Async Design**: Built with Tokio; every wait is a cooperative
//!   suspension point that re-checks for actor loss.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use waygate::config::Config;
//! use waygate::sim::SimWorld;
//! use waygate::travel::{DestinationCatalog, TravelService, VisitedSet};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let world = Arc::new(SimWorld::new().with_flat_ground(0.0));
//!     world.add_area("riverside_island");
//!     world.set_balance(500);
//!
//!     let catalog = DestinationCatalog::from_seeds(
//!         waygate::travel::sample_destinations(),
//!         config.catalog.default_price,
//!     );
//!     let mut visited = VisitedSet::new();
//!
//!     let service =
//!         TravelService::new(world.clone(), world.clone(), world.clone(), config);
//!     let outcome = service.travel(&catalog, &mut visited, "riverside", None).await;
//!     println!("{}", outcome);
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`travel`] - the core engine: catalog, placement, scenes, ledger,
//!   transactions, and persistence
//! - [`sim`] - deterministic in-memory host for demos and tests
//! - [`config`] - configuration management and validation
//! - [`logutil`] - log sanitization utilities

pub mod config;
pub mod logutil;
pub mod sim;
pub mod travel;
