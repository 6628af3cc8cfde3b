//! The destination catalog: every travel target the service knows about.
//!
//! A catalog is an explicitly constructed value owned by the caller; no
//! process-wide destination list exists. Seed records merge into it by
//! id: new ids are inserted, existing ones only have their missing
//! optional fields backfilled. Destinations are never deleted at
//! runtime.

use log::debug;

use crate::logutil::escape_log;
use crate::travel::types::{Anchor, Destination};

pub struct DestinationCatalog {
    destinations: Vec<Destination>,
    default_price: i64,
}

impl DestinationCatalog {
    pub fn new(default_price: i64) -> Self {
        Self {
            destinations: Vec::new(),
            default_price,
        }
    }

    /// Build a catalog from a seed list (typically the JSON file).
    pub fn from_seeds(seeds: Vec<Destination>, default_price: i64) -> Self {
        let mut catalog = Self::new(default_price);
        for seed in seeds {
            catalog.merge(seed);
        }
        catalog
    }

    /// Insert a destination, or backfill an existing one with the same
    /// id. Backfilling touches only missing optional fields: a present
    /// price, area, or anchor is never overwritten, and nothing is ever
    /// removed.
    pub fn merge(&mut self, incoming: Destination) {
        match self.position_of(&incoming.id) {
            Some(index) => {
                let existing = &mut self.destinations[index];
                if existing.price.is_none() && incoming.price.is_some() {
                    existing.price = incoming.price;
                }
                if existing.area_id.is_none() && incoming.area_id.is_some() {
                    existing.area_id = incoming.area_id;
                }
                if existing.anchor == Anchor::Unset && incoming.anchor != Anchor::Unset {
                    existing.anchor = incoming.anchor;
                }
                debug!("backfilled destination '{}'", escape_log(&existing.id));
            }
            None => {
                debug!("registered destination '{}'", escape_log(&incoming.id));
                self.destinations.push(incoming);
            }
        }
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.destinations
            .iter()
            .position(|d| d.id.eq_ignore_ascii_case(id))
    }

    /// Case-insensitive lookup.
    pub fn get(&self, id: &str) -> Option<&Destination> {
        self.position_of(id).map(|index| &self.destinations[index])
    }

    /// The fare for a destination, falling back to the catalog default
    /// when the record carries none.
    pub fn effective_price(&self, destination: &Destination) -> i64 {
        destination.price.unwrap_or(self.default_price)
    }

    pub fn default_price(&self) -> i64 {
        self.default_price
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

/// A small example world, used by `waygate init` for the starter seed
/// file and by the CLI demo. Operators replace it with their own list.
pub fn sample_destinations() -> Vec<Destination> {
    vec![
        Destination::new("riverside", "Riverside")
            .with_anchor(Anchor::coordinates(10.0, 0.0, 20.0))
            .with_area("riverside_island")
            .with_price(50),
        Destination::new("harbor", "Old Harbor")
            .with_anchor(Anchor::named("Anchor_Harbor"))
            .with_area("harbor_district")
            .with_price(75),
        Destination::new("highlands", "The Highlands")
            .with_anchor(Anchor::coordinates(-140.0, 85.0, 310.0))
            .with_area("highlands"),
        Destination::new("sunken_vault", "Sunken Vault")
            .with_anchor(Anchor::named("Anchor_Vault"))
            .with_area("vault_depths")
            .with_price(200)
            .locked(),
    ]
}
