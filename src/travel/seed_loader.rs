//! Seed data loader for data-driven destination content.
//!
//! Destinations live in a JSON file (default `data/destinations.json`)
//! so operators can customize the travel network without recompiling.
//! Seed records are forgiving: only `id` is required, display names
//! default to the id, and unknown anchors fall back to area heuristics.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::travel::types::{Anchor, Destination};

/// On-disk shape of one destination seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationSeed {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub anchor: Option<Anchor>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub unlocked: Option<bool>,
}

impl From<Destination> for DestinationSeed {
    fn from(destination: Destination) -> Self {
        Self {
            id: destination.id,
            name: Some(destination.name),
            anchor: Some(destination.anchor),
            area: destination.area_id,
            price: destination.price,
            unlocked: Some(destination.unlocked),
        }
    }
}

/// Load destination seeds from a JSON file.
pub fn load_destinations_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Destination>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read destination seeds {}", path.display()))?;

    let seeds: Vec<DestinationSeed> = serde_json::from_str(&contents)
        .map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))?;

    let mut records = Vec::with_capacity(seeds.len());
    for seed in seeds {
        if seed.id.trim().is_empty() {
            return Err(anyhow!(
                "Destination seed in {} has an empty id",
                path.display()
            ));
        }
        records.push(convert_seed(seed));
    }
    Ok(records)
}

/// Write destination records as a seed file (used by `waygate init`).
pub fn write_destinations_to_json<P: AsRef<Path>>(
    path: P,
    destinations: Vec<Destination>,
) -> Result<()> {
    let path = path.as_ref();
    let seeds: Vec<DestinationSeed> = destinations.into_iter().map(Into::into).collect();
    let contents = serde_json::to_string_pretty(&seeds)
        .map_err(|e| anyhow!("Failed to serialize destination seeds: {}", e))?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write destination seeds {}", path.display()))?;
    Ok(())
}

fn convert_seed(seed: DestinationSeed) -> Destination {
    let mut destination = Destination::new(seed.id.clone(), seed.name.unwrap_or(seed.id));
    if let Some(anchor) = seed.anchor {
        destination.anchor = anchor;
    }
    destination.area_id = seed.area;
    destination.price = seed.price;
    if let Some(unlocked) = seed.unlocked {
        destination.unlocked = unlocked;
    }
    destination
}
