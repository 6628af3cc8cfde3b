//! Configuration management for the waygate engine.
//!
//! All timing, tolerance, and retry knobs of the travel pipeline live in
//! a single TOML file, organized into logical sections:
//!
//! - [`CatalogConfig`] - destination seeds and default pricing
//! - [`PlacementConfig`] - resolution, grounding, and settle behavior
//! - [`SceneConfig`] - area load polling, watchdog, and activation limits
//! - [`LoggingConfig`] - log level and optional log file
//!
//! Every field has a serde default so a partial file (or no file at all)
//! yields a working configuration. `validate()` rejects values that would
//! make the pipeline misbehave, with messages naming the offending key.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Destination catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the JSON destination seed file.
    #[serde(default = "default_destinations_path")]
    pub destinations_path: String,
    /// Directory for the visited-destination store.
    #[serde(default = "default_visited_path")]
    pub visited_path: String,
    /// Fare charged when a destination record carries no price.
    #[serde(default = "default_price")]
    pub default_price: i64,
    /// Object names probed, in order, by the spawn-anchor placement
    /// heuristic when a destination has no usable anchor.
    #[serde(default = "default_spawn_anchor_names")]
    pub spawn_anchor_names: Vec<String>,
}

fn default_destinations_path() -> String {
    "data/destinations.json".to_string()
}

fn default_visited_path() -> String {
    "data/visited".to_string()
}

fn default_price() -> i64 {
    100
}

fn default_spawn_anchor_names() -> Vec<String> {
    vec![
        "SpawnPoint".to_string(),
        "PlayerSpawn".to_string(),
        "Spawn_Main".to_string(),
        "StartPosition".to_string(),
    ]
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            destinations_path: default_destinations_path(),
            visited_path: default_visited_path(),
            default_price: default_price(),
            spawn_anchor_names: default_spawn_anchor_names(),
        }
    }
}

/// Placement resolution and safe-placement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// How long to poll for a named anchor object before falling through.
    #[serde(default = "default_named_object_timeout_ms")]
    pub named_object_timeout_ms: u64,
    /// Interval between named-object polls.
    #[serde(default = "default_named_object_poll_ms")]
    pub named_object_poll_ms: u64,
    /// Max allowed difference between a grounded Y and the hint's Y.
    /// Keeps a bad raycast from dropping the actor to another elevation.
    #[serde(default = "default_vertical_tolerance")]
    pub vertical_tolerance: f32,
    /// Height above the candidate point the ground ray starts from.
    #[serde(default = "default_probe_height")]
    pub probe_height: f32,
    /// Max downward ray distance.
    #[serde(default = "default_probe_distance")]
    pub probe_distance: f32,
    /// Upward offset applied to a ground hit to avoid interpenetration.
    #[serde(default = "default_ground_clearance")]
    pub ground_clearance: f32,
    /// Navmesh search radius when ray grounding finds nothing.
    #[serde(default = "default_walkable_search_radius")]
    pub walkable_search_radius: f32,
    /// Sphere radius for post-placement clearance checks.
    #[serde(default = "default_clearance_radius")]
    pub clearance_radius: f32,
    /// How far from the resolved target the actor may land before the
    /// attempt counts as failed and is retried.
    #[serde(default = "default_acceptance_radius")]
    pub acceptance_radius: f32,
    /// Scheduler ticks to wait after setting the position.
    #[serde(default = "default_settle_ticks")]
    pub settle_ticks: u32,
    /// Duration of one settle tick (a physics-step equivalent).
    #[serde(default = "default_settle_tick_ms")]
    pub settle_tick_ms: u64,
    /// Downward nudge distance that re-engages grounding collisions.
    #[serde(default = "default_nudge_distance")]
    pub nudge_distance: f32,
    /// Step size for the overlap raise-and-retest loop.
    #[serde(default = "default_raise_step")]
    pub raise_step: f32,
    /// Total raise budget before giving up (non-fatal).
    #[serde(default = "default_raise_limit")]
    pub raise_limit: f32,
    /// Placement attempts per travel transaction.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base wait before a retry attempt.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    /// Additional wait per prior failed attempt.
    #[serde(default = "default_retry_delay_step_ms")]
    pub retry_delay_step_ms: u64,
}

fn default_named_object_timeout_ms() -> u64 {
    5000
}

fn default_named_object_poll_ms() -> u64 {
    100
}

fn default_vertical_tolerance() -> f32 {
    100.0
}

fn default_probe_height() -> f32 {
    50.0
}

fn default_probe_distance() -> f32 {
    200.0
}

fn default_ground_clearance() -> f32 {
    0.1
}

fn default_walkable_search_radius() -> f32 {
    10.0
}

fn default_clearance_radius() -> f32 {
    0.4
}

fn default_acceptance_radius() -> f32 {
    5.0
}

fn default_settle_ticks() -> u32 {
    2
}

fn default_settle_tick_ms() -> u64 {
    20
}

fn default_nudge_distance() -> f32 {
    0.05
}

fn default_raise_step() -> f32 {
    0.25
}

fn default_raise_limit() -> f32 {
    2.0
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    250
}

fn default_retry_delay_step_ms() -> u64 {
    150
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            named_object_timeout_ms: default_named_object_timeout_ms(),
            named_object_poll_ms: default_named_object_poll_ms(),
            vertical_tolerance: default_vertical_tolerance(),
            probe_height: default_probe_height(),
            probe_distance: default_probe_distance(),
            ground_clearance: default_ground_clearance(),
            walkable_search_radius: default_walkable_search_radius(),
            clearance_radius: default_clearance_radius(),
            acceptance_radius: default_acceptance_radius(),
            settle_ticks: default_settle_ticks(),
            settle_tick_ms: default_settle_tick_ms(),
            nudge_distance: default_nudge_distance(),
            raise_step: default_raise_step(),
            raise_limit: default_raise_limit(),
            max_attempts: default_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_delay_step_ms: default_retry_delay_step_ms(),
        }
    }
}

/// Area load and activation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Interval between load-progress polls.
    #[serde(default = "default_progress_poll_ms")]
    pub progress_poll_ms: u64,
    /// Minimum progress delta worth a log line.
    #[serde(default = "default_progress_log_delta")]
    pub progress_log_delta: f32,
    /// Stall window before a soft watchdog warning. The load itself is
    /// never timed out; the host engine owns load completion.
    #[serde(default = "default_load_watchdog_ms")]
    pub load_watchdog_ms: u64,
    /// How long to wait for activation before proceeding anyway.
    #[serde(default = "default_activation_timeout_ms")]
    pub activation_timeout_ms: u64,
    /// Grace period after activation so newly loaded objects can run
    /// their initialization before any lookup or placement.
    #[serde(default = "default_settle_grace_ms")]
    pub settle_grace_ms: u64,
}

fn default_progress_poll_ms() -> u64 {
    100
}

fn default_progress_log_delta() -> f32 {
    0.01
}

fn default_load_watchdog_ms() -> u64 {
    60_000
}

fn default_activation_timeout_ms() -> u64 {
    12_000
}

fn default_settle_grace_ms() -> u64 {
    500
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            progress_poll_ms: default_progress_poll_ms(),
            progress_log_delta: default_progress_log_delta(),
            load_watchdog_ms: default_load_watchdog_ms(),
            activation_timeout_ms: default_activation_timeout_ms(),
            settle_grace_ms: default_settle_grace_ms(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; stdout only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file.
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Reject values that would make the travel pipeline misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.default_price < 0 {
            return Err(anyhow!("catalog.default_price must not be negative"));
        }
        if self.placement.named_object_poll_ms == 0 {
            return Err(anyhow!("placement.named_object_poll_ms must be at least 1"));
        }
        if self.placement.vertical_tolerance <= 0.0 {
            return Err(anyhow!("placement.vertical_tolerance must be positive"));
        }
        if self.placement.probe_distance <= 0.0 {
            return Err(anyhow!("placement.probe_distance must be positive"));
        }
        if self.placement.raise_step <= 0.0 {
            return Err(anyhow!("placement.raise_step must be positive"));
        }
        if self.placement.raise_limit < self.placement.raise_step {
            return Err(anyhow!(
                "placement.raise_limit must be at least placement.raise_step"
            ));
        }
        if self.placement.max_attempts == 0 {
            return Err(anyhow!("placement.max_attempts must be at least 1"));
        }
        if self.placement.acceptance_radius <= 0.0 {
            return Err(anyhow!("placement.acceptance_radius must be positive"));
        }
        if self.scene.progress_poll_ms == 0 {
            return Err(anyhow!("scene.progress_poll_ms must be at least 1"));
        }
        if self.scene.progress_log_delta <= 0.0 || self.scene.progress_log_delta >= 1.0 {
            return Err(anyhow!(
                "scene.progress_log_delta must be between 0 and 1 exclusive"
            ));
        }
        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(anyhow!(
                    "logging.level must be one of error/warn/info/debug/trace, got '{}'",
                    other
                ));
            }
        }
        Ok(())
    }
}
