/// Backdrop configuration
///
/// Layered: preset defaults, then an optional JSON file, then environment.
use std::{path::Path, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BackdropError;
use crate::sim::DatasetSpec;
use crate::surface::CellMetrics;

pub const ENV_CONFIG: &str = "BACKDROP_CONFIG";
pub const ENV_PRESET: &str = "BACKDROP_PRESET";
pub const ENV_SEED: &str = "BACKDROP_SEED";
pub const ENV_REDUCED_MOTION: &str = "BACKDROP_REDUCED_MOTION";
pub const ENV_FRAME_MS: &str = "BACKDROP_FRAME_MS";

/// Seed used when none is configured
pub const DEFAULT_SEED: &str = "bloomberg-terminal";

/// Named bundle of layout and spotlight tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Full 11-panel terminal, wide fixed spotlight
    #[default]
    Terminal,
    /// Quote wall layout, speed-reactive spotlight with glow
    Hover,
    /// Fewer, larger panels
    Compact,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Terminal => "terminal",
            Preset::Hover => "hover",
            Preset::Compact => "compact",
        }
    }

    /// Spotlight tuning that ships with this preset
    pub fn spotlight(&self) -> SpotlightConfig {
        match self {
            Preset::Terminal => SpotlightConfig::default(),
            Preset::Hover => SpotlightConfig {
                base_radius: 220.0,
                speed_gain: 0.06,
                min_radius: 200.0,
                max_radius: 380.0,
                center_easing: 0.18,
                idle_timeout_ms: 2_200,
                exclusion_band: 0.0,
                glow: true,
                ..SpotlightConfig::default()
            },
            Preset::Compact => SpotlightConfig {
                base_radius: 240.0,
                speed_gain: 0.03,
                min_radius: 160.0,
                max_radius: 300.0,
                easing: 0.15,
                center_easing: 0.35,
                ..SpotlightConfig::default()
            },
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = BackdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terminal" => Ok(Preset::Terminal),
            "hover" => Ok(Preset::Hover),
            "compact" => Ok(Preset::Compact),
            other => Err(BackdropError::UnknownPreset(other.to_string())),
        }
    }
}

/// Spotlight radius and motion tuning
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpotlightConfig {
    /// Target radius for a stationary pointer, px
    pub base_radius: f64,
    /// Extra radius per px/s of pointer speed
    pub speed_gain: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Per-frame fraction of the remaining radius gap closed
    pub easing: f64,
    /// Per-frame fraction of the remaining centre gap closed; 1.0 tracks exactly
    pub center_easing: f64,
    /// Quiet pointer time before the spotlight collapses
    pub idle_timeout_ms: u64,
    /// Pointer moves with y above this hide the spotlight, px
    pub exclusion_band: f64,
    /// Wheel input hides the spotlight when the last move is older than this
    pub wheel_hide_ms: u64,
    /// Cyan tint over the revealed region
    pub glow: bool,
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            base_radius: 360.0,
            speed_gain: 0.0,
            min_radius: 0.0,
            max_radius: 360.0,
            easing: 0.12,
            center_easing: 1.0,
            idle_timeout_ms: 3_000,
            exclusion_band: 60.0,
            wheel_hide_ms: 400,
            glow: false,
        }
    }
}

impl SpotlightConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn wheel_hide(&self) -> Duration {
        Duration::from_millis(self.wheel_hide_ms)
    }
}

/// Top-level backdrop configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub preset: Preset,
    /// Seed string for every simulator stream
    pub seed: String,
    /// Freeze panel oscillations and scrolls
    pub reduced_motion: bool,
    pub frame_interval_ms: u64,
    /// Low-frequency market tick
    pub data_interval_ms: u64,
    /// Pixel size of one terminal cell
    pub cell: CellMetrics,
    pub spotlight: SpotlightConfig,
    pub dataset: DatasetSpec,
    /// Capacity of the input channel feeding the frame loop
    pub input_buffer: usize,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            preset: Preset::Terminal,
            seed: DEFAULT_SEED.to_string(),
            reduced_motion: false,
            frame_interval_ms: 16,
            data_interval_ms: 200,
            cell: CellMetrics::default(),
            spotlight: SpotlightConfig::default(),
            dataset: DatasetSpec::default(),
            input_buffer: 256,
        }
    }
}

impl BackdropConfig {
    /// Defaults for a preset
    pub fn for_preset(preset: Preset) -> Self {
        Self::default().with_preset(preset)
    }

    /// Switch preset, taking its spotlight tuning along
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self.spotlight = preset.spotlight();
        self
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = seed.into();
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_data_interval(mut self, interval: Duration) -> Self {
        self.data_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_cell_metrics(mut self, cell: CellMetrics) -> Self {
        self.cell = cell;
        self
    }

    pub fn with_spotlight(mut self, spotlight: SpotlightConfig) -> Self {
        self.spotlight = spotlight;
        self
    }

    pub fn with_dataset(mut self, dataset: DatasetSpec) -> Self {
        self.dataset = dataset;
        self
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn data_interval(&self) -> Duration {
        Duration::from_millis(self.data_interval_ms)
    }

    /// Parse a JSON document; a missing `spotlight` section follows the preset
    pub fn from_json(json: &str) -> Result<Self, BackdropError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let has_spotlight = value.get("spotlight").is_some();
        let mut config: BackdropConfig = serde_json::from_value(value)?;
        if !has_spotlight {
            config.spotlight = config.preset.spotlight();
        }
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BackdropError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self, BackdropError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for environment variables
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BackdropError> {
        let mut config = match lookup(ENV_CONFIG) {
            Some(path) => {
                debug!(%path, "loading backdrop config file");
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        if let Some(preset) = lookup(ENV_PRESET) {
            config = config.with_preset(preset.parse()?);
        }
        if let Some(seed) = lookup(ENV_SEED) {
            config.seed = seed;
        }
        if let Some(flag) = lookup(ENV_REDUCED_MOTION) {
            config.reduced_motion = parse_flag(ENV_REDUCED_MOTION, &flag)?;
        }
        if let Some(ms) = lookup(ENV_FRAME_MS) {
            config.frame_interval_ms = ms
                .trim()
                .parse()
                .map_err(|_| BackdropError::invalid("frame_interval_ms", format!("not an integer: {}", ms)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the frame loop cannot run with
    pub fn validate(&self) -> Result<(), BackdropError> {
        let s = &self.spotlight;
        if !(s.easing > 0.0 && s.easing <= 1.0) {
            return Err(BackdropError::invalid("spotlight.easing", "must be in (0, 1]"));
        }
        if !(s.center_easing > 0.0 && s.center_easing <= 1.0) {
            return Err(BackdropError::invalid("spotlight.center_easing", "must be in (0, 1]"));
        }
        if !(s.min_radius >= 0.0 && s.min_radius <= s.max_radius && s.max_radius.is_finite()) {
            return Err(BackdropError::invalid(
                "spotlight.min_radius",
                format!("need 0 <= min ({}) <= max ({})", s.min_radius, s.max_radius),
            ));
        }
        if !(s.base_radius >= 0.0 && s.base_radius.is_finite()) {
            return Err(BackdropError::invalid("spotlight.base_radius", "must be finite and >= 0"));
        }
        if !(s.speed_gain >= 0.0 && s.speed_gain.is_finite()) {
            return Err(BackdropError::invalid("spotlight.speed_gain", "must be finite and >= 0"));
        }
        if s.idle_timeout_ms == 0 {
            return Err(BackdropError::invalid("spotlight.idle_timeout_ms", "must be > 0"));
        }
        if self.frame_interval_ms == 0 {
            return Err(BackdropError::invalid("frame_interval_ms", "must be > 0"));
        }
        if self.data_interval_ms == 0 {
            return Err(BackdropError::invalid("data_interval_ms", "must be > 0"));
        }
        if !(self.cell.width_px > 0.0 && self.cell.height_px > 0.0) {
            return Err(BackdropError::invalid("cell", "cell metrics must be > 0"));
        }
        if self.input_buffer == 0 {
            return Err(BackdropError::invalid("input_buffer", "must be > 0"));
        }
        Ok(())
    }
}

fn parse_flag(field: &'static str, value: &str) -> Result<bool, BackdropError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(BackdropError::invalid(field, format!("not a boolean: {}", other))),
    }
}
