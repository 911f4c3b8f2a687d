//! TOML Configuration File Support
//!
//! Centralized configuration loading for cosmos, supporting a TOML file at
//! `~/.config/cosmos/cosmos.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables (`COSMOS_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [timing]
//! boot_idle_ms = 3500
//! boot_warp_ms = 2000
//! fade_ms = 550
//! warp_ms = 1500
//! watchdog_grace_ms = 1000
//!
//! [starfield]
//! ambient_particles = 800
//! warp_particles = 500
//! warp_initial_speed = 2.0
//! warp_acceleration = 1.05
//! warp_max_speed = 50.0
//!
//! [display]
//! fps = 30
//! catalog_path = "/home/me/portfolio.json"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::boot::BootTimings;
use crate::starfield::StarfieldConfig;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Timing section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingToml {
    /// Boot text duration before the warp (D1)
    pub boot_idle_ms: Option<u64>,

    /// Boot warp duration before the fade (D2)
    pub boot_warp_ms: Option<u64>,

    /// Boot overlay fade duration (D3)
    pub fade_ms: Option<u64>,

    /// Navigation warp duration
    pub warp_ms: Option<u64>,

    /// Extra time a navigation may take before the watchdog steps in
    pub watchdog_grace_ms: Option<u64>,
}

/// Starfield section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldToml {
    /// Particles in the ambient starfield
    pub ambient_particles: Option<usize>,

    /// Particles in the warp overlay
    pub warp_particles: Option<usize>,

    /// Ambient depth speed per reference frame
    pub ambient_speed: Option<f32>,

    /// Warp starting speed
    pub warp_initial_speed: Option<f32>,

    /// Warp speed multiplier per reference frame
    pub warp_acceleration: Option<f32>,

    /// Warp speed cap
    pub warp_max_speed: Option<f32>,
}

/// Display section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToml {
    /// Target frames per second
    pub fps: Option<u32>,

    /// Optional JSON catalog replacing the built-in content
    pub catalog_path: Option<PathBuf>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmosToml {
    /// Timing configuration section
    pub timing: TimingToml,

    /// Starfield configuration section
    pub starfield: StarfieldToml,

    /// Display configuration section
    pub display: DisplayToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Durations of every timed transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    /// Boot delays (D1, D2, D3)
    pub boot: BootTimings,
    /// Navigation warp duration
    pub warp: Duration,
    /// Watchdog slack past the warp duration
    pub watchdog_grace: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            boot: BootTimings::default(),
            warp: Duration::from_millis(1500),
            watchdog_grace: Duration::from_millis(1000),
        }
    }
}

/// Centralized configuration for cosmos
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug)]
pub struct CosmosConfig {
    /// Transition timings
    pub timing: TimingConfig,

    /// Ambient starfield tuning
    pub ambient: StarfieldConfig,

    /// Warp overlay tuning
    pub warp: StarfieldConfig,

    /// Target frames per second
    pub fps: u32,

    /// Optional catalog file replacing the built-in content
    pub catalog_path: Option<PathBuf>,

    /// Seed for particle placement (random when unset)
    pub seed: Option<u64>,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for CosmosConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            ambient: StarfieldConfig::ambient(800),
            warp: StarfieldConfig::warp(500),
            fps: 30,
            catalog_path: None,
            seed: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl CosmosConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Duration of one frame at the configured rate
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// Reject values that would stall or break the transition engine
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for zero durations, a zero
    /// frame rate, or non-positive or non-finite particle speeds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("timing.boot_idle_ms", self.timing.boot.idle),
            ("timing.boot_warp_ms", self.timing.boot.warp),
            ("timing.fade_ms", self.timing.boot.fade),
            ("timing.warp_ms", self.timing.warp),
        ];
        for (name, value) in durations {
            if value.is_zero() {
                return Err(ConfigError::ValidationError(format!("{name} must be > 0")));
            }
        }

        if self.fps == 0 {
            return Err(ConfigError::ValidationError("display.fps must be > 0".into()));
        }

        let speeds = [
            ("starfield.ambient_speed", self.ambient.initial_speed),
            ("starfield.warp_initial_speed", self.warp.initial_speed),
            ("starfield.warp_max_speed", self.warp.max_speed),
        ];
        for (name, value) in speeds {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be a finite number > 0"
                )));
            }
        }

        if self.warp.max_speed < self.warp.initial_speed {
            return Err(ConfigError::ValidationError(
                "starfield warp speeds must satisfy 0 < initial <= max".into(),
            ));
        }

        if !self.warp.acceleration.is_finite() || self.warp.acceleration < 1.0 {
            return Err(ConfigError::ValidationError(
                "starfield.warp_acceleration must be a finite number >= 1.0".into(),
            ));
        }

        Ok(())
    }
}

/// Command-line overrides, applied last
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Frame rate override
    pub fps: Option<u32>,
    /// Particle seed override
    pub seed: Option<u64>,
    /// Catalog path override
    pub catalog_path: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Apply these overrides on top of a loaded configuration
    pub fn apply(&self, config: &mut CosmosConfig) {
        if let Some(fps) = self.fps {
            config.fps = fps;
            config.source = ConfigSource::Cli;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
            config.source = ConfigSource::Cli;
        }
        if let Some(path) = &self.catalog_path {
            config.catalog_path = Some(path.clone());
            config.source = ConfigSource::Cli;
        }
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/cosmos/cosmos.toml` or
/// `~/.config/cosmos/cosmos.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cosmos").join("cosmos.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the merged configuration fails validation. A missing config file is not
/// an error (defaults are used).
pub fn load_config() -> Result<CosmosConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if the result fails validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<CosmosConfig, ConfigError> {
    let mut config = CosmosConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: CosmosToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut CosmosConfig, toml: &CosmosToml) {
    // Timing
    if let Some(ms) = toml.timing.boot_idle_ms {
        config.timing.boot.idle = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.timing.boot_warp_ms {
        config.timing.boot.warp = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.timing.fade_ms {
        config.timing.boot.fade = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.timing.warp_ms {
        config.timing.warp = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.timing.watchdog_grace_ms {
        config.timing.watchdog_grace = Duration::from_millis(ms);
    }

    // Starfield
    if let Some(count) = toml.starfield.ambient_particles {
        config.ambient.particle_count = count;
    }
    if let Some(count) = toml.starfield.warp_particles {
        config.warp.particle_count = count;
    }
    if let Some(speed) = toml.starfield.ambient_speed {
        config.ambient.initial_speed = speed;
        config.ambient.max_speed = speed;
    }
    if let Some(speed) = toml.starfield.warp_initial_speed {
        config.warp.initial_speed = speed;
    }
    if let Some(factor) = toml.starfield.warp_acceleration {
        config.warp.acceleration = factor;
    }
    if let Some(speed) = toml.starfield.warp_max_speed {
        config.warp.max_speed = speed;
    }

    // Display
    if let Some(fps) = toml.display.fps {
        config.fps = fps;
    }
    if toml.display.catalog_path.is_some() {
        config.catalog_path = toml.display.catalog_path.clone();
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut CosmosConfig) {
    if let Some(ms) = env_parse::<u64>("COSMOS_BOOT_IDLE_MS") {
        config.timing.boot.idle = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = env_parse::<u64>("COSMOS_BOOT_WARP_MS") {
        config.timing.boot.warp = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = env_parse::<u64>("COSMOS_FADE_MS") {
        config.timing.boot.fade = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = env_parse::<u64>("COSMOS_WARP_MS") {
        config.timing.warp = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(count) = env_parse::<usize>("COSMOS_AMBIENT_PARTICLES") {
        config.ambient.particle_count = count;
        config.source = ConfigSource::Env;
    }
    if let Some(count) = env_parse::<usize>("COSMOS_WARP_PARTICLES") {
        config.warp.particle_count = count;
        config.source = ConfigSource::Env;
    }
    if let Some(fps) = env_parse::<u32>("COSMOS_FPS") {
        config.fps = fps;
        config.source = ConfigSource::Env;
    }
    if let Ok(path) = std::env::var("COSMOS_CATALOG") {
        config.catalog_path = Some(PathBuf::from(path));
        config.source = ConfigSource::Env;
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_reference_timings() {
        let config = CosmosConfig::default();
        assert_eq!(config.timing.boot.idle, Duration::from_millis(3500));
        assert_eq!(config.timing.boot.warp, Duration::from_millis(2000));
        assert_eq!(config.timing.boot.fade, Duration::from_millis(550));
        assert_eq!(config.timing.warp, Duration::from_millis(1500));
        assert_eq!(config.ambient.particle_count, 800);
        assert_eq!(config.warp.particle_count, 500);
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config_from_path(Some(dir.path().join("absent.toml"))).expect("load");
        assert!(config.config_file_path.is_none());
        assert_eq!(config.fps, 30);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "[timing]\nwarp_ms = 900\n\n[starfield]\nwarp_particles = 120\n\n[display]\nfps = 24"
        )
        .expect("write");

        let config = load_config_from_path(Some(file.path().to_path_buf())).expect("load");
        assert_eq!(config.timing.warp, Duration::from_millis(900));
        assert_eq!(config.warp.particle_count, 120);
        assert_eq!(config.fps, 24);
        assert_eq!(config.timing.boot.idle, Duration::from_millis(3500));
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[timing\nwarp_ms = ").expect("write");

        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[timing]\nwarp_ms = 0").expect("write");

        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    fn load_starfield(line: &str) -> Result<CosmosConfig, ConfigError> {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[starfield]\n{line}").expect("write");
        load_config_from_path(Some(file.path().to_path_buf()))
    }

    #[test]
    fn test_negative_ambient_speed_rejected() {
        let result = load_starfield("ambient_speed = -5.0");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_zero_ambient_speed_rejected() {
        let result = load_starfield("ambient_speed = 0.0");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_nan_warp_initial_speed_rejected() {
        let result = load_starfield("warp_initial_speed = nan");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_infinite_warp_max_speed_rejected() {
        let result = load_starfield("warp_max_speed = inf");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_nan_warp_acceleration_rejected() {
        let result = load_starfield("warp_acceleration = nan");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result = load_starfield("warp_acceleration = 0.5");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_positive_speeds_accepted() {
        let config = load_starfield("ambient_speed = 0.5\nwarp_initial_speed = 3.0").expect("load");
        assert!((config.ambient.initial_speed - 0.5).abs() < f32::EPSILON);
        assert!((config.warp.initial_speed - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = CosmosConfig::default();
        let overrides = ConfigOverrides {
            fps: Some(60),
            seed: Some(42),
            catalog_path: None,
        };
        overrides.apply(&mut config);

        assert_eq!(config.fps, 60);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_frame_duration() {
        let mut config = CosmosConfig::default();
        config.fps = 20;
        assert_eq!(config.frame_duration(), Duration::from_millis(50));
    }
}
