#![forbid(unsafe_code)]

//! Input configuration shared by chordsets and tool drivers.
//!
//! # Environment
//!
//! [`InputConfig::from_env`] reads:
//! - `CRAFTY_PLATFORM`: `win`/`windows` or `mac`/`osx`/`macos`
//! - `CRAFTY_CLICK_SLOP`: click slop distance in pixels
//!
//! # Files
//!
//! With the `config-file` feature:
//!
//! ```toml
//! # crafty.toml
//! platform = "mac"
//! click_slop_distance = 4.0
//! ```

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "config-file")]
use crate::error::ConfigError;
use crate::keys::Platform;

/// Default click slop distance in pixels.
pub const DEFAULT_CLICK_SLOP: f64 = 5.0;
/// Upper bound applied by [`InputConfig::validated`].
pub const MAX_CLICK_SLOP: f64 = 100.0;
/// Default separator between a mode's status and its chord help.
pub const DEFAULT_STATUS_SEPARATOR: &str = "    |||    ";

/// Configuration for input recognition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct InputConfig {
    /// Platform whose key tables and modifier names are used.
    pub platform: Platform,

    /// A release within this distance of the press (pixels) is a click;
    /// anything farther is a drag.
    pub click_slop_distance: f64,

    /// Placed between the mode status and the chordset help in the status bar.
    pub status_separator: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
            click_slop_distance: DEFAULT_CLICK_SLOP,
            status_separator: DEFAULT_STATUS_SEPARATOR.to_owned(),
        }
    }
}

impl InputConfig {
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn with_click_slop(mut self, distance: f64) -> Self {
        self.click_slop_distance = distance;
        self
    }

    #[must_use]
    pub fn with_status_separator(mut self, separator: impl Into<String>) -> Self {
        self.status_separator = separator.into();
        self
    }

    /// Load config from environment variables. Values are clamped.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load config using a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = get_env("CRAFTY_PLATFORM") {
            match Platform::from_str_opt(&val) {
                Some(platform) => config.platform = platform,
                None => tracing::warn!(value = %val, "ignoring unknown CRAFTY_PLATFORM"),
            }
        }

        if let Some(val) = get_env("CRAFTY_CLICK_SLOP")
            && let Ok(distance) = val.trim().parse::<f64>()
        {
            config.click_slop_distance = distance;
        }

        config.validated()
    }

    /// Clamp values to safe ranges.
    ///
    /// `click_slop_distance` is clamped to `0..=100`; NaN falls back to the
    /// default.
    ///
    /// ```
    /// use crafty_core::config::InputConfig;
    ///
    /// let config = InputConfig::default().with_click_slop(250.0).validated();
    /// assert_eq!(config.click_slop_distance, 100.0);
    /// ```
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.click_slop_distance = if self.click_slop_distance.is_nan() {
            DEFAULT_CLICK_SLOP
        } else {
            self.click_slop_distance.clamp(0.0, MAX_CLICK_SLOP)
        };
        self
    }

    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(0.0..=MAX_CLICK_SLOP).contains(&self.click_slop_distance) {
            errors.push(format!(
                "click_slop_distance must be in [0, {MAX_CLICK_SLOP}], got {}",
                self.click_slop_distance
            ));
        }

        if self.status_separator.contains('\n') {
            errors.push("status_separator must be a single line".to_owned());
        }

        errors
    }

    /// Load from a TOML string, rejecting invalid values.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}
