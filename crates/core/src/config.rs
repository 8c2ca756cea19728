// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered configuration loading for the core's own knobs: compiled-in
//! defaults, then an optional TOML file, then environment variables.
//!
//! This is distinct from the six-format parser collaborator (`argus-formats`)
//! that watches *application* configuration files — `Settings` is Argus's
//! own bootstrap configuration.

use crate::audit_event::Level;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable name prefix for `apply_env`.
pub const ENV_PREFIX: &str = "ARGUS_";

/// The four ring-buffer consumer pacing strategies, selectable from
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizationStrategy {
    Auto,
    SingleEvent,
    SmallBatch,
    LargeBatch,
}

impl FromStr for OptimizationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "auto" => Ok(Self::Auto),
            "single-event" => Ok(Self::SingleEvent),
            "small-batch" => Ok(Self::SmallBatch),
            "large-batch" => Ok(Self::LargeBatch),
            other => Err(format!("unknown optimization strategy: {other}")),
        }
    }
}

/// Audit sub-configuration, enumerated in the external-interfaces table.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AuditSettings {
    pub enabled: bool,
    pub output_path: PathBuf,
    pub min_level: Level,
    pub buffer_size: usize,
    #[serde(with = "humantime_duration")]
    pub flush_interval: Duration,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            output_path: PathBuf::from("argus-audit.journal"),
            min_level: Level::Info,
            buffer_size: 256,
            flush_interval: Duration::from_secs(5),
        }
    }
}

/// The core's own bootstrap configuration, covering every option in the
/// external-interfaces table.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(with = "humantime_duration")]
    pub poll_interval: Duration,
    #[serde(with = "humantime_duration")]
    pub cache_ttl: Duration,
    pub max_watched_files: usize,
    pub optimization_strategy: OptimizationStrategy,
    pub ring_capacity: usize,
    pub audit: AuditSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            cache_ttl: Duration::from_millis(2_500),
            max_watched_files: 100,
            optimization_strategy: OptimizationStrategy::Auto,
            ring_capacity: 128,
            audit: AuditSettings::default(),
        }
    }
}

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);
const MIN_CACHE_TTL: Duration = Duration::from_secs(1);
const MAX_WATCHED_FILES_UPPER_BOUND: usize = 10_000;
const MIN_RING_CAPACITY: usize = 8;
const MAX_RING_CAPACITY: usize = 65_536;

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self, crate::error::ArgusError> {
        let mut settings: Settings =
            toml::from_str(s).map_err(|e| crate::error::ArgusError::Configuration(e.to_string()))?;
        settings.normalize();
        Ok(settings)
    }

    pub fn load_file(path: &Path) -> Result<Self, crate::error::ArgusError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Overlays `ARGUS_`-prefixed environment variables onto `self`,
    /// each overriding the corresponding field when present.
    pub fn apply_env(&mut self) -> Result<(), crate::error::ArgusError> {
        self.apply_env_from(std::env::vars())
    }

    /// Same as [`Settings::apply_env`] but sourced from an explicit
    /// iterator, so tests never have to mutate the real process environment.
    pub fn apply_env_from(
        &mut self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), crate::error::ArgusError> {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "POLL_INTERVAL" => self.poll_interval = parse_duration(&value)?,
                "CACHE_TTL" => self.cache_ttl = parse_duration(&value)?,
                "MAX_WATCHED_FILES" => {
                    self.max_watched_files = value
                        .parse()
                        .map_err(|_| invalid("MAX_WATCHED_FILES", &value))?
                }
                "OPTIMIZATION_STRATEGY" => {
                    self.optimization_strategy =
                        value.parse().map_err(|_| invalid("OPTIMIZATION_STRATEGY", &value))?
                }
                "RING_CAPACITY" => {
                    self.ring_capacity = value.parse().map_err(|_| invalid("RING_CAPACITY", &value))?
                }
                "AUDIT_ENABLED" => self.audit.enabled = parse_bool(&value)?,
                "AUDIT_OUTPUT_PATH" => self.audit.output_path = PathBuf::from(value),
                "AUDIT_MIN_LEVEL" => {
                    self.audit.min_level = value.parse().map_err(|_| invalid("AUDIT_MIN_LEVEL", &value))?
                }
                "AUDIT_BUFFER_SIZE" => {
                    self.audit.buffer_size =
                        value.parse().map_err(|_| invalid("AUDIT_BUFFER_SIZE", &value))?
                }
                "AUDIT_FLUSH_INTERVAL" => self.audit.flush_interval = parse_duration(&value)?,
                _ => {}
            }
        }
        self.normalize();
        Ok(())
    }

    /// Clamps zero/negative/out-of-range values to their documented
    /// defaults or bounds, per §4.1/§4.2's "zero or negative values are
    /// replaced by defaults" rule.
    pub fn normalize(&mut self) {
        if self.poll_interval.is_zero() {
            self.poll_interval = Duration::from_secs(5);
        } else if self.poll_interval < MIN_POLL_INTERVAL {
            self.poll_interval = MIN_POLL_INTERVAL;
        }
        if self.cache_ttl < MIN_CACHE_TTL {
            self.cache_ttl = MIN_CACHE_TTL;
        }
        if self.max_watched_files == 0 {
            self.max_watched_files = 100;
        }
        self.max_watched_files = self.max_watched_files.min(MAX_WATCHED_FILES_UPPER_BOUND);
        if self.ring_capacity == 0 {
            self.ring_capacity = 128;
        }
        self.ring_capacity = self
            .ring_capacity
            .next_power_of_two()
            .clamp(MIN_RING_CAPACITY, MAX_RING_CAPACITY);
        if self.audit.buffer_size == 0 {
            self.audit.buffer_size = 256;
        }
    }
}

fn parse_duration(value: &str) -> Result<Duration, crate::error::ArgusError> {
    humantime::parse_duration(value).map_err(|_| invalid("duration", value))
}

fn parse_bool(value: &str) -> Result<bool, crate::error::ArgusError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(invalid("bool", value)),
    }
}

fn invalid(field: &str, value: &str) -> crate::error::ArgusError {
    crate::error::ArgusError::Configuration(format!("invalid value for {field}: {value:?}"))
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        humantime::format_duration(*d).to_string().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
