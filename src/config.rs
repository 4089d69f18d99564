// Collection configuration.
//
// Purpose
// - Decide how an optimistic collection behaves where the reconciliation rules leave room.
//
// How it is used
// - The binary reads it from the environment (after loading `.env`); tests build it directly.

use std::str::FromStr;
use thiserror::Error;

pub const SERIALIZE_SAME_KEY_VAR: &str = "OPTIMISTIC_SERIALIZE_SAME_KEY";
pub const ROLLBACK_VAR: &str = "OPTIMISTIC_ROLLBACK";
pub const RESYNC_PENDING_VAR: &str = "OPTIMISTIC_RESYNC_PENDING";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
}

/// What a failed update or delete restores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RollbackStrategy {
    /// The whole collection as it was right before the optimistic mutation.
    #[default]
    Snapshot,
    /// Only the affected entity; changes to other entities made in the meantime survive.
    Entry,
}

/// What a bulk resync does with pending markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResyncPolicy {
    /// Leave them alone; in flight operations still settle and unmark.
    #[default]
    Keep,
    Clear,
    /// Keep only markers whose key is present in the new items.
    Reconcile,
}

impl FromStr for RollbackStrategy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "snapshot" => Ok(Self::Snapshot),
            "entry" => Ok(Self::Entry),
            _ => Err(ConfigError::InvalidValue {
                var: ROLLBACK_VAR,
                value: value.to_string(),
            }),
        }
    }
}

impl FromStr for ResyncPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "clear" => Ok(Self::Clear),
            "reconcile" => Ok(Self::Reconcile),
            _ => Err(ConfigError::InvalidValue {
                var: RESYNC_PENDING_VAR,
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Queue optimistic operations on the same key behind each other.
    pub serialize_same_key: bool,
    pub rollback: RollbackStrategy,
    pub resync_pending: ResyncPolicy,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            serialize_same_key: true,
            rollback: RollbackStrategy::default(),
            resync_pending: ResyncPolicy::default(),
        }
    }
}

impl CollectionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from any variable source. Unset variables keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(SERIALIZE_SAME_KEY_VAR) {
            config.serialize_same_key = parse_bool(SERIALIZE_SAME_KEY_VAR, &value)?;
        }
        if let Some(value) = lookup(ROLLBACK_VAR) {
            config.rollback = value.parse()?;
        }
        if let Some(value) = lookup(RESYNC_PENDING_VAR) {
            config.resync_pending = value.parse()?;
        }
        Ok(config)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}
