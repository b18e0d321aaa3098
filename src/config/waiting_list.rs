//! Waiting-list configuration.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default offer lifetime: 30 minutes.
pub const DEFAULT_OFFER_TTL_SECS: u64 = 30 * 60;
/// Default number of retries after a transient conflict.
pub const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;

/// Environment variable overriding `offer_ttl_secs`.
pub const ENV_OFFER_TTL_SECS: &str = "WAITING_LIST_OFFER_TTL_SECS";
/// Environment variable overriding `max_conflict_retries`.
pub const ENV_MAX_CONFLICT_RETRIES: &str = "WAITING_LIST_MAX_CONFLICT_RETRIES";
/// Environment variable setting `sweep_interval_secs`.
pub const ENV_SWEEP_INTERVAL_SECS: &str = "WAITING_LIST_SWEEP_INTERVAL_SECS";

const fn default_offer_ttl_secs() -> u64 {
    DEFAULT_OFFER_TTL_SECS
}

const fn default_max_conflict_retries() -> u32 {
    DEFAULT_MAX_CONFLICT_RETRIES
}

/// Settings for one resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTypeConfig {
    /// Offer lifetime in seconds for resources of this type.
    pub offer_ttl_secs: u64,
}

/// Waiting-list configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingListConfig {
    /// How long an offer stays valid before it expires, in seconds.
    #[serde(default = "default_offer_ttl_secs")]
    pub offer_ttl_secs: u64,
    /// Retries after a transient conflict before giving up.
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,
    /// Period of the stale-offer sweeper; no sweeper when unset.
    #[serde(default)]
    pub sweep_interval_secs: Option<u64>,
    /// Per-resource-type overrides keyed by [`crate::core::Resource::kind`].
    #[serde(default)]
    pub resource_overrides: HashMap<String, ResourceTypeConfig>,
}

impl Default for WaitingListConfig {
    fn default() -> Self {
        Self {
            offer_ttl_secs: DEFAULT_OFFER_TTL_SECS,
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
            sweep_interval_secs: None,
            resource_overrides: HashMap::new(),
        }
    }
}

impl WaitingListConfig {
    /// Set the global offer lifetime.
    #[must_use]
    pub const fn with_offer_ttl_secs(mut self, secs: u64) -> Self {
        self.offer_ttl_secs = secs;
        self
    }

    /// Set the conflict retry budget.
    #[must_use]
    pub const fn with_max_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }

    /// Enable the periodic sweeper.
    #[must_use]
    pub const fn with_sweep_interval_secs(mut self, secs: u64) -> Self {
        self.sweep_interval_secs = Some(secs);
        self
    }

    /// Override the offer lifetime for one resource type.
    #[must_use]
    pub fn with_resource_type(mut self, kind: impl Into<String>, offer_ttl_secs: u64) -> Self {
        self.resource_overrides
            .insert(kind.into(), ResourceTypeConfig { offer_ttl_secs });
        self
    }

    /// Global offer lifetime.
    #[must_use]
    pub const fn offer_ttl(&self) -> Duration {
        Duration::from_secs(self.offer_ttl_secs)
    }

    /// Offer lifetime for a resource of the given type.
    #[must_use]
    pub fn offer_ttl_for(&self, kind: Option<&str>) -> Duration {
        kind.and_then(|k| self.resource_overrides.get(k))
            .map_or_else(|| self.offer_ttl(), |t| Duration::from_secs(t.offer_ttl_secs))
    }

    /// Sweeper period, if enabled.
    #[must_use]
    pub fn sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval_secs.map(Duration::from_secs)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// A message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.offer_ttl_secs == 0 {
            return Err("offer_ttl_secs must be greater than 0".into());
        }
        if self.sweep_interval_secs == Some(0) {
            return Err("sweep_interval_secs must be greater than 0 when set".into());
        }
        for (kind, overrides) in &self.resource_overrides {
            if overrides.offer_ttl_secs == 0 {
                return Err(format!(
                    "resource type `{kind}` invalid: offer_ttl_secs must be greater than 0"
                ));
            }
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `WAITING_LIST_*` environment variables,
    /// loading a `.env` file first if one exists.
    ///
    /// # Errors
    ///
    /// Unparsable values or validation failure.
    pub fn from_env() -> Result<Self, String> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Unparsable values or validation failure.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, String>
        where
            T::Err: std::fmt::Display,
        {
            raw.trim()
                .parse()
                .map_err(|e| format!("{key}: invalid value `{raw}`: {e}"))
        }

        let mut cfg = Self::default();
        if let Some(raw) = lookup(ENV_OFFER_TTL_SECS) {
            cfg.offer_ttl_secs = parse(ENV_OFFER_TTL_SECS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_CONFLICT_RETRIES) {
            cfg.max_conflict_retries = parse(ENV_MAX_CONFLICT_RETRIES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SWEEP_INTERVAL_SECS) {
            cfg.sweep_interval_secs = Some(parse(ENV_SWEEP_INTERVAL_SECS, &raw)?);
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
