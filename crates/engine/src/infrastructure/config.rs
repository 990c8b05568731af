//! Application configuration

use std::env;

use anyhow::{Context, Result};

/// SQLite path that selects the in-memory adapters instead of a database file.
pub const MEMORY_BACKEND: &str = ":memory:";

/// Application configuration loaded from environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database path, or `:memory:` for the ephemeral adapters
    pub database_path: String,
    /// Pending challenges older than this expire when answered
    pub challenge_ttl: Option<chrono::Duration>,
    /// Attempts per ledger call during reward settlement
    pub settlement_attempts: u32,
    /// Attempts per action when the match save loses a version race
    pub resolve_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "duelbot.db".to_string(),
            challenge_ttl: None,
            settlement_attempts: 3,
            resolve_attempts: 3,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let challenge_ttl = match lookup("DUELBOT_CHALLENGE_TTL_SECS").filter(|v| !v.is_empty()) {
            Some(raw) => {
                let secs: i64 = raw
                    .trim()
                    .parse()
                    .context("DUELBOT_CHALLENGE_TTL_SECS must be a whole number of seconds")?;
                (secs > 0).then(|| chrono::Duration::seconds(secs))
            }
            None => None,
        };

        Ok(Self {
            database_path: lookup("DUELBOT_DB")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.database_path),
            challenge_ttl,
            settlement_attempts: lookup("DUELBOT_SETTLEMENT_ATTEMPTS")
                .map(|v| v.trim().parse::<u32>())
                .transpose()
                .context("DUELBOT_SETTLEMENT_ATTEMPTS must be a positive integer")?
                .unwrap_or(defaults.settlement_attempts)
                .max(1),
            resolve_attempts: lookup("DUELBOT_RESOLVE_ATTEMPTS")
                .map(|v| v.trim().parse::<u32>())
                .transpose()
                .context("DUELBOT_RESOLVE_ATTEMPTS must be a positive integer")?
                .unwrap_or(defaults.resolve_attempts)
                .max(1),
        })
    }

    pub fn uses_memory_backend(&self) -> bool {
        self.database_path == MEMORY_BACKEND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(!config.uses_memory_backend());
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DUELBOT_DB", ":memory:"),
            ("DUELBOT_CHALLENGE_TTL_SECS", "300"),
            ("DUELBOT_SETTLEMENT_ATTEMPTS", "5"),
            ("DUELBOT_RESOLVE_ATTEMPTS", "2"),
        ]))
        .unwrap();

        assert!(config.uses_memory_backend());
        assert_eq!(config.challenge_ttl, Some(chrono::Duration::seconds(300)));
        assert_eq!(config.settlement_attempts, 5);
        assert_eq!(config.resolve_attempts, 2);
    }

    #[test]
    fn zero_ttl_disables_expiry_and_zero_attempts_clamp_to_one() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DUELBOT_CHALLENGE_TTL_SECS", "0"),
            ("DUELBOT_SETTLEMENT_ATTEMPTS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.challenge_ttl, None);
        assert_eq!(config.settlement_attempts, 1);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let result = AppConfig::from_lookup(lookup(&[("DUELBOT_RESOLVE_ATTEMPTS", "many")]));
        assert!(result.is_err());
    }
}
