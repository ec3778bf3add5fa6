use serde::Deserialize;
use std::env;

/// Explicit engine configuration: validity window, pricing, cache TTL
/// and storage keys are passed in at construction rather than read from
/// ambient globals, so tests can run with arbitrary durations.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub ticket: TicketRules,
    #[serde(default)]
    pub cache: CacheRules,
    #[serde(default)]
    pub storage: StorageKeys,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TicketRules {
    /// Validity window of a fresh ticket, seconds.
    pub duration_seconds: u64,
    /// Price of a single passenger fare.
    pub unit_price: f64,
}

impl Default for TicketRules {
    fn default() -> Self {
        Self {
            duration_seconds: 60 * 60,
            unit_price: 12.00,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheRules {
    /// How long generated data stays fresh, seconds.
    pub ttl_seconds: i64,
}

impl Default for CacheRules {
    fn default() -> Self {
        Self {
            ttl_seconds: 24 * 60 * 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageKeys {
    pub tickets: String,
    pub statistics: String,
    pub cache: String,
    pub persistence_enabled: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            tickets: "transport_tickets".to_string(),
            statistics: "transport_statistics".to_string(),
            cache: "transport_cache".to_string(),
            persistence_enabled: "storage_enabled".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of FARELINE)
            // Eg.. `FARELINE_TICKET__UNIT_PRICE=8.0` would set the fare
            .add_source(config::Environment::with_prefix("FARELINE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
