//! Environment-driven configuration.
//!
//! Every knob has a default; only `DATABASE_URL` is mandatory, and it is read
//! by the callers that actually need a connection.

use std::time::Duration;

use crate::constants::{
    PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "DISCOVERY_TAGS_PG_MAX_CONNECTIONS";
pub const ACQUIRE_TIMEOUT_VAR: &str = "DISCOVERY_TAGS_PG_ACQUIRE_TIMEOUT_SECS";
pub const IDLE_TIMEOUT_VAR: &str = "DISCOVERY_TAGS_PG_IDLE_TIMEOUT_SECS";

/// Parse an environment variable with a default fallback.
///
/// Unset is the expected case and stays silent; a value that fails to parse is
/// logged at warn level before the default is used.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Connection pool settings for PostgreSQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: PG_POOL_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS),
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let max_connections = env_parse_with_default(MAX_CONNECTIONS_VAR, PG_POOL_MAX_CONNECTIONS);
        Self {
            // a zero-sized pool can never hand out a connection
            max_connections: max_connections.max(1),
            acquire_timeout: Duration::from_secs(env_parse_with_default(
                ACQUIRE_TIMEOUT_VAR,
                PG_POOL_ACQUIRE_TIMEOUT_SECS,
            )),
            idle_timeout: Duration::from_secs(env_parse_with_default(
                IDLE_TIMEOUT_VAR,
                PG_POOL_IDLE_TIMEOUT_SECS,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Edition 2024 marks env mutation unsafe; each test uses its own variable.
    fn set(var: &str, value: &str) {
        unsafe { std::env::set_var(var, value) };
    }

    fn unset(var: &str) {
        unsafe { std::env::remove_var(var) };
    }

    #[test]
    fn test_env_parse_valid_value() {
        let var_name = "TEST_DISCOVERY_TAGS_VALID_40121";
        set(var_name, "42");
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 42);
        unset(var_name);
    }

    #[test]
    fn test_env_parse_invalid_value() {
        let var_name = "TEST_DISCOVERY_TAGS_INVALID_40122";
        set(var_name, "banana");
        let result: u64 = env_parse_with_default(var_name, 7);
        assert_eq!(result, 7);
        unset(var_name);
    }

    #[test]
    fn test_env_parse_missing_var() {
        let var_name = "TEST_DISCOVERY_TAGS_MISSING_40123";
        unset(var_name);
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_pool_config_defaults() {
        let cfg = PoolConfig::default();
        assert_eq!(cfg.max_connections, PG_POOL_MAX_CONNECTIONS);
        assert_eq!(cfg.acquire_timeout, Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS));
        assert_eq!(cfg.idle_timeout, Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS));
    }
}
