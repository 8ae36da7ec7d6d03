// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration loading from environment variables.
//!
//! Each hook reads its configuration once at invocation start; a missing
//! required variable fails the invocation before any remote call is made.

use std::time::Duration;

/// Index name used when neither the environment nor the event supplies one.
pub const DEFAULT_INDEX_NAME: &str = "stackhook-kb-default-index";

/// Default dimension of the knn vector field.
pub const DEFAULT_VECTOR_DIMENSION: u32 = 1536;

/// Configuration for the index provisioning hook.
#[derive(Debug, Clone)]
pub struct IndexHookConfig {
    /// Search collection endpoint URL
    pub search_endpoint: String,
    /// Name of the index to provision
    pub index_name: String,
    /// Dimension of the vector field in the index definition
    pub vector_dimension: u32,
    /// Optional hard deadline for the whole invocation
    pub deadline: Option<Duration>,
}

impl IndexHookConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `STACKHOOK_SEARCH_ENDPOINT`: search collection endpoint URL
    ///
    /// Optional (with defaults):
    /// - `STACKHOOK_INDEX_NAME`: index name (default: `stackhook-kb-default-index`)
    /// - `STACKHOOK_VECTOR_DIMENSION`: vector dimension (default: 1536)
    /// - `STACKHOOK_DEADLINE_SECS`: invocation deadline in seconds (default: none)
    pub fn from_env() -> Result<Self, ConfigError> {
        let search_endpoint = require("STACKHOOK_SEARCH_ENDPOINT")?;

        let index_name = std::env::var("STACKHOOK_INDEX_NAME")
            .unwrap_or_else(|_| DEFAULT_INDEX_NAME.to_string());

        let vector_dimension: u32 = match std::env::var("STACKHOOK_VECTOR_DIMENSION") {
            Ok(raw) => raw.parse().map_err(|_| {
                ConfigError::Invalid("STACKHOOK_VECTOR_DIMENSION", "must be a positive integer")
            })?,
            Err(_) => DEFAULT_VECTOR_DIMENSION,
        };

        Ok(Self {
            search_endpoint,
            index_name,
            vector_dimension,
            deadline: deadline_from_env()?,
        })
    }
}

/// Configuration for the knowledge sync hook.
#[derive(Debug, Clone)]
pub struct IngestHookConfig {
    /// Knowledge sync service endpoint URL
    pub sync_endpoint: String,
    /// Knowledge base to sync into
    pub knowledge_base_id: String,
    /// Data source to ingest from
    pub data_source_id: String,
    /// Optional hard deadline for the whole invocation
    pub deadline: Option<Duration>,
}

impl IngestHookConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `STACKHOOK_SYNC_ENDPOINT`: knowledge sync service endpoint URL
    /// - `STACKHOOK_KNOWLEDGE_BASE_ID`: knowledge base identifier
    /// - `STACKHOOK_DATA_SOURCE_ID`: data source identifier
    ///
    /// Optional:
    /// - `STACKHOOK_DEADLINE_SECS`: invocation deadline in seconds (default: none)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            sync_endpoint: require("STACKHOOK_SYNC_ENDPOINT")?,
            knowledge_base_id: require("STACKHOOK_KNOWLEDGE_BASE_ID")?,
            data_source_id: require("STACKHOOK_DATA_SOURCE_ID")?,
            deadline: deadline_from_env()?,
        })
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn deadline_from_env() -> Result<Option<Duration>, ConfigError> {
    match std::env::var("STACKHOOK_DEADLINE_SECS") {
        Ok(raw) => {
            let secs: u64 = raw.parse().map_err(|_| {
                ConfigError::Invalid("STACKHOOK_DEADLINE_SECS", "must be a number of seconds")
            })?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set env vars for a test and restore them after
    struct EnvGuard {
        vars: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            Self { vars: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            let old = env::var(key).ok();
            self.vars.push((key.to_string(), old));
            // SAFETY: Tests are serialized via ENV_MUTEX, so no concurrent access
            unsafe { env::set_var(key, value) };
        }

        fn remove(&mut self, key: &str) {
            let old = env::var(key).ok();
            self.vars.push((key.to_string(), old));
            // SAFETY: Tests are serialized via ENV_MUTEX, so no concurrent access
            unsafe { env::remove_var(key) };
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.vars.drain(..).rev() {
                // SAFETY: Tests are serialized via ENV_MUTEX, so no concurrent access
                unsafe {
                    match value {
                        Some(v) => env::set_var(&key, v),
                        None => env::remove_var(&key),
                    }
                }
            }
        }
    }

    #[test]
    fn test_index_config_with_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();
        guard.set("STACKHOOK_SEARCH_ENDPOINT", "https://search.example");
        guard.remove("STACKHOOK_INDEX_NAME");
        guard.remove("STACKHOOK_VECTOR_DIMENSION");
        guard.remove("STACKHOOK_DEADLINE_SECS");

        let config = IndexHookConfig::from_env().unwrap();
        assert_eq!(config.search_endpoint, "https://search.example");
        assert_eq!(config.index_name, DEFAULT_INDEX_NAME);
        assert_eq!(config.vector_dimension, DEFAULT_VECTOR_DIMENSION);
        assert!(config.deadline.is_none());
    }

    #[test]
    fn test_index_config_missing_endpoint() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();
        guard.remove("STACKHOOK_SEARCH_ENDPOINT");

        let err = IndexHookConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Missing("STACKHOOK_SEARCH_ENDPOINT")
        ));
    }

    #[test]
    fn test_index_config_invalid_dimension() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();
        guard.set("STACKHOOK_SEARCH_ENDPOINT", "https://search.example");
        guard.set("STACKHOOK_VECTOR_DIMENSION", "not-a-number");

        let err = IndexHookConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid("STACKHOOK_VECTOR_DIMENSION", _)
        ));
    }

    #[test]
    fn test_ingest_config_complete() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();
        guard.set("STACKHOOK_SYNC_ENDPOINT", "https://sync.example");
        guard.set("STACKHOOK_KNOWLEDGE_BASE_ID", "kb-1234");
        guard.set("STACKHOOK_DATA_SOURCE_ID", "ds-5678");
        guard.set("STACKHOOK_DEADLINE_SECS", "840");

        let config = IngestHookConfig::from_env().unwrap();
        assert_eq!(config.knowledge_base_id, "kb-1234");
        assert_eq!(config.data_source_id, "ds-5678");
        assert_eq!(config.deadline, Some(Duration::from_secs(840)));
    }

    #[test]
    fn test_ingest_config_missing_data_source() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();
        guard.set("STACKHOOK_SYNC_ENDPOINT", "https://sync.example");
        guard.set("STACKHOOK_KNOWLEDGE_BASE_ID", "kb-1234");
        guard.remove("STACKHOOK_DATA_SOURCE_ID");

        let err = IngestHookConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Missing("STACKHOOK_DATA_SOURCE_ID")
        ));
    }
}
