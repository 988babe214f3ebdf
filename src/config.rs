// NODE CONFIGURATION
// Layered settings for an IBC host: optional TOML file, then BLEEP_IBC__*
// environment overrides, then built-in defaults for anything left unset
//
// INVARIANTS:
// 1. Every field has a default; an empty configuration is a valid one
// 2. Selecting a backend that is not compiled in fails at startup, never
//    silently falls back to another backend

use bleep_ibc_host::{KvStore, MemoryStore, ReadStore, StoreError};
use bleep_telemetry::{LogSink, NoopSink, ObservabilityEngine, TelemetrySink};
use config::{Config, Environment, File};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[cfg(feature = "rocksdb")]
use bleep_ibc_host::RocksStore;

/// Environment variable prefix; `BLEEP_IBC__STORE__BACKEND=rocksdb` sets `store.backend`.
pub const ENV_PREFIX: &str = "BLEEP_IBC";
pub const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Store backend '{0}' is not compiled in, rebuild with --features {0}")]
    BackendUnavailable(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Rocksdb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Database directory, used by persistent backends only
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            backend: StoreBackend::Memory,
            path: PathBuf::from("data/ibc"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Keep events and counters in memory for inspection
    #[default]
    Recording,
    /// Write events and counter bumps to the log
    Log,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub sink: SinkKind,
    /// Recording sink only: retain events, not just their counts
    pub record_events: bool,
    /// Recording sink only: seed mixed into event ids
    pub seed: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        TelemetryConfig {
            enabled: true,
            sink: SinkKind::Recording,
            record_events: true,
            seed: "bleep-ibc".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `env_logger` filter used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IbcConfig {
    pub store: StoreConfig,
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
}

impl IbcConfig {
    /// Load from `path` (if given) with environment overrides on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

/// Host store selected by [`StoreConfig`].
pub enum HostStore {
    Memory(MemoryStore),
    #[cfg(feature = "rocksdb")]
    Rocks(RocksStore),
}

impl ReadStore for HostStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self {
            HostStore::Memory(store) => store.get(key),
            #[cfg(feature = "rocksdb")]
            HostStore::Rocks(store) => store.get(key),
        }
    }
}

impl KvStore for HostStore {
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        match self {
            HostStore::Memory(store) => store.set(key, value),
            #[cfg(feature = "rocksdb")]
            HostStore::Rocks(store) => store.set(key, value),
        }
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        match self {
            HostStore::Memory(store) => store.delete(key),
            #[cfg(feature = "rocksdb")]
            HostStore::Rocks(store) => store.delete(key),
        }
    }
}

pub fn open_store(config: &StoreConfig) -> Result<HostStore, ConfigError> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory IBC store");
            Ok(HostStore::Memory(MemoryStore::new()))
        }
        #[cfg(feature = "rocksdb")]
        StoreBackend::Rocksdb => Ok(HostStore::Rocks(RocksStore::open(&config.path)?)),
        #[cfg(not(feature = "rocksdb"))]
        StoreBackend::Rocksdb => Err(ConfigError::BackendUnavailable("rocksdb")),
    }
}

/// Telemetry sink plus, for the recording sink, a handle to read it back.
#[derive(Clone)]
pub struct Telemetry {
    pub sink: Arc<dyn TelemetrySink>,
    pub engine: Option<Arc<ObservabilityEngine>>,
}

pub fn telemetry_sink(config: &TelemetryConfig) -> Telemetry {
    if !config.enabled {
        return Telemetry {
            sink: Arc::new(NoopSink),
            engine: None,
        };
    }
    match config.sink {
        SinkKind::Log => Telemetry {
            sink: Arc::new(LogSink),
            engine: None,
        },
        SinkKind::Recording => {
            let seed = config.seed.as_bytes().to_vec();
            let engine = Arc::new(if config.record_events {
                ObservabilityEngine::new(seed)
            } else {
                ObservabilityEngine::counters_only(seed)
            });
            Telemetry {
                sink: engine.clone(),
                engine: Some(engine),
            }
        }
    }
}
