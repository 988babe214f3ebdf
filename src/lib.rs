//! BLEEP IBC: the channel upgrade handshake and the light client consensus
//! state store, wired to a configurable host store and telemetry sink.
//!
//! The library crates do the work; this crate loads configuration, installs
//! logging and assembles an [`IbcNode`] from them.

pub mod config;
pub mod node;

pub use bleep_ibc_channel as channel;
pub use bleep_ibc_client as client;
pub use bleep_ibc_host as host;
pub use bleep_telemetry as telemetry;

pub use config::{
    open_store, telemetry_sink, ConfigError, HostStore, IbcConfig, LoggingConfig, SinkKind,
    StoreBackend, StoreConfig, Telemetry, TelemetryConfig,
};
pub use node::{init_logging, IbcNode};
