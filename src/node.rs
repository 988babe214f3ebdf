// IBC NODE
// Startup wiring: configuration in, a ready host store, collaborators and
// channel keeper out

use crate::config::{open_store, telemetry_sink, HostStore, IbcConfig, LoggingConfig, Telemetry};
use anyhow::Context;
use bleep_ibc_channel::ChannelKeeper;
use bleep_ibc_client::ClientStore;
use bleep_ibc_host::{ClientId, ConnectionSet, ScopedCapabilities};
use log::info;
use std::sync::Arc;

/// Install `env_logger` with the configured filter. `RUST_LOG` wins when set.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.filter.as_str()))
        .try_init()
        .context("logger already installed")?;
    Ok(())
}

/// A host's IBC state: store, collaborators and telemetry.
pub struct IbcNode {
    pub store: HostStore,
    pub capabilities: Arc<ScopedCapabilities>,
    pub connections: Arc<ConnectionSet>,
    pub telemetry: Telemetry,
}

impl IbcNode {
    pub fn from_config(config: &IbcConfig) -> anyhow::Result<Self> {
        let store = open_store(&config.store).context("failed to open IBC store")?;
        let telemetry = telemetry_sink(&config.telemetry);
        info!(
            "IBC node ready: store backend {:?}, telemetry {}",
            config.store.backend,
            if config.telemetry.enabled { "on" } else { "off" }
        );
        Ok(IbcNode {
            store,
            capabilities: Arc::new(ScopedCapabilities::new()),
            connections: Arc::new(ConnectionSet::new()),
            telemetry,
        })
    }

    pub fn channel_keeper(&self) -> ChannelKeeper<Arc<ScopedCapabilities>, Arc<ConnectionSet>> {
        ChannelKeeper::new(
            self.capabilities.clone(),
            self.connections.clone(),
            self.telemetry.sink.clone(),
        )
    }

    /// Consensus state store for `client_id`, borrowing the node's store.
    pub fn client_store(&mut self, client_id: ClientId) -> ClientStore<&mut HostStore> {
        ClientStore::new(&mut self.store, client_id)
    }
}
