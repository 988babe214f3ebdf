// CHANNEL STORE
// Channel ends and in-flight upgrade bookkeeping, keyed by (port, channel)
//
// INVARIANTS:
// 1. The upgrade sequence is never deleted; it survives every attempt so the
//    next attempt is numbered after it
// 2. Restore channel and timeout are written and cleared together by the
//    handshake; an attempt is "in flight" while the restore channel exists
// 3. Every value round-trips through bincode; undecodable bytes surface as
//    ChannelError::Codec, never as an absent record

use crate::channel::Channel;
use crate::error::ChannelError;
use crate::upgrade::{UpgradeAttempt, UpgradeTimeout};
use bleep_ibc_host::path::{
    channel_key, upgrade_restore_channel_key, upgrade_sequence_key, upgrade_timeout_key,
};
use bleep_ibc_host::{ChannelId, KvStore, PortId, ReadStore};
use serde::de::DeserializeOwned;
use serde::Serialize;

const RECORD_CHANNEL: &str = "channel end";
const RECORD_RESTORE_CHANNEL: &str = "upgrade restore channel";
const RECORD_SEQUENCE: &str = "upgrade sequence";
const RECORD_TIMEOUT: &str = "upgrade timeout";

fn encode<T: Serialize>(record: &'static str, value: &T) -> Result<Vec<u8>, ChannelError> {
    bincode::serialize(value).map_err(|e| ChannelError::Codec {
        record,
        reason: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(record: &'static str, bytes: &[u8]) -> Result<T, ChannelError> {
    bincode::deserialize(bytes).map_err(|e| ChannelError::Codec {
        record,
        reason: e.to_string(),
    })
}

/// Typed view over the host store for channel records.
pub struct ChannelStore<S> {
    store: S,
}

impl<S> ChannelStore<S> {
    pub fn new(store: S) -> Self {
        ChannelStore { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ReadStore> ChannelStore<S> {
    fn read<T: DeserializeOwned>(
        &self,
        record: &'static str,
        key: &[u8],
    ) -> Result<Option<T>, ChannelError> {
        match self.store.get(key)? {
            Some(bytes) => decode(record, &bytes).map(Some),
            None => Ok(None),
        }
    }

    pub fn get_channel(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<Channel>, ChannelError> {
        self.read(RECORD_CHANNEL, &channel_key(port_id, channel_id))
    }

    pub fn get_upgrade_restore_channel(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<Channel>, ChannelError> {
        self.read(
            RECORD_RESTORE_CHANNEL,
            &upgrade_restore_channel_key(port_id, channel_id),
        )
    }

    /// Last upgrade sequence used by the channel, `None` if it never started one.
    pub fn get_upgrade_sequence(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<u64>, ChannelError> {
        match self.store.get(&upgrade_sequence_key(port_id, channel_id))? {
            Some(bytes) => {
                let raw: [u8; 8] =
                    bytes
                        .as_slice()
                        .try_into()
                        .map_err(|_| ChannelError::Codec {
                            record: RECORD_SEQUENCE,
                            reason: format!("expected 8 bytes, found {}", bytes.len()),
                        })?;
                Ok(Some(u64::from_be_bytes(raw)))
            }
            None => Ok(None),
        }
    }

    pub fn get_upgrade_timeout(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<UpgradeTimeout>, ChannelError> {
        self.read(RECORD_TIMEOUT, &upgrade_timeout_key(port_id, channel_id))
    }

    /// Assemble the in-flight upgrade attempt, if any.
    ///
    /// An attempt exists while a restore channel is stored. A restore channel
    /// without its sequence or timeout is reported as `UpgradeIncomplete`.
    pub fn get_upgrade(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<UpgradeAttempt>, ChannelError> {
        let restore_channel = match self.get_upgrade_restore_channel(port_id, channel_id)? {
            Some(channel) => channel,
            None => return Ok(None),
        };
        let incomplete = |missing| ChannelError::UpgradeIncomplete {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            missing,
        };
        let sequence = self
            .get_upgrade_sequence(port_id, channel_id)?
            .ok_or_else(|| incomplete(RECORD_SEQUENCE))?;
        let timeout = self
            .get_upgrade_timeout(port_id, channel_id)?
            .ok_or_else(|| incomplete(RECORD_TIMEOUT))?;
        Ok(Some(UpgradeAttempt {
            restore_channel,
            sequence,
            timeout,
        }))
    }
}

impl<S: KvStore> ChannelStore<S> {
    fn write<T: Serialize>(
        &mut self,
        record: &'static str,
        key: &[u8],
        value: &T,
    ) -> Result<(), ChannelError> {
        let bytes = encode(record, value)?;
        self.store.set(key, bytes)?;
        Ok(())
    }

    pub fn set_channel(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        channel: &Channel,
    ) -> Result<(), ChannelError> {
        self.write(RECORD_CHANNEL, &channel_key(port_id, channel_id), channel)
    }

    pub fn set_upgrade_restore_channel(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        channel: &Channel,
    ) -> Result<(), ChannelError> {
        self.write(
            RECORD_RESTORE_CHANNEL,
            &upgrade_restore_channel_key(port_id, channel_id),
            channel,
        )
    }

    pub fn delete_upgrade_restore_channel(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), ChannelError> {
        self.store
            .delete(&upgrade_restore_channel_key(port_id, channel_id))?;
        Ok(())
    }

    pub fn set_upgrade_sequence(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: u64,
    ) -> Result<(), ChannelError> {
        self.store.set(
            &upgrade_sequence_key(port_id, channel_id),
            sequence.to_be_bytes().to_vec(),
        )?;
        Ok(())
    }

    pub fn set_upgrade_timeout(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        timeout: &UpgradeTimeout,
    ) -> Result<(), ChannelError> {
        self.write(
            RECORD_TIMEOUT,
            &upgrade_timeout_key(port_id, channel_id),
            timeout,
        )
    }

    pub fn delete_upgrade_timeout(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), ChannelError> {
        self.store.delete(&upgrade_timeout_key(port_id, channel_id))?;
        Ok(())
    }

    /// Clear the in-flight attempt. The sequence is kept.
    pub fn delete_upgrade(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), ChannelError> {
        self.delete_upgrade_restore_channel(port_id, channel_id)?;
        self.delete_upgrade_timeout(port_id, channel_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Counterparty, Order, State};
    use bleep_ibc_client::Height;
    use bleep_ibc_host::{ConnectionId, MemoryStore};

    fn port() -> PortId {
        "transfer".parse().unwrap()
    }

    fn open_channel() -> Channel {
        Channel::new(
            State::Open,
            Order::Unordered,
            Counterparty::new("transfer".parse().unwrap(), Some(ChannelId::new(7))),
            vec![ConnectionId::new(0)],
            "ics20-1",
        )
    }

    #[test]
    fn test_channel_roundtrip() {
        let mut store = ChannelStore::new(MemoryStore::new());
        let channel_id = ChannelId::new(0);
        assert_eq!(store.get_channel(&port(), &channel_id).unwrap(), None);

        store.set_channel(&port(), &channel_id, &open_channel()).unwrap();
        assert_eq!(
            store.get_channel(&port(), &channel_id).unwrap(),
            Some(open_channel())
        );
        assert_eq!(store.get_channel(&port(), &ChannelId::new(1)).unwrap(), None);
    }

    #[test]
    fn test_corrupt_channel_is_codec_error() {
        let mut mem = MemoryStore::new();
        let channel_id = ChannelId::new(0);
        mem.set(&channel_key(&port(), &channel_id), vec![0xff; 3]).unwrap();

        let store = ChannelStore::new(mem);
        let err = store.get_channel(&port(), &channel_id).unwrap_err();
        assert!(matches!(err, ChannelError::Codec { record: RECORD_CHANNEL, .. }));
    }

    #[test]
    fn test_sequence_encoding_is_big_endian() {
        let mut store = ChannelStore::new(MemoryStore::new());
        let channel_id = ChannelId::new(0);
        store.set_upgrade_sequence(&port(), &channel_id, 258).unwrap();

        let mem = store.into_inner();
        assert_eq!(
            mem.get(&upgrade_sequence_key(&port(), &channel_id)).unwrap(),
            Some(vec![0, 0, 0, 0, 0, 0, 1, 2])
        );
    }

    #[test]
    fn test_short_sequence_is_codec_error() {
        let mut mem = MemoryStore::new();
        let channel_id = ChannelId::new(0);
        mem.set(&upgrade_sequence_key(&port(), &channel_id), vec![1, 2]).unwrap();

        let store = ChannelStore::new(mem);
        assert!(matches!(
            store.get_upgrade_sequence(&port(), &channel_id),
            Err(ChannelError::Codec { record: RECORD_SEQUENCE, .. })
        ));
    }

    #[test]
    fn test_get_upgrade_assembles_attempt() {
        let mut store = ChannelStore::new(MemoryStore::new());
        let channel_id = ChannelId::new(0);
        assert_eq!(store.get_upgrade(&port(), &channel_id).unwrap(), None);

        let timeout = UpgradeTimeout::new(Height::new(0, 100), 5_000);
        store
            .set_upgrade_restore_channel(&port(), &channel_id, &open_channel())
            .unwrap();
        store.set_upgrade_sequence(&port(), &channel_id, 3).unwrap();
        store.set_upgrade_timeout(&port(), &channel_id, &timeout).unwrap();

        let attempt = store.get_upgrade(&port(), &channel_id).unwrap().unwrap();
        assert_eq!(attempt.restore_channel, open_channel());
        assert_eq!(attempt.sequence, 3);
        assert_eq!(attempt.timeout, timeout);
    }

    #[test]
    fn test_get_upgrade_reports_missing_timeout() {
        let mut store = ChannelStore::new(MemoryStore::new());
        let channel_id = ChannelId::new(0);
        store
            .set_upgrade_restore_channel(&port(), &channel_id, &open_channel())
            .unwrap();
        store.set_upgrade_sequence(&port(), &channel_id, 1).unwrap();

        let err = store.get_upgrade(&port(), &channel_id).unwrap_err();
        assert!(matches!(
            err,
            ChannelError::UpgradeIncomplete { missing: RECORD_TIMEOUT, .. }
        ));
    }

    #[test]
    fn test_delete_upgrade_keeps_sequence() {
        let mut store = ChannelStore::new(MemoryStore::new());
        let channel_id = ChannelId::new(0);
        store
            .set_upgrade_restore_channel(&port(), &channel_id, &open_channel())
            .unwrap();
        store.set_upgrade_sequence(&port(), &channel_id, 4).unwrap();
        store
            .set_upgrade_timeout(&port(), &channel_id, &UpgradeTimeout::new(Height::new(1, 10), 0))
            .unwrap();

        store.delete_upgrade(&port(), &channel_id).unwrap();
        assert_eq!(store.get_upgrade(&port(), &channel_id).unwrap(), None);
        assert_eq!(store.get_upgrade_timeout(&port(), &channel_id).unwrap(), None);
        assert_eq!(store.get_upgrade_sequence(&port(), &channel_id).unwrap(), Some(4));
    }
}
