// OBSERVABILITY ENGINE
// Append-only event log and monotonic counters for IBC modules
//
// INVARIANTS:
// 1. Events are immutable once recorded (hash-sealed)
// 2. Event IDs are deterministic and never duplicated within one engine
// 3. Counters only ever increase

use crate::event::Event;
use crate::sink::{counter_name, TelemetrySink};
use chrono::Utc;
use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// ═══════════════════════════════════════════════════════════════════════════════
/// OBSERVABILITY TYPES
/// ═══════════════════════════════════════════════════════════════════════════════

/// Unique event ID (deterministic, never duplicated)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EventId([u8; 32]);

impl EventId {
    pub fn new(kind: &str, index: usize, seed: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(kind.as_bytes());
        hasher.update(index.to_le_bytes());
        hasher.update(seed);
        EventId(hasher.finalize().into())
    }

    pub fn as_hex(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

/// Recorded event (immutable once recorded)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservableEvent {
    /// Unique event ID
    pub event_id: EventId,
    /// Emission order within the engine
    pub index: usize,
    /// When the event was recorded (UNIX milliseconds)
    pub timestamp_ms: i64,
    /// The emitted event
    pub event: Event,
    /// Seal over all other fields
    pub event_hash: Vec<u8>,
}

impl ObservableEvent {
    pub fn compute_hash(&self) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(&self.event_id.0);
        hasher.update(self.index.to_le_bytes());
        hasher.update(self.timestamp_ms.to_le_bytes());
        hasher.update(self.event.kind.as_bytes());
        for attr in &self.event.attributes {
            hasher.update(attr.key.as_bytes());
            hasher.update([0u8]);
            hasher.update(attr.value.as_bytes());
            hasher.update([0u8]);
        }
        hasher.finalize().to_vec()
    }

    pub fn verify(&self) -> bool {
        self.compute_hash() == self.event_hash
    }
}

/// Point-in-time view of the engine, suitable for export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub total_events: u64,
    pub event_counts: BTreeMap<String, u64>,
    pub counters: BTreeMap<String, u64>,
}

impl TelemetrySnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// ═══════════════════════════════════════════════════════════════════════════════
/// OBSERVABILITY ENGINE
/// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct EngineState {
    next_index: usize,
    event_log: Vec<ObservableEvent>,
    event_counts: BTreeMap<String, u64>,
    counters: BTreeMap<String, u64>,
}

/// Recording sink: keeps every event and counter in memory.
#[derive(Debug)]
pub struct ObservabilityEngine {
    state: Mutex<EngineState>,
    /// When false, events are counted but not retained
    record_events: bool,
    /// Execution seed (for deterministic event IDs)
    seed: Vec<u8>,
}

impl ObservabilityEngine {
    pub fn new(seed: Vec<u8>) -> Self {
        ObservabilityEngine {
            state: Mutex::new(EngineState::default()),
            record_events: true,
            seed,
        }
    }

    /// Engine that tracks counts only, for long-running hosts
    pub fn counters_only(seed: Vec<u8>) -> Self {
        ObservabilityEngine {
            record_events: false,
            ..Self::new(seed)
        }
    }

    /// Record an event (immutable once recorded)
    pub fn record_event(&self, event: Event) -> EventId {
        let mut state = self.state.lock();
        let index = state.next_index;
        state.next_index += 1;
        let event_id = EventId::new(&event.kind, index, &self.seed);

        *state.event_counts.entry(event.kind.clone()).or_insert(0) += 1;

        if self.record_events {
            let mut recorded = ObservableEvent {
                event_id: event_id.clone(),
                index,
                timestamp_ms: Utc::now().timestamp_millis(),
                event,
                event_hash: vec![],
            };
            recorded.event_hash = recorded.compute_hash();
            debug!("Recorded event {} ({})", recorded.event.kind, event_id.as_hex());
            state.event_log.push(recorded);
        }
        event_id
    }

    pub fn events(&self) -> Vec<ObservableEvent> {
        self.state.lock().event_log.clone()
    }

    pub fn events_of_kind(&self, kind: &str) -> Vec<Event> {
        self.state
            .lock()
            .event_log
            .iter()
            .filter(|recorded| recorded.event.kind == kind)
            .map(|recorded| recorded.event.clone())
            .collect()
    }

    pub fn event_count(&self, kind: &str) -> u64 {
        self.state.lock().event_counts.get(kind).copied().unwrap_or(0)
    }

    pub fn counter(&self, keys: &[&str]) -> u64 {
        self.state
            .lock()
            .counters
            .get(&counter_name(keys))
            .copied()
            .unwrap_or(0)
    }

    /// Verify event log integrity
    pub fn verify_log_integrity(&self) -> bool {
        self.state.lock().event_log.iter().all(|event| event.verify())
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let state = self.state.lock();
        TelemetrySnapshot {
            total_events: state.event_counts.values().sum(),
            event_counts: state.event_counts.clone(),
            counters: state.counters.clone(),
        }
    }
}

impl TelemetrySink for ObservabilityEngine {
    fn emit_event(&self, event: Event) {
        self.record_event(event);
    }

    fn incr_counter(&self, keys: &[&str], delta: u64) {
        let mut state = self.state.lock();
        let counter = state.counters.entry(counter_name(keys)).or_insert(0);
        *counter = counter.saturating_add(delta);
    }
}
