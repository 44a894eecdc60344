//! In-memory store driver pieces: a snapshot cache and a channel-fed event
//! source. Used by tests and by embedders that persist elsewhere.

use crate::domain::{ApplicationState, SnapshotError};
use crate::events::EventEnvelope;
use crate::ports::{EventSource, SnapshotStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

/// In-memory implementation of SnapshotStore.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    snapshot: Mutex<Option<ApplicationState>>,
    saves: AtomicU64,
}

impl InMemorySnapshotStore {
    /// Empty store (cold start).
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a cached state.
    pub fn with_state(state: ApplicationState) -> Self {
        Self {
            snapshot: Mutex::new(Some(state)),
            saves: AtomicU64::new(0),
        }
    }

    /// Last saved snapshot.
    pub fn latest(&self) -> Option<ApplicationState> {
        self.snapshot.lock().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self) -> Result<Option<ApplicationState>, SnapshotError> {
        Ok(self.snapshot.lock().clone())
    }

    async fn save(&self, state: &ApplicationState) -> Result<(), SnapshotError> {
        *self.snapshot.lock() = Some(state.clone());
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Event source fed through a tokio mpsc channel.
pub struct ChannelEventSource {
    receiver: mpsc::Receiver<EventEnvelope>,
}

impl ChannelEventSource {
    /// Create a bounded channel and its source end.
    pub fn channel(capacity: usize) -> (mpsc::Sender<EventEnvelope>, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (sender, Self { receiver })
    }
}

#[async_trait]
impl EventSource for ChannelEventSource {
    async fn next_event(&mut self) -> Option<EventEnvelope> {
        self.receiver.recv().await
    }
}

/// Event source over a fixed list, mostly for tests and replays.
pub struct VecEventSource {
    events: std::vec::IntoIter<EventEnvelope>,
}

impl VecEventSource {
    /// Source yielding `events` in order.
    pub fn new(events: Vec<EventEnvelope>) -> Self {
        Self {
            events: events.into_iter(),
        }
    }
}

#[async_trait]
impl EventSource for VecEventSource {
    async fn next_event(&mut self) -> Option<EventEnvelope> {
        self.events.next()
    }
}
