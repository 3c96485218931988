/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

//! Correlation store: the durable mapping from an event id to the
//! metadata of its open notification. Two interchangeable variants
//! share one capability set (`set` / `get` / `delete`); which one is
//! active is a configuration concern, not a handler concern.

mod memory;
mod redis;

use serde::{Deserialize, Serialize};

pub use memory::MemoryStore;
pub use redis::RedisStore;

/// Opaque handle to a sent Telegram message, used to edit it in
/// place when the event resolves.
#[derive(
    Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug,
)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The data persisted for a single open event, written when the
/// PROBLEM notification is sent and consumed when the matching
/// RESOLVED alert arrives. Serialized field names are the wire
/// format of the redis-backed store; do not rename.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(rename = "messageID")]
    pub message_id: MessageId,
    pub start_time: String,
    pub message: String,
    pub severity: String,
}

/// Store variant selected at startup. Entries persist until
/// explicitly deleted; an event that never resolves keeps its entry
/// indefinitely.
pub enum EventStore {
    Memory(MemoryStore),
    Redis(RedisStore),
}

impl EventStore {
    pub fn in_memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub async fn set(&self, event_id: &str, entry: Entry) {
        match self {
            Self::Memory(store) => store.set(event_id, entry),
            Self::Redis(store) => store.set(event_id, &entry).await,
        }
    }

    pub async fn get(&self, event_id: &str) -> Option<Entry> {
        match self {
            Self::Memory(store) => store.get(event_id),
            Self::Redis(store) => store.get(event_id).await,
        }
    }

    pub async fn delete(&self, event_id: &str) {
        match self {
            Self::Memory(store) => store.delete(event_id),
            Self::Redis(store) => store.delete(event_id).await,
        }
    }
}
