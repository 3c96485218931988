/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::Entry;

/// In-process store variant. Correlations do not survive a restart;
/// a RESOLVED alert for a lost entry degrades to a fresh message.
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn set(&self, event_id: &str, entry: Entry) {
        self.data.write().insert(event_id.to_string(), entry);
    }

    pub fn get(&self, event_id: &str) -> Option<Entry> {
        self.data.read().get(event_id).cloned()
    }

    pub fn delete(&self, event_id: &str) {
        self.data.write().remove(event_id);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::{Entry, MemoryStore};
    use crate::store::MessageId;

    fn entry(message_id: i64) -> Entry {
        Entry {
            message_id: MessageId(message_id),
            start_time: String::from("2024-05-01 12:00:00 UTC"),
            message: String::from("cpu load too high"),
            severity: String::from("HIGH"),
        }
    }

    #[test]
    fn set_get_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.get("100"), None);

        store.set("100", entry(1));
        assert_eq!(store.get("100"), Some(entry(1)));

        store.delete("100");
        assert_eq!(store.get("100"), None);
    }

    #[test]
    fn last_problem_wins() {
        let store = MemoryStore::new();
        store.set("100", entry(1));
        store.set("100", entry(2));
        assert_eq!(store.get("100"), Some(entry(2)));
    }

    #[test]
    fn delete_is_idempotent() {
        let store = MemoryStore::new();
        store.delete("100");
        store.set("100", entry(1));
        store.delete("100");
        store.delete("100");
        assert_eq!(store.get("100"), None);
    }
}
