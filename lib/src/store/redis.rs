/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::time::Duration;

use redis::{aio::ConnectionManager, AsyncCommands};
use tokio::time::timeout;

use super::Entry;
use crate::error::{Error, Result};

const OP_TIMEOUT: Duration = Duration::from_secs(5);

/// Store variant backed by a redis-compatible server. Entries are
/// serialized as JSON and stored with no expiry.
///
/// Store unavailability is a soft failure: `get` answers "not found"
/// and `set` / `delete` log and drop the error, so the relay keeps
/// forwarding alerts (at the cost of a possible duplicate message)
/// when the backend is down. Only `connect` and `ping` surface
/// errors, for fail-fast at startup.
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(Error::RedisUrl)?;
        let conn = timeout(OP_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| Error::RedisTimeout)?
            .map_err(Error::RedisConnect)?;
        Ok(Self { conn })
    }

    /// Check connectivity to the redis server.
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        timeout(OP_TIMEOUT, redis::cmd("PING").query_async::<String>(&mut conn))
            .await
            .map_err(|_| Error::RedisTimeout)?
            .map_err(Error::RedisCommand)?;
        Ok(())
    }

    pub async fn set(&self, event_id: &str, entry: &Entry) {
        let data = match serde_json::to_string(entry) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("redis store: failed to serialize entry for event {event_id}: {e}");
                return;
            }
        };
        let mut conn = self.conn.clone();
        match timeout(OP_TIMEOUT, conn.set::<_, _, ()>(event_id, data)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("redis store: SET event {event_id}: {e}"),
            Err(_) => log::warn!("redis store: SET event {event_id}: timed out"),
        }
    }

    pub async fn get(&self, event_id: &str) -> Option<Entry> {
        let mut conn = self.conn.clone();
        let data = match timeout(OP_TIMEOUT, conn.get::<_, Option<String>>(event_id)).await {
            Ok(Ok(data)) => data?,
            Ok(Err(e)) => {
                log::warn!("redis store: GET event {event_id}: {e}");
                return None;
            }
            Err(_) => {
                log::warn!("redis store: GET event {event_id}: timed out");
                return None;
            }
        };
        match serde_json::from_str(&data) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("redis store: failed to deserialize entry for event {event_id}: {e}");
                None
            }
        }
    }

    pub async fn delete(&self, event_id: &str) {
        let mut conn = self.conn.clone();
        match timeout(OP_TIMEOUT, conn.del::<_, ()>(event_id)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("redis store: DEL event {event_id}: {e}"),
            Err(_) => log::warn!("redis store: DEL event {event_id}: timed out"),
        }
    }
}
