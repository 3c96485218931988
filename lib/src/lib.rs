/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

pub mod alerts;
pub mod store;

pub(crate) mod error;

pub use alerts::{escape_html, format_message, format_timestamp, Alert, AlertStatus, TIME_FORMAT};
pub use error::{Error, Result};
pub use store::{Entry, EventStore, MemoryStore, MessageId, RedisStore};
