/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use alert_relay::{Entry, EventStore, MessageId};
use serde_json::json;

fn entry(message_id: i64) -> Entry {
    Entry {
        message_id: MessageId(message_id),
        start_time: String::from("2024-05-01 12:00:00 UTC"),
        message: String::from("cpu load > 0.9"),
        severity: String::from("HIGH"),
    }
}

#[tokio::test]
async fn in_memory_store_lifecycle() {
    let store = EventStore::in_memory();
    assert_eq!(store.get("100").await, None);

    store.set("100", entry(1)).await;
    assert_eq!(store.get("100").await, Some(entry(1)));
    assert_eq!(store.get("101").await, None);

    store.set("100", entry(2)).await;
    assert_eq!(store.get("100").await, Some(entry(2)));

    store.delete("100").await;
    assert_eq!(store.get("100").await, None);
}

#[test]
fn entry_wire_format() {
    let value = serde_json::to_value(entry(7)).unwrap();
    assert_eq!(
        value,
        json!({
            "messageID": 7,
            "startTime": "2024-05-01 12:00:00 UTC",
            "message": "cpu load > 0.9",
            "severity": "HIGH",
        })
    );
    let decoded = serde_json::from_value::<Entry>(value).unwrap();
    assert_eq!(decoded, entry(7));
}
