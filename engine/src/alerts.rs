/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

//! The webhook handler receiving Zabbix alert notifications. A
//! PROBLEM alert produces a new Telegram message and an open-event
//! entry in the correlation store; the matching RESOLVED alert edits
//! that message in place and removes the entry. The read-decide-write
//! sequence is not transactional across concurrent requests for the
//! same event id; the last writer wins.

use actix_web::{
    web::{post, resource, scope, Data, Json},
    HttpResponse, Scope,
};
use chrono::Utc;
use tracing::instrument;

use alert_relay::{format_message, format_timestamp, Alert, AlertStatus, Entry};

use crate::{AppData, Error, Result};

pub(crate) fn service() -> Scope {
    scope("/zabbix").service(resource("/alert").route(post().to(post_alert)))
}

#[instrument(skip_all, fields(event_id = %alert.event_id, status = %alert.status))]
async fn post_alert(data: Data<AppData>, alert: Json<Alert>) -> Result<HttpResponse> {
    let alert = alert.into_inner();

    if alert.event_id.is_empty() {
        return Err(Error::MissingEventId);
    }

    if let Some(secret) = &data.secret {
        if &alert.secret != secret {
            return Err(Error::Unauthorized);
        }
    }

    match &alert.status {
        AlertStatus::Problem => handle_problem(&data, &alert).await?,
        AlertStatus::Resolved => handle_resolved(&data, alert).await?,
        AlertStatus::Other(_) => handle_informational(&data, &alert).await?,
    }

    Ok(HttpResponse::Ok().finish())
}

async fn handle_problem(data: &AppData, alert: &Alert) -> Result<()> {
    let now = Utc::now();
    let text = format_message(alert, now, None, None);
    let message_id = data
        .notifier
        .send_message(&text)
        .await
        .inspect_err(|e| {
            log::error!("failed to send message for event {}: {e}", alert.event_id)
        })?;
    data.store
        .set(
            &alert.event_id,
            Entry {
                message_id,
                start_time: format_timestamp(now),
                message: alert.message.clone(),
                severity: alert.severity.clone(),
            },
        )
        .await;
    log::info!(
        "PROBLEM alert sent for event {} (message {message_id})",
        alert.event_id
    );
    Ok(())
}

async fn handle_resolved(data: &AppData, mut alert: Alert) -> Result<()> {
    let Some(entry) = data.store.get(&alert.event_id).await else {
        // No tracked message found; send a new one so the resolution
        // is not lost.
        let text = format_message(&alert, Utc::now(), None, None);
        let message_id = data
            .notifier
            .send_message(&text)
            .await
            .inspect_err(|e| {
                log::error!(
                    "failed to send message for resolved event {}: {e}",
                    alert.event_id
                )
            })?;
        log::info!(
            "RESOLVED alert sent (no prior message tracked) for event {} (message {message_id})",
            alert.event_id
        );
        return Ok(());
    };

    if alert.severity.is_empty() && !entry.severity.is_empty() {
        alert.severity = entry.severity.clone();
    }
    let text = format_message(
        &alert,
        Utc::now(),
        Some(&entry.start_time),
        Some(&entry.message),
    );
    data.notifier
        .edit_message(entry.message_id, &text)
        .await
        .inspect_err(|e| {
            log::error!(
                "failed to edit message {} for event {}: {e}",
                entry.message_id,
                alert.event_id
            )
        })?;
    // Deleted only after a successful edit, so a retried RESOLVED can
    // still find and edit the message.
    data.store.delete(&alert.event_id).await;
    log::info!(
        "RESOLVED alert updated for event {} (message {})",
        alert.event_id,
        entry.message_id
    );
    Ok(())
}

async fn handle_informational(data: &AppData, alert: &Alert) -> Result<()> {
    let text = format_message(alert, Utc::now(), None, None);
    let message_id = data
        .notifier
        .send_message(&text)
        .await
        .inspect_err(|e| {
            log::error!("failed to send message for event {}: {e}", alert.event_id)
        })?;
    log::info!(
        "INFO alert sent for event {} (message {message_id})",
        alert.event_id
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use actix_web::{
        http::StatusCode,
        test::{call_service, init_service, TestRequest},
        web::Data,
        App,
    };
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    use alert_relay::{EventStore, MessageId};

    use super::service;
    use crate::telegram::Notifier;
    use crate::{AppData, Error, Result};

    #[derive(Default)]
    struct MockNotifier {
        fail: bool,
        sent: Mutex<Vec<String>>,
        edited: Mutex<Vec<(MessageId, String)>>,
    }

    impl MockNotifier {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn send_message(&self, text: &str) -> Result<MessageId> {
            if self.fail {
                return Err(Error::TelegramApi(String::from("mock send failure")));
            }
            let mut sent = self.sent.lock();
            sent.push(text.to_string());
            Ok(MessageId(sent.len() as i64))
        }

        async fn edit_message(&self, message_id: MessageId, text: &str) -> Result<()> {
            if self.fail {
                return Err(Error::TelegramApi(String::from("mock edit failure")));
            }
            self.edited.lock().push((message_id, text.to_string()));
            Ok(())
        }
    }

    fn app_data(notifier: Arc<MockNotifier>, secret: Option<&str>) -> Data<AppData> {
        Data::new(AppData {
            notifier,
            store: EventStore::in_memory(),
            secret: secret.map(String::from),
            app_version: String::from("test"),
        })
    }

    async fn post(data: &Data<AppData>, body: serde_json::Value) -> StatusCode {
        let app = init_service(App::new().app_data(data.clone()).service(service())).await;
        let req = TestRequest::post()
            .uri("/zabbix/alert")
            .set_json(body)
            .to_request();
        call_service(&app, req).await.status()
    }

    #[actix_web::test]
    async fn problem_sends_and_stores() {
        let notifier = Arc::new(MockNotifier::default());
        let data = app_data(notifier.clone(), None);

        let status = post(
            &data,
            json!({"event_id": "100", "status": "PROBLEM", "host": "server1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(notifier.sent.lock().len(), 1);
        assert!(notifier.edited.lock().is_empty());
        let entry = data.store.get("100").await.unwrap();
        assert_eq!(entry.message_id, MessageId(1));
    }

    #[actix_web::test]
    async fn resolved_edits_tracked_message() {
        let notifier = Arc::new(MockNotifier::default());
        let data = app_data(notifier.clone(), None);

        let status = post(
            &data,
            json!({"event_id": "100", "status": "PROBLEM", "host": "server1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let status = post(
            &data,
            json!({"event_id": "100", "status": "RESOLVED", "host": "server1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(notifier.sent.lock().len(), 1);
        let edited = notifier.edited.lock();
        assert_eq!(edited.len(), 1);
        assert_eq!(edited[0].0, MessageId(1));
        assert!(data.store.get("100").await.is_none());
    }

    #[actix_web::test]
    async fn resolved_preserves_problem_details() {
        let notifier = Arc::new(MockNotifier::default());
        let data = app_data(notifier.clone(), None);

        post(
            &data,
            json!({
                "event_id": "100",
                "status": "PROBLEM",
                "severity": "HIGH",
                "message": "cpu load > 0.9",
            }),
        )
        .await;
        post(&data, json!({"event_id": "100", "status": "RESOLVED"})).await;

        let edited = notifier.edited.lock();
        let text = &edited[0].1;
        assert!(text.contains("📝 <b>Details:</b> cpu load &gt; 0.9"));
        assert!(text.contains("🔥 <b>Severity:</b> HIGH"));
        assert!(text.contains("<b>Start Time:</b>"));
        assert!(text.contains("<b>End Time:</b>"));
    }

    #[actix_web::test]
    async fn resolved_without_entry_sends_new_message() {
        let notifier = Arc::new(MockNotifier::default());
        let data = app_data(notifier.clone(), None);

        let status = post(
            &data,
            json!({"event_id": "100", "status": "RESOLVED", "host": "server1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(notifier.sent.lock().len(), 1);
        assert!(notifier.edited.lock().is_empty());
    }

    #[actix_web::test]
    async fn resolving_twice_degrades_to_send() {
        let notifier = Arc::new(MockNotifier::default());
        let data = app_data(notifier.clone(), None);

        post(&data, json!({"event_id": "100", "status": "PROBLEM"})).await;
        let first = post(&data, json!({"event_id": "100", "status": "RESOLVED"})).await;
        let second = post(&data, json!({"event_id": "100", "status": "RESOLVED"})).await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::OK);
        assert_eq!(notifier.edited.lock().len(), 1);
        assert_eq!(notifier.sent.lock().len(), 2);
    }

    #[actix_web::test]
    async fn duplicate_problem_overwrites_entry() {
        let notifier = Arc::new(MockNotifier::default());
        let data = app_data(notifier.clone(), None);

        post(&data, json!({"event_id": "100", "status": "PROBLEM"})).await;
        post(&data, json!({"event_id": "100", "status": "PROBLEM"})).await;

        assert_eq!(notifier.sent.lock().len(), 2);
        let entry = data.store.get("100").await.unwrap();
        assert_eq!(entry.message_id, MessageId(2));
    }

    #[actix_web::test]
    async fn unknown_status_is_never_correlated() {
        let notifier = Arc::new(MockNotifier::default());
        let data = app_data(notifier.clone(), None);

        let status = post(
            &data,
            json!({"event_id": "100", "status": "ACKNOWLEDGED"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(notifier.sent.lock().len(), 1);
        assert!(data.store.get("100").await.is_none());
    }

    #[actix_web::test]
    async fn missing_event_id_is_rejected() {
        let data = app_data(Arc::new(MockNotifier::default()), None);
        let status = post(&data, json!({"status": "PROBLEM"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn malformed_body_is_rejected() {
        let data = app_data(Arc::new(MockNotifier::default()), None);
        let app = init_service(App::new().app_data(data.clone()).service(service())).await;
        let req = TestRequest::post()
            .uri("/zabbix/alert")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let status = call_service(&app, req).await.status();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn get_method_is_rejected() {
        let data = app_data(Arc::new(MockNotifier::default()), None);
        let app = init_service(App::new().app_data(data.clone()).service(service())).await;
        let req = TestRequest::get().uri("/zabbix/alert").to_request();
        let status = call_service(&app, req).await.status();
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[actix_web::test]
    async fn secret_check() {
        let notifier = Arc::new(MockNotifier::default());
        let data = app_data(notifier.clone(), Some("hunter2"));

        let missing = post(&data, json!({"event_id": "100", "status": "PROBLEM"})).await;
        assert_eq!(missing, StatusCode::UNAUTHORIZED);

        let wrong = post(
            &data,
            json!({"event_id": "100", "status": "PROBLEM", "secret": "wrong"}),
        )
        .await;
        assert_eq!(wrong, StatusCode::UNAUTHORIZED);
        assert!(notifier.sent.lock().is_empty());
        assert!(data.store.get("100").await.is_none());

        let correct = post(
            &data,
            json!({"event_id": "100", "status": "PROBLEM", "secret": "hunter2"}),
        )
        .await;
        assert_eq!(correct, StatusCode::OK);
        assert_eq!(notifier.sent.lock().len(), 1);
    }

    #[actix_web::test]
    async fn no_configured_secret_accepts_any_secret() {
        let notifier = Arc::new(MockNotifier::default());
        let data = app_data(notifier.clone(), None);

        let status = post(
            &data,
            json!({"event_id": "100", "status": "PROBLEM", "secret": "anything"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[actix_web::test]
    async fn failed_send_leaves_no_entry() {
        let data = app_data(Arc::new(MockNotifier::failing()), None);
        let status = post(&data, json!({"event_id": "100", "status": "PROBLEM"})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(data.store.get("100").await.is_none());
    }

    #[actix_web::test]
    async fn failed_edit_retains_entry() {
        let data = app_data(Arc::new(MockNotifier::failing()), None);
        data.store
            .set(
                "100",
                alert_relay::Entry {
                    message_id: MessageId(7),
                    start_time: String::from("2024-05-01 11:45:00 UTC"),
                    message: String::from("cpu load > 0.9"),
                    severity: String::from("HIGH"),
                },
            )
            .await;

        let status = post(&data, json!({"event_id": "100", "status": "RESOLVED"})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(data.store.get("100").await.is_some());
    }
}
