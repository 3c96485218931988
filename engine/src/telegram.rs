/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::json;

use alert_relay::MessageId;

use crate::error::{Error, Result};

/// The capability the alert handler needs from the messaging side:
/// send a message and edit a previously sent one by its opaque
/// handle. Implemented by the Telegram client below; tests use a
/// recording mock instead.
#[async_trait]
pub(crate) trait Notifier: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<MessageId>;
    async fn edit_message(&self, message_id: MessageId, text: &str) -> Result<()>;
}

/// Thin Telegram Bot API client posting to a fixed group chat, with
/// HTML parse mode for all messages.
pub(crate) struct Telegram {
    client: reqwest::Client,
    base_url: Url,
    chat_id: i64,
}

impl Telegram {
    pub(crate) fn new(token: &str, chat_id: i64) -> Result<Self> {
        let base_url = Url::parse(&format!("https://api.telegram.org/bot{token}/"))
            .map_err(Error::TelegramUrl)?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(Error::BuildTelegramClient)?;
        Ok(Self {
            client,
            base_url,
            chat_id,
        })
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.base_url.join(method).map_err(Error::TelegramUrl)?)
            .json(body)
            .send()
            .await
            .map_err(Error::TelegramRequest)?
            .json::<ApiResponse<T>>()
            .await
            .map_err(Error::TelegramDecode)?;
        match response {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(Error::TelegramApi(
                description.unwrap_or_else(|| String::from("unknown error")),
            )),
        }
    }
}

#[async_trait]
impl Notifier for Telegram {
    async fn send_message(&self, text: &str) -> Result<MessageId> {
        let message = self
            .call::<Message>(
                "sendMessage",
                &json!({
                    "chat_id": self.chat_id,
                    "text": text,
                    "parse_mode": "HTML",
                }),
            )
            .await?;
        Ok(message.message_id)
    }

    async fn edit_message(&self, message_id: MessageId, text: &str) -> Result<()> {
        self.call::<Message>(
            "editMessageText",
            &json!({
                "chat_id": self.chat_id,
                "message_id": message_id,
                "text": text,
                "parse_mode": "HTML",
            }),
        )
        .await?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Deserialize)]
struct Message {
    message_id: MessageId,
}
