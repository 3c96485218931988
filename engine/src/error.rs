/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::path::PathBuf;

use actix_web::{http::StatusCode, ResponseError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read config file {0}: {1}")]
    ReadConfig(PathBuf, std::io::Error),
    #[error("failed to parse config file {0}: {1}")]
    DecodeConfig(PathBuf, serde_yaml::Error),
    #[error("telegram bot token is required (flag, env var or config file)")]
    MissingBotToken,
    #[error("telegram chat id is required (flag, env var or config file)")]
    MissingChatId,
    #[error("telegram chat id must be a valid integer: {0}")]
    InvalidChatId(std::num::ParseIntError),
    #[error("redis db must be a valid integer: {0}")]
    InvalidRedisDb(std::num::ParseIntError),
    #[error("invalid telegram api url: {0}")]
    TelegramUrl(url::ParseError),
    #[error("failed to build telegram client: {0}")]
    BuildTelegramClient(reqwest::Error),
    #[error("telegram request failed: {0}")]
    TelegramRequest(reqwest::Error),
    #[error("failed to decode telegram response: {0}")]
    TelegramDecode(reqwest::Error),
    #[error("telegram api error: {0}")]
    TelegramApi(String),
    #[error("event_id is required")]
    MissingEventId,
    #[error("unauthorized")]
    Unauthorized,
    #[error("failed to bind socket: {0}")]
    Bind(std::io::Error),
    #[error("server error: {0}")]
    Server(std::io::Error),
    #[error(transparent)]
    Lib(#[from] alert_relay::Error),
}

impl Error {
    pub(crate) fn http_status_code(&self) -> StatusCode {
        match self {
            Error::MissingEventId => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.http_status_code()
    }
}
