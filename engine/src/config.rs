/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

//! Runtime configuration: command-line flags and environment
//! variables (via clap) overlaid on an optional YAML config file.
//! Flags and env vars always take precedence over file values.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::Args;

pub(crate) struct Config {
    pub(crate) telegram_token: String,
    pub(crate) telegram_chat_id: i64,
    pub(crate) bind: String,
    pub(crate) prefix: String,
    /// Shared secret for incoming requests; `None` disables the check.
    pub(crate) secret: Option<String>,
    pub(crate) redis: Option<RedisConfig>,
    pub(crate) app_version: String,
}

pub(crate) struct RedisConfig {
    pub(crate) addr: String,
    pub(crate) password: Option<String>,
    pub(crate) db: i64,
}

impl RedisConfig {
    pub(crate) fn url(&self) -> String {
        match &self.password {
            Some(password) => format!("redis://:{password}@{}/{}", self.addr, self.db),
            None => format!("redis://{}/{}", self.addr, self.db),
        }
    }
}

/// Structure of the optional YAML config file. All values are
/// strings to keep the file format uniform; numeric fields are
/// parsed during resolution.
#[derive(Deserialize, Default)]
pub(crate) struct FileConfig {
    pub(crate) telegram_bot_token: Option<String>,
    pub(crate) telegram_chat_id: Option<String>,
    pub(crate) server_addr: Option<String>,
    pub(crate) server_secret: Option<String>,
    pub(crate) redis_addr: Option<String>,
    pub(crate) redis_password: Option<String>,
    pub(crate) redis_db: Option<String>,
}

impl Config {
    pub(crate) fn resolve(args: Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => load_file(path, true)?,
            None => load_file(Path::new("config.yaml"), false)?,
        };
        Self::resolve_from(args, file)
    }

    fn resolve_from(args: Args, file: FileConfig) -> Result<Self> {
        let telegram_token = args
            .telegram_bot_token
            .or(file.telegram_bot_token)
            .filter(|s| !s.is_empty())
            .ok_or(Error::MissingBotToken)?;

        let telegram_chat_id = match args.telegram_chat_id {
            Some(id) => id,
            None => file
                .telegram_chat_id
                .filter(|s| !s.is_empty())
                .ok_or(Error::MissingChatId)?
                .parse()
                .map_err(Error::InvalidChatId)?,
        };

        let bind = args
            .bind
            .or(file.server_addr)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| String::from("0.0.0.0:8080"));

        let secret = args
            .secret
            .or(file.server_secret)
            .filter(|s| !s.is_empty());

        let redis = args
            .redis_addr
            .or(file.redis_addr)
            .filter(|s| !s.is_empty())
            .map(|addr| {
                Ok::<_, Error>(RedisConfig {
                    addr,
                    password: args
                        .redis_password
                        .or(file.redis_password)
                        .filter(|s| !s.is_empty()),
                    db: match args.redis_db {
                        Some(db) => db,
                        None => file
                            .redis_db
                            .filter(|s| !s.is_empty())
                            .map(|s| s.parse())
                            .transpose()
                            .map_err(Error::InvalidRedisDb)?
                            .unwrap_or(0),
                    },
                })
            })
            .transpose()?;

        let app_version = args
            .app_version
            .unwrap_or_else(|| String::from(env!("CARGO_PKG_VERSION")));

        Ok(Self {
            telegram_token,
            telegram_chat_id,
            bind,
            prefix: args.prefix,
            secret,
            redis,
            app_version,
        })
    }
}

fn load_file(path: &Path, explicit: bool) -> Result<FileConfig> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        // The default file is optional; an explicitly configured one
        // is not.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
            return Ok(FileConfig::default())
        }
        Err(e) => return Err(Error::ReadConfig(path.to_path_buf(), e)),
    };
    serde_yaml::from_slice(&data).map_err(|e| Error::DecodeConfig(path.to_path_buf(), e))
}
