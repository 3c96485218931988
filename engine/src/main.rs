/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

mod alerts;
mod app;
mod app_data;
mod config;
mod error;
mod telegram;

use std::{path::PathBuf, sync::Arc};

use actix_web::{
    web::{scope, Data},
    App, HttpServer,
};
use clap::Parser;
use tracing_actix_web::TracingLogger;

use alert_relay::{EventStore, RedisStore};

use config::Config;
use telegram::Telegram;

pub(crate) use app_data::AppData;
pub(crate) use error::{Error, Result};

#[derive(Parser)]
struct Args {
    /// Path to the YAML configuration file. The default file is
    /// silently skipped when absent; an explicitly configured one is
    /// required to exist.
    #[clap(long, env = "CONFIG_FILE")]
    config: Option<PathBuf>,
    /// Bot token from BotFather.
    #[clap(long, env = "TELEGRAM_BOT_TOKEN")]
    telegram_bot_token: Option<String>,
    /// Numeric id of the target group chat.
    #[clap(long, env = "TELEGRAM_CHAT_ID")]
    telegram_chat_id: Option<i64>,
    /// Listen address for the http server (default "0.0.0.0:8080").
    #[clap(long, env = "SERVER_ADDR")]
    bind: Option<String>,
    /// Shared secret that must be present in the body of every
    /// incoming request. No check is done when unset.
    #[clap(long, env = "SERVER_SECRET")]
    secret: Option<String>,
    /// Host:port of the redis server used to persist event
    /// correlations. The in-memory store is used when unset.
    #[clap(long, env = "REDIS_ADDR")]
    redis_addr: Option<String>,
    #[clap(long, env = "REDIS_PASSWORD")]
    redis_password: Option<String>,
    /// Logical redis database index (default 0).
    #[clap(long, env = "REDIS_DB")]
    redis_db: Option<i64>,
    #[clap(long, default_value = "")]
    prefix: String,
    /// App version.
    #[clap(long, env = "APP_VERSION")]
    app_version: Option<String>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let r = run(args).await;

    if let Err(e) = &r {
        log::error!("{e}");
    }

    r
}

async fn run(args: Args) -> Result<()> {
    let config = Config::resolve(args)?;

    log::info!("Creating telegram client");

    let notifier = Telegram::new(&config.telegram_token, config.telegram_chat_id)?;

    let store = match &config.redis {
        Some(redis) => {
            log::info!("Connecting to redis at {}", redis.addr);
            let store = RedisStore::connect(&redis.url()).await?;
            store.ping().await?;
            log::info!("Successfully connected to redis");
            EventStore::Redis(store)
        }
        None => {
            log::info!("Using in-memory correlation store");
            EventStore::in_memory()
        }
    };

    let data = Data::new(AppData {
        notifier: Arc::new(notifier),
        store,
        secret: config.secret,
        app_version: config.app_version,
    });

    log::info!("Starting http server on {}", config.bind);

    let prefix = config.prefix;
    HttpServer::new(move || {
        App::new().wrap(TracingLogger::default()).service(
            scope(&prefix)
                .app_data(data.clone())
                .service(alerts::service())
                .service(app::service()),
        )
    })
    .bind(&config.bind)
    .map_err(Error::Bind)?
    .run()
    .await
    .map_err(Error::Server)?;

    log::info!("Http server stopped");

    Ok(())
}
