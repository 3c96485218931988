/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid redis url: {0}")]
    RedisUrl(redis::RedisError),
    #[error("failed to connect to redis: {0}")]
    RedisConnect(redis::RedisError),
    #[error("redis command failed: {0}")]
    RedisCommand(redis::RedisError),
    #[error("redis operation timed out")]
    RedisTimeout,
}
