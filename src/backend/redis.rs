//! Redis Backend Module
//!
//! Maps the backend primitives onto Redis commands over a managed async connection.

use std::collections::HashMap;
use std::time::Duration;

use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, Client};
use async_trait::async_trait;
use tracing::info;

use crate::backend::entry::duration_ms;
use crate::backend::Backend;
use crate::error::Result;

/// Redis rejects expiries whose absolute deadline overflows a signed 64-bit
/// millisecond clock, so relative TTLs are capped well below that.
const MAX_EXPIRE_MS: u64 = i64::MAX as u64 / 2;

/// PSETEX argument for `ttl`: at least 1 ms, at most `MAX_EXPIRE_MS`.
fn expire_ms(ttl: Duration) -> u64 {
    duration_ms(ttl).clamp(1, MAX_EXPIRE_MS)
}

// == Redis Backend ==
/// Redis-backed primitives.
///
/// `ConnectionManager` reconnects on its own; each call works on a cheap
/// clone of it. Dropping the backend closes the connection.
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
}

impl RedisBackend {
    /// Opens a managed connection to `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("Connected to redis at {}", url);
        Ok(Self { conn })
    }
}

#[async_trait]
impl Backend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn string_set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();
        match ttl {
            Some(ttl) => {
                conn.pset_ex::<_, _, ()>(key, value, expire_ms(ttl)).await?;
            }
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    async fn string_get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn key_delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn hash_set(&self, bucket: &str, field: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.hset::<_, _, _, ()>(bucket, field, value).await?;
        Ok(())
    }

    async fn hash_get(&self, bucket: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.hget(bucket, field).await?;
        Ok(value)
    }

    async fn hash_delete(&self, bucket: &str, field: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.hdel(bucket, field).await?;
        Ok(removed > 0)
    }

    async fn hash_keys(&self, bucket: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn.hkeys(bucket).await?;
        Ok(keys)
    }

    async fn hash_get_all(&self, bucket: &str) -> Result<Vec<(String, String)>> {
        let mut conn = self.conn.clone();
        let all: HashMap<String, String> = conn.hgetall(bucket).await?;
        Ok(all.into_iter().collect())
    }

    async fn hash_length(&self, bucket: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        let length: u64 = conn.hlen(bucket).await?;
        Ok(length)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = ::redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
