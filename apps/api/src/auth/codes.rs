//! Email verification codes — generation, storage, and checking.
//!
//! `AppState` holds an `Arc<dyn CodeStore>`: `MemoryCodeStore` by default,
//! `RedisCodeStore` when `REDIS_URL` is configured.
//!
//! Expiry is checked lazily on read. Nothing sweeps expired entries from memory.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use redis::aio::MultiplexedConnection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

pub const CODE_TTL_MINUTES: i64 = 15;
/// Extra Redis key lifetime past expiry, so late attempts still read "expired".
const REDIS_GRACE_SECS: i64 = 3600;
const REDIS_KEY_PREFIX: &str = "verification:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationEntry {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationEntry {
    /// Fresh random code valid for `CODE_TTL_MINUTES` from `now`.
    pub fn issue(now: DateTime<Utc>) -> Self {
        Self {
            code: generate_code(),
            expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
        }
    }
}

/// Six decimal digits, never a leading zero.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Why a submitted code was rejected. The display text is returned to the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyFailure {
    #[error("No verification code found for this email")]
    NotFound,
    #[error("Verification code has expired")]
    Expired,
    #[error("Invalid verification code")]
    Mismatch,
}

/// Checks in order: presence, expiry, then equality.
pub fn check_code(
    stored: Option<&VerificationEntry>,
    submitted: &str,
    now: DateTime<Utc>,
) -> Result<(), VerifyFailure> {
    let stored = stored.ok_or(VerifyFailure::NotFound)?;
    if stored.expires_at < now {
        return Err(VerifyFailure::Expired);
    }
    if stored.code != submitted {
        return Err(VerifyFailure::Mismatch);
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum CodeStoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Corrupt verification entry: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Stores the entry, replacing any previous code for the email.
    async fn put(&self, email: &str, entry: VerificationEntry) -> Result<(), CodeStoreError>;
    async fn get(&self, email: &str) -> Result<Option<VerificationEntry>, CodeStoreError>;
    async fn remove(&self, email: &str) -> Result<(), CodeStoreError>;
}

/// Process-local store. Lost on restart and not shared between instances.
#[derive(Default)]
pub struct MemoryCodeStore {
    entries: Mutex<HashMap<String, VerificationEntry>>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CodeStore for MemoryCodeStore {
    async fn put(&self, email: &str, entry: VerificationEntry) -> Result<(), CodeStoreError> {
        self.entries.lock().await.insert(email.to_string(), entry);
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<VerificationEntry>, CodeStoreError> {
        Ok(self.entries.lock().await.get(email).cloned())
    }

    async fn remove(&self, email: &str) -> Result<(), CodeStoreError> {
        self.entries.lock().await.remove(email);
        Ok(())
    }
}

/// Redis-backed store, shared by every instance pointing at the same server.
#[derive(Clone)]
pub struct RedisCodeStore {
    conn: MultiplexedConnection,
}

impl RedisCodeStore {
    pub async fn connect(url: &str) -> Result<Self, CodeStoreError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        Ok(Self { conn })
    }

    fn key(email: &str) -> String {
        format!("{REDIS_KEY_PREFIX}{email}")
    }
}

#[async_trait]
impl CodeStore for RedisCodeStore {
    async fn put(&self, email: &str, entry: VerificationEntry) -> Result<(), CodeStoreError> {
        let ttl = redis_ttl_secs(&entry, Utc::now());
        let payload = serde_json::to_string(&entry)?;
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(Self::key(email))
            .arg(payload)
            .arg("EX")
            .arg(ttl)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<VerificationEntry>, CodeStoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(Self::key(email))
            .query_async(&mut conn)
            .await?;
        Ok(raw.map(|s| serde_json::from_str(&s)).transpose()?)
    }

    async fn remove(&self, email: &str) -> Result<(), CodeStoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("DEL")
            .arg(Self::key(email))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}

fn redis_ttl_secs(entry: &VerificationEntry, now: DateTime<Utc>) -> u64 {
    let remaining = (entry.expires_at - now).num_seconds().max(0);
    (remaining + REDIS_GRACE_SECS) as u64
}
