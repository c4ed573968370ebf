//! CSRF nonces bound to a principal and an action

use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Issues and verifies per-(principal, action) tokens
pub trait NonceStore: Send + Sync {
    /// Issue a fresh nonce
    fn issue(&self, principal_id: u64, action: &str) -> Result<String>;

    /// Check a submitted nonce; a nonce stays valid until it expires
    fn verify(&self, principal_id: u64, action: &str, nonce: &str) -> Result<bool>;
}

#[derive(Debug, Clone)]
struct NonceEntry {
    principal_id: u64,
    action: String,
    expires_at: DateTime<Utc>,
}

/// In-memory nonce store
///
/// Uses RwLock for thread-safe access. Expired entries are pruned on issue.
#[derive(Clone)]
pub struct InMemoryNonceStore {
    entries: Arc<RwLock<HashMap<String, NonceEntry>>>,
    ttl: Duration,
}

impl InMemoryNonceStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }
}

impl NonceStore for InMemoryNonceStore {
    fn issue(&self, principal_id: u64, action: &str) -> Result<String> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let now = Utc::now();
        entries.retain(|_, entry| entry.expires_at > now);

        let nonce = Uuid::new_v4().simple().to_string();
        entries.insert(
            nonce.clone(),
            NonceEntry {
                principal_id,
                action: action.to_string(),
                expires_at: now + self.ttl,
            },
        );

        Ok(nonce)
    }

    fn verify(&self, principal_id: u64, action: &str, nonce: &str) -> Result<bool> {
        let entries = self
            .entries
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(entries.get(nonce).is_some_and(|entry| {
            entry.principal_id == principal_id
                && entry.action == action
                && entry.expires_at > Utc::now()
        }))
    }
}
