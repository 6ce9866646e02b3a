//! In-memory backend implementations
//!
//! Thread-safe, dependency-free implementations of the engine ports, backed
//! by [`DashMap`]. They serve as the default wiring for embedded use and as
//! observable doubles in tests: each one exposes inspection methods that
//! report what passed through it.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::core::traits::{AdapterError, Mailer, RateProvider, SimulationCache, SimulationStore};
use crate::types::{LoanSimulation, RateTier};

/// A cached payload with its expiry deadline
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory TTL cache
///
/// Entries expire lazily: a read that finds a stale entry evicts it and
/// reports a miss.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        MemoryCache::default()
    }

    /// Number of entries currently held, expired or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SimulationCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, AdapterError> {
        // Clone out of the guard before touching the map again; removing
        // while a reference into the same shard is alive would deadlock.
        let entry = self
            .entries
            .get(key)
            .map(|entry| (entry.payload.clone(), entry.is_expired()));

        match entry {
            Some((payload, false)) => Ok(Some(payload)),
            Some((_, true)) => {
                self.entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<(), AdapterError> {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                payload: payload.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}

/// In-memory simulation store, grouped by applicant email
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: DashMap<String, Vec<LoanSimulation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Total number of simulations saved across all applicants
    pub fn save_count(&self) -> usize {
        self.saved.iter().map(|entry| entry.value().len()).sum()
    }

    /// Simulations saved for one applicant, in save order
    pub fn saved_for(&self, email: &str) -> Vec<LoanSimulation> {
        self.saved
            .get(email)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SimulationStore for MemoryStore {
    async fn save(&self, simulation: &LoanSimulation) -> Result<(), AdapterError> {
        self.saved
            .entry(simulation.email.clone())
            .or_default()
            .push(simulation.clone());
        Ok(())
    }
}

/// A message captured by [`MemoryMailer`]
#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub subject: String,
    pub html_body: String,
    pub recipient: String,
}

/// In-memory mailer that records every message instead of delivering it
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: DashMap<String, Vec<SentMail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        MemoryMailer::default()
    }

    /// Total number of messages sent across all recipients
    pub fn sent_count(&self) -> usize {
        self.sent.iter().map(|entry| entry.value().len()).sum()
    }

    /// Messages sent to one recipient, in send order
    pub fn sent_to(&self, recipient: &str) -> Vec<SentMail> {
        self.sent
            .get(recipient)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(
        &self,
        subject: &str,
        html_body: &str,
        recipient: &str,
    ) -> Result<(), AdapterError> {
        self.sent
            .entry(recipient.to_string())
            .or_default()
            .push(SentMail {
                subject: subject.to_string(),
                html_body: html_body.to_string(),
                recipient: recipient.to_string(),
            });
        Ok(())
    }
}

/// Rate provider backed by a fixed tier list
#[derive(Debug, Clone)]
pub struct StaticRateProvider {
    tiers: Vec<RateTier>,
}

impl StaticRateProvider {
    pub fn new(tiers: Vec<RateTier>) -> Self {
        StaticRateProvider { tiers }
    }

    /// The standard four-tier schedule: 5% for 18-25, 3% for 26-40,
    /// 2% for 41-60, and 4% for 61-100
    pub fn with_default_tiers() -> Self {
        StaticRateProvider::new(vec![
            RateTier::new("tier1", Decimal::new(5, 0), 18, 25),
            RateTier::new("tier2", Decimal::new(3, 0), 26, 40),
            RateTier::new("tier3", Decimal::new(2, 0), 41, 60),
            RateTier::new("tier4", Decimal::new(4, 0), 61, 100),
        ])
    }
}

impl Default for StaticRateProvider {
    fn default() -> Self {
        StaticRateProvider::with_default_tiers()
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    async fn tiers(&self) -> Result<Vec<RateTier>, AdapterError> {
        Ok(self.tiers.clone())
    }
}
