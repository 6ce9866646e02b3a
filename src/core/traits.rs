//! Collaborator traits the simulation engine depends on
//!
//! This module defines the contracts toward the external systems the engine
//! talks to: the rate-tier provider, the key-value cache, the document store
//! and the mail transport. Driver code (Redis, Mongo, SMTP, HTTP) lives
//! outside this crate; the engine only ever sees these traits, injected
//! through its constructor.
//!
//! All traits are object-safe, `Send + Sync`, and return a boxed error so
//! implementations can surface their own error types without this crate
//! depending on any driver.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{LoanSimulation, RateTier};

/// Error type surfaced by collaborator implementations
///
/// The engine never inspects these beyond their display form; per-item
/// errors carry the rendered message, not the source error.
pub type AdapterError = Box<dyn std::error::Error + Send + Sync>;

/// Source of the configured rate-tier set
///
/// The tier set is read-only configuration from the engine's point of view.
/// It is fetched once per batch; a fetch failure fails every item of that
/// batch identically.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Return the currently configured tiers, in any order
    async fn tiers(&self) -> Result<Vec<RateTier>, AdapterError>;
}

/// Key-value cache for simulation snapshots
///
/// Payloads are JSON snapshots of [`LoanSimulation`]; the engine treats them
/// as opaque strings. Implementations must be safe for concurrent use by
/// many worker tasks.
#[async_trait]
pub trait SimulationCache: Send + Sync {
    /// Fetch a cached payload
    ///
    /// `Ok(None)` is a miss. Errors are also treated as misses by the
    /// caller, so implementations need not distinguish "absent" from
    /// "unreachable" if they cannot.
    async fn get(&self, key: &str) -> Result<Option<String>, AdapterError>;

    /// Write a payload under a key, expiring after `ttl`
    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<(), AdapterError>;
}

/// Append-only store for computed simulations
#[async_trait]
pub trait SimulationStore: Send + Sync {
    /// Persist one computed simulation
    ///
    /// Called exactly once per cache-miss computation; cache hits are never
    /// re-persisted.
    async fn save(&self, simulation: &LoanSimulation) -> Result<(), AdapterError>;
}

/// Outbound mail transport
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one HTML mail
    ///
    /// # Arguments
    ///
    /// * `subject` - Mail subject line
    /// * `html_body` - Rendered HTML body
    /// * `recipient` - Destination address, the request's email
    async fn send(&self, subject: &str, html_body: &str, recipient: &str)
        -> Result<(), AdapterError>;
}
