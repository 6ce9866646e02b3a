//! Cache-aside layer for finished simulations
//!
//! Simulations are cached as JSON snapshots under a deterministic key derived
//! from the request, so a repeated request inside the TTL window returns the
//! stored simulation (original timestamp included) without recomputation.
//!
//! Reads are strictly best-effort: a backend failure or an unreadable payload
//! is logged and treated as a miss, never surfaced to the caller. Writes
//! return their error so the engine can record the failure against the item.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::core::traits::{AdapterError, SimulationCache};
use crate::types::{LoanSimulation, SimulationRequest};

/// Cache-aside wrapper around a [`SimulationCache`] backend
///
/// Owns the snapshot TTL and the JSON encoding of cached simulations. The
/// engine never talks to the backend directly.
#[derive(Clone)]
pub struct SnapshotCache {
    cache: Arc<dyn SimulationCache>,
    ttl: Duration,
}

impl SnapshotCache {
    /// Create a snapshot cache over a backend with a fixed TTL
    pub fn new(cache: Arc<dyn SimulationCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Derive the deterministic cache key for a request
    ///
    /// The key covers the fields that determine the schedule: applicant
    /// email, principal, and installment count. The principal is normalized
    /// so `100.50` and `100.5` map to the same entry.
    pub fn key(request: &SimulationRequest) -> String {
        format!(
            "loan-simulation:{}:{}:{}",
            request.email,
            request.loan_amount.normalize(),
            request.installments
        )
    }

    /// Look up a cached simulation, treating every failure as a miss
    pub async fn lookup(&self, key: &str) -> Option<LoanSimulation> {
        match self.cache.get(key).await {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(simulation) => Some(simulation),
                Err(error) => {
                    warn!(key = %key, error = %error, "Discarding unreadable cache snapshot");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                warn!(key = %key, error = %error, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Store a simulation snapshot under the given key with the configured TTL
    pub async fn store(&self, key: &str, simulation: &LoanSimulation) -> Result<(), AdapterError> {
        let payload = serde_json::to_string(simulation)?;
        self.cache.set(key, &payload, self.ttl).await
    }
}
