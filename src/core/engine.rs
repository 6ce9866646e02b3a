//! Concurrent loan simulation engine
//!
//! This module provides the SimulationEngine that fans a batch of simulation
//! requests out over a bounded worker pool and collects exactly one outcome
//! per request.
//!
//! The engine enforces the per-item pipeline:
//! - Request validation (birth date, principal, installments, currency)
//! - Cache-aside lookup keyed on applicant and loan shape
//! - Age-based rate resolution against the tier table
//! - Amortization, then best-effort persistence, caching, and notification
//!
//! Persistence, cache-write, and notification failures are recorded against
//! the item without discarding the computed simulation. Validation, rate
//! resolution, calculation, and timeout failures discard the item.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::core::cache::SnapshotCache;
use crate::core::calculator;
use crate::core::notifier::Notifier;
use crate::core::traits::{Mailer, RateProvider, SimulationCache, SimulationStore};
use crate::core::validator::Validator;
use crate::types::{LoanSimulation, RateTable, SimulationError, SimulationRequest};

/// Tuning knobs for the simulation engine
///
/// `workers` bounds the number of concurrent in-flight simulations,
/// `cache_ttl` bounds snapshot freshness, and `item_timeout` bounds how long
/// a single item may hold a worker.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on concurrent workers per batch
    pub workers: usize,
    /// Lifetime of cached simulation snapshots
    pub cache_ttl: Duration,
    /// Per-item wall-clock budget before the item fails with a timeout
    pub item_timeout: Duration,
    /// Currencies accepted by request validation
    pub allowed_currencies: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            workers: num_cpus::get(),
            cache_ttl: Duration::from_secs(5),
            item_timeout: Duration::from_secs(30),
            allowed_currencies: vec!["BRL".to_string(), "USD".to_string()],
        }
    }
}

impl EngineConfig {
    /// Create a config, falling back to defaults for degenerate values
    ///
    /// A zero worker count, a zero duration, or an empty currency list would
    /// make the engine unusable, so each falls back with a warning. A zero
    /// cache TTL in particular would expire every snapshot on arrival.
    pub fn new(
        workers: usize,
        cache_ttl: Duration,
        item_timeout: Duration,
        allowed_currencies: Vec<String>,
    ) -> Self {
        let defaults = EngineConfig::default();

        let workers = if workers == 0 {
            warn!(
                fallback = defaults.workers,
                "Worker count of zero requested, using available parallelism"
            );
            defaults.workers
        } else {
            workers
        };

        let cache_ttl = if cache_ttl.is_zero() {
            warn!(
                fallback = ?defaults.cache_ttl,
                "Cache TTL of zero requested, using default"
            );
            defaults.cache_ttl
        } else {
            cache_ttl
        };

        let item_timeout = if item_timeout.is_zero() {
            warn!(
                fallback = ?defaults.item_timeout,
                "Item timeout of zero requested, using default"
            );
            defaults.item_timeout
        } else {
            item_timeout
        };

        let allowed_currencies = if allowed_currencies.is_empty() {
            warn!("Empty currency allow-list, using defaults");
            defaults.allowed_currencies
        } else {
            allowed_currencies
        };

        EngineConfig {
            workers,
            cache_ttl,
            item_timeout,
            allowed_currencies,
        }
    }
}

/// Aggregated result of one batch
///
/// Every request contributes to this: a healthy item lands in `simulations`,
/// a failed item in `errors`, and an item whose side effects partially failed
/// lands in both.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Completed simulations, in completion order
    pub simulations: Vec<LoanSimulation>,
    /// Item-level failures, each carrying the applicant email
    pub errors: Vec<SimulationError>,
}

/// Outcome of a single item, sent once per request over the result channel
struct ItemOutcome {
    simulation: Option<LoanSimulation>,
    errors: Vec<SimulationError>,
}

impl ItemOutcome {
    fn success(simulation: LoanSimulation, errors: Vec<SimulationError>) -> Self {
        ItemOutcome {
            simulation: Some(simulation),
            errors,
        }
    }

    fn failure(error: SimulationError) -> Self {
        ItemOutcome {
            simulation: None,
            errors: vec![error],
        }
    }
}

/// Concurrent batch simulation engine
///
/// Holds the collaborators behind trait objects so backends can be swapped
/// without touching the pipeline. Cloning is cheap; clones share the same
/// backends.
#[derive(Clone)]
pub struct SimulationEngine {
    rates: Arc<dyn RateProvider>,
    cache: SnapshotCache,
    store: Arc<dyn SimulationStore>,
    notifier: Notifier,
    validator: Validator,
    config: EngineConfig,
}

impl SimulationEngine {
    /// Create an engine over the given backends
    ///
    /// # Arguments
    ///
    /// * `config` - Worker, TTL, timeout, and currency settings
    /// * `rates` - Source of interest rate tiers, fetched once per batch
    /// * `cache` - Snapshot cache backend
    /// * `store` - Persistence backend for completed simulations
    /// * `mailer` - Delivery backend for result notifications
    pub fn new(
        config: EngineConfig,
        rates: Arc<dyn RateProvider>,
        cache: Arc<dyn SimulationCache>,
        store: Arc<dyn SimulationStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let validator = Validator::new(config.allowed_currencies.clone());
        let cache = SnapshotCache::new(cache, config.cache_ttl);
        SimulationEngine {
            rates,
            cache,
            store,
            notifier: Notifier::new(mailer),
            validator,
            config,
        }
    }

    /// Process a batch of simulation requests
    ///
    /// Fans the requests out over at most `config.workers` workers and
    /// collects one outcome per request, so the batch always accounts for
    /// every item regardless of individual failures. Request order is not
    /// preserved in the output.
    ///
    /// # Arguments
    ///
    /// * `requests` - The batch to simulate; an empty batch yields an empty
    ///   outcome without touching any backend
    ///
    /// # Returns
    ///
    /// A [`BatchOutcome`] whose `simulations` and `errors` together cover
    /// every request in the batch
    pub async fn process(&self, requests: Vec<SimulationRequest>) -> BatchOutcome {
        if requests.is_empty() {
            return BatchOutcome::default();
        }

        let total = requests.len();
        info!(total, "Processing simulation batch");

        // One tier fetch covers the whole batch. If it fails there is nothing
        // any item could do, so every item fails with the same cause.
        let table = match self.load_rate_table().await {
            Ok(table) => Arc::new(table),
            Err(cause) => {
                error!(%cause, "Rate tiers unavailable, failing batch");
                let errors = requests
                    .iter()
                    .map(|request| SimulationError::tiers_unavailable(&request.email, &cause))
                    .collect();
                return BatchOutcome {
                    simulations: Vec::new(),
                    errors,
                };
            }
        };

        let worker_count = self.config.workers.min(total).max(1);
        let queue: Arc<Mutex<VecDeque<SimulationRequest>>> =
            Arc::new(Mutex::new(requests.into_iter().collect()));
        let (outcome_tx, mut outcome_rx) = mpsc::channel::<ItemOutcome>(total);

        let mut workers = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let engine = self.clone();
            let table = Arc::clone(&table);
            let queue = Arc::clone(&queue);
            let outcome_tx = outcome_tx.clone();

            workers.push(tokio::spawn(async move {
                loop {
                    // The guard is dropped before the item is simulated, so
                    // workers only contend on the pop itself.
                    let request = queue.lock().await.pop_front();
                    let Some(request) = request else {
                        break;
                    };

                    let outcome = engine.simulate_item(request, &table).await;
                    if outcome_tx.send(outcome).await.is_err() {
                        break;
                    }
                }
            }));
        }
        drop(outcome_tx);

        let mut outcome = BatchOutcome::default();
        let mut received = 0;
        while received < total {
            match outcome_rx.recv().await {
                Some(item) => {
                    received += 1;
                    if let Some(simulation) = item.simulation {
                        outcome.simulations.push(simulation);
                    }
                    outcome.errors.extend(item.errors);
                }
                None => {
                    // All senders gone before the count was reached, which
                    // only happens if a worker died without sending.
                    error!(received, total, "Outcome channel closed early");
                    break;
                }
            }
        }

        for worker in join_all(workers).await {
            if let Err(join_error) = worker {
                error!(%join_error, "Simulation worker panicked");
            }
        }

        debug!(
            simulations = outcome.simulations.len(),
            errors = outcome.errors.len(),
            "Simulation batch complete"
        );
        outcome
    }

    /// Fetch the tiers and build the validated rate table
    async fn load_rate_table(&self) -> Result<RateTable, String> {
        let tiers = self
            .rates
            .tiers()
            .await
            .map_err(|error| error.to_string())?;
        RateTable::new(tiers).map_err(|error| error.to_string())
    }

    /// Run one item under the configured timeout
    async fn simulate_item(&self, request: SimulationRequest, table: &RateTable) -> ItemOutcome {
        let email = request.email.clone();
        let limit = self.config.item_timeout;

        match timeout(limit, self.run_pipeline(request, table)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(email = %email, ?limit, "Simulation timed out");
                ItemOutcome::failure(SimulationError::timeout(&email, limit))
            }
        }
    }

    /// The per-item pipeline: validate, cache, resolve rate, calculate,
    /// then persist, cache, and notify best-effort
    async fn run_pipeline(&self, request: SimulationRequest, table: &RateTable) -> ItemOutcome {
        let violations = self.validator.validate(&request);
        if !violations.is_empty() {
            return ItemOutcome::failure(SimulationError::validation(&request.email, violations));
        }

        let key = SnapshotCache::key(&request);
        if let Some(snapshot) = self.cache.lookup(&key).await {
            debug!(email = %request.email, "Serving simulation from cache");
            let mut errors = Vec::new();
            if let Err(cause) = self.notifier.notify(&snapshot).await {
                warn!(email = %request.email, %cause, "Notification failed");
                errors.push(SimulationError::notification(
                    &request.email,
                    &cause.to_string(),
                ));
            }
            return ItemOutcome {
                simulation: Some(snapshot),
                errors,
            };
        }

        // Validation guarantees a birth date, but the pipeline still refuses
        // to proceed without one rather than panic.
        let age = match request.age_on(Utc::now().date_naive()) {
            Some(age) => age,
            None => {
                return ItemOutcome::failure(SimulationError::validation(
                    &request.email,
                    vec!["birth date is required".to_string()],
                ));
            }
        };

        let rate = match table.rate_for_age(age) {
            Some(rate) => rate,
            None => {
                return ItemOutcome::failure(SimulationError::rate_not_found(&request.email, age))
            }
        };

        let simulation = match calculator::build_simulation(&request, rate, Utc::now()) {
            Ok(simulation) => simulation,
            Err(error) => return ItemOutcome::failure(error),
        };

        let mut errors = Vec::new();

        if let Err(cause) = self.store.save(&simulation).await {
            warn!(email = %request.email, %cause, "Persistence failed");
            errors.push(SimulationError::persistence(
                &request.email,
                &cause.to_string(),
            ));
        }

        if let Err(cause) = self.cache.store(&key, &simulation).await {
            warn!(email = %request.email, %cause, "Cache write failed");
            errors.push(SimulationError::cache_write(
                &request.email,
                &cause.to_string(),
            ));
        }

        if let Err(cause) = self.notifier.notify(&simulation).await {
            warn!(email = %request.email, %cause, "Notification failed");
            errors.push(SimulationError::notification(
                &request.email,
                &cause.to_string(),
            ));
        }

        ItemOutcome::success(simulation, errors)
    }
}
