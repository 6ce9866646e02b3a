//! Loan Simulation Engine Library
//! # Overview
//!
//! This library provides a concurrent batch engine for fixed-installment loan
//! simulations with cache-aside snapshots and best-effort side effects
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (SimulationRequest, LoanSimulation, RateTier, etc.)
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Concurrent batch orchestration over a bounded worker pool
//!   - [`core::validator`] - Request validation rules
//!   - [`core::calculator`] - French (constant-payment) amortization in decimal arithmetic
//!   - [`core::cache`] - Cache-aside snapshot layer with TTL
//!   - [`core::notifier`] - Result email rendering and delivery
//! - [`memory`] - In-memory backends for embedded use and tests
//!
//! # Simulation Pipeline
//!
//! Each request in a batch passes through the same stages:
//!
//! - **Validate**: birth date, principal, installment count, and currency
//! - **Cache lookup**: a fresh snapshot short-circuits recomputation
//! - **Rate resolution**: applicant age mapped to an interest tier
//! - **Amortization**: installment, total, and fee amounts in fixed-point decimal
//! - **Side effects**: persistence, snapshot caching, and email notification,
//!   each best-effort and recorded against the item on failure
//!
//! # Batch Outcomes
//!
//! A batch of N requests always accounts for all N items:
//! - A healthy item contributes one simulation
//! - A failed item contributes at least one error carrying the applicant email
//! - An item whose side effects partially failed contributes both

// Module declarations
pub mod core;
pub mod memory;
pub mod types;

pub use core::{
    AdapterError, BatchOutcome, EngineConfig, Mailer, Notifier, RateProvider, SimulationCache,
    SimulationEngine, SimulationStore, SnapshotCache, Validator,
};
pub use memory::{MemoryCache, MemoryMailer, MemoryStore, SentMail, StaticRateProvider};
pub use types::{
    Installment, LoanSimulation, RateTable, RateTier, SimulationError, SimulationRequest,
    TierSetError,
};
