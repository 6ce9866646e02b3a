//! Core business logic module
//!
//! This module contains the simulation pipeline components:
//! - `traits` - Port abstractions for interchangeable backends
//! - `engine` - Concurrent batch orchestration
//! - `validator` - Request validation rules
//! - `calculator` - Fixed-installment amortization math
//! - `cache` - Cache-aside snapshot layer
//! - `notifier` - Result email rendering and delivery

pub mod cache;
pub mod calculator;
pub mod engine;
pub mod notifier;
pub mod traits;
pub mod validator;

pub use cache::SnapshotCache;
pub use engine::{BatchOutcome, EngineConfig, SimulationEngine};
pub use notifier::Notifier;
pub use traits::{AdapterError, Mailer, RateProvider, SimulationCache, SimulationStore};
pub use validator::Validator;
