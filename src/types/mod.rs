//! Types module
//!
//! Contains core data structures used throughout the engine.
//! This module organizes types into logical submodules:
//! - `request`: Batch input records and age derivation
//! - `simulation`: Computed schedules, the unit of caching and persistence
//! - `tier`: Rate tiers and the validated resolution table
//! - `error`: Per-item error taxonomy for batch processing

pub mod error;
pub mod request;
pub mod simulation;
pub mod tier;

pub use error::SimulationError;
pub use request::SimulationRequest;
pub use simulation::{Installment, LoanSimulation};
pub use tier::{RateTable, RateTier, TierSetError};
