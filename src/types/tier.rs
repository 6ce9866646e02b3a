//! Rate tier types for the Rust Loan Engine
//!
//! This module defines the age-bracket interest tiers delivered by the
//! external rate provider, and the validated `RateTable` the engine resolves
//! ages against.
//!
//! # Design
//!
//! Tier sets are configuration: a malformed set is a deployment problem, not
//! a per-request condition. `RateTable::new` therefore rejects empty sets,
//! inverted bounds and overlapping ranges up front, which makes runtime
//! resolution unambiguous - at most one tier can cover any age. Gaps are
//! allowed at construction time and surface as per-item "rate not found"
//! errors during resolution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configured age bracket mapped to an annual interest rate
///
/// Both age bounds are inclusive: a tier `18..=25` covers ages 18 and 25.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTier {
    /// Human-readable tier name, used in configuration error messages
    pub name: String,

    /// Annual interest rate as a percentage (e.g. `3` for 3% per year)
    pub interest_rate: Decimal,

    /// Minimum covered age, inclusive
    pub min_age: i32,

    /// Maximum covered age, inclusive
    pub max_age: i32,
}

impl RateTier {
    /// Create a new RateTier
    pub fn new(name: &str, interest_rate: Decimal, min_age: i32, max_age: i32) -> Self {
        Self {
            name: name.to_string(),
            interest_rate,
            min_age,
            max_age,
        }
    }

    /// Whether this tier covers the given age
    pub fn covers(&self, age: i32) -> bool {
        age >= self.min_age && age <= self.max_age
    }
}

/// Error raised when a tier set fails construction-time validation
///
/// A failing tier set fails every item of the batch that needed it, so these
/// messages name the offending tiers rather than any request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TierSetError {
    /// The provider returned no tiers at all
    #[error("Rate tier set is empty")]
    Empty,

    /// A tier's minimum age exceeds its maximum age
    #[error("Rate tier '{name}' has inverted age bounds: min {min_age}, max {max_age}")]
    InvertedBounds {
        /// Name of the offending tier
        name: String,
        /// The configured minimum age
        min_age: i32,
        /// The configured maximum age
        max_age: i32,
    },

    /// Two tiers cover at least one common age
    #[error("Rate tiers '{first}' and '{second}' have overlapping age ranges")]
    Overlap {
        /// Name of the lower tier involved in the overlap
        first: String,
        /// Name of the higher tier involved in the overlap
        second: String,
    },
}

/// A validated, read-only set of rate tiers
///
/// Shared by every worker of a batch run; lookups never mutate the table.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    tiers: Vec<RateTier>,
}

impl RateTable {
    /// Validate a tier set and build a resolution table from it
    ///
    /// # Arguments
    ///
    /// * `tiers` - The tier set as delivered by the rate provider, in any order
    ///
    /// # Returns
    ///
    /// * `Ok(RateTable)` if the set is non-empty, every tier has
    ///   `min_age <= max_age`, and no two tiers overlap
    /// * `Err(TierSetError)` naming the first violation found
    pub fn new(tiers: Vec<RateTier>) -> Result<Self, TierSetError> {
        if tiers.is_empty() {
            return Err(TierSetError::Empty);
        }

        for tier in &tiers {
            if tier.min_age > tier.max_age {
                return Err(TierSetError::InvertedBounds {
                    name: tier.name.clone(),
                    min_age: tier.min_age,
                    max_age: tier.max_age,
                });
            }
        }

        // Overlap check on a sorted view; the table keeps provider order.
        let mut ordered: Vec<&RateTier> = tiers.iter().collect();
        ordered.sort_by_key(|tier| (tier.min_age, tier.max_age));
        for pair in ordered.windows(2) {
            if pair[1].min_age <= pair[0].max_age {
                return Err(TierSetError::Overlap {
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                });
            }
        }

        Ok(Self { tiers })
    }

    /// Resolve the annual interest rate for an age
    ///
    /// # Returns
    ///
    /// * `Some(rate)` from the unique tier covering the age
    /// * `None` if no tier covers it (including negative ages derived from
    ///   future birth dates)
    pub fn rate_for_age(&self, age: i32) -> Option<Decimal> {
        self.tiers
            .iter()
            .find(|tier| tier.covers(age))
            .map(|tier| tier.interest_rate)
    }

    /// The validated tiers, in provider order
    pub fn tiers(&self) -> &[RateTier] {
        &self.tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn standard_tiers() -> Vec<RateTier> {
        vec![
            RateTier::new("tier1", Decimal::new(5, 0), 18, 25),
            RateTier::new("tier2", Decimal::new(3, 0), 26, 40),
            RateTier::new("tier3", Decimal::new(2, 0), 41, 60),
            RateTier::new("tier4", Decimal::new(4, 0), 61, 100),
        ]
    }

    #[test]
    fn test_new_accepts_adjacent_tiers() {
        let table = RateTable::new(standard_tiers());

        assert!(table.is_ok());
    }

    #[test]
    fn test_new_accepts_unordered_input() {
        let mut tiers = standard_tiers();
        tiers.reverse();

        let table = RateTable::new(tiers).unwrap();

        assert_eq!(table.rate_for_age(30), Some(Decimal::new(3, 0)));
    }

    #[test]
    fn test_new_rejects_empty_set() {
        assert_eq!(RateTable::new(vec![]), Err(TierSetError::Empty));
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        let tiers = vec![RateTier::new("broken", Decimal::new(5, 0), 40, 18)];

        assert_eq!(
            RateTable::new(tiers),
            Err(TierSetError::InvertedBounds {
                name: "broken".to_string(),
                min_age: 40,
                max_age: 18,
            })
        );
    }

    #[rstest]
    #[case::partial_overlap(18, 30, 25, 40)]
    #[case::shared_boundary_age(18, 25, 25, 40)]
    #[case::nested_range(18, 60, 26, 40)]
    #[case::identical_range(18, 25, 18, 25)]
    fn test_new_rejects_overlapping_tiers(
        #[case] first_min: i32,
        #[case] first_max: i32,
        #[case] second_min: i32,
        #[case] second_max: i32,
    ) {
        let tiers = vec![
            RateTier::new("first", Decimal::new(5, 0), first_min, first_max),
            RateTier::new("second", Decimal::new(3, 0), second_min, second_max),
        ];

        assert!(matches!(
            RateTable::new(tiers),
            Err(TierSetError::Overlap { .. })
        ));
    }

    #[rstest]
    #[case::lower_bound_inclusive(18, Some(Decimal::new(5, 0)))]
    #[case::upper_bound_inclusive(25, Some(Decimal::new(5, 0)))]
    #[case::first_age_of_next_tier(26, Some(Decimal::new(3, 0)))]
    #[case::middle_of_a_tier(50, Some(Decimal::new(2, 0)))]
    #[case::top_of_last_tier(100, Some(Decimal::new(4, 0)))]
    #[case::below_all_tiers(17, None)]
    #[case::above_all_tiers(101, None)]
    #[case::negative_age(-6, None)]
    fn test_rate_for_age(#[case] age: i32, #[case] expected: Option<Decimal>) {
        let table = RateTable::new(standard_tiers()).unwrap();

        assert_eq!(table.rate_for_age(age), expected);
    }

    #[test]
    fn test_rate_for_age_in_a_gap_is_none() {
        let tiers = vec![
            RateTier::new("young", Decimal::new(5, 0), 18, 25),
            RateTier::new("senior", Decimal::new(4, 0), 61, 100),
        ];
        let table = RateTable::new(tiers).unwrap();

        assert_eq!(table.rate_for_age(40), None);
    }

    #[test]
    fn test_tiers_keeps_provider_order() {
        let mut tiers = standard_tiers();
        tiers.reverse();

        let table = RateTable::new(tiers.clone()).unwrap();

        assert_eq!(table.tiers(), tiers.as_slice());
    }
}
