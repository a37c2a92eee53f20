//! Error type used by the crate.

use thiserror::Error;

/// Error enum for engine operations.
#[derive(Debug, Error)]
pub enum PortolanError {
    /// An interval of a graded style has `low >= high`, so it can never match.
    #[error("style interval {index} is empty: [{low}, {high})")]
    EmptyInterval {
        /// Position of the interval in the style configuration.
        index: usize,
        /// Inclusive lower bound of the interval.
        low: f64,
        /// Exclusive upper bound of the interval.
        high: f64,
    },
    /// Intervals of a graded style overlap or are out of order.
    #[error("style intervals are not sorted and disjoint at position {index}")]
    UnorderedIntervals {
        /// Position of the first offending interval.
        index: usize,
    },
    /// A value group of a graded style has no values, so it can never match.
    #[error("style value group {index} matches no values")]
    EmptyGroup {
        /// Position of the group in the style configuration.
        index: usize,
    },
}
