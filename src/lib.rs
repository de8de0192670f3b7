//! Numerically stable online aggregation and conjugate parameter updates.
//!
//! - [`online::Mean`] keeps a running weighted mean that can be fed one sample at a time, in batches, or
//!   merged with means computed elsewhere.
//! - [`prob::ConjugateUpdate`] lets a distribution family summarize samples into a fixed-size sufficient
//!   statistic and fold it into its parameters, with the same result whether data arrives all at once or
//!   in slices.
//!
//! ```
//! use online_stats::online::Mean;
//!
//! let mut left = Mean::from_slice(&[4.0, -3.0, 7.0, 8.0, 10.0]);
//! let right = Mean::from_slice(&[1.0, 2.0, 3.0, 4.0]);
//! left.combine(&right);
//! assert!((left.result() - 4.0).abs() < 1e-14);
//! ```

/// Error types
pub mod error;

/// Online aggregators
pub mod online;

/// Probabilistic models and conjugate updates
pub mod prob;

mod util;

pub use error::StatError;
