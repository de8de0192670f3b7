use thiserror::Error;

/// Errors returned by aggregation and conjugate update operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatError {
    /// A slice argument does not have the length the operation requires
    #[error("invalid argument: `{name}` has length {found}, expected {expected}")]
    InvalidArgument {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    /// The result was queried on an aggregator with zero total weight
    #[error("undefined result: total weight is zero")]
    UndefinedResult,
}

/// Fails with [`StatError::InvalidArgument`] unless `found == expected`
pub(crate) fn check_len(
    name: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), StatError> {
    (expected == found)
        .then_some(())
        .ok_or(StatError::InvalidArgument {
            name,
            expected,
            found,
        })
}
