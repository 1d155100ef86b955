use thiserror::Error;

/// Errors returned when configuring engines or fitting models.
///
/// Stepping an engine never fails; everything here is raised at the
/// boundary, before any state is touched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Input dataset is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Matrix or vector shapes do not line up.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected size.
        expected: usize,
        /// Found size.
        found: usize,
    },

    /// Least-squares system has no unique solution (all `x` identical).
    #[error("singular design: x has zero variance")]
    SingularDesign,

    /// Model used before `fit`.
    #[error("model not fitted, call fit() first")]
    NotFitted,
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn invalid(name: &'static str, message: &'static str) -> Error {
    Error::InvalidParameter { name, message }
}
