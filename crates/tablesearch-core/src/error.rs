use std::fmt;
use thiserror::Error as ThisError;

///
/// SearchError
///
/// Failures raised by search structures.
/// A miss is never an error; lookups without a match return an empty structure.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SearchError {
    #[error("required argument '{argument}' was null")]
    NullArgument { argument: &'static str },

    #[error("unique lookup matched {count} results")]
    NonUniqueResult { count: usize },
}

impl SearchError {
    #[must_use]
    pub const fn null_argument(argument: &'static str) -> Self {
        Self::NullArgument { argument }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NullArgument { .. } => ErrorClass::InvalidArgument,
            Self::NonUniqueResult { .. } => ErrorClass::Conflict,
        }
    }

    #[must_use]
    pub const fn is_null_argument(&self) -> bool {
        matches!(self, Self::NullArgument { .. })
    }

    #[must_use]
    pub const fn is_non_unique(&self) -> bool {
        matches!(self, Self::NonUniqueResult { .. })
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidArgument,
    Conflict,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
