//! The error taxonomy shared by every fallible operation in this crate.
//!
//! Predicates (`is_acyclic`, `is_reachable`, ...) are total on all valid
//! inputs and never return an error for structural reasons; only index and
//! shape violations raise one of these.

use core::fmt::{self, Display, Formatter};

use error_stack::Context;

/// Result alias used throughout the crate.
pub type Result<T> = error_stack::Result<T, Error>;

/// The error taxonomy described in spec section 7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A numeric index fell outside the valid range for the operation
    /// (node, label, SCC index, union-find entry, view window).
    OutOfBounds { index: u64, bound: u64 },
    /// An argument is well-typed but violates a precondition.
    InvalidArgument { message: &'static str },
    /// Two arguments expected to share a dimension did not.
    Mismatch { expected: u64, found: u64 },
    /// An inverse presentation failed validation.
    InvalidPresentation { message: &'static str },
    /// An operation that requires an acyclic input was given a cyclic one.
    NotAcyclic,
    /// A lookup in a lazily constructed structure found nothing.
    NotFound,
    /// An operation required a lazy structure to be finalised first.
    InvalidState { message: &'static str },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { index, bound } => {
                write!(f, "index {index} out of bounds, expected < {bound}")
            }
            Self::InvalidArgument { message } => write!(f, "invalid argument: {message}"),
            Self::Mismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Self::InvalidPresentation { message } => {
                write!(f, "invalid presentation: {message}")
            }
            Self::NotAcyclic => write!(f, "operation requires an acyclic graph"),
            Self::NotFound => write!(f, "not found"),
            Self::InvalidState { message } => write!(f, "invalid state: {message}"),
        }
    }
}

impl Context for Error {}

pub(crate) fn out_of_bounds(index: impl Into<u64>, bound: impl Into<u64>) -> Error {
    Error::OutOfBounds {
        index: index.into(),
        bound: bound.into(),
    }
}

pub(crate) fn mismatch(expected: impl Into<u64>, found: impl Into<u64>) -> Error {
    Error::Mismatch {
        expected: expected.into(),
        found: found.into(),
    }
}
