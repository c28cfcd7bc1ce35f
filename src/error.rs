//! Presentation errors.
//!
//! None of these cross the public rendering path as panics: `resolve` turns an
//! unresolved destination into a placeholder view, and `present` without a host
//! is logged and reported here.

use crate::destination::LocalDestinationId;

/// Errors surfaced by the fallible entry points (`try_resolve`, `present`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresentationError {
    /// No resolver matched the value's type or any declared supertype.
    #[error("no destination registered for type {type_name}")]
    UnresolvedDestination { type_name: &'static str },

    /// A local identifier was presented but its builder is not registered.
    #[error("no local destination registered for id {id}")]
    UnresolvedLocalDestination { id: LocalDestinationId },

    /// `present` was called with no host attached on this thread.
    #[error("no presentation host is attached on this thread")]
    NoActiveHost,
}

pub type Result<T> = std::result::Result<T, PresentationError>;
