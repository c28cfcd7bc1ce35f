//! Fallback views for destinations nothing resolves.

use crate::error::PresentationError;

/// Everything a placeholder view needs to describe what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedDestination {
    /// Name of the value's concrete type.
    pub type_name: &'static str,
    /// Configured indicator text (see `PresentationConfig::placeholder_label`).
    pub label: String,
    pub error: PresentationError,
}

/// A view type the registry can produce.
///
/// Hosts implement this for their own view type so an unregistered
/// destination degrades into a visible indicator instead of a crash.
pub trait DestinationView: Sized {
    fn unresolved(missing: &UnresolvedDestination) -> Self;
}

impl DestinationView for String {
    fn unresolved(missing: &UnresolvedDestination) -> Self {
        format!("{} {}", missing.label, missing.type_name)
    }
}
