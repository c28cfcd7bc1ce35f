//! Local destination identifiers.
//!
//! A local identifier keys a one-off builder that is not tied to any data
//! type. Presenting the identifier itself (it is a valid screen value) shows
//! that builder. Local keys live in their own namespace and never take part
//! in supertype fallback.

use std::fmt;

use uuid::Uuid;

/// Process-unique token for a local destination builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalDestinationId(Uuid);

impl LocalDestinationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LocalDestinationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocalDestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = LocalDestinationId::new();
        let b = LocalDestinationId::new();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_display_is_uuid() {
        let id = LocalDestinationId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
        assert_eq!(id.to_string().len(), 36);
    }
}
