//! Host configuration.

/// What `resolve` does after logging an unresolved destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedPolicy {
    /// Return the placeholder view. Never panics.
    #[default]
    Placeholder,
    /// Fail a `debug_assert!` in debug builds; placeholder in release builds.
    DebugAssert,
}

/// Settings shared by a host's registry and chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationConfig {
    /// Policy for values no resolver accepts.
    pub unresolved: UnresolvedPolicy,
    /// Text carried by the placeholder view for unresolved destinations.
    pub placeholder_label: String,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            unresolved: UnresolvedPolicy::default(),
            placeholder_label: "\u{26A0}".to_string(),
        }
    }
}

impl PresentationConfig {
    pub fn with_unresolved(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    pub fn with_placeholder_label(mut self, label: impl Into<String>) -> Self {
        self.placeholder_label = label.into();
        self
    }

    /// Strict in debug builds, lenient in release builds.
    pub fn strict() -> Self {
        Self::default().with_unresolved(UnresolvedPolicy::DebugAssert)
    }
}
