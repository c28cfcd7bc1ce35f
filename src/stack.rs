//! Presentation Stack - the ordered, observable list of presented screens.
//!
//! The stack is a single `Signal<Vec<Screen>>`. Every read but `peek_len` is
//! tracked, so an effect that reads the stack re-runs on every
//! push or truncate:
//!
//! ```ignore
//! let stack = PresentationStack::new();
//! let watched = stack.clone();
//! let _stop = effect(move || println!("depth = {}", watched.len()));
//!
//! stack.push(Profile(1)); // depth = 1
//! stack.truncate(0);      // depth = 0
//! ```
//!
//! Mutations only ever append or cut a suffix, so the stack is always a
//! prefix of what was presented before.

use std::fmt;

use spark_signals::{signal, untrack, Signal};

use crate::screen::{DestinationPath, Screen, ScreenValue};

/// Shared handle to a host's presentation stack.
#[derive(Clone)]
pub struct PresentationStack {
    screens: Signal<DestinationPath>,
}

impl Default for PresentationStack {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationStack {
    pub fn new() -> Self {
        Self {
            screens: signal(Vec::new()),
        }
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Append a screen. No capacity bound, no dedup.
    ///
    /// Writes never subscribe the caller, so effects may present freely.
    pub fn push<T: ScreenValue>(&self, item: T) {
        let screen = Screen::new(item);
        tracing::debug!(index = self.peek_len(), screen = ?screen, "push");
        self.screens.update(|screens| screens.push(screen));
    }

    /// Keep only the first `len` screens. No-op when `len >= self.len()`.
    pub fn truncate(&self, len: usize) {
        let current = self.peek_len();
        if len >= current {
            return;
        }
        tracing::debug!(from = current, to = len, "truncate");
        self.screens.update(|screens| screens.truncate(len));
    }

    pub fn clear(&self) {
        self.truncate(0);
    }

    // -------------------------------------------------------------------------
    // Presented flag
    // -------------------------------------------------------------------------

    /// Whether anything is presented (derived: stack non-empty).
    pub fn is_presented(&self) -> bool {
        !self.is_empty()
    }

    /// Write side of the presented flag. `false` dismisses everything;
    /// `true` does nothing since presentation is driven by `push`.
    pub fn set_presented(&self, presented: bool) {
        if !presented {
            self.clear();
        }
    }

    // -------------------------------------------------------------------------
    // Reads (tracked)
    // -------------------------------------------------------------------------

    pub fn screens(&self) -> DestinationPath {
        self.screens.get()
    }

    pub fn len(&self) -> usize {
        self.screens.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Screen> {
        self.screens.get().get(index).cloned()
    }

    pub fn top(&self) -> Option<Screen> {
        self.screens.get().last().cloned()
    }

    /// Untracked length, for guards on the write path.
    pub fn peek_len(&self) -> usize {
        untrack(|| self.screens.get().len())
    }

    /// Read/write accessor handed to chain nodes.
    pub fn binding(&self) -> StackBinding {
        StackBinding { stack: self.clone() }
    }
}

impl fmt::Debug for PresentationStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.screens.get().iter()).finish()
    }
}

// =============================================================================
// Binding
// =============================================================================

/// Narrow view of a stack: observe it and request truncation, nothing else.
#[derive(Clone, Debug)]
pub struct StackBinding {
    stack: PresentationStack,
}

impl StackBinding {
    pub fn screens(&self) -> DestinationPath {
        self.stack.screens()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Screen> {
        self.stack.get(index)
    }

    /// Untracked length (see [`PresentationStack::peek_len`]).
    pub fn peek_len(&self) -> usize {
        self.stack.peek_len()
    }

    pub fn truncate(&self, len: usize) {
        self.stack.truncate(len);
    }
}

// =============================================================================
// Tests
// =============================================================================
