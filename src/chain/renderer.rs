//! Presentation Chain - renders the stack as nested overlays.
//!
//! Layer `i` shows screen `i` and, while the stack is longer than `i + 1`,
//! presents layer `i + 1` on top of itself:
//!
//! ```text
//! root content
//!   └─ sheet 0  (presented while stack.len() > 0)
//!        └─ sheet 1  (presented while stack.len() > 1)
//!             └─ sheet 2 ...
//! ```
//!
//! The chain is a flat arena walked by index, not a recursive tree. An
//! effect keeps the arena in step with the stack; the host runtime reports
//! each layer's lifecycle through `did_appear`/`did_disappear` and forwards
//! user dismissals through `dismiss`/`dismiss_root`.
//!
//! # Dismiss guard
//!
//! Overlay bindings can report "not visible" while a layer is still mounting.
//! A dismissal of layer `i + 1` (requested on node `i`) only truncates once
//! node `i` has appeared.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use spark_signals::effect;

use crate::destination::{DestinationRegistry, DestinationView};
use crate::screen::Screen;
use crate::stack::StackBinding;

use super::node::{prune, reconcile, ChainNode};

// =============================================================================
// Outputs
// =============================================================================

/// Result of a dismiss request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissOutcome {
    /// The stack was cut back to `len` screens.
    Truncated { len: usize },
    /// Nothing above the node to dismiss.
    NothingToTruncate,
    /// The node has not finished appearing; the signal was spurious.
    NotAppeared,
}

/// One rendered overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<V> {
    pub index: usize,
    pub screen: Screen,
    pub view: V,
    /// Whether this layer presents the next one on top of itself.
    pub presenting_next: bool,
    /// Rendered from the node's snapshot while it animates out.
    pub dismissing: bool,
}

impl<V> Layer<V> {
    /// Stable key for keyed rendering.
    pub fn id(&self) -> u64 {
        self.screen.id()
    }
}

// =============================================================================
// Chain
// =============================================================================

/// Arena of chain nodes bound to one stack.
pub struct PresentationChain {
    binding: StackBinding,
    nodes: Rc<RefCell<Vec<ChainNode>>>,
    stop_effect: Option<Box<dyn FnOnce()>>,
}

impl PresentationChain {
    /// Subscribe to `binding` and build the initial arena.
    pub fn new(binding: StackBinding) -> Self {
        let nodes: Rc<RefCell<Vec<ChainNode>>> = Rc::new(RefCell::new(Vec::new()));

        let nodes_effect = nodes.clone();
        let binding_effect = binding.clone();
        let stop = effect(move || {
            let screens = binding_effect.screens();
            reconcile(&mut nodes_effect.borrow_mut(), &screens);
        });

        Self {
            binding,
            nodes,
            stop_effect: Some(Box::new(stop)),
        }
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    /// Root overlay visibility: anything on the stack.
    pub fn is_presented(&self) -> bool {
        !self.binding.is_empty()
    }

    /// Whether node `index` presents node `index + 1`.
    pub fn is_presenting_next(&self, index: usize) -> bool {
        has_above(self.binding.len(), index)
    }

    pub fn node(&self, index: usize) -> Option<ChainNode> {
        self.nodes.borrow().get(index).cloned()
    }

    pub fn nodes(&self) -> Vec<ChainNode> {
        self.nodes.borrow().clone()
    }

    pub fn is_appeared(&self, index: usize) -> bool {
        self.nodes.borrow().get(index).is_some_and(ChainNode::is_appeared)
    }

    // -------------------------------------------------------------------------
    // Lifecycle (reported by the host runtime)
    // -------------------------------------------------------------------------

    pub fn did_appear(&self, index: usize) {
        match self.nodes.borrow_mut().get_mut(index) {
            Some(node) => node.set_appeared(true),
            None => tracing::trace!(index, "appear for unknown node"),
        }
    }

    pub fn did_disappear(&self, index: usize) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(node) = nodes.get_mut(index) {
            node.set_appeared(false);
        }
        prune(&mut nodes);
    }

    // -------------------------------------------------------------------------
    // Dismissal
    // -------------------------------------------------------------------------

    /// The overlay presented by node `index` was dismissed by the user.
    pub fn dismiss(&self, index: usize) -> DismissOutcome {
        let len = self.binding.peek_len();
        if !has_above(len, index) {
            tracing::debug!(index, len, "dismiss ignored: nothing above node");
            return DismissOutcome::NothingToTruncate;
        }

        // Borrow ends here; truncate re-enters the arena effect
        if !self.is_appeared(index) {
            tracing::debug!(index, len, "dismiss ignored: node has not appeared");
            return DismissOutcome::NotAppeared;
        }

        self.binding.truncate(index + 1);
        DismissOutcome::Truncated { len: index + 1 }
    }

    /// The root overlay was dismissed. Clears the whole stack; the root is
    /// always mounted so there is no appear guard.
    pub fn dismiss_root(&self) -> DismissOutcome {
        let len = self.binding.peek_len();
        if len == 0 {
            return DismissOutcome::NothingToTruncate;
        }
        tracing::debug!(len, "dismiss root");
        self.binding.truncate(0);
        DismissOutcome::Truncated { len: 0 }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Render node `index`.
    ///
    /// Uses the stack's current value when in range, the node's snapshot
    /// while it is still mounted past the end, and nothing otherwise.
    pub fn render_node<V>(&self, index: usize, registry: &DestinationRegistry<V>) -> Option<Layer<V>>
    where
        V: DestinationView + 'static,
    {
        let len = self.binding.len();
        let (screen, dismissing) = match self.binding.get(index) {
            Some(screen) => (screen, false),
            None => {
                let snapshot = self
                    .nodes
                    .borrow()
                    .get(index)
                    .filter(|node| node.is_dismissing())
                    .map(|node| node.screen().clone());
                match snapshot {
                    Some(screen) => (screen, true),
                    None => {
                        tracing::trace!(index, len, "render out of range");
                        return None;
                    }
                }
            }
        };

        let view = registry.resolve(&screen);
        Some(Layer {
            index,
            screen,
            view,
            presenting_next: has_above(len, index),
            dismissing,
        })
    }

    /// Render every layer, innermost last. Layers animating out follow the
    /// live ones.
    pub fn render<V>(&self, registry: &DestinationRegistry<V>) -> Vec<Layer<V>>
    where
        V: DestinationView + 'static,
    {
        let depth = self.binding.len().max(self.nodes.borrow().len());
        let mut layers = Vec::with_capacity(depth);
        for index in 0..depth {
            match self.render_node(index, registry) {
                Some(layer) => layers.push(layer),
                None => break,
            }
        }
        layers
    }
}

/// Whether a stack of `len` has a screen above `index`.
fn has_above(len: usize, index: usize) -> bool {
    index.checked_add(1).is_some_and(|next| len > next)
}

impl fmt::Debug for PresentationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationChain")
            .field("stack", &self.binding)
            .field("nodes", &self.nodes.borrow())
            .finish()
    }
}

impl Drop for PresentationChain {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::PresentationStack;
    use spark_signals::signal;
    use std::cell::Cell;

    fn setup() -> (PresentationStack, PresentationChain, DestinationRegistry<String>) {
        let stack = PresentationStack::new();
        let chain = PresentationChain::new(stack.binding());
        let registry = DestinationRegistry::default();
        registry.register(|s: &&'static str| s.to_string());
        (stack, chain, registry)
    }

    #[test]
    fn test_arena_follows_pushes() {
        let (stack, chain, _) = setup();
        stack.push("a");
        stack.push("b");

        assert_eq!(chain.nodes().len(), 2);
        assert!(chain.is_presented());
        assert!(chain.is_presenting_next(0));
        assert!(!chain.is_presenting_next(1));
    }

    #[test]
    fn test_dismiss_before_appear_is_ignored() {
        let (stack, chain, _) = setup();
        stack.push("a");
        stack.push("b");

        assert_eq!(chain.dismiss(0), DismissOutcome::NotAppeared);
        assert_eq!(stack.len(), 2, "spurious dismiss must not truncate");
    }

    #[test]
    fn test_dismiss_with_nothing_above() {
        let (stack, chain, _) = setup();
        stack.push("a");
        chain.did_appear(0);

        assert_eq!(chain.dismiss(0), DismissOutcome::NothingToTruncate);
        assert_eq!(chain.dismiss(5), DismissOutcome::NothingToTruncate);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_dismiss_after_appear_truncates() {
        let (stack, chain, _) = setup();
        stack.push("a");
        stack.push("b");
        stack.push("c");
        chain.did_appear(0);

        assert_eq!(chain.dismiss(0), DismissOutcome::Truncated { len: 1 });
        assert_eq!(stack.screens(), vec![Screen::new("a")]);
    }

    #[test]
    fn test_disappear_resets_guard() {
        let (stack, chain, _) = setup();
        stack.push("a");
        stack.push("b");
        chain.did_appear(0);
        chain.did_disappear(0);

        assert_eq!(chain.dismiss(0), DismissOutcome::NotAppeared);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_dismiss_at_extreme_index_is_noop() {
        let (stack, chain, registry) = setup();
        stack.push("a");
        chain.did_appear(0);

        assert_eq!(chain.dismiss(usize::MAX), DismissOutcome::NothingToTruncate);
        assert!(!chain.is_presenting_next(usize::MAX));
        assert!(chain.render_node(usize::MAX, &registry).is_none());
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_dismiss_from_effect_does_not_subscribe() {
        let (stack, chain, _) = setup();
        stack.push("a");
        stack.push("b");
        chain.did_appear(0);

        let chain = Rc::new(chain);
        let trigger = signal(false);
        let runs = Rc::new(Cell::new(0));

        let trigger_effect = trigger.clone();
        let chain_effect = chain.clone();
        let runs_effect = runs.clone();
        let _stop = effect(move || {
            runs_effect.set(runs_effect.get() + 1);
            if trigger_effect.get() {
                chain_effect.dismiss(0);
            }
        });

        trigger.set(true);
        assert_eq!(stack.len(), 1);
        assert_eq!(runs.get(), 2);

        stack.push("c");
        stack.push("d");
        assert_eq!(runs.get(), 2, "dismiss inside an effect must not track the stack");
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_dismiss_root_clears() {
        let (stack, chain, _) = setup();
        assert_eq!(chain.dismiss_root(), DismissOutcome::NothingToTruncate);

        stack.push("a");
        stack.push("b");
        assert_eq!(chain.dismiss_root(), DismissOutcome::Truncated { len: 0 });
        assert!(stack.is_empty());
        assert!(!chain.is_presented());
    }

    #[test]
    fn test_render_layers() {
        let (stack, chain, registry) = setup();
        stack.push("a");
        stack.push("b");

        let layers = chain.render(&registry);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].view, "a");
        assert!(layers[0].presenting_next);
        assert_eq!(layers[1].view, "b");
        assert!(!layers[1].presenting_next);
        assert!(layers.iter().all(|l| !l.dismissing));
    }

    #[test]
    fn test_render_out_of_range_is_none() {
        let (stack, chain, registry) = setup();
        stack.push("a");
        assert!(chain.render_node(3, &registry).is_none());
    }

    #[test]
    fn test_render_uses_snapshot_while_dismissing() {
        let (stack, chain, registry) = setup();
        stack.push("a");
        stack.push("b");
        chain.did_appear(0);
        chain.did_appear(1);

        stack.truncate(1);
        let layer = chain.render_node(1, &registry).expect("still mounted");
        assert_eq!(layer.view, "b");
        assert!(layer.dismissing);
        assert_eq!(chain.render(&registry).len(), 2);

        chain.did_disappear(1);
        assert!(chain.render_node(1, &registry).is_none());
        assert_eq!(chain.nodes().len(), 1);
    }

    #[test]
    fn test_drop_stops_tracking() {
        let (stack, chain, _) = setup();
        stack.push("a");
        let nodes = chain.nodes.clone();
        drop(chain);

        stack.push("b");
        assert_eq!(nodes.borrow().len(), 1, "dropped chain must not reconcile");
    }
}
