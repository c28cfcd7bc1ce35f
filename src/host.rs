//! Presentation Host - owns one subtree's stack, registry and chain.
//!
//! Attaching a host makes it the target of the free [`present`] function for
//! the current thread. Hosts nest like parent contexts: the innermost
//! attached host wins, and dropping its guard restores the outer one.
//!
//! ```ignore
//! let host: PresentationHost<String> = PresentationHost::new();
//! host.declare_destination(|user: &User| format!("profile of {}", user.name));
//!
//! let _guard = host.attach();
//! present(User { name: "ada".into() })?;
//!
//! let tree = host.render("home".to_string());
//! assert_eq!(tree.layers[0].view, "profile of ada");
//! ```

use std::cell::RefCell;
use std::fmt;

use crate::chain::{DismissOutcome, Layer, PresentationChain};
use crate::config::PresentationConfig;
use crate::destination::{DestinationRegistry, DestinationView, LocalDestinationId};
use crate::error::{PresentationError, Result};
use crate::screen::ScreenValue;
use crate::stack::PresentationStack;

// =============================================================================
// Active Host Context
// =============================================================================

thread_local! {
    /// Stacks of the attached hosts, innermost last.
    static ACTIVE_HOSTS: RefCell<Vec<PresentationStack>> = RefCell::new(Vec::new());
}

/// Stack of the innermost attached host, if any.
pub fn active_stack() -> Option<PresentationStack> {
    ACTIVE_HOSTS.with(|hosts| hosts.borrow().last().cloned())
}

/// Present `item` on the innermost attached host.
pub fn present<T: ScreenValue>(item: T) -> Result<()> {
    match active_stack() {
        Some(stack) => {
            stack.push(item);
            Ok(())
        }
        None => {
            tracing::warn!(
                type_name = std::any::type_name::<T>(),
                "present called without an attached host"
            );
            Err(PresentationError::NoActiveHost)
        }
    }
}

/// Keeps a host attached; detaches it (and anything attached after it) on drop.
#[must_use = "the host detaches when the guard is dropped"]
#[derive(Debug)]
pub struct HostGuard {
    depth: usize,
}

impl Drop for HostGuard {
    fn drop(&mut self) {
        ACTIVE_HOSTS.with(|hosts| hosts.borrow_mut().truncate(self.depth));
    }
}

// =============================================================================
// Host
// =============================================================================

/// Root content plus the overlays presented over it.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentedTree<V> {
    pub root: V,
    /// Root overlay visibility.
    pub presented: bool,
    /// Nested overlays, outermost first.
    pub layers: Vec<Layer<V>>,
}

pub struct PresentationHost<V> {
    stack: PresentationStack,
    registry: DestinationRegistry<V>,
    chain: PresentationChain,
}

impl<V: DestinationView + 'static> Default for PresentationHost<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: DestinationView + 'static> PresentationHost<V> {
    pub fn new() -> Self {
        Self::with_config(PresentationConfig::default())
    }

    pub fn with_config(config: PresentationConfig) -> Self {
        let stack = PresentationStack::new();
        let chain = PresentationChain::new(stack.binding());
        Self {
            registry: DestinationRegistry::new(config),
            stack,
            chain,
        }
    }

    /// Make this host the target of [`present`] until the guard drops.
    pub fn attach(&self) -> HostGuard {
        let depth = ACTIVE_HOSTS.with(|hosts| {
            let mut hosts = hosts.borrow_mut();
            hosts.push(self.stack.clone());
            hosts.len() - 1
        });
        HostGuard { depth }
    }

    /// Run `f` with this host attached.
    pub fn scoped<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.attach();
        f()
    }

    // -------------------------------------------------------------------------
    // Destinations
    // -------------------------------------------------------------------------

    pub fn declare_destination<T: ScreenValue>(&self, builder: impl Fn(&T) -> V + 'static) {
        self.registry.register(builder);
    }

    pub fn declare_supertype<Sub, Super>(&self)
    where
        Sub: ScreenValue + Clone + Into<Super>,
        Super: ScreenValue,
    {
        self.registry.declare_supertype::<Sub, Super>();
    }

    /// Register a one-off builder and return the id to present it with.
    pub fn local_destination(&self, builder: impl Fn() -> V + 'static) -> LocalDestinationId {
        let id = LocalDestinationId::new();
        self.registry.append_local(id, builder);
        id
    }

    // -------------------------------------------------------------------------
    // Stack
    // -------------------------------------------------------------------------

    pub fn present<T: ScreenValue>(&self, item: T) {
        self.stack.push(item);
    }

    pub fn stack(&self) -> &PresentationStack {
        &self.stack
    }

    pub fn registry(&self) -> &DestinationRegistry<V> {
        &self.registry
    }

    pub fn chain(&self) -> &PresentationChain {
        &self.chain
    }

    // -------------------------------------------------------------------------
    // Runtime hooks
    // -------------------------------------------------------------------------

    pub fn did_appear(&self, index: usize) {
        self.chain.did_appear(index);
    }

    pub fn did_disappear(&self, index: usize) {
        self.chain.did_disappear(index);
    }

    pub fn dismiss(&self, index: usize) -> DismissOutcome {
        self.chain.dismiss(index)
    }

    pub fn dismiss_root(&self) -> DismissOutcome {
        self.chain.dismiss_root()
    }

    /// Render `root` with the current overlays.
    pub fn render(&self, root: V) -> PresentedTree<V> {
        PresentedTree {
            root,
            presented: self.chain.is_presented(),
            layers: self.chain.render(&self.registry),
        }
    }
}

impl<V> fmt::Debug for PresentationHost<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationHost")
            .field("stack", &self.stack)
            .field("registry", &self.registry)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::Screen;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Article(u32);

    fn host() -> PresentationHost<String> {
        let host = PresentationHost::new();
        host.declare_destination(|article: &Article| format!("article {}", article.0));
        host
    }

    #[test]
    fn test_present_without_host_errors() {
        assert_eq!(present(Article(1)), Err(PresentationError::NoActiveHost));
    }

    #[test]
    fn test_present_targets_attached_host() {
        let host = host();
        {
            let _guard = host.attach();
            present(Article(1)).unwrap();
        }
        assert_eq!(host.stack().screens(), vec![Screen::new(Article(1))]);
        assert!(active_stack().is_none(), "guard drop detaches");
    }

    #[test]
    fn test_nested_hosts_innermost_wins() {
        let outer = host();
        let inner = host();

        let _outer_guard = outer.attach();
        inner.scoped(|| present(Article(2)).unwrap());
        present(Article(3)).unwrap();

        assert_eq!(inner.stack().len(), 1);
        assert_eq!(outer.stack().screens(), vec![Screen::new(Article(3))]);
    }

    #[test]
    fn test_render_tree() {
        let host = host();
        let tree = host.render("home".to_string());
        assert!(!tree.presented);
        assert!(tree.layers.is_empty());

        host.present(Article(7));
        let tree = host.render("home".to_string());
        assert_eq!(tree.root, "home");
        assert!(tree.presented);
        assert_eq!(tree.layers.len(), 1);
        assert_eq!(tree.layers[0].view, "article 7");
    }

    #[test]
    fn test_local_destination_presents() {
        let host = host();
        let id = host.local_destination(|| "settings".to_string());
        host.present(id);

        assert_eq!(host.render(String::new()).layers[0].view, "settings");
    }

    #[test]
    fn test_unregistered_item_renders_placeholder() {
        let host = host();
        host.present(3.5f32.to_bits());
        assert_eq!(host.render(String::new()).layers[0].view, "\u{26A0} u32");
    }
}
