//! Destination Registry - value → view resolution.
//!
//! Maps a [`DestinationKey`] to a resolver closure:
//! - `Type` keys come from a concrete data type (`register::<T>`)
//! - `Local` keys come from a [`LocalDestinationId`] token (`append_local`)
//!
//! Resolution walks the declared [`TypeHierarchy`] when the exact type has no
//! resolver (or its resolver declines), so a `Cat` can be shown by the
//! `Animal` destination. Local keys are exact-match only.
//!
//! The registry is a cheap `Clone` handle. Borrows are released before any
//! resolver or upcast runs, so either may register more destinations.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::config::{PresentationConfig, UnresolvedPolicy};
use crate::error::{PresentationError, Result};
use crate::screen::{Screen, ScreenValue, TypeKey};

use super::hierarchy::TypeHierarchy;
use super::local::LocalDestinationId;
use super::view::{DestinationView, UnresolvedDestination};

// =============================================================================
// Keys and Resolvers
// =============================================================================

/// Registry key. The two namespaces never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationKey {
    Type(TypeKey),
    Local(LocalDestinationId),
}

impl DestinationKey {
    pub fn of<T: ScreenValue>() -> Self {
        Self::Type(TypeKey::of::<T>())
    }
}

type Resolver<V> = Rc<dyn Fn(&Screen) -> Option<V>>;

struct RegistryState<V> {
    resolvers: HashMap<DestinationKey, Resolver<V>>,
    hierarchy: TypeHierarchy,
    config: PresentationConfig,
}

// =============================================================================
// Registry
// =============================================================================

/// Shared handle to a host's destination table.
pub struct DestinationRegistry<V> {
    state: Rc<RefCell<RegistryState<V>>>,
}

impl<V> Clone for DestinationRegistry<V> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<V: 'static> Default for DestinationRegistry<V> {
    fn default() -> Self {
        Self::new(PresentationConfig::default())
    }
}

impl<V: 'static> DestinationRegistry<V> {
    pub fn new(config: PresentationConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(RegistryState {
                resolvers: HashMap::new(),
                hierarchy: TypeHierarchy::new(),
                config,
            })),
        }
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Install the destination for `T`, replacing any earlier one.
    pub fn register<T: ScreenValue>(&self, resolver: impl Fn(&T) -> V + 'static) {
        self.register_optional::<T>(move |value| Some(resolver(value)));
    }

    /// Install a destination for `T` that may decline a value. A declined
    /// value continues up the type hierarchy.
    pub fn register_optional<T: ScreenValue>(&self, resolver: impl Fn(&T) -> Option<V> + 'static) {
        let resolver: Resolver<V> =
            Rc::new(move |screen: &Screen| screen.downcast_ref::<T>().and_then(&resolver));
        self.insert(DestinationKey::of::<T>(), resolver);
    }

    /// Install a one-off builder under a local identifier.
    pub fn append_local(&self, id: LocalDestinationId, builder: impl Fn() -> V + 'static) {
        self.insert(DestinationKey::Local(id), Rc::new(move |_: &Screen| Some(builder())));
    }

    pub fn remove_local(&self, id: LocalDestinationId) {
        if self.state.borrow_mut().resolvers.remove(&DestinationKey::Local(id)).is_some() {
            tracing::debug!(%id, "removed local destination");
        }
    }

    /// Let values of `Sub` fall back to the destination for `Super`.
    pub fn declare_supertype<Sub, Super>(&self)
    where
        Sub: ScreenValue + Clone + Into<Super>,
        Super: ScreenValue,
    {
        self.declare_supertype_with::<Sub, Super>(|sub| sub.clone().into());
    }

    /// Like [`declare_supertype`](Self::declare_supertype) with an explicit conversion.
    pub fn declare_supertype_with<Sub, Super>(&self, upcast: impl Fn(&Sub) -> Super + 'static)
    where
        Sub: ScreenValue,
        Super: ScreenValue,
    {
        tracing::trace!(
            sub = std::any::type_name::<Sub>(),
            parent = std::any::type_name::<Super>(),
            "declared supertype"
        );
        self.state.borrow_mut().hierarchy.declare(upcast);
    }

    fn insert(&self, key: DestinationKey, resolver: Resolver<V>) {
        let replaced = self.state.borrow_mut().resolvers.insert(key, resolver).is_some();
        tracing::trace!(?key, replaced, "registered destination");
    }

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    /// Resolve a screen, or report why nothing matched.
    pub fn try_resolve(&self, screen: &Screen) -> Result<V> {
        if let Some(id) = screen.downcast_ref::<LocalDestinationId>() {
            let resolver = self.lookup(DestinationKey::Local(*id));
            return resolver
                .and_then(|resolver| resolver(screen))
                .ok_or(PresentationError::UnresolvedLocalDestination { id: *id });
        }

        let mut current = screen.clone();
        let mut visited = HashSet::new();
        loop {
            let key = current.type_key();
            if !visited.insert(key) {
                break;
            }

            if let Some(resolver) = self.lookup(DestinationKey::Type(key)) {
                if let Some(view) = resolver(&current) {
                    return Ok(view);
                }
            }

            let upcast = self.state.borrow().hierarchy.upcast_for(key);
            match upcast.and_then(|upcast| upcast(&current)) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Err(PresentationError::UnresolvedDestination {
            type_name: screen.type_name(),
        })
    }

    /// Resolve a screen, falling back to the placeholder view.
    ///
    /// A miss is a programming error (a missing `register`). It is logged and,
    /// under [`UnresolvedPolicy::DebugAssert`], fails a debug assertion.
    pub fn resolve(&self, screen: &Screen) -> V
    where
        V: DestinationView,
    {
        match self.try_resolve(screen) {
            Ok(view) => view,
            Err(error) => {
                tracing::error!(type_name = screen.type_name(), %error, "unresolved destination");
                let (policy, label) = {
                    let state = self.state.borrow();
                    (state.config.unresolved, state.config.placeholder_label.clone())
                };
                debug_assert!(
                    policy != UnresolvedPolicy::DebugAssert,
                    "no view builder found: {error}"
                );
                V::unresolved(&UnresolvedDestination {
                    type_name: screen.type_name(),
                    label,
                    error,
                })
            }
        }
    }

    fn lookup(&self, key: DestinationKey) -> Option<Resolver<V>> {
        self.state.borrow().resolvers.get(&key).cloned()
    }

    // -------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------

    pub fn contains<T: ScreenValue>(&self) -> bool {
        self.state.borrow().resolvers.contains_key(&DestinationKey::of::<T>())
    }

    pub fn contains_local(&self, id: LocalDestinationId) -> bool {
        self.state.borrow().resolvers.contains_key(&DestinationKey::Local(id))
    }

    pub fn len(&self) -> usize {
        self.state.borrow().resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().resolvers.is_empty()
    }

    pub fn config(&self) -> PresentationConfig {
        self.state.borrow().config.clone()
    }
}

impl<V> fmt::Debug for DestinationRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("DestinationRegistry")
            .field("keys", &state.resolvers.keys().collect::<Vec<_>>())
            .field("hierarchy", &state.hierarchy)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
