//! Type Hierarchy - explicit supertype table for destination fallback.
//!
//! Rust values carry no superclass chain, so the host declares one. Each
//! edge says "`Sub` can stand in for `Super`" and carries the conversion
//! that produces the `Super` value handed to `Super`'s resolver.
//!
//! ```text
//! Cat ──upcast──▶ Animal ──upcast──▶ LivingThing
//! Dog ──upcast──▶ Animal
//! ```
//!
//! A type has at most one parent; declaring again replaces the edge.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::screen::{Screen, ScreenValue, TypeKey};

pub(crate) type Upcast = Rc<dyn Fn(&Screen) -> Option<Screen>>;

#[derive(Clone)]
struct Edge {
    parent: TypeKey,
    upcast: Upcast,
}

/// Child → parent table with value conversions.
#[derive(Clone, Default)]
pub struct TypeHierarchy {
    edges: HashMap<TypeKey, Edge>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `Super` as the parent of `Sub`.
    pub fn declare<Sub, Super>(&mut self, upcast: impl Fn(&Sub) -> Super + 'static)
    where
        Sub: ScreenValue,
        Super: ScreenValue,
    {
        let edge = Edge {
            parent: TypeKey::of::<Super>(),
            upcast: Rc::new(move |screen: &Screen| {
                screen.downcast_ref::<Sub>().map(|sub| Screen::new(upcast(sub)))
            }),
        };
        self.edges.insert(TypeKey::of::<Sub>(), edge);
    }

    pub fn parent_of(&self, key: TypeKey) -> Option<TypeKey> {
        self.edges.get(&key).map(|edge| edge.parent)
    }

    /// Convert `screen` into a value of its declared parent type.
    pub fn upcast(&self, screen: &Screen) -> Option<Screen> {
        self.upcast_for(screen.type_key())?(screen)
    }

    /// The conversion out of `key`, detached from the table.
    pub(crate) fn upcast_for(&self, key: TypeKey) -> Option<Upcast> {
        self.edges.get(&key).map(|edge| edge.upcast.clone())
    }

    /// Parents of `key`, nearest first. Stops at the first repeated key.
    pub fn ancestors(&self, key: TypeKey) -> Vec<TypeKey> {
        let mut seen = HashSet::from([key]);
        let mut chain = Vec::new();
        let mut current = key;
        while let Some(parent) = self.parent_of(current) {
            if !seen.insert(parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl fmt::Debug for TypeHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.edges.iter().map(|(child, edge)| (child, &edge.parent)))
            .finish()
    }
}
