//! Screen values - type-erased, hashable presentation targets.
//!
//! A [`Screen`] wraps any `Eq + Hash + Debug + 'static` value behind an `Rc`.
//! Equality and hashing follow the wrapped value; two screens holding values
//! of different types are never equal.
//!
//! ```ignore
//! let a = Screen::new(Dog { name: "Rex".into() });
//! let b = Screen::new(a.clone()); // unwrapped, not double-erased
//! assert_eq!(a, b);
//! assert!(b.downcast_ref::<Dog>().is_some());
//! ```

use std::any::{Any, TypeId};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

// =============================================================================
// Type Keys
// =============================================================================

/// Stable, globally unique key for a concrete type.
///
/// Identity is the `TypeId`; the name is kept for diagnostics only.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// =============================================================================
// Erased Values
// =============================================================================

/// Object-safe view of a value that can be presented.
///
/// Implemented for every `Any + Debug + Eq + Hash` type.
pub trait ScreenValue: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn type_key(&self) -> TypeKey;
    fn dyn_eq(&self, other: &dyn ScreenValue) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T> ScreenValue for T
where
    T: Any + fmt::Debug + Eq + Hash,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn dyn_eq(&self, other: &dyn ScreenValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        // Type first so equal-looking values of different types hash apart
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}

// =============================================================================
// Screen
// =============================================================================

/// Ordered navigation sequence held by a presentation stack.
pub type DestinationPath = Vec<Screen>;

/// A type-erased navigation target.
#[derive(Clone)]
pub struct Screen {
    inner: Rc<dyn ScreenValue>,
}

impl Screen {
    /// Erase a value. Passing a `Screen` returns it as-is (one level of
    /// erasure is unwrapped, never stacked).
    pub fn new<T: ScreenValue>(value: T) -> Self {
        if let Some(screen) = (&value as &dyn Any).downcast_ref::<Screen>() {
            return screen.clone();
        }
        Self {
            inner: Rc::new(value),
        }
    }

    /// The concretely held value.
    pub fn value(&self) -> &dyn ScreenValue {
        &*self.inner
    }

    pub fn as_any(&self) -> &dyn Any {
        self.value().as_any()
    }

    /// Key of the held value's concrete type.
    pub fn type_key(&self) -> TypeKey {
        self.value().type_key()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_key().name()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Hash-derived identity, stable for the life of the process.
    /// Equal screens share an id.
    pub fn id(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl PartialEq for Screen {
    fn eq(&self, other: &Self) -> bool {
        self.value().dyn_eq(other.value())
    }
}

impl Eq for Screen {}

impl Hash for Screen {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value().dyn_hash(state);
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.value(), f)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Profile(u32);

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Settings(u32);

    #[test]
    fn test_equality_follows_value() {
        assert_eq!(Screen::new(Profile(1)), Screen::new(Profile(1)));
        assert_ne!(Screen::new(Profile(1)), Screen::new(Profile(2)));
    }

    #[test]
    fn test_different_types_never_equal() {
        assert_ne!(Screen::new(Profile(1)), Screen::new(Settings(1)));
        assert_ne!(Screen::new(1u32), Screen::new(1u64));
    }

    #[test]
    fn test_hash_matches_equality() {
        let mut set = HashSet::new();
        set.insert(Screen::new(Profile(7)));
        assert!(set.contains(&Screen::new(Profile(7))));
        assert!(!set.contains(&Screen::new(Settings(7))));
        assert_eq!(Screen::new(Profile(7)).id(), Screen::new(Profile(7)).id());
    }

    #[test]
    fn test_nested_screen_is_unwrapped() {
        let inner = Screen::new(Profile(3));
        let outer = Screen::new(inner.clone());

        assert_eq!(outer.type_key(), TypeKey::of::<Profile>());
        assert_eq!(outer.downcast_ref::<Profile>(), Some(&Profile(3)));
        assert_eq!(outer, inner);
    }

    #[test]
    fn test_type_key_identity() {
        assert_eq!(TypeKey::of::<Profile>(), TypeKey::of::<Profile>());
        assert_ne!(TypeKey::of::<Profile>(), TypeKey::of::<Settings>());
        assert!(TypeKey::of::<Profile>().name().ends_with("Profile"));
    }

    #[test]
    fn test_debug_shows_inner_value() {
        assert_eq!(format!("{:?}", Screen::new(Profile(9))), "Profile(9)");
    }
}
