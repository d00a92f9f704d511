#![forbid(unsafe_code)]

//! Type-erased property values.
//!
//! The property store maps names to [`Value`] slots. A `Value` can hold any
//! `'static + PartialEq` payload; equality is checked structurally across the
//! erasure boundary so the store can suppress redundant change notifications.
//!
//! # Invariants
//!
//! 1. Two `Value`s compare equal iff they hold the same payload type and the
//!    payloads compare equal.
//! 2. A `Value` holding `T` and a `Value` holding `U != T` are never equal,
//!    even if their bytes coincide.
//! 3. Cloning a `Value` is cheap (shared pointer) and never clones the
//!    payload.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Payload contract for values held in a property store.
///
/// Blanket-implemented for every `'static` type with structural equality, so
/// user code never implements this directly.
pub trait PropertyValue: Any {
    /// Upcast for downcasting back to the concrete payload type.
    fn as_any(&self) -> &dyn Any;

    /// Structural equality across the erasure boundary.
    ///
    /// Returns `false` when `other` holds a different payload type.
    fn eq_value(&self, other: &dyn PropertyValue) -> bool;

    /// Payload type name, for diagnostics only.
    fn type_name(&self) -> &'static str;
}

impl<T: Any + PartialEq> PropertyValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_value(&self, other: &dyn PropertyValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A shared, type-erased property value.
///
/// `Value` is a single-threaded handle (`Rc` inside, deliberately not
/// `Send`). Reads downcast to the stored payload type; a mismatched type
/// reads as absent rather than panicking.
#[derive(Clone)]
pub struct Value {
    inner: Rc<dyn PropertyValue>,
}

impl Value {
    /// Erase a payload into a `Value`.
    pub fn new<T: PropertyValue>(value: T) -> Self {
        Self {
            inner: Rc::new(value),
        }
    }

    /// Borrow the payload as `T`, if that is what is stored.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref()
    }

    /// Clone the payload out as `T`, if that is what is stored.
    #[must_use]
    pub fn extract<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref().cloned()
    }

    /// Whether the payload is a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.as_any().is::<T>()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_value(other.inner.as_ref())
    }
}

// No `Debug` bound on stored payloads, so the debug form shows the payload
// type name instead.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.inner.type_name())
            .finish()
    }
}
