#![forbid(unsafe_code)]

//! Per-instance property storage.
//!
//! Names map to [`Value`] slots, created lazily on first write and never
//! destroyed before the instance. The store itself does not notify; it
//! reports whether a write changed anything and the view-model layer drives
//! the cascade, so no borrow is ever held across user callbacks.

use std::cell::RefCell;

use ahash::AHashMap;
use tracing::trace;

use crate::value::Value;

#[derive(Debug, Default)]
pub(crate) struct PropertyStore {
    values: RefCell<AHashMap<String, Value>>,
}

impl PropertyStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, name: &str) -> Option<Value> {
        self.values.borrow().get(name).cloned()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.values.borrow().contains_key(name)
    }

    /// Store `value` under `name`, inserting if absent.
    ///
    /// Returns whether anything changed. Writing a value structurally equal
    /// to the current one is a no-op; only a `true` return should raise a
    /// change signal.
    pub(crate) fn put(&self, name: &str, value: Value) -> bool {
        let mut values = self.values.borrow_mut();
        match values.get(name) {
            Some(current) if *current == value => {
                trace!(property = name, "store write suppressed (equal value)");
                false
            }
            _ => {
                trace!(property = name, "store write");
                values.insert(name.to_string(), value);
                true
            }
        }
    }
}
