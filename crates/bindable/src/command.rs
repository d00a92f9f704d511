#![forbid(unsafe_code)]

//! Synthesized command entries.
//!
//! The builder materializes one [`Command`] per registered action and stores
//! it in the property store under the action's bare name, so a command is
//! retrievable like any other property. A command pairs an execute operation
//! with an optional can-execute predicate and carries its own
//! enablement-changed signal.
//!
//! # Invariants
//!
//! 1. `can_execute` defaults to `true` when no predicate was registered.
//! 2. The engine never invokes `execute` or `can_execute` on its own; a
//!    dependency trigger only raises the enablement-changed signal.
//! 3. `execute` is not gated on `can_execute`; enforcing that is the
//!    caller's policy.
//!
//! # Failure Modes
//!
//! - **Owner dropped**: a command holds a weak back-reference to its
//!   view-model (a strong one would leak the instance through its own
//!   store). A command outliving its owner goes inert: `execute` is a
//!   no-op and a registered predicate reports `false`.

use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::signal::{Signal, Subscription};
use crate::value::Value;
use crate::viewmodel::{ViewModel, ViewModelInner};

pub(crate) type ActionFn = Rc<dyn Fn(&ViewModel, Option<&Value>)>;
pub(crate) type PredicateFn = Rc<dyn Fn(&ViewModel, Option<&Value>) -> bool>;

struct CommandInner {
    name: String,
    owner: Weak<ViewModelInner>,
    execute: ActionFn,
    can_execute: Option<PredicateFn>,
    enablement_changed: Signal<()>,
}

/// A shared handle to one command entry.
///
/// Cloning yields a handle to the **same** entry; equality is identity, so
/// re-storing a command under its own name raises no change signal.
#[derive(Clone)]
pub struct Command {
    inner: Rc<CommandInner>,
}

impl Command {
    pub(crate) fn new(
        name: String,
        owner: Weak<ViewModelInner>,
        execute: ActionFn,
        can_execute: Option<PredicateFn>,
    ) -> Self {
        Self {
            inner: Rc::new(CommandInner {
                name,
                owner,
                execute,
                can_execute,
                enablement_changed: Signal::new(),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Run the action operation.
    ///
    /// Not gated on [`can_execute`](Self::can_execute). No-op if the owning
    /// view-model has been dropped.
    pub fn execute(&self, parameter: Option<&Value>) {
        let Some(owner) = self.inner.owner.upgrade() else {
            trace!(command = self.inner.name.as_str(), "execute on inert command ignored");
            return;
        };
        trace!(command = self.inner.name.as_str(), "execute");
        (self.inner.execute)(&ViewModel::from_inner(owner), parameter);
    }

    /// Run the predicate operation; `true` when no predicate was registered,
    /// `false` when the owning view-model has been dropped.
    #[must_use]
    pub fn can_execute(&self, parameter: Option<&Value>) -> bool {
        let Some(predicate) = &self.inner.can_execute else {
            return true;
        };
        let Some(owner) = self.inner.owner.upgrade() else {
            return false;
        };
        predicate(&ViewModel::from_inner(owner), parameter)
    }

    /// Subscribe to the enablement-changed signal: "re-query `can_execute`".
    pub fn subscribe_enablement(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.enablement_changed.subscribe(move |()| callback())
    }

    /// Raise the enablement-changed signal.
    ///
    /// Fired by the change notifier when one of the predicate's dependency
    /// triggers changes; the predicate itself is not re-invoked.
    pub fn raise_enablement_changed(&self) {
        trace!(command = self.inner.name.as_str(), "enablement changed");
        self.inner.enablement_changed.emit(&());
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.inner.name)
            .field("has_predicate", &self.inner.can_execute.is_some())
            .finish()
    }
}
