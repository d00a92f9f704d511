#![forbid(unsafe_code)]

//! The view-model instance: property access plus the change notifier.
//!
//! # Architecture
//!
//! [`ViewModel`] is a cloneable handle (`Rc` inside) to one instance's
//! property store, dependency graph, dependent methods, and change signal.
//! Everything operates on string property names; a name never declared in
//! the builder participates in storage and propagation exactly like a
//! declared one (the "dynamic accessor"). Typed accessors on wrapper
//! structs are thin wrappers over the same string keys.
//!
//! # Invariants
//!
//! 1. A write that changes a value raises the change signal for that name
//!    exactly once; an equal write raises nothing.
//! 2. [`notify`](ViewModel::notify) cascades depth-first through property
//!    dependents in declared order: trigger A with dependent B which has
//!    dependent C signals [A, B, C] before returning.
//! 3. Method dependents run after the property cascade for their trigger;
//!    command dependents only get their enablement signal raised.
//! 4. Subscribers observe signals synchronously, in subscription order.
//!
//! # Failure Modes
//!
//! - **Runtime cycles**: declared property cycles are rejected at build
//!   time, but a dependent method that writes a property which (through any
//!   chain) re-triggers the same method recurses without bound. That data
//!   flow is invisible to the declared graph; exhausting the stack is the
//!   accepted outcome.

use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use tracing::trace;

use crate::builder::ViewModelBuilder;
use crate::command::Command;
use crate::graph::DependencyGraph;
use crate::signal::{Signal, Subscription};
use crate::store::PropertyStore;
use crate::value::{PropertyValue, Value};

pub(crate) type MethodFn = Rc<dyn Fn(&ViewModel)>;

pub(crate) struct ViewModelInner {
    pub(crate) store: PropertyStore,
    pub(crate) graph: DependencyGraph,
    pub(crate) methods: AHashMap<String, MethodFn>,
    pub(crate) changed: Signal<str>,
}

/// A reactive named-property container.
///
/// Cloning yields a handle to the **same** instance. Single-threaded and
/// fully synchronous: `set` returns only after the entire cascade it
/// triggered has run.
#[derive(Clone)]
pub struct ViewModel {
    inner: Rc<ViewModelInner>,
}

impl ViewModel {
    /// Start declaring a new instance.
    #[must_use]
    pub fn builder() -> ViewModelBuilder {
        ViewModelBuilder::new()
    }

    pub(crate) fn from_inner(inner: Rc<ViewModelInner>) -> Self {
        Self { inner }
    }

    /// Read a property, `None` if absent or holding a different type.
    #[must_use]
    pub fn get<T: Clone + 'static>(&self, name: &str) -> Option<T> {
        self.inner.store.get(name).and_then(|value| value.extract())
    }

    /// Read a property, falling back to `default`. Absent names are never
    /// an error and the fallback is not stored.
    #[must_use]
    pub fn get_or<T: Clone + 'static>(&self, name: &str, default: T) -> T {
        self.get(name).unwrap_or(default)
    }

    /// Read a property, computing the fallback lazily. Not stored.
    #[must_use]
    pub fn get_or_else<T: Clone + 'static>(&self, name: &str, default: impl FnOnce() -> T) -> T {
        self.get(name).unwrap_or_else(default)
    }

    /// Read a property, initializing it on first access.
    ///
    /// If absent, `init` runs exactly once and the result is stored through
    /// the normal `set` path, so the first write raises the change signal.
    /// Subsequent reads never re-invoke `init`. If the entry exists but
    /// holds a different type, `init`'s result is returned without being
    /// stored.
    pub fn get_or_init<T: PropertyValue + Clone>(
        &self,
        name: &str,
        init: impl FnOnce() -> T,
    ) -> T {
        if self.inner.store.contains(name) {
            return self.get_or_else(name, init);
        }
        let value = init();
        self.set(name, value.clone());
        value
    }

    /// Write a property, creating the entry if absent.
    ///
    /// Writing a value structurally equal to the current one is a no-op.
    /// Otherwise the value is stored and [`notify`](Self::notify) runs for
    /// `name` — the sole source of cascading propagation.
    pub fn set<T: PropertyValue>(&self, name: &str, value: T) {
        self.set_value(name, Value::new(value));
    }

    /// Erased read, backing the dynamic accessor.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Option<Value> {
        self.inner.store.get(name)
    }

    /// Erased write; see [`set`](Self::set).
    pub fn set_value(&self, name: &str, value: Value) {
        if self.inner.store.put(name, value) {
            self.notify(name);
        }
    }

    /// Whether an entry exists under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.store.contains(name)
    }

    /// Retrieve the command entry stored under an action's name.
    #[must_use]
    pub fn command(&self, name: &str) -> Option<Command> {
        self.get(name)
    }

    /// Subscribe to the change signal. Callbacks receive the property name;
    /// delivery is synchronous, in subscription order, for as long as the
    /// returned guard lives.
    pub fn subscribe(&self, callback: impl Fn(&str) + 'static) -> Subscription {
        self.inner.changed.subscribe(callback)
    }

    /// Raise the change signal for `trigger` and drive propagation.
    ///
    /// In order: (1) the external signal is published; (2) property
    /// dependents are notified recursively, depth-first, in declared order;
    /// (3) method dependents execute; (4) command dependents get their
    /// enablement-changed signal raised — `can_execute` is not invoked.
    ///
    /// Re-entrant: a dependent method writing a property recurses into
    /// `notify` through the resulting `set`.
    pub fn notify(&self, trigger: &str) {
        trace!(property = trigger, "change signal");
        self.inner.changed.emit(trigger);

        for dependent in self.inner.graph.property_dependents_of(trigger) {
            self.notify(dependent);
        }

        for method in self.inner.graph.method_dependents_of(trigger) {
            if let Some(body) = self.inner.methods.get(method) {
                trace!(property = trigger, method = method.as_str(), "dependent method");
                body(self);
            }
        }

        for dependent in self.inner.graph.command_dependents_of(trigger) {
            if let Some(command) = self.command(dependent) {
                command.raise_enablement_changed();
            }
        }
    }
}

impl fmt::Debug for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModel")
            .field("subscribers", &self.inner.changed.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::graph::DependsUpon;

    fn record_changes(vm: &ViewModel) -> (Rc<RefCell<Vec<String>>>, Subscription) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = Rc::clone(&log);
        let sub = vm.subscribe(move |name| log_clone.borrow_mut().push(name.to_string()));
        (log, sub)
    }

    #[test]
    fn set_then_get_round_trips() {
        let vm = ViewModel::builder().build().unwrap();
        vm.set("Foo", "Bar".to_string());
        assert_eq!(vm.get::<String>("Foo").unwrap(), "Bar");

        vm.set("MyInt", 55_i32);
        assert_eq!(vm.get::<i32>("MyInt").unwrap(), 55);
    }

    #[test]
    fn new_value_raises_signal_exactly_once() {
        let vm = ViewModel::builder().build().unwrap();
        let (log, _sub) = record_changes(&vm);

        vm.set("Foo", "Bar".to_string());
        assert_eq!(*log.borrow(), vec!["Foo"]);
    }

    #[test]
    fn equal_value_raises_no_signal() {
        let vm = ViewModel::builder().build().unwrap();
        let (log, _sub) = record_changes(&vm);

        vm.set("Foo", "Bar".to_string());
        vm.set("Foo", "Bar".to_string());
        assert_eq!(*log.borrow(), vec!["Foo"]);
    }

    #[test]
    fn none_over_none_raises_no_signal() {
        let vm = ViewModel::builder().build().unwrap();
        let (log, _sub) = record_changes(&vm);

        vm.set("Foo", Some("test".to_string()));
        vm.set("Foo", None::<String>);
        vm.set("Foo", None::<String>);
        assert_eq!(*log.borrow(), vec!["Foo", "Foo"]);
    }

    #[test]
    fn write_change_revert_raises_three_signals() {
        // No memoization across writes.
        let vm = ViewModel::builder().build().unwrap();
        let (log, _sub) = record_changes(&vm);

        vm.set("P", 1_i32);
        vm.set("P", 2_i32);
        vm.set("P", 1_i32);
        assert_eq!(*log.borrow(), vec!["P", "P", "P"]);
    }

    #[test]
    fn mismatched_name_reads_default() {
        let vm = ViewModel::builder().build().unwrap();
        vm.set("Value", 55_i32);
        assert_eq!(vm.get_or("WrongName", 0_i32), 0);
    }

    #[test]
    fn get_or_supplies_default_without_storing() {
        let vm = ViewModel::builder().build().unwrap();
        assert_eq!(vm.get_or("IntWithDefault", 56_i32), 56);
        assert!(!vm.contains("IntWithDefault"));

        vm.set("IntWithDefault", 99_i32);
        assert_eq!(vm.get_or("IntWithDefault", 56_i32), 99);
    }

    #[test]
    fn get_or_init_runs_initializer_at_most_once() {
        let vm = ViewModel::builder().build().unwrap();
        let runs = Rc::new(RefCell::new(0));

        for _ in 0..3 {
            let runs_clone = Rc::clone(&runs);
            let value = vm.get_or_init("Lazy", move || {
                *runs_clone.borrow_mut() += 1;
                "Default".to_string()
            });
            assert_eq!(value, "Default");
        }
        assert_eq!(*runs.borrow(), 1);
    }

    #[test]
    fn get_or_init_first_write_raises_signal() {
        let vm = ViewModel::builder().build().unwrap();
        let (log, _sub) = record_changes(&vm);

        let _ = vm.get_or_init("Lazy", || 7_i32);
        let _ = vm.get_or_init("Lazy", || 8_i32);
        assert_eq!(*log.borrow(), vec!["Lazy"]);
        assert_eq!(vm.get::<i32>("Lazy").unwrap(), 7);
    }

    #[test]
    fn dynamic_names_participate_like_declared_ones() {
        // The graph operates purely on strings; "Friend" is never declared.
        let vm = ViewModel::builder()
            .property_with("FriendSentence", [DependsUpon::on("Friend")])
            .build()
            .unwrap();
        let (log, _sub) = record_changes(&vm);

        vm.set("Friend", "Brian".to_string());
        assert_eq!(*log.borrow(), vec!["Friend", "FriendSentence"]);
        assert_eq!(vm.get::<String>("Friend").unwrap(), "Brian");
    }

    #[test]
    fn single_dependent_notifies_after_trigger() {
        let vm = ViewModel::builder()
            .property("InputA")
            .property_with("InputASquared", [DependsUpon::on("InputA")])
            .build()
            .unwrap();
        let (log, _sub) = record_changes(&vm);

        vm.set("InputA", 5_i32);
        assert_eq!(*log.borrow(), vec!["InputA", "InputASquared"]);
    }

    #[test]
    fn two_dependents_notify_in_declared_order() {
        let vm = ViewModel::builder()
            .property("InputA")
            .property_with("InputASquared", [DependsUpon::on("InputA")])
            .property_with("InputACubed", [DependsUpon::on("InputA")])
            .build()
            .unwrap();
        let (log, _sub) = record_changes(&vm);

        vm.set("InputA", 5_i32);
        assert_eq!(
            *log.borrow(),
            vec!["InputA", "InputASquared", "InputACubed"]
        );
    }

    #[test]
    fn dependent_on_two_triggers_fires_for_each() {
        let vm = ViewModel::builder()
            .property("InputA")
            .property("InputB")
            .property_with(
                "APlusB",
                [DependsUpon::on("InputA"), DependsUpon::on("InputB")],
            )
            .build()
            .unwrap();
        let (log, _sub) = record_changes(&vm);

        vm.set("InputA", 5_i32);
        vm.set("InputB", 6_i32);
        assert_eq!(
            *log.borrow(),
            vec!["InputA", "APlusB", "InputB", "APlusB"]
        );
    }

    #[test]
    fn chain_cascades_depth_first() {
        let vm = ViewModel::builder()
            .property("A")
            .property_with("B", [DependsUpon::on("A")])
            .property_with("C", [DependsUpon::on("B")])
            .build()
            .unwrap();
        let (log, _sub) = record_changes(&vm);

        vm.set("A", 1_i32);
        assert_eq!(*log.borrow(), vec!["A", "B", "C"]);
    }

    #[test]
    fn dependent_method_executes_on_trigger_change() {
        let observed = Rc::new(RefCell::new(0_i32));
        let observed_clone = Rc::clone(&observed);
        let vm = ViewModel::builder()
            .property("InputA")
            .method("OnAChanged", [DependsUpon::on("InputA")], move |vm| {
                *observed_clone.borrow_mut() = vm.get_or("InputA", 0_i32);
            })
            .build()
            .unwrap();

        vm.set("InputA", 20_i32);
        assert_eq!(*observed.borrow(), 20);
    }

    #[test]
    fn method_runs_after_property_cascade_of_its_trigger() {
        let order = Rc::new(RefCell::new(Vec::new()));

        let order_clone = Rc::clone(&order);
        let vm = ViewModel::builder()
            .property("A")
            .property_with("B", [DependsUpon::on("A")])
            .method("OnAChanged", [DependsUpon::on("A")], move |_| {
                order_clone.borrow_mut().push("method".to_string());
            })
            .build()
            .unwrap();

        let order_for_sub = Rc::clone(&order);
        let _sub = vm.subscribe(move |name| order_for_sub.borrow_mut().push(name.to_string()));

        vm.set("A", 1_i32);
        assert_eq!(*order.borrow(), vec!["A", "B", "method"]);
    }

    #[test]
    fn reentrant_method_write_cascades_again() {
        // A dependent method writing another property re-enters notify.
        let vm = ViewModel::builder()
            .property("Source")
            .property("Echo")
            .method("Mirror", [DependsUpon::on("Source")], |vm| {
                let doubled = vm.get_or("Source", 0_i32) * 2;
                vm.set("Echo", doubled);
            })
            .build()
            .unwrap();
        let (log, _sub) = record_changes(&vm);

        vm.set("Source", 21_i32);
        assert_eq!(*log.borrow(), vec!["Source", "Echo"]);
        assert_eq!(vm.get::<i32>("Echo").unwrap(), 42);
    }

    #[test]
    fn trigger_change_raises_enablement_without_running_predicate() {
        let predicate_runs = Rc::new(RefCell::new(0));
        let predicate_clone = Rc::clone(&predicate_runs);
        let vm = ViewModel::builder()
            .property("Text")
            .action("Something", |_, _| {})
            .predicate("Something", [DependsUpon::on("Text")], move |_, _| {
                *predicate_clone.borrow_mut() += 1;
                true
            })
            .build()
            .unwrap();

        let command = vm.command("Something").unwrap();
        let enablement_fired = Rc::new(RefCell::new(false));
        let fired_clone = Rc::clone(&enablement_fired);
        let _sub = command.subscribe_enablement(move || *fired_clone.borrow_mut() = true);

        vm.set("Text", "Foo".to_string());

        assert!(*enablement_fired.borrow());
        assert_eq!(*predicate_runs.borrow(), 0);
    }

    #[test]
    fn trigger_change_never_auto_executes_the_action() {
        let action_runs = Rc::new(RefCell::new(0));
        let action_clone = Rc::clone(&action_runs);
        let vm = ViewModel::builder()
            .property("Text")
            .action("Something", move |_, _| *action_clone.borrow_mut() += 1)
            .predicate("Something", [DependsUpon::on("Text")], |_, _| false)
            .build()
            .unwrap();

        vm.set("Text", "Foo".to_string());
        assert_eq!(*action_runs.borrow(), 0);

        // The engine does not gate execute on can_execute either.
        let command = vm.command("Something").unwrap();
        assert!(!command.can_execute(None));
        command.execute(None);
        assert_eq!(*action_runs.borrow(), 1);
    }

    #[test]
    fn command_is_retrievable_like_a_property() {
        let vm = ViewModel::builder()
            .action("Something", |_, _| {})
            .build()
            .unwrap();

        assert!(vm.contains("Something"));
        assert!(vm.get_value("Something").is_some());
        assert_eq!(vm.command("Something").unwrap().name(), "Something");
    }

    #[test]
    fn restoring_the_same_command_raises_no_signal() {
        // Command equality is identity.
        let vm = ViewModel::builder()
            .action("Something", |_, _| {})
            .build()
            .unwrap();
        let command = vm.command("Something").unwrap();
        let (log, _sub) = record_changes(&vm);

        vm.set("Something", command);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn score_percentage_output_scenario() {
        let vm = ViewModel::builder()
            .property("Score")
            .property_with("Percentage", [DependsUpon::on("Score")])
            .property_with("Output", [DependsUpon::on("Percentage")])
            .build()
            .unwrap();
        let (log, _sub) = record_changes(&vm);

        // Derived accessors as a wrapper type would define them.
        let percentage = |vm: &ViewModel| (100.0 * vm.get_or("Score", 0.0_f64)) as i32;
        let output = |vm: &ViewModel| format!("You scored {}%.", percentage(vm));

        vm.set("Score", 0.5_f64);

        assert_eq!(*log.borrow(), vec!["Score", "Percentage", "Output"]);
        assert_eq!(output(&vm), "You scored 50%.");
    }

    #[test]
    fn two_subscribers_receive_in_subscription_order() {
        let vm = ViewModel::builder().build().unwrap();
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&order);
        let _a = vm.subscribe(move |_| first.borrow_mut().push("first"));
        let second = Rc::clone(&order);
        let _b = vm.subscribe(move |_| second.borrow_mut().push("second"));

        vm.set("X", 1_i32);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn dropped_subscription_stops_delivery() {
        let vm = ViewModel::builder().build().unwrap();
        let (log, sub) = record_changes(&vm);

        vm.set("X", 1_i32);
        drop(sub);
        vm.set("X", 2_i32);

        assert_eq!(*log.borrow(), vec!["X"]);
    }

    #[test]
    fn clone_is_a_handle_to_the_same_instance() {
        let vm = ViewModel::builder().build().unwrap();
        let alias = vm.clone();

        alias.set("Shared", 9_i32);
        assert_eq!(vm.get::<i32>("Shared").unwrap(), 9);
    }
}
