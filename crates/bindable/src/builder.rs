#![forbid(unsafe_code)]

//! Explicit registration step for view-model instances.
//!
//! Reflection-driven metadata scanning has no Rust equivalent, so every
//! member is declared here instead: properties, dependent methods, and
//! action/predicate pairs, each with its `DependsUpon` declarations.
//! [`build`](ViewModelBuilder::build) validates the declarations, inverts
//! them into the three trigger-adjacency maps, materializes one command
//! entry per action, and returns the ready instance.
//!
//! Construction is the only failure point of the engine; see
//! [`BindError`] for the exhaustive list of rejections.

use std::rc::Rc;

use tracing::debug;

use crate::command::{ActionFn, Command, PredicateFn};
use crate::error::{BindError, Result};
use crate::graph::{DependencyGraph, DependsUpon};
use crate::signal::Signal;
use crate::store::PropertyStore;
use crate::value::Value;
use crate::viewmodel::{MethodFn, ViewModel, ViewModelInner};

/// Builder for [`ViewModel`] instances.
///
/// Declaration order is significant: dependents of a trigger are notified in
/// the order their declarations were registered.
#[derive(Default)]
pub struct ViewModelBuilder {
    properties: Vec<(String, Vec<DependsUpon>)>,
    methods: Vec<(String, Vec<DependsUpon>, MethodFn)>,
    actions: Vec<(String, ActionFn)>,
    predicates: Vec<(String, Vec<DependsUpon>, PredicateFn)>,
}

impl ViewModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a stored property with no dependencies.
    ///
    /// Declaring plain properties is optional for storage (writes create
    /// entries lazily) but required for them to satisfy strict dependency
    /// checks.
    pub fn property(self, name: impl Into<String>) -> Self {
        self.property_with(name, [])
    }

    /// Declare a property together with its `DependsUpon` declarations.
    ///
    /// Used for derived properties: when a trigger changes, the change
    /// signal for this property is re-raised (recursively), telling readers
    /// to re-query the accessor that computes it.
    pub fn property_with(
        mut self,
        name: impl Into<String>,
        depends: impl IntoIterator<Item = DependsUpon>,
    ) -> Self {
        self.properties
            .push((name.into(), depends.into_iter().collect()));
        self
    }

    /// Declare a dependent method, executed (no arguments) after the
    /// property cascade whenever one of its triggers changes.
    pub fn method(
        mut self,
        name: impl Into<String>,
        depends: impl IntoIterator<Item = DependsUpon>,
        body: impl Fn(&ViewModel) + 'static,
    ) -> Self {
        self.methods
            .push((name.into(), depends.into_iter().collect(), Rc::new(body)));
        self
    }

    /// Register an action operation. One command entry is synthesized per
    /// action and stored under the action's bare name.
    pub fn action(
        mut self,
        name: impl Into<String>,
        body: impl Fn(&ViewModel, Option<&Value>) + 'static,
    ) -> Self {
        self.actions.push((name.into(), Rc::new(body)));
        self
    }

    /// Register the can-execute predicate for the action of the same name.
    ///
    /// When one of `depends`'s triggers changes, the command's
    /// enablement-changed signal is raised; the predicate itself is only
    /// run when a caller queries `can_execute`.
    pub fn predicate(
        mut self,
        action: impl Into<String>,
        depends: impl IntoIterator<Item = DependsUpon>,
        body: impl Fn(&ViewModel, Option<&Value>) -> bool + 'static,
    ) -> Self {
        self.predicates
            .push((action.into(), depends.into_iter().collect(), Rc::new(body)));
        self
    }

    /// Validate the declarations and assemble the instance.
    ///
    /// # Errors
    ///
    /// - [`BindError::InvalidName`]: a member or trigger name is not a bare
    ///   identifier.
    /// - [`BindError::DuplicateMember`]: two members share a name.
    /// - [`BindError::OrphanPredicate`]: a predicate has no matching action.
    /// - [`BindError::MissingDependency`]: a strict trigger names an
    ///   undeclared property.
    /// - [`BindError::DependencyCycle`]: property declarations form a cycle.
    pub fn build(self) -> Result<ViewModel> {
        self.validate_names()?;
        self.validate_uniqueness()?;
        self.validate_pairing()?;
        self.validate_strict_triggers()?;

        let command_declarations: Vec<(String, Vec<DependsUpon>)> = self
            .predicates
            .iter()
            .map(|(action, depends, _)| (action.clone(), depends.clone()))
            .collect();
        let method_declarations: Vec<(String, Vec<DependsUpon>)> = self
            .methods
            .iter()
            .map(|(name, depends, _)| (name.clone(), depends.clone()))
            .collect();

        let graph = DependencyGraph::new(
            &self.properties,
            &method_declarations,
            &command_declarations,
        );
        if let Some(cycle) = graph.find_property_cycle() {
            return Err(BindError::DependencyCycle {
                chain: cycle.join(" -> "),
            });
        }

        debug!(
            properties = self.properties.len(),
            methods = self.methods.len(),
            actions = self.actions.len(),
            "view-model graph built"
        );

        let inner = Rc::new(ViewModelInner {
            store: PropertyStore::new(),
            graph,
            methods: self
                .methods
                .into_iter()
                .map(|(name, _, body)| (name, body))
                .collect(),
            changed: Signal::new(),
        });
        let vm = ViewModel::from_inner(Rc::clone(&inner));

        // Commands are stored through the normal set path; no subscribers
        // exist yet, so the first-write signals go nowhere.
        for (name, execute) in self.actions {
            let predicate = self
                .predicates
                .iter()
                .find(|(action, _, _)| *action == name)
                .map(|(_, _, body)| Rc::clone(body));
            let command = Command::new(name.clone(), Rc::downgrade(&inner), execute, predicate);
            vm.set_value(&name, Value::new(command));
        }

        Ok(vm)
    }

    fn validate_names(&self) -> Result<()> {
        let members = self
            .properties
            .iter()
            .map(|(name, depends)| (name, depends))
            .chain(self.methods.iter().map(|(name, depends, _)| (name, depends)))
            .chain(
                self.predicates
                    .iter()
                    .map(|(name, depends, _)| (name, depends)),
            );

        for (name, depends) in members {
            if !is_bare_identifier(name) {
                return Err(BindError::invalid_name(name));
            }
            for declaration in depends {
                if !is_bare_identifier(declaration.trigger()) {
                    return Err(BindError::invalid_name(declaration.trigger()));
                }
            }
        }
        for (name, _) in &self.actions {
            if !is_bare_identifier(name) {
                return Err(BindError::invalid_name(name));
            }
        }
        Ok(())
    }

    fn validate_uniqueness(&self) -> Result<()> {
        let mut seen: Vec<&str> = Vec::new();
        let names = self
            .properties
            .iter()
            .map(|(name, _)| name.as_str())
            .chain(self.methods.iter().map(|(name, _, _)| name.as_str()))
            .chain(self.actions.iter().map(|(name, _)| name.as_str()));

        for name in names {
            if seen.contains(&name) {
                return Err(BindError::DuplicateMember {
                    name: name.to_string(),
                });
            }
            seen.push(name);
        }

        let mut predicate_targets: Vec<&str> = Vec::new();
        for (action, _, _) in &self.predicates {
            if predicate_targets.contains(&action.as_str()) {
                return Err(BindError::DuplicateMember {
                    name: action.clone(),
                });
            }
            predicate_targets.push(action);
        }
        Ok(())
    }

    fn validate_pairing(&self) -> Result<()> {
        for (action, _, _) in &self.predicates {
            if !self.actions.iter().any(|(name, _)| name == action) {
                return Err(BindError::OrphanPredicate {
                    name: action.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_strict_triggers(&self) -> Result<()> {
        let declared: Vec<&str> = self
            .properties
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();

        let declarations = self
            .properties
            .iter()
            .map(|(name, depends)| (name, depends))
            .chain(self.methods.iter().map(|(name, depends, _)| (name, depends)))
            .chain(
                self.predicates
                    .iter()
                    .map(|(name, depends, _)| (name, depends)),
            );

        for (dependent, depends) in declarations {
            for declaration in depends {
                if declaration.is_strict() && !declared.contains(&declaration.trigger()) {
                    return Err(BindError::missing_dependency(
                        dependent,
                        declaration.trigger(),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
