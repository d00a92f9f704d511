#![forbid(unsafe_code)]

//! Declarative dependency graph.
//!
//! Members declare what they depend upon ("`Percentage` depends upon
//! `Score`"); the graph stores the inversion, trigger → dependents, in three
//! parallel maps sharing one trigger-name keyspace:
//!
//! - property dependents: names re-notified recursively on change;
//! - method dependents: callbacks executed after the property cascade;
//! - command dependents: commands whose enablement signal is raised.
//!
//! Built once at construction, immutable afterwards. Dependent order within
//! a trigger is declaration order, so propagation is deterministic and
//! reproducible.

use ahash::AHashMap;

/// A single dependency declaration attached to a property, method, or
/// predicate: "this member depends upon `trigger`".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependsUpon {
    trigger: String,
    strict: bool,
}

impl DependsUpon {
    /// Depend on `trigger` without existence checking.
    pub fn on(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            strict: false,
        }
    }

    /// Depend on `trigger`, requiring it to be a declared property at
    /// construction time.
    pub fn strict(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            strict: true,
        }
    }

    #[must_use]
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

/// Trigger → dependents adjacency, one map per dependent domain.
#[derive(Debug, Default)]
pub(crate) struct DependencyGraph {
    property_dependents: AHashMap<String, Vec<String>>,
    method_dependents: AHashMap<String, Vec<String>>,
    command_dependents: AHashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build the three adjacency maps by inverting per-domain forward
    /// declarations. Each forward slice is `(dependent, its declarations)`
    /// in declaration order, which the inversion preserves.
    pub(crate) fn new(
        properties: &[(String, Vec<DependsUpon>)],
        methods: &[(String, Vec<DependsUpon>)],
        commands: &[(String, Vec<DependsUpon>)],
    ) -> Self {
        Self {
            property_dependents: invert(properties),
            method_dependents: invert(methods),
            command_dependents: invert(commands),
        }
    }

    pub(crate) fn property_dependents_of(&self, trigger: &str) -> &[String] {
        dependents_of(&self.property_dependents, trigger)
    }

    pub(crate) fn method_dependents_of(&self, trigger: &str) -> &[String] {
        dependents_of(&self.method_dependents, trigger)
    }

    pub(crate) fn command_dependents_of(&self, trigger: &str) -> &[String] {
        dependents_of(&self.command_dependents, trigger)
    }

    /// Find a cycle in the property adjacency, if any, as the chain of
    /// trigger names that closes on itself.
    ///
    /// Only declared property edges are inspected; cycles routed through
    /// dependent methods are runtime data flow and cannot be detected here.
    pub(crate) fn find_property_cycle(&self) -> Option<Vec<String>> {
        let mut done: Vec<&str> = Vec::new();
        let mut path: Vec<&str> = Vec::new();

        // Deterministic scan order for reproducible error messages.
        let mut roots: Vec<&str> = self.property_dependents.keys().map(String::as_str).collect();
        roots.sort_unstable();

        for root in roots {
            if let Some(cycle) = self.walk(root, &mut path, &mut done) {
                return Some(cycle);
            }
        }
        None
    }

    fn walk<'a>(
        &'a self,
        node: &'a str,
        path: &mut Vec<&'a str>,
        done: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        if done.contains(&node) {
            return None;
        }
        if let Some(start) = path.iter().position(|seen| *seen == node) {
            let mut chain: Vec<String> = path[start..].iter().map(ToString::to_string).collect();
            chain.push(node.to_string());
            return Some(chain);
        }

        path.push(node);
        for dependent in self.property_dependents_of(node) {
            if let Some(cycle) = self.walk(dependent, path, done) {
                return Some(cycle);
            }
        }
        path.pop();
        done.push(node);
        None
    }
}

fn invert(forward: &[(String, Vec<DependsUpon>)]) -> AHashMap<String, Vec<String>> {
    let mut inverted: AHashMap<String, Vec<String>> = AHashMap::new();
    for (dependent, declarations) in forward {
        for declaration in declarations {
            inverted
                .entry(declaration.trigger().to_string())
                .or_default()
                .push(dependent.clone());
        }
    }
    inverted
}

fn dependents_of<'a>(map: &'a AHashMap<String, Vec<String>>, trigger: &str) -> &'a [String] {
    map.get(trigger).map_or(&[], Vec::as_slice)
}
