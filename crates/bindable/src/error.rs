#![forbid(unsafe_code)]

//! Construction-time errors.
//!
//! Every variant is raised by [`ViewModelBuilder::build`]; once an instance
//! exists, no engine operation fails. Unknown property names on `get`/`set`
//! are deliberately not errors (`get` yields a default, `set` creates the
//! entry) so dynamic, name-only properties work.
//!
//! [`ViewModelBuilder::build`]: crate::ViewModelBuilder::build

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BindError>;

#[derive(Debug, Error)]
pub enum BindError {
    /// A strict `DependsUpon` declaration names a property that was never
    /// declared.
    #[error("dependency target does not exist: {dependent} depends upon {trigger}")]
    MissingDependency { dependent: String, trigger: String },

    /// A member or trigger name is not a bare identifier.
    #[error("invalid member name: {name:?}")]
    InvalidName { name: String },

    /// Two members were declared under the same name.
    #[error("duplicate member declaration: {name}")]
    DuplicateMember { name: String },

    /// A predicate was registered with no matching action.
    #[error("predicate has no matching action: {name}")]
    OrphanPredicate { name: String },

    /// Property dependency declarations form a cycle; propagation would
    /// recurse without bound.
    #[error("property dependency cycle: {chain}")]
    DependencyCycle { chain: String },
}

impl BindError {
    #[must_use]
    pub fn missing_dependency(dependent: impl Into<String>, trigger: impl Into<String>) -> Self {
        Self::MissingDependency {
            dependent: dependent.into(),
            trigger: trigger.into(),
        }
    }

    #[must_use]
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }
}
