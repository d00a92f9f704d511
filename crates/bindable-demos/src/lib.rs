#![forbid(unsafe_code)]

//! Example view-models built on the `bindable` engine.
//!
//! Each module shows one usage pattern: a typed wrapper struct owning a
//! [`bindable::ViewModel`] and exposing ordinary accessors over the string
//! keys. Derived accessors compute from their triggers at read time; the
//! engine's job is only to say *when* to re-read them.

pub mod defaults;
pub mod dependent_methods;
pub mod dynamic;
pub mod scoring;
pub mod text_commands;

pub use defaults::DefaultValuesViewModel;
pub use dependent_methods::AuditedScoreViewModel;
pub use dynamic::FriendViewModel;
pub use scoring::ScoringViewModel;
pub use text_commands::TextCommandsViewModel;
