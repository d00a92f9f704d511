#![forbid(unsafe_code)]

//! Reactive state containers for view-models.
//!
//! `bindable` provides a generic named-property store with automatic change
//! notification, a declarative dependency graph that propagates invalidation
//! across properties, dependent-method execution, and command re-evaluation
//! signaling, plus a command registry keyed by action name.
//!
//! - [`ViewModel`]: one instance's property graph — typed and erased
//!   `get`/`set`, change subscription, and the notification cascade.
//! - [`ViewModelBuilder`]: the one-time registration step declaring
//!   properties, dependent methods, and action/predicate pairs.
//! - [`DependsUpon`]: a dependency declaration attached to a member.
//! - [`Command`]: a synthesized execute/can-execute pair with its own
//!   enablement-changed signal, stored like a property.
//! - [`Value`]: the type-erased value slot with structural equality.
//!
//! # Architecture
//!
//! Single-threaded and fully synchronous. The graph is built once at
//! construction and immutable afterwards; dependency edges cannot change at
//! runtime. `set` runs its entire cascade before returning: the external
//! change signal, recursive property-dependent signals (depth-first, in
//! declared order), dependent methods, then command enablement signals.
//!
//! # Invariants
//!
//! 1. Assigning a structurally equal value raises no signal.
//! 2. Propagation order is declaration order, reproducibly.
//! 3. Strict dependency declarations are validated at construction; an
//!    instance either builds completely or not at all.
//! 4. The engine never invokes `execute` or `can_execute` on its own.
//!
//! # Example
//!
//! ```
//! use bindable::{DependsUpon, ViewModel};
//!
//! let vm = ViewModel::builder()
//!     .property("Score")
//!     .property_with("Percentage", [DependsUpon::strict("Score")])
//!     .build()?;
//!
//! let _sub = vm.subscribe(|name| println!("{name} changed"));
//! vm.set("Score", 0.5_f64); // prints "Score changed", "Percentage changed"
//! # Ok::<(), bindable::BindError>(())
//! ```

pub mod builder;
pub mod command;
pub mod error;
pub mod graph;
pub mod signal;
mod store;
pub mod value;
pub mod viewmodel;

pub use builder::ViewModelBuilder;
pub use command::Command;
pub use error::{BindError, Result};
pub use graph::DependsUpon;
pub use signal::{Signal, Subscription};
pub use value::{PropertyValue, Value};
pub use viewmodel::ViewModel;
