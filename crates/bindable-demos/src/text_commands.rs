#![forbid(unsafe_code)]

//! A predicate-gated command: `MakeLower` lowercases `Input` into `Output`,
//! enabled only while `Input` is non-blank.
//!
//! The predicate's `DependsUpon("Input")` means every `Input` change raises
//! the command's enablement-changed signal; the predicate itself only runs
//! when a caller re-queries `can_execute`.

use bindable::{Command, DependsUpon, Result, ViewModel};

pub struct TextCommandsViewModel {
    vm: ViewModel,
}

impl TextCommandsViewModel {
    pub fn new() -> Result<Self> {
        let vm = ViewModel::builder()
            .property("Input")
            .property("Output")
            .action("MakeLower", |vm, _| {
                let input: String = vm.get_or_else("Input", String::new);
                vm.set("Output", input.to_lowercase());
            })
            .predicate("MakeLower", [DependsUpon::strict("Input")], |vm, _| {
                let input: String = vm.get_or_else("Input", String::new);
                !input.trim().is_empty()
            })
            .build()?;
        Ok(Self { vm })
    }

    #[must_use]
    pub fn input(&self) -> String {
        self.vm.get_or_else("Input", String::new)
    }

    pub fn set_input(&self, input: impl Into<String>) {
        self.vm.set("Input", input.into());
    }

    #[must_use]
    pub fn output(&self) -> String {
        self.vm.get_or_else("Output", String::new)
    }

    /// The synthesized command, retrievable like any property.
    #[must_use]
    pub fn make_lower(&self) -> Command {
        self.vm.command("MakeLower").expect("registered action")
    }
}
