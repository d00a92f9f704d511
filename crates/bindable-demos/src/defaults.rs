#![forbid(unsafe_code)]

//! Getter-supplied defaults and run-once lazy initialization.
//!
//! `text` falls back to a constant until first written; `session_id` is
//! computed on first read, stored through the normal set path, and never
//! recomputed.

use std::cell::Cell;

use bindable::{Result, ViewModel};

const DEFAULT_TEXT: &str = "This is the default value";

pub struct DefaultValuesViewModel {
    vm: ViewModel,
    session_inits: Cell<u32>,
}

impl DefaultValuesViewModel {
    pub fn new() -> Result<Self> {
        let vm = ViewModel::builder()
            .property("Text")
            .property("SessionId")
            .build()?;
        Ok(Self {
            vm,
            session_inits: Cell::new(0),
        })
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.vm.get_or("Text", DEFAULT_TEXT.to_string())
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.vm.set("Text", text.into());
    }

    /// Lazily initialized: the first read stores a generated id, later
    /// reads return it unchanged.
    #[must_use]
    pub fn session_id(&self) -> String {
        self.vm.get_or_init("SessionId", || {
            self.session_inits.set(self.session_inits.get() + 1);
            format!("session-{:04}", self.session_inits.get())
        })
    }

    #[cfg(test)]
    fn init_count(&self) -> u32 {
        self.session_inits.get()
    }
}
