#![forbid(unsafe_code)]

//! Dependent derived properties: `Score` → `Percentage` → `Output`.
//!
//! `Percentage` and `Output` are never stored; they compute from their
//! triggers at read time. The dependency declarations make one `Score`
//! write re-signal all three names, depth-first, so a binding layer knows
//! to re-read the derived accessors.

use bindable::{DependsUpon, Result, Subscription, ViewModel};

pub struct ScoringViewModel {
    vm: ViewModel,
}

impl ScoringViewModel {
    pub fn new() -> Result<Self> {
        let vm = ViewModel::builder()
            .property("Score")
            .property_with("Percentage", [DependsUpon::strict("Score")])
            .property_with("Output", [DependsUpon::strict("Percentage")])
            .build()?;
        Ok(Self { vm })
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.vm.get_or("Score", 0.0)
    }

    pub fn set_score(&self, score: f64) {
        self.vm.set("Score", score);
    }

    #[must_use]
    pub fn percentage(&self) -> i32 {
        (100.0 * self.score()) as i32
    }

    #[must_use]
    pub fn output(&self) -> String {
        format!("You scored {}%.", self.percentage())
    }

    pub fn subscribe(&self, callback: impl Fn(&str) + 'static) -> Subscription {
        self.vm.subscribe(callback)
    }
}
