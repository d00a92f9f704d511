#![forbid(unsafe_code)]

//! A dependent method: every `Score` change runs `WhenScoreChanges`, which
//! keeps an audit count and a high-water mark as ordinary properties.
//!
//! The method writes `BestScore` through the normal `set`, so that write
//! cascades too — re-entrancy is plain recursion.

use bindable::{DependsUpon, Result, Subscription, ViewModel};

pub struct AuditedScoreViewModel {
    vm: ViewModel,
}

impl AuditedScoreViewModel {
    pub fn new() -> Result<Self> {
        let vm = ViewModel::builder()
            .property("Score")
            .property("BestScore")
            .property("ChangeCount")
            .method("WhenScoreChanges", [DependsUpon::strict("Score")], |vm| {
                vm.set("ChangeCount", vm.get_or("ChangeCount", 0_u32) + 1);
                let score = vm.get_or("Score", 0.0_f64);
                if score > vm.get_or("BestScore", f64::MIN) {
                    vm.set("BestScore", score);
                }
            })
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
    pub fn best_score(&self) -> f64 {
        self.vm.get_or("BestScore", 0.0)
    }

    #[must_use]
    pub fn change_count(&self) -> u32 {
        self.vm.get_or("ChangeCount", 0)
    }

    pub fn subscribe(&self, callback: impl Fn(&str) + 'static) -> Subscription {
        self.vm.subscribe(callback)
    }
}
