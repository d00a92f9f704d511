#![forbid(unsafe_code)]

//! Name-only dynamic properties and a parameterized action.
//!
//! `Friend` has no declared accessor anywhere; it exists purely as a store
//! key, yet `FriendSentence` depends on it and the `UpdateFriend` action
//! writes it — propagation is identical to a declared property.

use bindable::{DependsUpon, Result, Subscription, Value, ViewModel};

pub struct FriendViewModel {
    vm: ViewModel,
}

impl FriendViewModel {
    pub fn new() -> Result<Self> {
        let vm = ViewModel::builder()
            .property_with("FriendSentence", [DependsUpon::on("Friend")])
            .action("UpdateFriend", |vm, parameter| {
                if let Some(name) = parameter.and_then(|p| p.extract::<String>()) {
                    vm.set("Friend", name);
                }
            })
            .build()?;
        vm.set("Friend", "Brian".to_string());
        Ok(Self { vm })
    }

    #[must_use]
    pub fn friend_sentence(&self) -> String {
        let friend: String = self.vm.get_or_else("Friend", String::new);
        format!("My friend is {friend}.")
    }

    pub fn update_friend(&self, name: impl Into<String>) {
        self.vm
            .command("UpdateFriend")
            .expect("registered action")
            .execute(Some(&Value::new(name.into())));
    }

    pub fn subscribe(&self, callback: impl Fn(&str) + 'static) -> Subscription {
        self.vm.subscribe(callback)
    }
}
