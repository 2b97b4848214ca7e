use std::collections::HashMap;

use dk_core::{GameContent, GameState, LocationId};

use crate::choice::{Choice, Exit};

/// The declared half of a story: content choices and location exits.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    choices: Vec<Choice>,
    exits: HashMap<LocationId, Vec<Exit>>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declared choice. Presentation follows insertion order.
    pub fn add_choice(&mut self, choice: Choice) {
        self.choices.push(choice);
    }

    /// Add an exit leaving `from`.
    pub fn add_exit(&mut self, from: LocationId, exit: Exit) {
        self.exits.entry(from).or_default().push(exit);
    }

    /// Builder form of [`RuleSet::add_choice`].
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.add_choice(choice);
        self
    }

    /// Builder form of [`RuleSet::add_exit`].
    pub fn with_exit(mut self, from: impl Into<LocationId>, exit: Exit) -> Self {
        self.add_exit(from.into(), exit);
        self
    }

    /// All declared choices.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Find a declared choice by id.
    pub fn choice(&self, id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == id)
    }

    /// Exits leaving a location.
    pub fn exits_from(&self, location: &LocationId) -> &[Exit] {
        self.exits.get(location).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of exits.
    pub fn exit_count(&self) -> usize {
        self.exits.values().map(Vec::len).sum()
    }

    /// Declared choices that are available right now.
    pub fn available<'a>(
        &'a self,
        state: &'a GameState,
        content: &'a GameContent,
    ) -> impl Iterator<Item = &'a Choice> + 'a {
        self.choices
            .iter()
            .filter(move |c| c.is_available(state, content))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::choice::Condition;
    use dk_core::{Inventory, LocationDef};

    #[test]
    fn available_filters_in_declaration_order() {
        let content = GameContent::new()
            .with_location(LocationDef::new("attic", "Attic"), vec![])
            .with_location(LocationDef::new("hall", "Hall"), vec![]);
        let state = GameState::seed(
            &content,
            LocationId::new("attic"),
            Inventory::new(),
            HashMap::new(),
        )
        .unwrap();

        let rules = RuleSet::new()
            .with_choice(Choice::new("b_wait", "Wait"))
            .with_choice(
                Choice::new("sing", "Sing in the hall").with_condition(Condition::InLocation {
                    location: LocationId::new("hall"),
                }),
            )
            .with_choice(Choice::new("a_listen", "Listen"));

        let ids: Vec<_> = rules
            .available(&state, &content)
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b_wait", "a_listen"]);
        assert!(rules.choice("sing").is_some());
    }

    #[test]
    fn exits_default_to_empty() {
        let rules = RuleSet::new().with_exit("attic", Exit::new("down", "hall"));
        assert_eq!(rules.exits_from(&LocationId::new("attic")).len(), 1);
        assert!(rules.exits_from(&LocationId::new("hall")).is_empty());
        assert_eq!(rules.exit_count(), 1);
    }
}
