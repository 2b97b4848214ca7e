//! Guarded choices and exits.

use std::collections::BTreeMap;

use dk_core::{GameContent, GameState, ItemId, LocationId, ObjectId};
use tracing::debug;

use super::condition::Condition;
use super::effect::Effect;
use crate::error::{EngineError, EngineResult};
use crate::narrator::TemplateRegistry;

/// A world entity referenced by a condition or effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// An item.
    Item(&'a ItemId),
    /// A piece of furniture.
    Object(&'a ObjectId),
    /// A location.
    Location(&'a LocationId),
}

/// What the player reads after a choice is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultText {
    /// Fixed text.
    Literal(String),
    /// A narrator template, interpolated with display names of the ids in
    /// `params`.
    Template {
        /// Template key, e.g. `generic_open`.
        key: String,
        /// Placeholder name to raw id (or literal text).
        params: BTreeMap<String, String>,
    },
}

impl Default for ResultText {
    fn default() -> Self {
        ResultText::Literal(String::new())
    }
}

/// A guarded, player-selectable action.
///
/// A choice is stateless: it can be evaluated and applied any number of
/// times. Availability is recomputed from the state on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Unique identifier.
    pub id: String,
    /// Text shown in the option list.
    pub text: String,
    /// All must hold for the choice to be available.
    pub conditions: Vec<Condition>,
    /// Applied in order when the choice is taken.
    pub effects: Vec<Effect>,
    /// Text shown after applying.
    pub result: ResultText,
}

impl Choice {
    /// Create an unconditional choice with no effects.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            conditions: Vec::new(),
            effects: Vec::new(),
            result: ResultText::default(),
        }
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Set a literal result text.
    pub fn with_result_text(mut self, text: impl Into<String>) -> Self {
        self.result = ResultText::Literal(text.into());
        self
    }

    /// Set a templated result.
    pub fn with_template<K, V>(
        mut self,
        key: impl Into<String>,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.result = ResultText::Template {
            key: key.into(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        };
        self
    }

    /// Evaluate every condition in order, stopping at the first false one.
    ///
    /// Condition errors are returned with the choice id attached.
    pub fn check(&self, state: &GameState, content: &GameContent) -> EngineResult<bool> {
        for condition in &self.conditions {
            let holds = condition
                .evaluate(state, content)
                .map_err(|source| EngineError::Condition {
                    choice: self.id.clone(),
                    condition: condition.name(),
                    source,
                })?;
            if !holds {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether the choice can be taken. A condition that cannot be
    /// evaluated makes the choice unavailable.
    pub fn is_available(&self, state: &GameState, content: &GameContent) -> bool {
        match self.check(state, content) {
            Ok(available) => available,
            Err(err) => {
                debug!(choice = %self.id, error = %err, "condition not satisfiable");
                false
            }
        }
    }

    /// Apply the choice and return the result text.
    ///
    /// Availability is re-checked first. Effects run in order against a
    /// staged copy of the state, which replaces `state` only once every
    /// effect has succeeded; on error `state` is untouched.
    pub fn apply(
        &self,
        state: &mut GameState,
        content: &GameContent,
        templates: &TemplateRegistry,
    ) -> EngineResult<String> {
        if !self.check(state, content)? {
            return Err(EngineError::PreconditionsNotMet {
                choice: self.id.clone(),
            });
        }

        let mut staged = state.clone();
        for effect in &self.effects {
            effect
                .apply(&mut staged, content)
                .map_err(|source| EngineError::Effect {
                    choice: self.id.clone(),
                    effect: effect.name(),
                    source,
                })?;
            debug!(choice = %self.id, effect = effect.name(), "effect applied");
        }

        let text = templates.render(&self.result, content)?;
        *state = staged;
        Ok(text)
    }
}

/// A way out of a location, offered as a `go_<direction>` choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    /// Direction label, e.g. `down`.
    pub direction: String,
    /// Destination.
    pub to: LocationId,
    /// Override for the option text.
    pub text: Option<String>,
    /// All must hold for the exit to be offered.
    pub conditions: Vec<Condition>,
}

impl Exit {
    /// Create an unconditional exit.
    pub fn new(direction: impl Into<String>, to: impl Into<LocationId>) -> Self {
        Self {
            direction: direction.into(),
            to: to.into(),
            text: None,
            conditions: Vec::new(),
        }
    }

    /// Set the option text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::narrator::NarratorConfig;
    use dk_core::{FurnitureDef, FurnitureKind, Inventory, ItemDef, LocationDef, ObjectState};

    fn test_world() -> (GameContent, GameState) {
        let content = GameContent::new()
            .with_item(ItemDef::new("rusty_key", "rusty key"))
            .with_item(ItemDef::new("gold_ring", "gold ring"))
            .with_location(
                LocationDef::new("attic", "Attic"),
                vec![
                    FurnitureDef::new("wooden_box", FurnitureKind::Container, "wooden box")
                        .openable()
                        .lockable()
                        .container(),
                ],
            )
            .with_location(LocationDef::new("hall", "Hall"), vec![]);
        let objects = HashMap::from([(
            ObjectId::new("wooden_box"),
            ObjectState::closed(true).with_content("gold_ring"),
        )]);
        let inventory: Inventory = [(ItemId::new("rusty_key"), 1)].into_iter().collect();
        let state = GameState::seed(&content, LocationId::new("attic"), inventory, objects).unwrap();
        (content, state)
    }

    fn templates() -> TemplateRegistry {
        TemplateRegistry::new(&NarratorConfig::default())
    }

    fn open_box() -> Choice {
        Choice::new("open_box", "Open the box with the key")
            .with_condition(Condition::HasItem {
                item: ItemId::new("rusty_key"),
            })
            .with_condition(Condition::ContainerLocked {
                object: ObjectId::new("wooden_box"),
            })
            .with_effect(Effect::ConsumeItem {
                item: ItemId::new("rusty_key"),
            })
            .with_effect(Effect::UnlockContainer {
                object: ObjectId::new("wooden_box"),
            })
            .with_effect(Effect::RevealContents {
                object: ObjectId::new("wooden_box"),
            })
            .with_template(
                "generic_unlock",
                [("object", "wooden_box"), ("item", "rusty_key")],
            )
    }

    #[test]
    fn empty_conditions_are_always_available() {
        let (content, state) = test_world();
        assert!(Choice::new("wait", "Wait").is_available(&state, &content));
    }

    #[test]
    fn apply_runs_effects_and_renders() {
        let (content, mut state) = test_world();
        let choice = open_box();
        assert!(choice.is_available(&state, &content));

        let text = choice.apply(&mut state, &content, &templates()).unwrap();
        assert_eq!(text, "You unlock wooden box with rusty key.");
        assert_eq!(state.inventory().quantity(&ItemId::new("gold_ring")), 1);
        assert!(!state.inventory().has(&ItemId::new("rusty_key")));
    }

    #[test]
    fn apply_rechecks_preconditions() {
        let (content, mut state) = test_world();
        let choice = open_box();
        choice.apply(&mut state, &content, &templates()).unwrap();

        let err = choice
            .apply(&mut state, &content, &templates())
            .unwrap_err();
        assert!(matches!(err, EngineError::PreconditionsNotMet { .. }));
    }

    #[test]
    fn failing_effect_leaves_state_untouched() {
        let (content, mut state) = test_world();
        let choice = Choice::new("broken", "Broken")
            .with_effect(Effect::ConsumeItem {
                item: ItemId::new("rusty_key"),
            })
            .with_effect(Effect::MoveTo {
                location: LocationId::new("roof"),
            });
        let before = state.clone();

        let err = choice
            .apply(&mut state, &content, &templates())
            .unwrap_err();
        match err {
            EngineError::Effect { choice, effect, .. } => {
                assert_eq!(choice, "broken");
                assert_eq!(effect, "move_to");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(state, before);
    }

    #[test]
    fn unsatisfiable_condition_is_unavailable_but_apply_reports_it() {
        let (content, mut state) = test_world();
        let choice = Choice::new("peek", "Peek into the chest").with_condition(
            Condition::ContainerLocked {
                object: ObjectId::new("iron_chest"),
            },
        );
        assert!(!choice.is_available(&state, &content));

        let err = choice
            .apply(&mut state, &content, &templates())
            .unwrap_err();
        assert!(matches!(err, EngineError::Condition { .. }));
    }

    #[test]
    fn literal_result_is_returned_verbatim() {
        let (content, mut state) = test_world();
        let choice = Choice::new("go_down", "Climb down")
            .with_effect(Effect::MoveTo {
                location: LocationId::new("hall"),
            })
            .with_result_text("You climb down the ladder.");
        let text = choice.apply(&mut state, &content, &templates()).unwrap();
        assert_eq!(text, "You climb down the ladder.");
        assert_eq!(state.current_location(), &LocationId::new("hall"));
    }
}
