//! Interactive session: the tick protocol between the engine and a front end.
//!
//! Each tick the front end calls [`GameSession::present`] to get the
//! location description and the numbered options, then hands one key back
//! to [`GameSession::select`]. A rejected key changes nothing.

use dk_core::{GameContent, GameState, LocationId};
use strsim::jaro_winkler;
use tracing::{debug, info};

use crate::choice::{Choice, generic};
use crate::error::{EngineError, EngineResult};
use crate::narrator::{NarratorConfig, TemplateRegistry};
use crate::rules::RuleSet;

/// Minimum similarity score for suggesting a choice id (0.0-1.0).
const FUZZY_THRESHOLD: f64 = 0.8;

/// Configuration for a game session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Start here instead of the world's start location.
    pub start: Option<LocationId>,
    /// Describe locations verbosely on every tick, not just the first visit.
    pub always_verbose: bool,
}

impl SessionConfig {
    /// Create a new session config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the start location.
    pub fn with_start(mut self, start: impl Into<LocationId>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Always use verbose location descriptions.
    pub fn with_always_verbose(mut self, verbose: bool) -> Self {
        self.always_verbose = verbose;
        self
    }
}

/// One numbered option offered to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    /// Option number, starting at 1.
    pub key: usize,
    /// Choice id, also accepted as a selection key.
    pub id: String,
    /// Display text.
    pub text: String,
}

/// Everything the front end shows for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// Tick counter: number of choices applied so far.
    pub tick: u64,
    /// Description of the current location.
    pub description: String,
    /// Available options, in presentation order.
    pub options: Vec<OptionEntry>,
}

/// A running game.
pub struct GameSession {
    content: GameContent,
    rules: RuleSet,
    state: GameState,
    templates: TemplateRegistry,
    config: SessionConfig,
    offered: Vec<Choice>,
    tick: u64,
}

impl GameSession {
    /// Create a session with the default narrator.
    pub fn new(
        content: GameContent,
        rules: RuleSet,
        state: GameState,
        config: SessionConfig,
    ) -> EngineResult<Self> {
        Self::with_narrator(content, rules, state, config, &NarratorConfig::default())
    }

    /// Create a session with a custom narrator configuration.
    ///
    /// Fails if the configured start location does not exist.
    pub fn with_narrator(
        content: GameContent,
        rules: RuleSet,
        mut state: GameState,
        config: SessionConfig,
        narrator: &NarratorConfig,
    ) -> EngineResult<Self> {
        if let Some(start) = &config.start {
            state.move_to(&content, start)?;
        }
        info!(location = %state.current_location(), "session started");

        Ok(Self {
            content,
            rules,
            state,
            templates: TemplateRegistry::new(narrator),
            config,
            offered: Vec::new(),
            tick: 0,
        })
    }

    /// The static world.
    pub fn content(&self) -> &GameContent {
        &self.content
    }

    /// The declared rules.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Number of choices applied so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Available choices: declared ones in declaration order, then
    /// generated ones.
    pub fn available_choices(&self) -> Vec<Choice> {
        let mut choices: Vec<Choice> = self
            .rules
            .available(&self.state, &self.content)
            .cloned()
            .collect();
        choices.extend(generic::generate(&self.state, &self.content, &self.rules));
        choices
    }

    /// Describe the location and number the available options.
    ///
    /// The description is verbose on the first visit to a location. The
    /// options stay valid for [`GameSession::select`] until a choice is
    /// applied.
    pub fn present(&mut self) -> Presentation {
        let first_visit = self.state.visit_current();
        let verbose = first_visit || self.config.always_verbose;
        let description = self
            .templates
            .describe_location(&self.state, &self.content, verbose);

        self.offered = self.available_choices();
        let options = self
            .offered
            .iter()
            .enumerate()
            .map(|(i, c)| OptionEntry {
                key: i + 1,
                id: c.id.clone(),
                text: c.text.clone(),
            })
            .collect();

        Presentation {
            tick: self.tick,
            description,
            options,
        }
    }

    /// Apply the option matching `key`, either its number or its choice id.
    ///
    /// On success the tick advances and the result text is returned. On any
    /// error the state and the tick are unchanged.
    pub fn select(&mut self, key: &str) -> EngineResult<String> {
        if self.offered.is_empty() {
            self.offered = self.available_choices();
        }

        let key = key.trim();
        let choice = self.find_offered(key).cloned().ok_or_else(|| {
            EngineError::InvalidSelection {
                key: key.to_string(),
                suggestion: self.suggest(key),
            }
        })?;

        debug!(choice = %choice.id, tick = self.tick, "applying choice");
        let text = choice.apply(&mut self.state, &self.content, &self.templates)?;
        self.tick += 1;
        self.offered.clear();
        Ok(text)
    }

    /// Describe the inventory.
    pub fn inventory_text(&self) -> String {
        self.templates.describe_inventory(&self.state, &self.content)
    }

    /// Verbose description of the current location, without marking it
    /// visited.
    pub fn look(&self) -> String {
        self.templates
            .describe_location(&self.state, &self.content, true)
    }

    fn find_offered(&self, key: &str) -> Option<&Choice> {
        if let Ok(n) = key.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| self.offered.get(i));
        }
        self.offered.iter().find(|c| c.id == key)
    }

    fn suggest(&self, key: &str) -> Option<String> {
        let key = key.to_lowercase();
        let mut best: Option<(&str, f64)> = None;
        for choice in &self.offered {
            let score = jaro_winkler(&key, &choice.id);
            if score >= FUZZY_THRESHOLD && best.is_none_or(|(_, s)| score > s) {
                best = Some((choice.id.as_str(), score));
            }
        }
        best.map(|(id, _)| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::choice::{Condition, Effect, Exit};
    use dk_core::{Inventory, ItemDef, ItemId, LocationDef};

    fn session(config: SessionConfig) -> GameSession {
        let content = GameContent::new()
            .with_item(ItemDef::new("candle", "candle"))
            .with_location(
                LocationDef::new("attic", "Attic")
                    .with_description("A low room under the roof.")
                    .with_item("candle"),
                vec![],
            )
            .with_location(LocationDef::new("hall", "Hall"), vec![]);
        let rules = RuleSet::new()
            .with_choice(
                Choice::new("light_candle", "Light the candle")
                    .with_condition(Condition::HasItem {
                        item: ItemId::new("candle"),
                    })
                    .with_effect(Effect::SetFlag {
                        flag: "candle_lit".to_string(),
                        value: true,
                    })
                    .with_result_text("The candle flickers to life."),
            )
            .with_exit("attic", Exit::new("down", "hall"))
            .with_exit("hall", Exit::new("up", "attic"));
        let state = GameState::seed(
            &content,
            LocationId::new("attic"),
            Inventory::new(),
            HashMap::new(),
        )
        .unwrap();
        GameSession::new(content, rules, state, config).unwrap()
    }

    #[test]
    fn present_numbers_options_from_one() {
        let mut s = session(SessionConfig::new());
        let p = s.present();
        let ids: Vec<_> = p.options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["pick_up_candle", "go_down"]);
        assert_eq!(p.options[0].key, 1);
        assert_eq!(p.options[1].text, "Go down to Hall");
        assert_eq!(p.tick, 0);
    }

    #[test]
    fn verbose_only_on_first_visit() {
        let mut s = session(SessionConfig::new());
        assert!(s.present().description.contains("A low room"));
        assert!(!s.present().description.contains("A low room"));

        let mut s = session(SessionConfig::new().with_always_verbose(true));
        s.present();
        assert!(s.present().description.contains("A low room"));
    }

    #[test]
    fn select_by_number_and_by_id() {
        let mut s = session(SessionConfig::new());
        s.present();
        assert_eq!(s.select("1").unwrap(), "You pick up candle.");
        assert_eq!(s.tick(), 1);

        s.present();
        assert_eq!(s.select("light_candle").unwrap(), "The candle flickers to life.");
        assert!(s.state().flag("candle_lit"));
        assert_eq!(s.tick(), 2);
    }

    #[test]
    fn invalid_selection_changes_nothing() {
        let mut s = session(SessionConfig::new());
        s.present();
        let before = s.state().clone();

        for key in ["0", "7", "dance"] {
            let err = s.select(key).unwrap_err();
            assert!(matches!(err, EngineError::InvalidSelection { .. }));
        }
        assert_eq!(s.state(), &before);
        assert_eq!(s.tick(), 0);
    }

    #[test]
    fn invalid_selection_suggests_close_id() {
        let mut s = session(SessionConfig::new());
        s.present();
        match s.select("pick_up_candel").unwrap_err() {
            EngineError::InvalidSelection { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("pick_up_candle"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn start_override_is_applied() {
        let s = session(SessionConfig::new().with_start("hall"));
        assert_eq!(s.state().current_location(), &LocationId::new("hall"));
    }

    #[test]
    fn unknown_start_override_fails() {
        let content = GameContent::new().with_location(LocationDef::new("attic", "Attic"), vec![]);
        let state = GameState::seed(
            &content,
            LocationId::new("attic"),
            Inventory::new(),
            HashMap::new(),
        )
        .unwrap();
        let result = GameSession::new(
            content,
            RuleSet::new(),
            state,
            SessionConfig::new().with_start("moon"),
        );
        assert!(matches!(result, Err(EngineError::Domain(_))));
    }

    #[test]
    fn select_without_present_uses_fresh_choices() {
        let mut s = session(SessionConfig::new());
        assert_eq!(s.select("go_down").unwrap(), "You go to Hall.");
        assert_eq!(s.state().current_location(), &LocationId::new("hall"));
    }
}
