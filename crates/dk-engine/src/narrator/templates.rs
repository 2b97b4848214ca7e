//! Template registry for narrative text generation.

use std::collections::HashMap;

use dk_core::{FurnitureDef, GameContent, GameState, ObjectState, state::TURNED_ON};

use super::config::NarratorConfig;
use crate::choice::ResultText;
use crate::error::{ConfigError, EngineResult};

/// Built-in result templates, by key. Placeholders are `{param}`.
pub const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("generic_unlock", "You unlock {object} with {item}."),
    ("generic_pickup", "You pick up {item}."),
    ("generic_drop", "You drop {item}."),
    ("generic_open", "You open {object}."),
    ("generic_close", "You close {object}."),
    ("generic_move", "You go to {location}."),
];

/// Registry of narrative templates.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<String, String>,
    show_furniture: bool,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new(&NarratorConfig::default())
    }
}

impl TemplateRegistry {
    /// Create a registry from the built-in templates plus the overrides in
    /// `config`.
    pub fn new(config: &NarratorConfig) -> Self {
        let mut templates: HashMap<String, String> = DEFAULT_TEMPLATES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        templates.extend(config.templates.clone());
        Self {
            templates,
            show_furniture: config.show_furniture,
        }
    }

    /// Whether a template key is known.
    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// Resolve a result text.
    ///
    /// Template parameters naming an item, object or location are replaced
    /// by its display name; anything else is inserted verbatim.
    pub fn render(&self, result: &ResultText, content: &GameContent) -> EngineResult<String> {
        match result {
            ResultText::Literal(text) => Ok(text.clone()),
            ResultText::Template { key, params } => {
                let template = self
                    .templates
                    .get(key)
                    .ok_or_else(|| ConfigError::UnknownTemplate(key.clone()))?;
                let mut text = template.clone();
                for (name, raw) in params {
                    let value = content.display_name(raw).unwrap_or(raw);
                    text = text.replace(&format!("{{{name}}}"), value);
                }
                Ok(text)
            }
        }
    }

    /// Describe the player's current location.
    ///
    /// The terse form is the name and the items lying around. The verbose
    /// form adds the description and, unless disabled, one status line per
    /// piece of furniture.
    pub fn describe_location(
        &self,
        state: &GameState,
        content: &GameContent,
        verbose: bool,
    ) -> String {
        let id = state.current_location();
        let mut output = format!("**{}**", content.location_name(id));

        if verbose {
            if let Some(location) = content.location(id) {
                if !location.description.is_empty() {
                    output.push('\n');
                    output.push_str(&location.description);
                }
                if self.show_furniture {
                    for object in &location.objects {
                        if let (Some(def), Some(obj)) =
                            (content.furniture(object), state.object(object))
                        {
                            output.push('\n');
                            output.push_str(&furniture_status(def, obj, content));
                        }
                    }
                }
            }
        }

        for item in state.items_here() {
            output.push('\n');
            output.push_str(&format!("You see {} here.", content.item_name(item)));
        }

        output
    }

    /// Describe the player's inventory.
    pub fn describe_inventory(&self, state: &GameState, content: &GameContent) -> String {
        let inventory = state.inventory();
        if inventory.is_empty() {
            return "You are carrying nothing.".to_string();
        }

        let mut output = String::from("You are carrying:");
        for (item, qty) in inventory.iter() {
            output.push_str("\n  - ");
            output.push_str(content.item_name(item));
            if qty > 1 {
                output.push_str(&format!(" (x{qty})"));
            }
        }
        output
    }
}

fn furniture_status(def: &FurnitureDef, obj: &ObjectState, content: &GameContent) -> String {
    let name = &def.name;

    if def.turnable {
        let power = if obj.flag(TURNED_ON) { "on" } else { "off" };
        return format!("The {name} is {power}.");
    }

    let mut line = if !def.can_open {
        format!("There is a {name} here.")
    } else if obj.open {
        format!("The {name} is open.")
    } else if obj.locked {
        format!("The {name} is closed and locked.")
    } else {
        format!("The {name} is closed.")
    };

    let visible = obj.open || def.is_transparent;
    if visible && !obj.contents.is_empty() {
        let names: Vec<&str> = obj.contents.iter().map(|i| content.item_name(i)).collect();
        line.push_str(&format!(" Inside: {}.", names.join(", ")));
    }
    line
}
