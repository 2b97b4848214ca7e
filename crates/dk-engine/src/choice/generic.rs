//! Dynamic choice generators.
//!
//! Content only declares the choices that are specific to a story. The
//! routine ones (picking up whatever lies around, opening whatever can be
//! opened, walking through exits) are derived from the current state here.
//! They are recomputed on every tick and never cached.

use dk_core::{GameContent, GameState};

use super::effect::Effect;
use super::rule::Choice;
use crate::rules::RuleSet;

/// One `pick_up_<item>` choice per item lying at the current location,
/// sorted by display text.
pub fn pickup(state: &GameState, content: &GameContent) -> Vec<Choice> {
    let mut choices: Vec<Choice> = state
        .items_here()
        .iter()
        .map(|item| {
            Choice::new(
                format!("pick_up_{item}"),
                format!("Pick up {}", content.item_name(item)),
            )
            .with_effect(Effect::GetItem { item: item.clone() })
            .with_template("generic_pickup", [("item", item.as_str())])
        })
        .collect();
    choices.sort_by(|a, b| a.text.cmp(&b.text));
    choices
}

/// One `open_<object>` choice per openable object at the current location
/// that is neither open nor locked, in the location's object order.
pub fn open(state: &GameState, content: &GameContent) -> Vec<Choice> {
    let Some(location) = content.location(state.current_location()) else {
        return Vec::new();
    };

    location
        .objects
        .iter()
        .filter_map(|id| {
            let def = content.furniture(id)?;
            let obj = state.object(id)?;
            if !def.can_open || obj.open || obj.locked {
                return None;
            }
            Some(
                Choice::new(format!("open_{id}"), format!("Open {}", def.name))
                    .with_effect(Effect::OpenObject { object: id.clone() })
                    .with_template("generic_open", [("object", id.as_str())]),
            )
        })
        .collect()
}

/// One `go_<direction>` choice per exit of the current location, in
/// declaration order. Exit conditions are carried over, so callers still
/// filter by availability.
pub fn travel(state: &GameState, content: &GameContent, rules: &RuleSet) -> Vec<Choice> {
    rules
        .exits_from(state.current_location())
        .iter()
        .map(|exit| {
            let text = exit.text.clone().unwrap_or_else(|| {
                format!(
                    "Go {} to {}",
                    exit.direction,
                    content.location_name(&exit.to)
                )
            });
            let mut choice = Choice::new(format!("go_{}", exit.direction), text)
                .with_effect(Effect::MoveTo {
                    location: exit.to.clone(),
                })
                .with_template("generic_move", [("location", exit.to.as_str())]);
            choice.conditions = exit.conditions.clone();
            choice
        })
        .collect()
}

/// Output of every generator, available ones only: pickups, then opens,
/// then exits.
pub fn generate(state: &GameState, content: &GameContent, rules: &RuleSet) -> Vec<Choice> {
    let mut choices = pickup(state, content);
    choices.extend(open(state, content));
    choices.extend(
        travel(state, content, rules)
            .into_iter()
            .filter(|c| c.is_available(state, content)),
    );
    choices
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::choice::{Condition, Exit};
    use dk_core::{
        FurnitureDef, FurnitureKind, Inventory, ItemDef, ItemId, LocationDef, LocationId,
        ObjectId, ObjectState,
    };

    fn test_world() -> (GameContent, GameState, RuleSet) {
        let content = GameContent::new()
            .with_item(ItemDef::new("candle", "candle"))
            .with_item(ItemDef::new("apple", "apple"))
            .with_item(ItemDef::new("rusty_key", "rusty key"))
            .with_location(
                LocationDef::new("attic", "Attic")
                    .with_item("candle")
                    .with_item("apple"),
                vec![
                    FurnitureDef::new("wooden_box", FurnitureKind::Container, "wooden box")
                        .openable()
                        .lockable(),
                    FurnitureDef::new("wardrobe", FurnitureKind::Container, "wardrobe")
                        .openable(),
                    FurnitureDef::new("jar", FurnitureKind::Jar, "jar").openable(),
                    FurnitureDef::new("shelf", FurnitureKind::Shelf, "shelf"),
                ],
            )
            .with_location(LocationDef::new("hall", "Hall"), vec![])
            .with_location(LocationDef::new("roof", "Roof"), vec![]);
        let objects = HashMap::from([
            (ObjectId::new("wooden_box"), ObjectState::closed(true)),
            (ObjectId::new("wardrobe"), ObjectState::closed(false)),
            (ObjectId::new("jar"), ObjectState::opened()),
        ]);
        let state = GameState::seed(&content, LocationId::new("attic"), Inventory::new(), objects)
            .unwrap();
        let mut rules = RuleSet::new();
        rules.add_exit(LocationId::new("attic"), Exit::new("down", "hall"));
        rules.add_exit(
            LocationId::new("attic"),
            Exit::new("up", "roof").with_condition(Condition::HasItem {
                item: ItemId::new("rusty_key"),
            }),
        );
        (content, state, rules)
    }

    #[test]
    fn pickup_is_sorted_by_text() {
        let (content, state, _) = test_world();
        let choices = pickup(&state, &content);
        let ids: Vec<_> = choices.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["pick_up_apple", "pick_up_candle"]);
        assert_eq!(choices[0].text, "Pick up apple");
        assert!(choices[0].conditions.is_empty());
    }

    #[test]
    fn open_skips_locked_open_and_fixed_objects() {
        let (content, state, _) = test_world();
        let choices = open(&state, &content);
        let ids: Vec<_> = choices.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["open_wardrobe"]);
    }

    #[test]
    fn travel_carries_exit_conditions() {
        let (content, state, rules) = test_world();
        let choices = travel(&state, &content, &rules);
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].id, "go_down");
        assert_eq!(choices[0].text, "Go down to Hall");
        assert_eq!(choices[1].conditions.len(), 1);
        assert!(!choices[1].is_available(&state, &content));
    }

    #[test]
    fn generate_filters_unavailable_exits() {
        let (content, state, rules) = test_world();
        let ids: Vec<_> = generate(&state, &content, &rules)
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(
            ids,
            vec!["pick_up_apple", "pick_up_candle", "open_wardrobe", "go_down"]
        );
    }

    #[test]
    fn generators_follow_state_changes() {
        let (content, mut state, _) = test_world();
        state.take_item_here(&ItemId::new("candle")).unwrap();
        let ids: Vec<_> = pickup(&state, &content).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["pick_up_apple"]);
    }
}
