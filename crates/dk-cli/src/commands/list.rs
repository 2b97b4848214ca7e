use std::path::Path;

use clap::ValueEnum;
use comfy_table::{ContentArrangement, Table};
use dk_content::LoadedWorld;
use dk_engine::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    /// Item definitions
    Items,
    /// Locations and their exits
    Locations,
    /// Furniture and what can be done with it
    Objects,
    /// Declared choices
    Choices,
}

pub fn run(registry: &Registry, dir: &Path, section: Section) -> Result<(), String> {
    let world = super::load_world(registry, dir)?;

    let (table, count, noun) = match section {
        Section::Items => (items_table(&world), world.content.item_count(), "items"),
        Section::Locations => (
            locations_table(&world),
            world.content.location_count(),
            "locations",
        ),
        Section::Objects => (
            objects_table(&world),
            world.content.furniture_count(),
            "objects",
        ),
        Section::Choices => (
            choices_table(&world),
            world.rules.choices().len(),
            "choices",
        ),
    };

    if count == 0 {
        println!("  No {noun} found.");
        return Ok(());
    }

    println!("{table}");
    println!();
    println!("  {count} {noun}");

    Ok(())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn items_table(world: &LoadedWorld) -> Table {
    let mut table = new_table(vec!["Id", "Name", "Consumable", "Description"]);
    let mut items: Vec<_> = world.content.items().collect();
    items.sort_by(|a, b| a.id.cmp(&b.id));
    for item in items {
        table.add_row(vec![
            item.id.to_string(),
            item.name.clone(),
            if item.consumable { "yes" } else { "no" }.to_string(),
            truncate(&item.description),
        ]);
    }
    table
}

fn locations_table(world: &LoadedWorld) -> Table {
    let mut table = new_table(vec!["Id", "Name", "Objects", "Exits"]);
    let mut locations: Vec<_> = world.content.locations().collect();
    locations.sort_by(|a, b| a.id.cmp(&b.id));
    for location in locations {
        let objects: Vec<&str> = location.objects.iter().map(|o| o.as_str()).collect();
        let exits: Vec<String> = world
            .rules
            .exits_from(&location.id)
            .iter()
            .map(|e| format!("{} -> {}", e.direction, e.to))
            .collect();
        table.add_row(vec![
            location.id.to_string(),
            location.name.clone(),
            dash_if_empty(objects.join(", ")),
            dash_if_empty(exits.join(", ")),
        ]);
    }
    table
}

fn objects_table(world: &LoadedWorld) -> Table {
    let mut table = new_table(vec!["Id", "Kind", "Name", "Location", "Can"]);
    let mut objects: Vec<_> = world.content.all_furniture().collect();
    objects.sort_by(|a, b| a.id.cmp(&b.id));
    for def in objects {
        let mut can = Vec::new();
        if def.can_open {
            can.push("open");
        }
        if def.can_lock {
            can.push("lock");
        }
        if def.is_container {
            can.push("hold");
        }
        if def.turnable {
            can.push("turn");
        }
        let location = world
            .content
            .object_location(&def.id)
            .map(|l| l.to_string())
            .unwrap_or_default();
        table.add_row(vec![
            def.id.to_string(),
            def.kind.to_string(),
            def.name.clone(),
            location,
            dash_if_empty(can.join(", ")),
        ]);
    }
    table
}

fn choices_table(world: &LoadedWorld) -> Table {
    let mut table = new_table(vec!["Id", "Text", "Conditions", "Effects"]);
    for choice in world.rules.choices() {
        let conditions: Vec<&str> = choice.conditions.iter().map(|c| c.name()).collect();
        let effects: Vec<&str> = choice.effects.iter().map(|e| e.name()).collect();
        table.add_row(vec![
            choice.id.clone(),
            choice.text.clone(),
            dash_if_empty(conditions.join(", ")),
            dash_if_empty(effects.join(", ")),
        ]);
    }
    table
}

fn truncate(text: &str) -> String {
    if text.is_empty() {
        "—".to_string()
    } else if text.chars().count() > 60 {
        let short: String = text.chars().take(57).collect();
        format!("{short}...")
    } else {
        text.to_string()
    }
}

fn dash_if_empty(text: String) -> String {
    if text.is_empty() {
        "—".to_string()
    } else {
        text
    }
}
