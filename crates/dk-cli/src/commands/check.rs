use std::path::Path;

use dk_engine::Registry;

pub fn run(registry: &Registry, dir: &Path) -> Result<(), String> {
    let world = super::load_world(registry, dir)?;

    println!("  All checks passed for '{}'.", world.name);
    println!(
        "  {} items, {} locations, {} objects, {} choices, {} exits",
        world.content.item_count(),
        world.content.location_count(),
        world.content.furniture_count(),
        world.rules.choices().len(),
        world.rules.exit_count(),
    );

    Ok(())
}
