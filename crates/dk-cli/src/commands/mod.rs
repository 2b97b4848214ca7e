pub mod check;
pub mod list;
pub mod play;

use std::path::Path;

use colored::Colorize;
use dk_content::{Diagnostic, LoadedWorld};
use dk_engine::Registry;

/// Load and link the world at `dir`, printing warnings to stderr.
/// Load errors are rendered with miette before returning.
fn load_world(registry: &Registry, dir: &Path) -> Result<LoadedWorld, String> {
    match dk_content::load_path(dir, registry) {
        Ok(world) => {
            print_warnings(&world.warnings);
            Ok(world)
        }
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            Err(format!("cannot load world from {}", dir.display()))
        }
    }
}

fn print_warnings(warnings: &[Diagnostic]) {
    for warning in warnings {
        eprintln!("  {} {warning}", "warning:".yellow().bold());
        if let Some(help) = &warning.help {
            eprintln!("    {} {help}", "help:".cyan());
        }
    }
    if !warnings.is_empty() {
        eprintln!(
            "  {} warning{}",
            warnings.len(),
            if warnings.len() == 1 { "" } else { "s" },
        );
    }
}
