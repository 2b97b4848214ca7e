use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use dk_engine::{GameSession, Presentation, Registry, SessionConfig};
use tracing::{debug, warn};

pub fn run(
    registry: &Registry,
    dir: &Path,
    start: Option<&str>,
    verbose: bool,
) -> Result<(), String> {
    let world = super::load_world(registry, dir)?;

    let mut config = SessionConfig::new().with_always_verbose(verbose);
    if let Some(start) = start {
        config = config.with_start(start);
    }

    let mut session = GameSession::with_narrator(
        world.content,
        world.rules,
        world.state,
        config,
        &world.narrator,
    )
    .map_err(|e| format!("failed to start session: {e}"))?;

    if !world.name.is_empty() {
        println!("  {}", world.name.bold());
    }
    println!("  Pick an option by number or id. Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();
    let mut fresh_tick = true;

    loop {
        if fresh_tick {
            print_presentation(&session.present());
            fresh_tick = false;
        }

        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "q" => {
                println!("Goodbye!");
                break;
            }
            "look" | "l" => println!("{}\n", session.look()),
            "inventory" | "i" => println!("{}\n", session.inventory_text()),
            "options" | "o" => fresh_tick = true,
            "help" | "h" | "?" => print_help(),
            _ => match session.select(input) {
                Ok(text) if text.is_empty() => fresh_tick = true,
                Ok(text) => {
                    println!("{text}\n");
                    fresh_tick = true;
                }
                Err(e) if e.is_recoverable() => {
                    debug!(input, error = %e, "selection rejected");
                    println!("{}\n", e.to_string().yellow());
                }
                Err(e) => {
                    warn!(input, error = %e, "choice failed");
                    println!("{} {e}\n", "error:".red().bold());
                }
            },
        }
    }

    Ok(())
}

fn print_presentation(presentation: &Presentation) {
    println!("{}\n", presentation.description);
    if presentation.options.is_empty() {
        println!("  There is nothing to do here.\n");
        return;
    }
    for option in &presentation.options {
        println!("  {}. {}", option.key.to_string().bold(), option.text);
    }
    println!();
}

fn print_help() {
    println!("  <number> | <id>   take an option");
    println!("  look, l           describe this place again");
    println!("  inventory, i      show what you carry");
    println!("  options, o        list the options again");
    println!("  quit, q           leave the game\n");
}
