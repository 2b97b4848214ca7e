//! End-to-end tests for the `dk` binary.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn attic() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../worlds/attic")
}

/// A world whose manifest points at a location that does not exist and
/// whose only choice uses an unregistered effect.
fn broken_world() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("world.json"),
        r#"{"name": "Broken", "start": "nowhere"}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("items.json"),
        r#"{"feather": {"name": "feather"}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("locations.json"),
        r#"{"attic": {"name": "Attic", "items": ["feather"]}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("choices.json"),
        r#"{"fly": {"text": "Fly away", "effects": [{"type": "teleport"}]}}"#,
    )
    .unwrap();
    dir
}

/// A valid world with one choice whose effect cannot succeed.
fn pantry_world() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("world.json"),
        r#"{"name": "Pantry", "start": "pantry"}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("items.json"),
        r#"{"apple": {"name": "apple"}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("locations.json"),
        r#"{"pantry": {"name": "Pantry", "items": ["apple"]}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("choices.json"),
        r#"{"eat_apple": {"text": "Eat the apple", "effects": [{"type": "consume_item", "item": "apple"}]}}"#,
    )
    .unwrap();
    dir
}

fn dk() -> Command {
    let mut cmd = Command::cargo_bin("dk").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_valid_world() {
    dk().args(["check", "--dir"])
        .arg(attic())
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed for 'The Attic'"))
        .stdout(predicate::str::contains(
            "5 items, 3 locations, 5 objects, 9 choices, 4 exits",
        ));
}

#[test]
fn check_reports_every_problem() {
    let dir = broken_world();
    dk().args(["check", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("world is invalid: 2 error(s)"))
        .stderr(predicate::str::contains("teleport"))
        .stderr(predicate::str::contains("nowhere"))
        .stderr(predicate::str::contains("error: cannot load world"));
}

#[test]
fn check_missing_directory() {
    dk().args(["check", "--dir", "/nonexistent/world"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[test]
fn list_items() {
    dk().args(["list", "items", "--dir"])
        .arg(attic())
        .assert()
        .success()
        .stdout(predicate::str::contains("rusty_key"))
        .stdout(predicate::str::contains("5 items"));
}

#[test]
fn list_choices() {
    dk().args(["list", "choices", "--dir"])
        .arg(attic())
        .assert()
        .success()
        .stdout(predicate::str::contains("open_box"))
        .stdout(predicate::str::contains("unlock_container"))
        .stdout(predicate::str::contains("9 choices"));
}

#[test]
fn list_objects_shows_locations() {
    dk().args(["list", "objects", "--dir"])
        .arg(attic())
        .assert()
        .success()
        .stdout(predicate::str::contains("wardrobe"))
        .stdout(predicate::str::contains("hall"));
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_opens_the_box() {
    dk().args(["play", "--dir"])
        .arg(attic())
        .write_stdin("1\ninventory\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("**Attic**"))
        .stdout(predicate::str::contains("1. Open the wooden box with the rusty key"))
        .stdout(predicate::str::contains("You unlock wooden box with rusty key."))
        .stdout(predicate::str::contains("  - gold ring"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn play_rejects_unknown_option() {
    dk().args(["play", "--dir"])
        .arg(attic())
        .write_stdin("opne_box\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("no option \"opne_box\""))
        .stdout(predicate::str::contains("did you mean \"open_box\""));
}

#[test]
fn play_ends_on_eof() {
    dk().args(["play", "--dir"])
        .arg(attic())
        .write_stdin("")
        .assert()
        .success();
}

#[test]
fn play_with_start_override() {
    dk().args(["play", "--start", "cellar", "--dir"])
        .arg(attic())
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("**Cellar**"))
        .stdout(predicate::str::contains("Pick up box of matches"));
}

#[test]
fn play_with_unknown_start_fails() {
    dk().args(["play", "--start", "moon", "--dir"])
        .arg(attic())
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to start session"));
}

#[test]
fn play_reports_failed_effect_and_goes_on() {
    let dir = pantry_world();
    dk().args(["play", "--dir"])
        .arg(dir.path())
        .write_stdin("eat_apple\npick_up_apple\neat_apple\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "error: choice \"eat_apple\": effect consume_item failed: item not held: apple",
        ))
        .stdout(predicate::str::contains("You pick up apple."))
        .stdout(predicate::str::contains("Goodbye!"));
}
