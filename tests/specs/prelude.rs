//! Shared helpers for CLI specs.

use assert_cmd::Command;

/// Command for the foreman binary
pub fn foreman() -> Command {
    Command::cargo_bin("foreman").expect("foreman binary builds")
}
