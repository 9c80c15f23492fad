//! The `roster init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("roster.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("scripts").context("failed to create scripts/")?;
    write_if_missing(Path::new("scripts/example.toml"), EXAMPLE_SCRIPT)?;

    println!("\n{NEXT_STEPS}");
    Ok(())
}

/// Write `content` to `path` unless something is already there.
fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

const NEXT_STEPS: &str = "Next steps:
  1. Edit the ops in scripts/example.toml (add, update, remove, find, list, count).
  2. Preview failures before touching the roster: roster validate
  3. Apply every script in script_dir: roster apply
  4. For machine-readable outcomes: roster apply --format json";

const SAMPLE_CONFIG: &str = r#"# roster configuration

default_format = "text"
continue_on_error = true
show_summary = true
script_dir = "./scripts"
"#;

const EXAMPLE_SCRIPT: &str = r#"[script]
name = "Example"
description = "Enroll two students, grade them, and drop one"

[[ops]]
op = "add"
cpf = "123.456.789-00"
name = "Ana Souza"
email = "ana@example.com"
evaluations = [
    { goal = "Requirements", grade = "MPA" },
    { goal = "Testing", grade = "MANA" },
]

[[ops]]
op = "add"
cpf = "987.654.321-00"
name = "Bruno Lima"
email = "bruno@example.com"

[[ops]]
op = "update"
cpf = "123.456.789-00"
name = "Ana Souza"
email = "ana.souza@example.com"
evaluations = [{ goal = "Requirements", grade = "MA" }]

[[ops]]
op = "remove"
cpf = "98765432100"

[[ops]]
op = "find"
cpf = "12345678900"

[[ops]]
op = "count"
"#;
