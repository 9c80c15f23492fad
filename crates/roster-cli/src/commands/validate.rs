//! The `roster validate` command.

use std::path::PathBuf;

use anyhow::Result;

use roster_core::parser::validate_script;

use crate::config::load_config_from;

pub fn execute(script_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    // Loaded even when --script is given, so a bad --config is reported.
    let config = load_config_from(config_path.as_deref())?;
    let path = script_path.unwrap_or(config.script_dir);
    let scripts = super::load_scripts(&path)?;

    let mut total_warnings = 0;

    for script in &scripts {
        println!("Script: {} ({} ops)", script.name, script.ops.len());

        let warnings = validate_script(script);
        for w in &warnings {
            let prefix = w
                .op_index
                .map(|i| format!("  [#{i}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All scripts valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
