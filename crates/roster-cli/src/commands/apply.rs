//! The `roster apply` command.

use std::path::PathBuf;

use anyhow::Result;

use roster_core::engine::{run_script, ScriptReport};
use roster_core::model::StudentRecord;
use roster_core::StudentSet;

use crate::config::{load_config_from, OutputFormat};

pub fn execute(
    script_path: Option<PathBuf>,
    format: Option<String>,
    stop_on_error: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let format: OutputFormat = match format {
        Some(f) => f.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?,
        None => config.default_format,
    };
    let path = script_path.unwrap_or_else(|| config.script_dir.clone());
    let scripts = super::load_scripts(&path)?;
    anyhow::ensure!(!scripts.is_empty(), "no scripts found in {}", path.display());

    let continue_on_error = config.continue_on_error && !stop_on_error;

    // Each script starts from an empty roster.
    let reports: Vec<ScriptReport> = scripts
        .iter()
        .map(|script| run_script(script, &mut StudentSet::new(), continue_on_error))
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Text => {
            for report in &reports {
                print_report(report, config.show_summary);
            }
        }
    }

    let failed: usize = reports.iter().map(|r| r.failed).sum();
    if failed > 0 {
        anyhow::bail!("{failed} op(s) failed");
    }

    Ok(())
}

fn print_report(report: &ScriptReport, show_summary: bool) {
    println!("Script: {} ({} ops)", report.script, report.ops.len());
    for op in &report.ops {
        println!("  [#{}] {}: {}", op.index, op.op, op.outcome);
    }
    if report.stopped_early {
        println!("  stopped after first failure");
    }

    if show_summary {
        println!("\n{}\n", roster_table(&report.roster));
    }
}

fn roster_table(students: &[StudentRecord]) -> comfy_table::Table {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["CPF", "Name", "Email", "Evaluations"]);

    for student in students {
        let evaluations = student
            .evaluations
            .iter()
            .map(|e| format!("{}={}", e.goal, e.grade))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(student.cpf.formatted()),
            Cell::new(&student.name),
            Cell::new(&student.email),
            Cell::new(evaluations),
        ]);
    }

    table
}
