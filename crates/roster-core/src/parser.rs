//! TOML operation-script parser.
//!
//! Loads scripts from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cpf::Cpf;
use crate::model::{EvaluationRecord, Grade, OpKind, Operation, Script, StudentRecord};

/// Intermediate TOML structure for parsing script files.
#[derive(Debug, Deserialize)]
struct TomlScriptFile {
    script: TomlScriptHeader,
    #[serde(default)]
    ops: Vec<TomlOperation>,
}

#[derive(Debug, Deserialize)]
struct TomlScriptHeader {
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlOperation {
    op: String,
    #[serde(default)]
    cpf: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    evaluations: Vec<TomlEvaluation>,
}

#[derive(Debug, Deserialize)]
struct TomlEvaluation {
    goal: String,
    grade: Grade,
}

/// Parse a single TOML file into a `Script`.
pub fn parse_script(path: &Path) -> Result<Script> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script file: {}", path.display()))?;

    parse_script_str(&content, path)
}

/// Parse a TOML string into a `Script` (useful for testing).
pub fn parse_script_str(content: &str, source_path: &Path) -> Result<Script> {
    let parsed: TomlScriptFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let ops = parsed
        .ops
        .into_iter()
        .enumerate()
        .map(|(i, op)| {
            convert_operation(op).with_context(|| {
                format!("invalid op #{} in {}", i + 1, source_path.display())
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Script {
        name: parsed.script.name,
        description: parsed.script.description,
        ops,
    })
}

fn convert_operation(op: TomlOperation) -> Result<Operation> {
    let kind: OpKind = op.op.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let cpf = op
        .cpf
        .as_deref()
        .map(Cpf::parse)
        .transpose()
        .context("invalid cpf")?;

    let require_cpf = || cpf.clone().ok_or_else(|| anyhow::anyhow!("{kind} requires a cpf"));

    let operation = match kind {
        OpKind::Add | OpKind::Update => {
            let record = StudentRecord {
                cpf: require_cpf()?,
                name: op
                    .name
                    .ok_or_else(|| anyhow::anyhow!("{kind} requires a name"))?,
                email: op
                    .email
                    .ok_or_else(|| anyhow::anyhow!("{kind} requires an email"))?,
                evaluations: op
                    .evaluations
                    .into_iter()
                    .map(|e| EvaluationRecord {
                        goal: e.goal,
                        grade: e.grade,
                    })
                    .collect(),
            };
            if kind == OpKind::Add {
                Operation::Add(record)
            } else {
                Operation::Update(record)
            }
        }
        OpKind::Remove => Operation::Remove(require_cpf()?),
        OpKind::Find => Operation::Find(require_cpf()?),
        OpKind::List => Operation::List,
        OpKind::Count => Operation::Count,
    };

    Ok(operation)
}

/// Recursively load all `.toml` script files from a directory, sorted by path.
pub fn load_script_directory(dir: &Path) -> Result<Vec<Script>> {
    let mut scripts = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            scripts.extend(load_script_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_script(&path) {
                Ok(script) => scripts.push(script),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(scripts)
}

/// A warning from script validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// One-based index of the op (if applicable).
    pub op_index: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate a script for common issues.
///
/// Membership is simulated over the op sequence starting from an empty
/// collection, so a warning here means the op will fail (or, for remove,
/// report `false`) when the script runs.
pub fn validate_script(script: &Script) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut present: HashSet<&Cpf> = HashSet::new();

    if script.ops.is_empty() {
        warnings.push(ValidationWarning {
            op_index: None,
            message: "script has no ops".into(),
        });
    }

    for (i, op) in script.ops.iter().enumerate() {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                op_index: Some(i + 1),
                message,
            })
        };

        match op {
            Operation::Add(record) => {
                if !present.insert(&record.cpf) {
                    warn(format!("add of {} will fail: CPF already present", record.cpf));
                }
            }
            Operation::Update(record) => {
                if !present.contains(&record.cpf) {
                    warn(format!("update of {} will fail: CPF not present", record.cpf));
                }
            }
            Operation::Remove(cpf) => {
                if !present.remove(cpf) {
                    warn(format!("remove of {cpf} matches no student"));
                }
            }
            Operation::Find(_) | Operation::List | Operation::Count => {}
        }

        if let Operation::Add(record) | Operation::Update(record) = op {
            if record.name.trim().is_empty() {
                warn("name is empty".into());
            }
            if !record.email.contains('@') {
                warn(format!("email {:?} has no '@'", record.email));
            }
            let mut goals = HashSet::new();
            for evaluation in &record.evaluations {
                if !goals.insert(evaluation.goal.as_str()) {
                    warn(format!("duplicate goal: {}", evaluation.goal));
                }
            }
        }
    }

    warnings
}
