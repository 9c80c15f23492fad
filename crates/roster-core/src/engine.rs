//! Script execution against a [`StudentSet`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collection::StudentSet;
use crate::cpf::Cpf;
use crate::error::StudentSetError;
use crate::model::{OpKind, Operation, Script, SharedStudent, StudentRecord};

/// Why an operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    DuplicateKey,
    NotFound,
}

impl From<&StudentSetError> for FailureReason {
    fn from(err: &StudentSetError) -> Self {
        match err {
            StudentSetError::DuplicateKey(_) => FailureReason::DuplicateKey,
            StudentSetError::NotFound(_) => FailureReason::NotFound,
        }
    }
}

/// Result of applying one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OpOutcome {
    Added { student: StudentRecord },
    Updated { student: StudentRecord },
    Removed { cpf: Cpf, found: bool },
    Found { cpf: Cpf, student: Option<StudentRecord> },
    Listed { students: Vec<StudentRecord> },
    Counted { count: usize },
    Failed {
        cpf: Cpf,
        reason: FailureReason,
        message: String,
    },
}

impl OpOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, OpOutcome::Failed { .. })
    }
}

impl fmt::Display for OpOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpOutcome::Added { student } => write!(f, "added {} ({})", student.cpf, student.name),
            OpOutcome::Updated { student } => write!(
                f,
                "updated {} ({}, {} evaluation(s))",
                student.cpf,
                student.name,
                student.evaluations.len()
            ),
            OpOutcome::Removed { cpf, found: true } => write!(f, "removed {cpf}"),
            OpOutcome::Removed { cpf, found: false } => write!(f, "remove {cpf}: no such student"),
            OpOutcome::Found {
                cpf,
                student: Some(student),
            } => write!(f, "found {cpf}: {} <{}>", student.name, student.email),
            OpOutcome::Found { cpf, student: None } => write!(f, "find {cpf}: no such student"),
            OpOutcome::Listed { students } => write!(f, "listed {} student(s)", students.len()),
            OpOutcome::Counted { count } => write!(f, "count = {count}"),
            OpOutcome::Failed { message, .. } => write!(f, "FAILED: {message}"),
        }
    }
}

/// One applied operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpReport {
    /// One-based position in the script.
    pub index: usize,
    pub op: OpKind,
    pub outcome: OpOutcome,
}

/// Everything a script run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptReport {
    /// Name of the script that was run.
    pub script: String,
    /// Per-op results, in execution order.
    pub ops: Vec<OpReport>,
    /// Number of ops that failed.
    pub failed: usize,
    /// True if the run stopped at the first failure before reaching the end.
    pub stopped_early: bool,
    /// Collection contents after the last applied op.
    pub roster: Vec<StudentRecord>,
}

impl ScriptReport {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Apply a single operation to `set`.
pub fn apply(set: &mut StudentSet, op: &Operation) -> OpOutcome {
    let result = match op {
        Operation::Add(record) => set
            .add(record.clone().into_student())
            .map(|s| OpOutcome::Added {
                student: record_of(&s),
            }),
        Operation::Update(record) => set
            .update(record.clone().into_student())
            .map(|s| OpOutcome::Updated {
                student: record_of(&s),
            }),
        Operation::Remove(cpf) => Ok(OpOutcome::Removed {
            cpf: cpf.clone(),
            found: set.remove(cpf),
        }),
        Operation::Find(cpf) => Ok(OpOutcome::Found {
            cpf: cpf.clone(),
            student: set.find_by_cpf(cpf).as_ref().map(record_of),
        }),
        Operation::List => Ok(OpOutcome::Listed {
            students: snapshot(set),
        }),
        Operation::Count => Ok(OpOutcome::Counted { count: set.count() }),
    };

    result.unwrap_or_else(|err| OpOutcome::Failed {
        cpf: err.cpf().clone(),
        reason: FailureReason::from(&err),
        message: err.to_string(),
    })
}

/// Run every op of `script` against `set`, in order.
///
/// With `continue_on_error` unset, the run stops after the first failed op.
pub fn run_script(script: &Script, set: &mut StudentSet, continue_on_error: bool) -> ScriptReport {
    tracing::info!("running script {} ({} ops)", script.name, script.ops.len());

    let mut ops = Vec::with_capacity(script.ops.len());
    let mut failed = 0;
    let mut stopped_early = false;

    for (i, op) in script.ops.iter().enumerate() {
        let outcome = apply(set, op);
        if outcome.is_failure() {
            failed += 1;
            tracing::warn!("op #{} ({}) failed: {}", i + 1, op.kind(), outcome);
        } else {
            tracing::debug!("op #{} ({}): {}", i + 1, op.kind(), outcome);
        }

        let is_failure = outcome.is_failure();
        ops.push(OpReport {
            index: i + 1,
            op: op.kind(),
            outcome,
        });

        if is_failure && !continue_on_error {
            stopped_early = i + 1 < script.ops.len();
            break;
        }
    }

    ScriptReport {
        script: script.name.clone(),
        ops,
        failed,
        stopped_early,
        roster: snapshot(set),
    }
}

fn record_of(student: &SharedStudent) -> StudentRecord {
    student.borrow().to_record()
}

fn snapshot(set: &StudentSet) -> Vec<StudentRecord> {
    set.get_all().iter().map(record_of).collect()
}
