//! Error types for identifiers and the student collection.

use thiserror::Error;

use crate::cpf::Cpf;

/// Errors raised while normalizing a CPF.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpfError {
    /// Nothing remained after stripping whitespace and separators.
    #[error("CPF is empty")]
    Empty,

    /// The input contained something other than digits, `.` or `-`.
    #[error("invalid character {found:?} in CPF {input:?}")]
    InvalidCharacter { input: String, found: char },
}

/// Errors raised by [`StudentSet`](crate::collection::StudentSet) operations.
///
/// `remove` never produces one of these; it reports a missing student by
/// returning `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudentSetError {
    /// A student with this CPF is already in the collection.
    #[error("student with CPF {0} already exists")]
    DuplicateKey(Cpf),

    /// No student with this CPF is in the collection.
    #[error("student with CPF {0} not found")]
    NotFound(Cpf),
}

impl StudentSetError {
    /// The identifier the failed operation was keyed on.
    pub fn cpf(&self) -> &Cpf {
        match self {
            StudentSetError::DuplicateKey(cpf) | StudentSetError::NotFound(cpf) => cpf,
        }
    }
}
