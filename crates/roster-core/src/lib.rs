//! roster-core — in-memory student roster keyed by CPF.
//!
//! This crate defines the student data model, CPF normalization, the
//! [`StudentSet`](collection::StudentSet) collection, and the operation
//! scripts the CLI runs against it.

pub mod collection;
pub mod cpf;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;

pub use collection::StudentSet;
pub use cpf::Cpf;
pub use error::{CpfError, StudentSetError};
pub use model::{Concept, Evaluation, Grade, SharedEvaluation, SharedStudent, Student};
