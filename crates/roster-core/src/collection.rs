//! The student collection.
//!
//! [`StudentSet`] keeps students in insertion order and is the only place
//! where CPF uniqueness is enforced. Lookups are linear scans; the
//! collection is meant for class-sized rosters.

use std::collections::HashSet;

use crate::cpf::Cpf;
use crate::error::StudentSetError;
use crate::model::{SharedEvaluation, SharedStudent, Student};

/// Ordered set of students, unique by CPF.
#[derive(Debug, Default)]
pub struct StudentSet {
    students: Vec<SharedStudent>,
}

/// What an update did to the stored evaluation list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Reconciled {
    updated: usize,
    added: usize,
    dropped: usize,
}

impl StudentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a student, failing if its CPF is already present.
    ///
    /// Returns the handle stored in the collection.
    ///
    /// # Panics
    ///
    /// Panics if any stored student is mutably borrowed.
    pub fn add(&mut self, student: Student) -> Result<SharedStudent, StudentSetError> {
        if self.find_by_cpf(student.cpf()).is_some() {
            return Err(StudentSetError::DuplicateKey(student.cpf().clone()));
        }

        tracing::debug!("adding student {}", student.cpf());
        let shared = student.shared();
        self.students.push(shared.clone());
        Ok(shared)
    }

    /// Remove the student with this CPF. Returns `false` if none matched.
    ///
    /// # Panics
    ///
    /// Panics if any stored student is mutably borrowed.
    pub fn remove(&mut self, cpf: &Cpf) -> bool {
        match self.position(cpf) {
            Some(index) => {
                self.students.remove(index);
                tracing::debug!("removed student {cpf}");
                true
            }
            None => false,
        }
    }

    /// Apply `updated` to the stored student with the same CPF.
    ///
    /// Name and email are overwritten on the existing record. Evaluations
    /// are reconciled by goal: matching goals get the incoming grade written
    /// into the existing evaluation, unknown goals are appended using the
    /// incoming handle, and stored goals missing from `updated` are dropped.
    /// If the stored list repeats a goal, only its first entry is kept.
    ///
    /// # Panics
    ///
    /// Panics if any stored student is mutably borrowed, or if the matching
    /// student is borrowed at all.
    pub fn update(&mut self, updated: Student) -> Result<SharedStudent, StudentSetError> {
        let (cpf, name, email, evaluations) = updated.into_parts();
        let existing = self
            .find_by_cpf(&cpf)
            .ok_or(StudentSetError::NotFound(cpf))?;

        let stats = {
            let mut student = existing.borrow_mut();
            student.set_name(name);
            student.set_email(email);
            reconcile(student.evaluations_mut(), evaluations)
        };

        tracing::debug!(
            "updated student {}: {} grade(s) changed in place, {} added, {} dropped",
            existing.borrow().cpf(),
            stats.updated,
            stats.added,
            stats.dropped
        );
        Ok(existing)
    }

    /// The stored handle for this CPF, if any.
    ///
    /// # Panics
    ///
    /// Panics if any stored student is mutably borrowed.
    pub fn find_by_cpf(&self, cpf: &Cpf) -> Option<SharedStudent> {
        self.position(cpf).map(|index| self.students[index].clone())
    }

    /// A new vector holding the same handles, in insertion order.
    pub fn get_all(&self) -> Vec<SharedStudent> {
        self.students.clone()
    }

    pub fn count(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    fn position(&self, cpf: &Cpf) -> Option<usize> {
        self.students.iter().position(|s| s.borrow().cpf() == cpf)
    }
}

/// Reconcile `existing` against `incoming` by goal, keeping the identity of
/// every stored evaluation whose goal survives.
fn reconcile(existing: &mut Vec<SharedEvaluation>, incoming: Vec<SharedEvaluation>) -> Reconciled {
    let mut stats = Reconciled::default();
    let mut goals = HashSet::with_capacity(incoming.len());

    for evaluation in incoming {
        // The incoming handle may also be a stored one; this read borrow
        // must end before any mutable borrow below.
        let (goal, grade) = {
            let e = evaluation.borrow();
            (e.goal().to_string(), e.grade())
        };

        match existing.iter().position(|e| e.borrow().goal() == goal) {
            Some(index) => {
                existing[index].borrow_mut().set_grade(grade);
                stats.updated += 1;
            }
            None => {
                existing.push(evaluation);
                stats.added += 1;
            }
        }
        goals.insert(goal);
    }

    // Each goal is taken once, so a repeated stored goal after its first
    // entry is dropped along with the goals that were not sent.
    let before = existing.len();
    existing.retain(|e| goals.remove(e.borrow().goal()));
    stats.dropped = before - existing.len();
    stats
}
