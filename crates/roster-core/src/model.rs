//! Core data model types for roster.
//!
//! Students and evaluations are handed around as shared handles
//! ([`SharedStudent`], [`SharedEvaluation`]) so that an update through the
//! collection is visible to everything else holding the same record.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cpf::Cpf;

/// Shared, mutable handle to a [`Student`].
pub type SharedStudent = Rc<RefCell<Student>>;

/// Shared, mutable handle to an [`Evaluation`].
pub type SharedEvaluation = Rc<RefCell<Evaluation>>;

/// Categorical grade for a learning goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Concept {
    /// Goal not yet achieved ("meta ainda não atingida").
    Mana,
    /// Goal partially achieved.
    Mpa,
    /// Goal achieved.
    Ma,
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concept::Mana => write!(f, "MANA"),
            Concept::Mpa => write!(f, "MPA"),
            Concept::Ma => write!(f, "MA"),
        }
    }
}

impl FromStr for Concept {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MANA" => Ok(Concept::Mana),
            "MPA" => Ok(Concept::Mpa),
            "MA" => Ok(Concept::Ma),
            other => Err(format!("unknown concept: {other}")),
        }
    }
}

/// A grade: either a numeric score or a [`Concept`].
///
/// Serialized as a bare number or concept string. Deserializing a string
/// goes through [`Concept::from_str`], so names are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Grade {
    Score(f64),
    Concept(Concept),
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct GradeVisitor;

        impl serde::de::Visitor<'_> for GradeVisitor {
            type Value = Grade;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a numeric score or one of MANA, MPA, MA")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Grade, E> {
                Ok(Grade::Score(v as f64))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Grade, E> {
                Ok(Grade::Score(v as f64))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Grade, E> {
                Ok(Grade::Score(v))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Grade, E> {
                v.parse::<Concept>().map(Grade::Concept).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(GradeVisitor)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Score(score) => write!(f, "{score}"),
            Grade::Concept(concept) => write!(f, "{concept}"),
        }
    }
}

impl From<f64> for Grade {
    fn from(score: f64) -> Self {
        Grade::Score(score)
    }
}

impl From<Concept> for Grade {
    fn from(concept: Concept) -> Self {
        Grade::Concept(concept)
    }
}

/// A graded learning goal attached to a student.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    goal: String,
    grade: Grade,
}

impl Evaluation {
    pub fn new(goal: impl Into<String>, grade: impl Into<Grade>) -> Self {
        Self {
            goal: goal.into(),
            grade: grade.into(),
        }
    }

    /// Wrap this evaluation in a fresh shared handle.
    pub fn shared(self) -> SharedEvaluation {
        Rc::new(RefCell::new(self))
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn set_grade(&mut self, grade: impl Into<Grade>) {
        self.grade = grade.into();
    }
}

/// A student record. The CPF is fixed at construction; there is no setter.
#[derive(Debug)]
pub struct Student {
    cpf: Cpf,
    name: String,
    email: String,
    evaluations: Vec<SharedEvaluation>,
}

impl Student {
    pub fn new(cpf: Cpf, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            cpf,
            name: name.into(),
            email: email.into(),
            evaluations: Vec::new(),
        }
    }

    /// Builder-style helper that appends a new evaluation.
    pub fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluations.push(evaluation.shared());
        self
    }

    /// Wrap this student in a fresh shared handle.
    pub fn shared(self) -> SharedStudent {
        Rc::new(RefCell::new(self))
    }

    pub fn cpf(&self) -> &Cpf {
        &self.cpf
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn evaluations(&self) -> &[SharedEvaluation] {
        &self.evaluations
    }

    pub(crate) fn evaluations_mut(&mut self) -> &mut Vec<SharedEvaluation> {
        &mut self.evaluations
    }

    /// Append an existing evaluation handle, keeping its identity.
    pub fn push_evaluation(&mut self, evaluation: SharedEvaluation) {
        self.evaluations.push(evaluation);
    }

    /// First evaluation whose goal matches.
    pub fn evaluation(&self, goal: &str) -> Option<SharedEvaluation> {
        self.evaluations
            .iter()
            .find(|e| e.borrow().goal() == goal)
            .cloned()
    }

    pub(crate) fn into_parts(self) -> (Cpf, String, String, Vec<SharedEvaluation>) {
        (self.cpf, self.name, self.email, self.evaluations)
    }

    /// Take a plain, serializable copy of the current field values.
    pub fn to_record(&self) -> StudentRecord {
        StudentRecord {
            cpf: self.cpf.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            evaluations: self
                .evaluations
                .iter()
                .map(|e| EvaluationRecord::from(&*e.borrow()))
                .collect(),
        }
    }
}

/// Point-in-time copy of a [`Student`] for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub cpf: Cpf,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub evaluations: Vec<EvaluationRecord>,
}

impl StudentRecord {
    /// Build a new [`Student`] carrying fresh evaluation handles.
    pub fn into_student(self) -> Student {
        self.evaluations
            .into_iter()
            .fold(Student::new(self.cpf, self.name, self.email), |s, e| {
                s.with_evaluation(Evaluation::new(e.goal, e.grade))
            })
    }
}

/// Point-in-time copy of an [`Evaluation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub goal: String,
    pub grade: Grade,
}

impl From<&Evaluation> for EvaluationRecord {
    fn from(evaluation: &Evaluation) -> Self {
        Self {
            goal: evaluation.goal.clone(),
            grade: evaluation.grade,
        }
    }
}

/// A single step of a [`Script`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Add(StudentRecord),
    Update(StudentRecord),
    Remove(Cpf),
    Find(Cpf),
    List,
    Count,
}

impl Operation {
    /// Which kind of operation this is.
    pub fn kind(&self) -> OpKind {
        match self {
            Operation::Add(_) => OpKind::Add,
            Operation::Update(_) => OpKind::Update,
            Operation::Remove(_) => OpKind::Remove,
            Operation::Find(_) => OpKind::Find,
            Operation::List => OpKind::List,
            Operation::Count => OpKind::Count,
        }
    }

    /// The CPF this operation is keyed on, if any.
    pub fn cpf(&self) -> Option<&Cpf> {
        match self {
            Operation::Add(record) | Operation::Update(record) => Some(&record.cpf),
            Operation::Remove(cpf) | Operation::Find(cpf) => Some(cpf),
            Operation::List | Operation::Count => None,
        }
    }
}

/// Operation names accepted in script files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Add,
    Update,
    Remove,
    Find,
    List,
    Count,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Add => write!(f, "add"),
            OpKind::Update => write!(f, "update"),
            OpKind::Remove => write!(f, "remove"),
            OpKind::Find => write!(f, "find"),
            OpKind::List => write!(f, "list"),
            OpKind::Count => write!(f, "count"),
        }
    }
}

impl FromStr for OpKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(OpKind::Add),
            "update" => Ok(OpKind::Update),
            "remove" | "delete" => Ok(OpKind::Remove),
            "find" | "get" => Ok(OpKind::Find),
            "list" => Ok(OpKind::List),
            "count" => Ok(OpKind::Count),
            other => Err(format!("unknown operation: {other}")),
        }
    }
}

/// A named sequence of collection operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    /// Human-readable name.
    pub name: String,
    /// Description of what this script does.
    pub description: String,
    /// Operations, applied in order.
    pub ops: Vec<Operation>,
}
