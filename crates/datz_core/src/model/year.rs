//! Year/subject domain model.
//!
//! # Responsibility
//! - Define the persisted shape of a school year and its weighted subjects.
//! - Validate structural invariants before records reach the backing store.
//!
//! # Invariants
//! - `Year::name` is the record identity and its storage key suffix.
//! - Subjects inside a `CombiMeta` never carry another `CombiMeta`.
//! - Coefficients are finite and non-negative.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One weighted subject of a year.
///
/// Serialized field names (`name`, `coef`, `combiMeta`) are the stable wire
/// contract for records persisted by earlier app versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMeta {
    pub name: String,
    pub coef: f32,
    /// Present when the subject score is derived from weighted sub-subjects.
    #[serde(
        rename = "combiMeta",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub combi_meta: Option<CombiMeta>,
}

impl SubjectMeta {
    /// Creates a plain subject whose score is entered directly.
    pub fn new(name: impl Into<String>, coef: f32) -> Self {
        Self {
            name: name.into(),
            coef,
            combi_meta: None,
        }
    }

    /// Creates a composite subject backed by `combi_meta`.
    pub fn composite(name: impl Into<String>, coef: f32, combi_meta: CombiMeta) -> Self {
        Self {
            name: name.into(),
            coef,
            combi_meta: Some(combi_meta),
        }
    }

    pub fn is_composite(&self) -> bool {
        self.combi_meta.is_some()
    }
}

/// Weighted sub-components of a composite subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombiMeta {
    pub subjects: Vec<SubjectMeta>,
}

impl CombiMeta {
    pub fn new(subjects: Vec<SubjectMeta>) -> Self {
        Self { subjects }
    }

    /// Sum of sub-subject weights. Independent of the owning subject's `coef`.
    pub fn total_coef(&self) -> f32 {
        self.subjects.iter().map(|subject| subject.coef).sum()
    }
}

/// A named school year with its ordered subject list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Year {
    pub name: String,
    pub subjects: Vec<SubjectMeta>,
}

impl Year {
    pub fn new(name: impl Into<String>, subjects: Vec<SubjectMeta>) -> Self {
        Self {
            name: name.into(),
            subjects,
        }
    }

    /// Sum of top-level subject coefficients.
    pub fn total_coef(&self) -> f32 {
        self.subjects.iter().map(|subject| subject.coef).sum()
    }

    /// Looks up a top-level subject by exact name.
    ///
    /// Returns the first match; preset years may repeat a subject name.
    pub fn subject(&self, name: &str) -> Option<&SubjectMeta> {
        self.subjects.iter().find(|subject| subject.name == name)
    }

    /// Validates structural invariants for persistence.
    ///
    /// # Errors
    /// - `EmptyYearName` when the name is blank.
    /// - `EmptySubjectName` when any subject (or sub-subject) name is blank.
    /// - `InvalidCoef` when a coefficient is negative, NaN or infinite.
    /// - `EmptyComposite` when a composite has no sub-subjects.
    /// - `NestedComposite` when a sub-subject carries its own composite.
    pub fn validate(&self) -> Result<(), YearValidationError> {
        if self.name.trim().is_empty() {
            return Err(YearValidationError::EmptyYearName);
        }

        for subject in &self.subjects {
            validate_subject(subject)?;
            let Some(combi) = subject.combi_meta.as_ref() else {
                continue;
            };
            if combi.subjects.is_empty() {
                return Err(YearValidationError::EmptyComposite {
                    subject: subject.name.clone(),
                });
            }
            for sub in &combi.subjects {
                validate_subject(sub)?;
                if sub.combi_meta.is_some() {
                    return Err(YearValidationError::NestedComposite {
                        subject: subject.name.clone(),
                        sub_subject: sub.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn validate_subject(subject: &SubjectMeta) -> Result<(), YearValidationError> {
    if subject.name.trim().is_empty() {
        return Err(YearValidationError::EmptySubjectName);
    }
    if !subject.coef.is_finite() || subject.coef < 0.0 {
        return Err(YearValidationError::InvalidCoef {
            subject: subject.name.clone(),
            coef: subject.coef,
        });
    }
    Ok(())
}

/// Validation failures for `Year` write paths.
#[derive(Debug, Clone, PartialEq)]
pub enum YearValidationError {
    EmptyYearName,
    EmptySubjectName,
    InvalidCoef { subject: String, coef: f32 },
    EmptyComposite { subject: String },
    NestedComposite { subject: String, sub_subject: String },
}

impl Display for YearValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyYearName => write!(f, "year name cannot be empty"),
            Self::EmptySubjectName => write!(f, "subject name cannot be empty"),
            Self::InvalidCoef { subject, coef } => write!(
                f,
                "subject `{subject}` has invalid coef {coef}; expected a finite value >= 0"
            ),
            Self::EmptyComposite { subject } => {
                write!(f, "composite subject `{subject}` has no sub-subjects")
            }
            Self::NestedComposite {
                subject,
                sub_subject,
            } => write!(
                f,
                "sub-subject `{sub_subject}` of `{subject}` cannot itself be composite"
            ),
        }
    }
}

impl Error for YearValidationError {}
