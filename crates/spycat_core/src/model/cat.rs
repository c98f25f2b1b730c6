//! Spy cat domain model.
//!
//! # Invariants
//! - `years_of_experience` is non-negative.
//! - `salary` is finite and non-negative.
//! - `breed` is checked against the breed directory at creation time only;
//!   a cat keeps its breed even if the directory later changes.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable store-assigned identifier for a spy cat.
pub type CatId = i64;

/// A spy cat on the agency roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cat {
    pub id: CatId,
    pub name: String,
    pub years_of_experience: i64,
    pub breed: String,
    pub salary: f64,
}

/// Typed request value for hiring a new spy cat.
///
/// Field validation happens before any SQL runs; breed validity is the
/// store's concern because it involves the external breed directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCat {
    pub name: String,
    pub years_of_experience: i64,
    pub breed: String,
    pub salary: f64,
}

impl NewCat {
    /// Checks structural field constraints.
    pub fn validate(&self) -> Result<(), CatValidationError> {
        if self.years_of_experience < 0 {
            return Err(CatValidationError::NegativeExperience(
                self.years_of_experience,
            ));
        }
        validate_salary(self.salary)
    }
}

/// Checks that a salary value is storable.
///
/// Shared by hiring and salary updates so both paths reject the same inputs.
pub fn validate_salary(salary: f64) -> Result<(), CatValidationError> {
    if !salary.is_finite() {
        return Err(CatValidationError::NonFiniteSalary);
    }
    if salary < 0.0 {
        return Err(CatValidationError::NegativeSalary(salary));
    }
    Ok(())
}

/// Structural validation failures for cat fields.
#[derive(Debug, Clone, PartialEq)]
pub enum CatValidationError {
    NegativeExperience(i64),
    NegativeSalary(f64),
    NonFiniteSalary,
}

impl Display for CatValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeExperience(value) => {
                write!(f, "years_of_experience must be non-negative, got {value}")
            }
            Self::NegativeSalary(value) => {
                write!(f, "salary must be non-negative, got {value}")
            }
            Self::NonFiniteSalary => write!(f, "salary must be a finite number"),
        }
    }
}

impl Error for CatValidationError {}
