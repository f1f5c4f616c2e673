//! Inbound creation payload and its validation.
//!
//! Every field is optional on the wire so that a missing field is reported
//! as a validation failure (400) instead of a decoding failure.

use employee_core::CreateEmployee;
use serde::Deserialize;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(required, custom = "not_blank")]
    pub name: Option<String>,

    #[validate(required, range(min = 1))]
    pub salary: Option<i64>,

    #[validate(required, range(min = 16, max = 75))]
    pub age: Option<i64>,

    #[validate(required, custom = "not_blank")]
    pub title: Option<String>,
}

impl CreateEmployeeRequest {
    /// Validate and convert into the upstream payload.
    pub fn into_create(self) -> Result<CreateEmployee, validator::ValidationErrors> {
        self.validate()?;
        match (self.name, self.salary, self.age, self.title) {
            (Some(name), Some(salary), Some(age), Some(title)) => Ok(CreateEmployee {
                name,
                salary,
                age,
                title,
            }),
            _ => {
                let mut missing = validator::ValidationErrors::new();
                missing.add("payload", ValidationError::new("required"));
                Err(missing)
            }
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
