//! Wire DTOs for the upstream employee API.
//!
//! # Design
//! Every `Employee` field except `id` is optional: the upstream owns the
//! schema and the aggregation rules are defined in terms of missing names
//! and salaries, so decoding must not reject them.

use serde::{Deserialize, Serialize};

/// An employee record as returned by the upstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub id: String,
    #[serde(rename = "employee_name", default)]
    pub name: Option<String>,
    #[serde(rename = "employee_salary", default)]
    pub salary: Option<i64>,
    #[serde(rename = "employee_age", default)]
    pub age: Option<i64>,
    #[serde(rename = "employee_title", default)]
    pub title: Option<String>,
    #[serde(rename = "employee_email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Payload for creating an employee. Validated by the caller before it is
/// handed to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateEmployee {
    pub name: String,
    pub salary: i64,
    pub age: i64,
    pub title: String,
}

/// Body of the upstream's name-keyed DELETE.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteEmployee {
    pub name: String,
}

/// Uniform upstream response envelope `{data, status, error}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn empty() -> Self {
        Self {
            data: None,
            status: None,
            error: None,
        }
    }
}
