//! In-process stand-in for the upstream employee API.
//!
//! Serves the `{data, status, error}` envelope on `/api/v1/employee`, deletes
//! by name rather than id, and can be told to start rate limiting after a
//! fixed number of requests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const BASE_PATH: &str = "/api/v1/employee";

const OK_STATUS: &str = "Successfully processed request.";
const FAILED_STATUS: &str = "Failed to process request.";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub employee_name: String,
    pub employee_salary: i64,
    pub employee_age: i64,
    pub employee_title: String,
    pub employee_email: String,
}

#[derive(Deserialize)]
pub struct CreateEmployee {
    pub name: String,
    pub salary: i64,
    pub age: i64,
    pub title: String,
}

#[derive(Deserialize)]
pub struct DeleteEmployee {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            status: OK_STATUS.to_string(),
            error: None,
        }
    }

    fn failed(error: &str) -> Self {
        Self {
            data: None,
            status: FAILED_STATUS.to_string(),
            error: Some(error.to_string()),
        }
    }
}

/// Insertion-ordered so list responses are stable between calls.
pub type Db = Arc<RwLock<Vec<Employee>>>;

#[derive(Clone)]
struct Budget {
    limit: Option<usize>,
    used: Arc<AtomicUsize>,
}

pub fn app() -> Router {
    build(Vec::new(), None)
}

/// Start from the given records instead of an empty collection.
pub fn app_with_employees(employees: Vec<Employee>) -> Router {
    build(employees, None)
}

/// Answer 429 to every request after the first `limit`.
pub fn app_with_request_limit(limit: usize) -> Router {
    build(Vec::new(), Some(limit))
}

fn build(employees: Vec<Employee>, limit: Option<usize>) -> Router {
    let db: Db = Arc::new(RwLock::new(employees));
    let budget = Budget {
        limit,
        used: Arc::new(AtomicUsize::new(0)),
    };
    Router::new()
        .route(
            BASE_PATH,
            get(list_employees).post(create_employee).delete(delete_employee),
        )
        .route(&format!("{BASE_PATH}/{{id}}"), get(get_employee))
        .with_state(db)
        .layer(middleware::from_fn_with_state(budget, rate_limit))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_app(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

/// Build a record the way the upstream would for a create request.
pub fn employee(name: &str, salary: i64, age: i64, title: &str) -> Employee {
    let handle = name.split_whitespace().next().unwrap_or("employee").to_lowercase();
    Employee {
        id: Uuid::new_v4(),
        employee_name: name.to_string(),
        employee_salary: salary,
        employee_age: age,
        employee_title: title.to_string(),
        employee_email: format!("{handle}@company.com"),
    }
}

async fn rate_limit(State(budget): State<Budget>, request: Request, next: Next) -> Response {
    let used = budget.used.fetch_add(1, Ordering::SeqCst);
    if budget.limit.is_some_and(|limit| used >= limit) {
        tracing::debug!(used, "mock upstream rate limiting");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(Envelope::<()>::failed("Too Many Requests")),
        )
            .into_response();
    }
    next.run(request).await
}

async fn list_employees(State(db): State<Db>) -> Json<Envelope<Vec<Employee>>> {
    let employees = db.read().await;
    Json(Envelope::ok(employees.clone()))
}

async fn get_employee(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Envelope<Employee>>) {
    let employees = db.read().await;
    let found = Uuid::parse_str(&id)
        .ok()
        .and_then(|id| employees.iter().find(|e| e.id == id).cloned());
    match found {
        Some(employee) => (StatusCode::OK, Json(Envelope::ok(employee))),
        None => (StatusCode::NOT_FOUND, Json(Envelope::failed("Employee not found"))),
    }
}

async fn create_employee(
    State(db): State<Db>,
    Json(input): Json<CreateEmployee>,
) -> Json<Envelope<Employee>> {
    let created = employee(&input.name, input.salary, input.age, &input.title);
    db.write().await.push(created.clone());
    Json(Envelope::ok(created))
}

async fn delete_employee(
    State(db): State<Db>,
    Json(input): Json<DeleteEmployee>,
) -> Json<Envelope<bool>> {
    let mut employees = db.write().await;
    let deleted = match employees.iter().position(|e| e.employee_name == input.name) {
        Some(index) => {
            employees.remove(index);
            true
        }
        None => false,
    };
    Json(Envelope::ok(deleted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_serializes_upstream_field_names() {
        let mut e = employee("Abhishek J", 50000, 30, "Developer");
        e.id = Uuid::nil();
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["employee_name"], "Abhishek J");
        assert_eq!(json["employee_salary"], 50000);
        assert_eq!(json["employee_email"], "abhishek@company.com");
    }

    #[test]
    fn failed_envelope_omits_data() {
        let json = serde_json::to_value(Envelope::<Employee>::failed("nope")).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["status"], FAILED_STATUS);
        assert_eq!(json["error"], "nope");
    }

    #[test]
    fn create_employee_rejects_missing_salary() {
        let result: Result<CreateEmployee, _> =
            serde_json::from_str(r#"{"name":"A","age":30,"title":"Dev"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn delete_employee_needs_name() {
        let input: DeleteEmployee = serde_json::from_str(r#"{"name":"Ravi Kumar"}"#).unwrap();
        assert_eq!(input.name, "Ravi Kumar");
    }
}
