//! HTTP surface of the façade.
//!
//! Each handler runs its upstream work on the blocking pool and maps the
//! outcome to a status: absence is 404 where a lookup is involved, any
//! upstream failure is 500 with an empty or default payload.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use employee_core::{Employee, EmployeeService, Transport, UpstreamError};
use thiserror::Error;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::payload::CreateEmployeeRequest;

pub const BASE_PATH: &str = "/api/v1/employees";

type Shared<T> = Arc<EmployeeService<T>>;

#[derive(Debug, Error)]
enum HandlerError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("blocking task failed: {0}")]
    Worker(String),
}

/// Build the façade router around an upstream service.
///
/// A request that outlives `request_timeout` answers 500, like any other
/// upstream failure.
pub fn router<T>(service: EmployeeService<T>, request_timeout: Duration) -> Router
where
    T: Transport + Send + Sync + 'static,
{
    let state: Shared<T> = Arc::new(service);
    Router::new()
        .route(BASE_PATH, get(list_all::<T>).post(create::<T>))
        .route(&format!("{BASE_PATH}/search/{{search_string}}"), get(search::<T>))
        .route(&format!("{BASE_PATH}/highestSalary"), get(highest_salary::<T>))
        .route(
            &format!("{BASE_PATH}/topTenHighestEarningEmployeeNames"),
            get(top_ten_names::<T>),
        )
        .route(
            &format!("{BASE_PATH}/{{id}}"),
            get(get_by_id::<T>).delete(delete_by_id::<T>),
        )
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::INTERNAL_SERVER_ERROR,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Run `work` against the service on tokio's blocking pool.
async fn blocking<T, R, F>(service: &Shared<T>, work: F) -> Result<R, HandlerError>
where
    T: Transport + Send + Sync + 'static,
    R: Send + 'static,
    F: FnOnce(&EmployeeService<T>) -> Result<R, UpstreamError> + Send + 'static,
{
    let service = Arc::clone(service);
    match tokio::task::spawn_blocking(move || work(service.as_ref())).await {
        Ok(result) => Ok(result?),
        Err(e) => Err(HandlerError::Worker(e.to_string())),
    }
}

async fn list_all<T>(State(service): State<Shared<T>>) -> (StatusCode, Json<Vec<Employee>>)
where
    T: Transport + Send + Sync + 'static,
{
    match blocking(&service, |s| s.fetch_all()).await {
        Ok(employees) => (StatusCode::OK, Json(employees)),
        Err(e) => {
            tracing::error!(error = %e, "list all employees failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::new()))
        }
    }
}

async fn search<T>(
    State(service): State<Shared<T>>,
    Path(search_string): Path<String>,
) -> (StatusCode, Json<Vec<Employee>>)
where
    T: Transport + Send + Sync + 'static,
{
    match blocking(&service, move |s| s.search(&search_string)).await {
        Ok(employees) => (StatusCode::OK, Json(employees)),
        Err(e) => {
            tracing::error!(error = %e, "employee name search failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::new()))
        }
    }
}

async fn get_by_id<T>(State(service): State<Shared<T>>, Path(id): Path<String>) -> Response
where
    T: Transport + Send + Sync + 'static,
{
    let lookup = id.clone();
    match blocking(&service, move |s| s.fetch_by_id(&lookup)).await {
        Ok(Some(employee)) => Json(employee).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!(%id, error = %e, "get employee by id failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn highest_salary<T>(State(service): State<Shared<T>>) -> Response
where
    T: Transport + Send + Sync + 'static,
{
    match blocking(&service, |s| s.highest_salary()).await {
        Ok(salary) => Json(salary).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "highest salary failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn top_ten_names<T>(State(service): State<Shared<T>>) -> (StatusCode, Json<Vec<String>>)
where
    T: Transport + Send + Sync + 'static,
{
    match blocking(&service, |s| s.top_ten_names()).await {
        Ok(names) => (StatusCode::OK, Json(names)),
        Err(e) => {
            tracing::error!(error = %e, "top ten earners failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::new()))
        }
    }
}

async fn create<T>(
    State(service): State<Shared<T>>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Response
where
    T: Transport + Send + Sync + 'static,
{
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable create payload");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    let input = match payload.into_create() {
        Ok(input) => input,
        Err(errors) => {
            tracing::debug!(%errors, "invalid create payload");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    match blocking(&service, move |s| s.create(&input)).await {
        Ok(Some(employee)) => (StatusCode::CREATED, Json(employee)).into_response(),
        Ok(None) => StatusCode::BAD_REQUEST.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "create employee failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn delete_by_id<T>(State(service): State<Shared<T>>, Path(id): Path<String>) -> Response
where
    T: Transport + Send + Sync + 'static,
{
    let lookup = id.clone();
    match blocking(&service, move |s| s.delete_by_id(&lookup)).await {
        Ok(Some(name)) => Json(name).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!(%id, error = %e, "delete employee by id failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
