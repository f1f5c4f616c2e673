//! Stateless HTTP request builder and response parser for the upstream
//! employee API.
//!
//! # Design
//! `EmployeeClient` holds only the upstream base URL. Each operation is split
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse` and applies the failure
//! classification. Executing the round-trip is someone else's job (see
//! `EmployeeService`).

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::UpstreamError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiResponse, CreateEmployee, DeleteEmployee, Employee};

pub const FETCH_ALL: &str = "fetching all employees";
pub const FETCH_BY_ID: &str = "fetching employee by id";
pub const CREATE: &str = "creating employee";
pub const DELETE: &str = "deleting employee";

const STATUS_NOT_FOUND: u16 = 404;
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Synchronous, stateless client for the upstream employee API.
#[derive(Debug, Clone)]
pub struct EmployeeClient {
    base_url: String,
}

impl EmployeeClient {
    /// `base_url` is the collection endpoint itself, e.g.
    /// `http://localhost:8112/api/v1/employee`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_fetch_all(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.base_url.clone(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// The id is opaque: it is percent-encoded as exactly one path segment,
    /// so `/`, `?`, `%` and spaces cannot reshape the upstream URL.
    pub fn build_fetch_by_id(&self, id: &str) -> Result<HttpRequest, UpstreamError> {
        let unusable = |reason: String| UpstreamError::RequestFailed {
            operation: FETCH_BY_ID,
            status: None,
            message: format!("could not build upstream url: {reason}"),
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| unusable(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| unusable(format!("{} cannot carry a path", self.base_url)))?
            .push(id);
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_create(&self, input: &CreateEmployee) -> Result<HttpRequest, UpstreamError> {
        let body = serde_json::to_string(input).map_err(|e| UpstreamError::RequestFailed {
            operation: CREATE,
            status: None,
            message: format!("could not encode request: {e}"),
        })?;
        Ok(json_request(HttpMethod::Post, self.base_url.clone(), body))
    }

    /// The upstream deletes by name, not by id: the name travels in the body
    /// of a DELETE against the collection endpoint.
    pub fn build_delete_by_name(&self, name: &str) -> Result<HttpRequest, UpstreamError> {
        let input = DeleteEmployee {
            name: name.to_string(),
        };
        let body = serde_json::to_string(&input).map_err(|e| UpstreamError::RequestFailed {
            operation: DELETE,
            status: None,
            message: format!("could not encode request: {e}"),
        })?;
        Ok(json_request(HttpMethod::Delete, self.base_url.clone(), body))
    }

    /// Records in upstream order. A success without data yields an empty list.
    pub fn parse_fetch_all(&self, response: HttpResponse) -> Result<Vec<Employee>, UpstreamError> {
        check_status(FETCH_ALL, &response)?;
        let envelope: ApiResponse<Vec<Employee>> = decode_envelope(FETCH_ALL, &response)?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// A 404 from the upstream is absence, not a failure.
    pub fn parse_fetch_by_id(&self, response: HttpResponse) -> Result<Option<Employee>, UpstreamError> {
        if response.status == STATUS_NOT_FOUND {
            tracing::debug!(operation = FETCH_BY_ID, "upstream reported no such employee");
            return Ok(None);
        }
        check_status(FETCH_BY_ID, &response)?;
        let envelope: ApiResponse<Employee> = decode_envelope(FETCH_BY_ID, &response)?;
        Ok(envelope.data)
    }

    /// `Ok(None)` when the upstream accepted the request but returned no record.
    pub fn parse_create(&self, response: HttpResponse) -> Result<Option<Employee>, UpstreamError> {
        check_status(CREATE, &response)?;
        let envelope: ApiResponse<Employee> = decode_envelope(CREATE, &response)?;
        Ok(envelope.data)
    }

    /// True only when the upstream explicitly reports `data: true`.
    pub fn parse_delete_by_name(&self, response: HttpResponse) -> Result<bool, UpstreamError> {
        check_status(DELETE, &response)?;
        let envelope: ApiResponse<bool> = decode_envelope(DELETE, &response)?;
        Ok(envelope.data == Some(true))
    }
}

fn json_request(method: HttpMethod, url: String, body: String) -> HttpRequest {
    HttpRequest {
        method,
        url,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    }
}

/// Map non-success status codes to the matching `UpstreamError` variant.
fn check_status(operation: &'static str, response: &HttpResponse) -> Result<(), UpstreamError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == STATUS_TOO_MANY_REQUESTS {
        tracing::warn!(operation, "rate limit exceeded");
        return Err(UpstreamError::RateLimited { operation });
    }
    let message = error_message(&response.body);
    tracing::error!(operation, status = response.status, %message, "upstream request failed");
    Err(UpstreamError::RequestFailed {
        operation,
        status: Some(response.status),
        message,
    })
}

/// Prefer the envelope's `error` string; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .unwrap_or_else(|| body.to_string())
}

fn decode_envelope<T: DeserializeOwned>(
    operation: &'static str,
    response: &HttpResponse,
) -> Result<ApiResponse<T>, UpstreamError> {
    if response.body.trim().is_empty() {
        return Ok(ApiResponse::empty());
    }
    serde_json::from_str(&response.body).map_err(|e| {
        tracing::error!(operation, error = %e, "undecodable upstream response");
        UpstreamError::RequestFailed {
            operation,
            status: Some(response.status),
            message: format!("invalid response body: {e}"),
        }
    })
}
