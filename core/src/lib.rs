//! Upstream client core for the employee records façade.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the
//! upstream employee API, classifies its failures into `UpstreamError`, and
//! computes the derived read views (name search, highest salary, top earners)
//! over the fetched collection.
//!
//! # Design
//! - `EmployeeClient` is stateless; it holds only the base URL.
//! - The network round-trip is behind the `Transport` trait, so the core does
//!   no I/O of its own and tests can script the upstream.
//! - `EmployeeService` composes the two and owns the two-step delete.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod aggregate;
pub mod client;
pub mod error;
pub mod http;
pub mod service;
pub mod types;

pub use client::EmployeeClient;
pub use error::{TransportError, UpstreamError, UpstreamErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use service::EmployeeService;
pub use types::{ApiResponse, CreateEmployee, DeleteEmployee, Employee};
