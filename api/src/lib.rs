//! REST façade over the upstream employee API.
//!
//! # Overview
//! Exposes list, search, get, create and delete endpoints plus the highest
//! salary and top-earner views under `/api/v1/employees`. All record work is
//! delegated to `employee_core::EmployeeService`; this crate owns routing,
//! payload validation, configuration and the real HTTP transport.

pub mod config;
pub mod payload;
pub mod routes;
pub mod transport;

pub use config::{Config, ConfigError};
pub use routes::{router, BASE_PATH};
pub use transport::UreqTransport;

use employee_core::{EmployeeClient, EmployeeService};

/// Wire the production service from configuration.
pub fn service(config: &Config) -> EmployeeService<UreqTransport> {
    EmployeeService::new(
        EmployeeClient::new(config.upstream_base_url.as_str()),
        UreqTransport::new(config.upstream_timeout()),
    )
}
