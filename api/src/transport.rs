//! Blocking `Transport` backed by a ureq agent.

use std::time::Duration;

use employee_core::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Status codes come back as data, not errors, so the core can classify
/// them. Connectivity problems and timeouts surface as
/// `TransportError::Connect`; a status line followed by a body that cannot be
/// read (size limit, invalid UTF-8) is `TransportError::UnreadableBody`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match (method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&url), &headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&url), &headers).send_empty(),
            (HttpMethod::Delete, Some(body)) => with_headers(self.agent.delete(&url), &headers)
                .force_send_body()
                .send(body.as_bytes()),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(&url), &headers).call(),
        };
        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::UnreadableBody {
                status,
                message: e.to_string(),
            })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
