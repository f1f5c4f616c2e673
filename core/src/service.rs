//! Upstream operations executed over a `Transport`, plus the derived views.
//!
//! # Design
//! `EmployeeService` pairs the stateless `EmployeeClient` with a host-supplied
//! transport. Every call is an independent round-trip; no record outlives the
//! call that fetched it, and failures are never retried here.

use crate::aggregate;
use crate::client::{self, EmployeeClient};
use crate::error::{TransportError, UpstreamError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{CreateEmployee, Employee};

#[derive(Debug, Clone)]
pub struct EmployeeService<T> {
    client: EmployeeClient,
    transport: T,
}

impl<T: Transport> EmployeeService<T> {
    pub fn new(client: EmployeeClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn fetch_all(&self) -> Result<Vec<Employee>, UpstreamError> {
        let response = self.send(client::FETCH_ALL, self.client.build_fetch_all())?;
        self.client.parse_fetch_all(response)
    }

    pub fn fetch_by_id(&self, id: &str) -> Result<Option<Employee>, UpstreamError> {
        let request = self.client.build_fetch_by_id(id)?;
        let response = self.send(client::FETCH_BY_ID, request)?;
        self.client.parse_fetch_by_id(response)
    }

    pub fn create(&self, input: &CreateEmployee) -> Result<Option<Employee>, UpstreamError> {
        let request = self.client.build_create(input)?;
        let response = self.send(client::CREATE, request)?;
        self.client.parse_create(response)
    }

    pub fn delete_by_name(&self, name: &str) -> Result<bool, UpstreamError> {
        let request = self.client.build_delete_by_name(name)?;
        let response = self.send(client::DELETE, request)?;
        self.client.parse_delete_by_name(response)
    }

    /// Blank queries match nothing and skip the upstream call entirely.
    pub fn search(&self, needle: &str) -> Result<Vec<Employee>, UpstreamError> {
        if needle.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(aggregate::search_by_name(&self.fetch_all()?, needle))
    }

    pub fn highest_salary(&self) -> Result<i64, UpstreamError> {
        Ok(aggregate::highest_salary(&self.fetch_all()?))
    }

    pub fn top_ten_names(&self) -> Result<Vec<String>, UpstreamError> {
        Ok(aggregate::top_earner_names(&self.fetch_all()?))
    }

    /// Resolve the record's name, then delete by that name.
    ///
    /// `Ok(None)` covers a missing record, a record without a name, and an
    /// upstream that declined the deletion.
    pub fn delete_by_id(&self, id: &str) -> Result<Option<String>, UpstreamError> {
        let Some(name) = self.fetch_by_id(id)?.and_then(|employee| employee.name) else {
            return Ok(None);
        };
        if self.delete_by_name(&name)? {
            tracing::info!(%id, %name, "employee deleted");
            Ok(Some(name))
        } else {
            tracing::warn!(%id, %name, "upstream declined deletion");
            Ok(None)
        }
    }

    fn send(&self, operation: &'static str, request: HttpRequest) -> Result<HttpResponse, UpstreamError> {
        tracing::debug!(operation, method = request.method.as_str(), url = %request.url, "calling upstream");
        self.transport.execute(request).map_err(|e| match e {
            TransportError::Connect(message) => {
                tracing::error!(operation, error = %message, "upstream unreachable");
                UpstreamError::Unreachable { operation, message }
            }
            TransportError::UnreadableBody { status, message } => {
                tracing::error!(operation, status, error = %message, "unreadable upstream response");
                UpstreamError::RequestFailed {
                    operation,
                    status: Some(status),
                    message: format!("unreadable response body: {message}"),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::error::UpstreamErrorKind;
    use crate::http::HttpMethod;

    /// Replays canned outcomes in order and records every request it saw.
    #[derive(Default)]
    struct Scripted {
        replies: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Ok(HttpResponse::new(status, body)));
            self
        }

        fn fail(self, message: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Err(TransportError::new(message)));
            self
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::new("no scripted reply")))
        }
    }

    const BASE: &str = "http://upstream/api/v1/employee";

    fn service(transport: Scripted) -> EmployeeService<Scripted> {
        EmployeeService::new(EmployeeClient::new(BASE), transport)
    }

    const ROSTER: &str = r#"{"data":[
        {"id":"1","employee_name":"Abhishek Joshi","employee_salary":50000},
        {"id":"2","employee_name":"Ravi Kumar","employee_salary":100000},
        {"id":"3","employee_name":"Yash Joshi","employee_salary":75000}
    ]}"#;

    #[test]
    fn repeated_fetch_all_is_list_equal() {
        let svc = service(Scripted::default().reply(200, ROSTER).reply(200, ROSTER));
        let first = svc.fetch_all().unwrap();
        let second = svc.fetch_all().unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn failure_kinds_are_distinct() {
        let svc = service(
            Scripted::default()
                .reply(429, "slow down")
                .reply(500, "boom")
                .fail("connection timed out"),
        );
        assert_eq!(svc.fetch_all().unwrap_err().kind(), UpstreamErrorKind::RateLimited);
        assert_eq!(
            svc.fetch_all().unwrap_err().kind(),
            UpstreamErrorKind::UpstreamRequestFailed
        );
        let err = svc.fetch_all().unwrap_err();
        assert_eq!(err.kind(), UpstreamErrorKind::UpstreamUnreachable);
        assert_eq!(err.operation(), client::FETCH_ALL);
    }

    #[test]
    fn unreadable_body_is_request_failure_not_unreachable() {
        let svc = service(Scripted::default());
        svc.transport.replies.borrow_mut().push_back(Err(TransportError::UnreadableBody {
            status: 200,
            message: "body exceeds limit".to_string(),
        }));
        match svc.fetch_all().unwrap_err() {
            UpstreamError::RequestFailed {
                operation,
                status,
                message,
            } => {
                assert_eq!(operation, client::FETCH_ALL);
                assert_eq!(status, Some(200));
                assert!(message.contains("body exceeds limit"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fetch_by_id_sends_encoded_id() {
        let svc = service(Scripted::default().reply(404, ""));
        assert!(svc.fetch_by_id("no such").unwrap().is_none());
        assert_eq!(svc.transport.seen.borrow()[0].url, format!("{BASE}/no%20such"));
    }

    #[test]
    fn search_filters_fetched_records() {
        let svc = service(Scripted::default().reply(200, ROSTER));
        let found = svc.search("JOSH").unwrap();
        let names: Vec<_> = found.iter().filter_map(|e| e.name.as_deref()).collect();
        assert_eq!(names, ["Abhishek Joshi", "Yash Joshi"]);
    }

    #[test]
    fn blank_search_does_not_call_upstream() {
        let transport = Scripted::default();
        let svc = service(transport);
        assert!(svc.search(" ").unwrap().is_empty());
        assert!(svc.transport.seen.borrow().is_empty());
    }

    #[test]
    fn highest_salary_and_top_ten_use_fetch_all() {
        let svc = service(Scripted::default().reply(200, ROSTER).reply(200, ROSTER));
        assert_eq!(svc.highest_salary().unwrap(), 100000);
        assert_eq!(
            svc.top_ten_names().unwrap(),
            ["Ravi Kumar", "Yash Joshi", "Abhishek Joshi"]
        );
    }

    #[test]
    fn highest_salary_propagates_failure() {
        let svc = service(Scripted::default().reply(429, ""));
        assert_eq!(
            svc.highest_salary().unwrap_err().kind(),
            UpstreamErrorKind::RateLimited
        );
    }

    #[test]
    fn delete_by_id_resolves_name_then_deletes() {
        let svc = service(
            Scripted::default()
                .reply(200, r#"{"data":{"id":"7","employee_name":"Abhishek J","employee_salary":50000}}"#)
                .reply(200, r#"{"data":true}"#),
        );
        assert_eq!(svc.delete_by_id("7").unwrap().as_deref(), Some("Abhishek J"));

        let seen = svc.transport.seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].url, format!("{BASE}/7"));
        assert_eq!(seen[1].method, HttpMethod::Delete);
        assert_eq!(seen[1].url, BASE);
        let body: serde_json::Value = serde_json::from_str(seen[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "Abhishek J");
    }

    #[test]
    fn delete_by_id_declined_is_absence() {
        let svc = service(
            Scripted::default()
                .reply(200, r#"{"data":{"id":"7","employee_name":"Abhishek J"}}"#)
                .reply(200, r#"{"data":false}"#),
        );
        assert!(svc.delete_by_id("7").unwrap().is_none());
    }

    #[test]
    fn delete_by_id_missing_record_skips_delete() {
        let svc = service(Scripted::default().reply(404, ""));
        assert!(svc.delete_by_id("nope").unwrap().is_none());
        assert_eq!(svc.transport.seen.borrow().len(), 1);
    }

    #[test]
    fn delete_by_id_nameless_record_skips_delete() {
        let svc = service(Scripted::default().reply(200, r#"{"data":{"id":"7"}}"#));
        assert!(svc.delete_by_id("7").unwrap().is_none());
        assert_eq!(svc.transport.seen.borrow().len(), 1);
    }

    #[test]
    fn delete_by_id_propagates_delete_failure() {
        let svc = service(
            Scripted::default()
                .reply(200, r#"{"data":{"id":"7","employee_name":"Abhishek J"}}"#)
                .reply(503, "down"),
        );
        let err = svc.delete_by_id("7").unwrap_err();
        assert_eq!(err.kind(), UpstreamErrorKind::UpstreamRequestFailed);
        assert_eq!(err.operation(), client::DELETE);
    }

    #[test]
    fn create_returns_upstream_record() {
        let svc = service(Scripted::default().reply(
            200,
            r#"{"data":{"id":"9","employee_name":"Test Employee","employee_salary":80000}}"#,
        ));
        let input = CreateEmployee {
            name: "Test Employee".to_string(),
            salary: 80000,
            age: 30,
            title: "Engineer".to_string(),
        };
        let created = svc.create(&input).unwrap().unwrap();
        assert_eq!(created.salary, Some(80000));
    }

    #[test]
    fn create_unreachable() {
        let svc = service(Scripted::default().fail("connection refused"));
        let input = CreateEmployee {
            name: "Test Employee".to_string(),
            salary: 80000,
            age: 30,
            title: "Engineer".to_string(),
        };
        let err = svc.create(&input).unwrap_err();
        assert!(matches!(err, UpstreamError::Unreachable { operation: client::CREATE, .. }));
    }
}
