//! The request executor shared by every domain client.
//!
//! # Design
//! A `Requester` binds a base URL to a `Session` and a `Transport`. Each call
//! goes through the same steps: build the wire request from the session's
//! current headers, send it, log it, and check the status against the
//! caller's acceptance set. Domain clients hand back a `Call` so the caller
//! can override the default status or add query parameters before sending.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::logging::log_exchange;
use crate::session::Session;
use crate::status::ExpectedStatus;
use crate::transport::Transport;

/// One call to the API, before it is bound to a base URL and session.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub endpoint: String,
    pub body: Option<Value>,
    pub params: Vec<(String, String)>,
    pub expected: ExpectedStatus,
    pub log: bool,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            params: Vec::new(),
            expected: ExpectedStatus::default(),
            log: true,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `payload` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_value(payload).map_err(ApiError::Serialization)?;
        Ok(self.body(body))
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn params<K, V, I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    pub fn expect_status(mut self, expected: impl Into<ExpectedStatus>) -> Self {
        self.expected = expected.into();
        self
    }

    pub fn without_logging(mut self) -> Self {
        self.log = false;
        self
    }
}

/// Executes `ApiRequest`s against one base URL.
#[derive(Clone)]
pub struct Requester {
    session: Session,
    base_url: String,
    transport: Rc<dyn Transport>,
}

impl fmt::Debug for Requester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requester")
            .field("session", &self.session)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Requester {
    /// `base_url` is used verbatim; endpoints are appended to it as-is.
    pub fn new(session: Session, base_url: impl Into<String>, transport: Rc<dyn Transport>) -> Self {
        Self {
            session,
            base_url: base_url.into(),
            transport,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Wraps `request` in a `Call` bound to this requester.
    pub fn call(&self, request: ApiRequest) -> Call<'_> {
        Call {
            requester: self,
            request: Ok(request),
        }
    }

    /// Builds the wire request: full URL, current session headers, body.
    pub fn build_http_request(&self, request: &ApiRequest) -> Result<HttpRequest, ApiError> {
        let body = request
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(ApiError::Serialization)?;
        Ok(HttpRequest {
            method: request.method,
            url: build_url(&self.base_url, &request.endpoint, &request.params),
            headers: self.session.headers(),
            body,
        })
    }

    /// Sends `request` and checks the status against its acceptance set.
    ///
    /// The exchange is logged before the status check, so rejected calls
    /// still show up in the log. Transport errors are returned unchanged.
    pub fn execute(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        let http_request = self.build_http_request(&request)?;
        let response = self.transport.send(&http_request)?;

        if request.log {
            log_exchange(&http_request, &response);
        }

        check_status(&response, &request.expected)?;
        Ok(response)
    }
}

/// Rejects any status outside the acceptance set.
fn check_status(response: &HttpResponse, expected: &ExpectedStatus) -> Result<(), ApiError> {
    if expected.accepts(response.status) {
        return Ok(());
    }
    Err(ApiError::UnexpectedStatusCode {
        status: response.status,
        allowed: expected.allowed(),
    })
}

fn build_url(base_url: &str, endpoint: &str, params: &[(String, String)]) -> String {
    let mut url = format!("{base_url}{endpoint}");
    if params.is_empty() {
        return url;
    }
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    url.push(if endpoint.contains('?') { '&' } else { '?' });
    url.push_str(&query);
    url
}

/// A prepared request that has not been sent yet.
///
/// Body serialization errors from the domain client are held until `send`.
#[must_use = "a Call does nothing until `send` is called"]
#[derive(Debug)]
pub struct Call<'a> {
    requester: &'a Requester,
    request: Result<ApiRequest, ApiError>,
}

impl<'a> Call<'a> {
    pub(crate) fn with_json<T: Serialize + ?Sized>(
        requester: &'a Requester,
        request: ApiRequest,
        payload: &T,
    ) -> Self {
        Self {
            requester,
            request: request.json(payload),
        }
    }

    fn map(self, f: impl FnOnce(ApiRequest) -> ApiRequest) -> Self {
        Self {
            requester: self.requester,
            request: self.request.map(f),
        }
    }

    /// Replaces the domain client's default acceptance set.
    pub fn expect_status(self, expected: impl Into<ExpectedStatus>) -> Self {
        self.map(|request| request.expect_status(expected))
    }

    pub fn param(self, key: impl Into<String>, value: impl ToString) -> Self {
        self.map(|request| request.param(key, value))
    }

    pub fn params<K, V, I>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.map(|request| request.params(params))
    }

    pub fn without_logging(self) -> Self {
        self.map(ApiRequest::without_logging)
    }

    /// The request this call would send.
    pub fn request(&self) -> Result<&ApiRequest, &ApiError> {
        self.request.as_ref()
    }

    pub fn send(self) -> Result<HttpResponse, ApiError> {
        self.requester.execute(self.request?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::json;

    use super::*;
    use crate::testing::FakeTransport;

    const BASE: &str = "http://localhost:3000";

    fn requester(transport: &Rc<FakeTransport>) -> Requester {
        Requester::new(Session::new(), BASE, transport.clone())
    }

    #[test]
    fn url_is_base_plus_endpoint_verbatim() {
        assert_eq!(build_url(BASE, "/movies", &[]), "http://localhost:3000/movies");
        assert_eq!(build_url("http://h/", "/movies", &[]), "http://h//movies");
    }

    #[test]
    fn query_params_are_encoded_in_order() {
        let params = vec![
            ("pageSize".to_string(), "10".to_string()),
            ("locations".to_string(), "MSK,SPB".to_string()),
        ];
        assert_eq!(
            build_url(BASE, "/movies", &params),
            "http://localhost:3000/movies?pageSize=10&locations=MSK%2CSPB"
        );
        assert_eq!(
            build_url(BASE, "/movies?page=1", &params[..1]),
            "http://localhost:3000/movies?page=1&pageSize=10"
        );
    }

    #[test]
    fn build_uses_session_headers_and_json_body() {
        let transport = Rc::new(FakeTransport::default());
        let requester = requester(&transport);
        let request = ApiRequest::post("/movies").body(json!({"name": "Heat"}));

        let http = requester.build_http_request(&request).unwrap();
        assert_eq!(http.method, HttpMethod::Post);
        assert_eq!(http.url, "http://localhost:3000/movies");
        assert_eq!(http.header("content-type"), Some("application/json"));
        assert_eq!(http.body.as_deref(), Some(r#"{"name":"Heat"}"#));
    }

    #[test]
    fn absent_body_is_not_sent() {
        let transport = Rc::new(FakeTransport::default());
        let http = requester(&transport)
            .build_http_request(&ApiRequest::get("/movies"))
            .unwrap();
        assert!(http.body.is_none());
    }

    #[test]
    fn accepted_status_returns_response_unmodified() {
        let transport = Rc::new(FakeTransport::default());
        transport.respond(201, r#"{"id":7}"#);

        let response = requester(&transport)
            .execute(ApiRequest::post("/movies").expect_status(201))
            .unwrap();
        assert_eq!(response.status, 201);
        assert_eq!(response.body, br#"{"id":7}"#);
    }

    #[test]
    fn rejected_status_carries_code_and_allowed_set() {
        let transport = Rc::new(FakeTransport::default());
        transport.respond(404, "");

        let err = requester(&transport)
            .execute(ApiRequest::get("/movies/1").expect_status([200, 204]))
            .unwrap_err();
        match err {
            ApiError::UnexpectedStatusCode { status, allowed } => {
                assert_eq!(status, 404);
                assert_eq!(allowed, BTreeSet::from([200, 204]));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn acceptance_matches_set_membership() {
        let transport = Rc::new(FakeTransport::default());
        let requester = requester(&transport);
        for status in [200u16, 201, 204, 400, 404, 500] {
            transport.respond(status, "");
            let result = requester.execute(
                ApiRequest::get("/movies")
                    .expect_status([200, 201])
                    .without_logging(),
            );
            assert_eq!(result.is_ok(), status == 200 || status == 201, "status {status}");
        }
    }

    #[test]
    fn empty_acceptance_set_rejects_success() {
        let transport = Rc::new(FakeTransport::default());
        transport.respond(200, "{}");

        let err = requester(&transport)
            .execute(ApiRequest::get("/movies").expect_status(Vec::<u16>::new()))
            .unwrap_err();
        match err {
            ApiError::UnexpectedStatusCode { status, allowed } => {
                assert_eq!(status, 200);
                assert!(allowed.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn headers_are_read_at_send_time() {
        let transport = Rc::new(FakeTransport::default());
        let requester = requester(&transport);
        transport.respond(200, "");
        transport.respond(200, "");

        requester.execute(ApiRequest::get("/movies")).unwrap();
        requester.session().set_bearer_token("abc");
        requester.execute(ApiRequest::get("/movies")).unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].header("authorization"), None);
        assert_eq!(sent[1].header("authorization"), Some("Bearer abc"));
    }

    #[test]
    fn transport_errors_propagate() {
        let transport = Rc::new(FakeTransport::default());
        let err = requester(&transport)
            .execute(ApiRequest::get("/movies"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn logging_failure_does_not_mask_status_check() {
        let transport = Rc::new(FakeTransport::default());
        transport.respond_bytes(500, &[0xff, 0xfe]);
        let err = requester(&transport)
            .execute(ApiRequest::get("/movies"))
            .unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedStatusCode { status: 500, .. }));
    }

    #[test]
    fn call_overrides_defaults_before_sending() {
        let transport = Rc::new(FakeTransport::default());
        transport.respond(400, "");
        let requester = requester(&transport);

        let response = requester
            .call(ApiRequest::get("/movies"))
            .param("page", "abc")
            .expect_status(400)
            .send()
            .unwrap();
        assert_eq!(response.status, 400);
        assert_eq!(transport.sent()[0].url, "http://localhost:3000/movies?page=abc");
    }

    #[test]
    fn call_defers_serialization_errors() {
        let transport = Rc::new(FakeTransport::default());
        let requester = requester(&transport);
        let mut bad = std::collections::HashMap::new();
        bad.insert(vec![1u8], 1);

        let call = Call::with_json(&requester, ApiRequest::post("/movies"), &bad);
        assert!(call.request().is_err());
        let err = call.send().unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)));
        assert!(transport.sent().is_empty());
    }
}
