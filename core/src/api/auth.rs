//! Registration, login and session authentication.
//!
//! # Design
//! `authenticate` is the only place that writes the bearer token; it goes
//! onto the shared session, not into individual requests.

use serde_json::Value;

use crate::error::ApiError;
use crate::requester::{ApiRequest, Call, Requester};
use crate::types::{Credentials, RegisterUser};

pub const REGISTER_ENDPOINT: &str = "/auth/register";
pub const LOGIN_ENDPOINT: &str = "/auth/login";

/// Field of the login response holding the bearer token.
pub const ACCESS_TOKEN_FIELD: &str = "accessToken";

/// Client for the auth service.
#[derive(Debug, Clone)]
pub struct AuthApi {
    requester: Requester,
}

impl AuthApi {
    pub fn new(requester: Requester) -> Self {
        Self { requester }
    }

    /// `POST /auth/register`, expecting 201.
    pub fn register_user(&self, user: &RegisterUser) -> Call<'_> {
        Call::with_json(
            &self.requester,
            ApiRequest::post(REGISTER_ENDPOINT).expect_status(201),
            user,
        )
    }

    /// `POST /auth/login`, expecting 200 or 201.
    pub fn login_user(&self, credentials: &Credentials) -> Call<'_> {
        Call::with_json(
            &self.requester,
            ApiRequest::post(LOGIN_ENDPOINT).expect_status([200, 201]),
            credentials,
        )
    }

    /// Logs in and stores `Authorization: Bearer <token>` on the session.
    ///
    /// Every client sharing the session sends the header from then on.
    /// Fails with `MissingCredential` when the response has no string
    /// `accessToken`, even if the status was accepted.
    pub fn authenticate(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let body: Value = self.login_user(credentials).send()?.json()?;
        let token = body
            .get(ACCESS_TOKEN_FIELD)
            .and_then(Value::as_str)
            .ok_or(ApiError::MissingCredential {
                field: ACCESS_TOKEN_FIELD,
            })?
            .to_string();

        self.requester.session().set_bearer_token(&token);
        tracing::debug!(email = %credentials.email, "session authenticated");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::session::Session;
    use crate::testing::FakeTransport;

    fn auth(transport: &Rc<FakeTransport>) -> AuthApi {
        AuthApi::new(Requester::new(Session::new(), "http://auth.local", transport.clone()))
    }

    fn credentials() -> Credentials {
        Credentials::new("admin@movies.test", "Admin123!")
    }

    #[test]
    fn authenticate_stores_bearer_token() {
        let transport = Rc::new(FakeTransport::default());
        transport.respond(201, r#"{"accessToken":"tok-1","user":{}}"#);
        let auth = auth(&transport);

        let token = auth.authenticate(&credentials()).unwrap();
        assert_eq!(token, "tok-1");
        assert_eq!(
            auth.requester.session().header("Authorization").as_deref(),
            Some("Bearer tok-1")
        );

        let sent = transport.sent();
        assert_eq!(sent[0].url, "http://auth.local/auth/login");
        let body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "admin@movies.test");
        assert_eq!(body["password"], "Admin123!");
    }

    #[test]
    fn authenticate_accepts_200() {
        let transport = Rc::new(FakeTransport::default());
        transport.respond(200, r#"{"accessToken":"tok-2"}"#);
        assert_eq!(auth(&transport).authenticate(&credentials()).unwrap(), "tok-2");
    }

    #[test]
    fn missing_token_is_a_missing_credential() {
        let transport = Rc::new(FakeTransport::default());
        transport.respond(201, r#"{"user":{"id":"1"}}"#);
        let auth = auth(&transport);

        let err = auth.authenticate(&credentials()).unwrap_err();
        assert!(matches!(
            err,
            ApiError::MissingCredential { field: "accessToken" }
        ));
        assert!(auth.requester.session().bearer_token().is_none());
    }

    #[test]
    fn non_string_token_is_a_missing_credential() {
        let transport = Rc::new(FakeTransport::default());
        transport.respond(201, r#"{"accessToken":null}"#);
        let err = auth(&transport).authenticate(&credentials()).unwrap_err();
        assert!(matches!(err, ApiError::MissingCredential { .. }));
    }

    #[test]
    fn rejected_login_surfaces_status() {
        let transport = Rc::new(FakeTransport::default());
        transport.respond(401, r#"{"message":"Invalid credentials"}"#);
        let err = auth(&transport).authenticate(&credentials()).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedStatusCode { status: 401, .. }));
    }

    #[test]
    fn register_expects_created_by_default() {
        let transport = Rc::new(FakeTransport::default());
        transport.respond(200, "{}");
        let user = RegisterUser {
            email: "new@movies.test".to_string(),
            full_name: "New User".to_string(),
            password: "Passw0rd!".to_string(),
            password_repeat: "Passw0rd!".to_string(),
        };
        let err = auth(&transport).register_user(&user).send().unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedStatusCode { status: 200, .. }));
        assert_eq!(transport.sent()[0].url, "http://auth.local/auth/register");
    }
}
