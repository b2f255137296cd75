//! Per-service clients and the manager that wires them to one session.

mod auth;
mod movies;
mod user;

use std::rc::Rc;

pub use auth::{AuthApi, ACCESS_TOKEN_FIELD, LOGIN_ENDPOINT, REGISTER_ENDPOINT};
pub use movies::{MoviesApi, MOVIES_ENDPOINT};
pub use user::{UserApi, USER_ENDPOINT};

use crate::config::Config;
use crate::requester::Requester;
use crate::session::Session;
use crate::transport::{Transport, UreqTransport};

/// All service clients over one shared session.
///
/// Logging in through `auth` authorizes `movies` and `user` as well. Build a
/// second manager to get an anonymous client next to an authorized one.
#[derive(Debug, Clone)]
pub struct ApiManager {
    pub session: Session,
    pub auth: AuthApi,
    pub movies: MoviesApi,
    pub user: UserApi,
}

impl ApiManager {
    pub fn new(config: &Config) -> Self {
        Self::with_transport(config, Rc::new(UreqTransport::new(config.timeout)))
    }

    pub fn with_transport(config: &Config, transport: Rc<dyn Transport>) -> Self {
        let session = Session::new();
        let auth_requester = Requester::new(session.clone(), &config.auth_base_url, transport.clone());
        let api_requester = Requester::new(session.clone(), &config.api_base_url, transport);
        Self {
            auth: AuthApi::new(auth_requester.clone()),
            user: UserApi::new(auth_requester),
            movies: MoviesApi::new(api_requester),
            session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use crate::types::Credentials;

    fn config() -> Config {
        Config {
            auth_base_url: "http://auth.local".to_string(),
            api_base_url: "http://api.local".to_string(),
            timeout: None,
            admin: None,
        }
    }

    #[test]
    fn services_use_their_own_base_urls() {
        let transport = Rc::new(FakeTransport::default());
        transport.respond(200, "{}");
        transport.respond(200, r#"{"movies":[]}"#);
        let api = ApiManager::with_transport(&config(), transport.clone());

        api.user.get_user("u1").send().unwrap();
        api.movies.list_movies().send().unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].url, "http://auth.local/user/u1");
        assert_eq!(sent[1].url, "http://api.local/movies");
    }

    #[test]
    fn login_authorizes_every_service() {
        let transport = Rc::new(FakeTransport::default());
        transport.respond(201, r#"{"accessToken":"tok"}"#);
        transport.respond(201, r#"{"id":1}"#);
        transport.respond(204, "");
        let api = ApiManager::with_transport(&config(), transport.clone());

        api.auth
            .authenticate(&Credentials::new("admin@movies.test", "secret"))
            .unwrap();
        api.movies
            .create_movie(&serde_json::json!({"name": "Heat"}))
            .send()
            .unwrap();
        api.user.delete_user("u1").send().unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].header("authorization"), None);
        assert_eq!(sent[1].header("authorization"), Some("Bearer tok"));
        assert_eq!(sent[2].header("authorization"), Some("Bearer tok"));
    }

    #[test]
    fn managers_do_not_share_sessions() {
        let transport = Rc::new(FakeTransport::default());
        let admin = ApiManager::with_transport(&config(), transport.clone());
        let anonymous = ApiManager::with_transport(&config(), transport);
        admin.session.set_bearer_token("tok");
        assert!(anonymous.session.bearer_token().is_none());
    }
}
