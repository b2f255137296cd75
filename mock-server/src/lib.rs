//! In-process stand-in for the Movies and auth backend.
//!
//! Reproduces the status codes the end-to-end suite relies on, including two
//! quirks of the real service: an unparseable `published` filter is ignored
//! (200), and a non-numeric movie id yields 500 instead of 400.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::{net::TcpListener, sync::RwLock};

pub mod error;
mod handlers;
pub mod store;

pub use error::{ErrorBody, Failure};
pub use store::{Genre, Location, LoginResponse, Movie, MovieList, Role, Store, User};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@movies.test";
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin123!";

pub type Db = Arc<RwLock<Store>>;

/// Seed data for the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConfig {
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl MockConfig {
    /// Reads `MOCK_ADMIN_EMAIL` and `MOCK_ADMIN_PASSWORD`, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            admin_email: std::env::var("MOCK_ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: std::env::var("MOCK_ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
        }
    }
}

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded(&config)));
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/user/{id}", get(handlers::get_user).delete(handlers::delete_user))
        .route("/movies", get(handlers::list_movies).post(handlers::create_movie))
        .route(
            "/movies/{id}",
            get(handlers::get_movie)
                .patch(handlers::patch_movie)
                .delete(handlers::delete_movie),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_default_admin() {
        let config = MockConfig::default();
        assert_eq!(config.admin_email, DEFAULT_ADMIN_EMAIL);
        assert_eq!(config.admin_password, DEFAULT_ADMIN_PASSWORD);
    }

    #[test]
    fn failure_maps_to_status() {
        use axum::http::StatusCode;

        assert_eq!(Failure::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(Failure::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Failure::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(Failure::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(Failure::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(Failure::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
