//! Shared harness for the end-to-end suite.
//!
//! Each test starts its own mock backend on a random port, so tests never see
//! each other's data. Setting `MOVIES_API_URL` points the suite at a live
//! deployment instead; the admin account then comes from
//! `MOVIES_ADMIN_EMAIL` / `MOVIES_ADMIN_PASSWORD`.

#![allow(dead_code)]

use movies_client::config::API_URL_VAR;
use movies_client::fixtures;
use movies_client::{ApiManager, Config, Credentials, Movie, RegisterUser, User};
use tracing_subscriber::EnvFilter;

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_test_writer()
        .try_init();
}

/// Starts the mock server on a background thread and returns its base URL.
pub fn spawn_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

pub struct Harness {
    pub config: Config,
    pub admin: Credentials,
}

impl Harness {
    pub fn start() -> Self {
        init_logging();
        if std::env::var_os(API_URL_VAR).is_some() {
            let config = Config::from_env().expect("invalid live configuration");
            let admin = config
                .admin
                .clone()
                .expect("live runs need MOVIES_ADMIN_EMAIL and MOVIES_ADMIN_PASSWORD");
            return Self { config, admin };
        }

        let admin = Credentials::new(
            mock_server::DEFAULT_ADMIN_EMAIL,
            mock_server::DEFAULT_ADMIN_PASSWORD,
        );
        let config = Config::local(spawn_mock_server()).with_admin(admin.clone());
        Self { config, admin }
    }

    /// A client that never logged in.
    pub fn anonymous(&self) -> ApiManager {
        ApiManager::new(&self.config)
    }

    /// A client authenticated as the admin.
    pub fn admin(&self) -> ApiManager {
        let api = ApiManager::new(&self.config);
        api.auth.authenticate(&self.admin).unwrap();
        api
    }

    /// Registers a fresh user and returns the payload with the created user.
    pub fn registered_user(&self) -> (RegisterUser, User) {
        let payload = fixtures::register_payload();
        let user = self
            .anonymous()
            .auth
            .register_user(&payload)
            .send()
            .unwrap()
            .json()
            .unwrap();
        (payload, user)
    }
}

/// Creates a movie through `api`, which must be authorized.
pub fn created_movie(api: &ApiManager) -> Movie {
    api.movies
        .create_movie(&fixtures::movie_payload())
        .send()
        .unwrap()
        .json()
        .unwrap()
}
