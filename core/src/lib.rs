//! Blocking client and test harness for the Movies REST API.
//!
//! # Overview
//! Every call goes through one executor, `Requester`: it joins the base URL
//! and endpoint, sends the session's current headers, logs the exchange as a
//! curl command plus response, and rejects statuses outside the caller's
//! acceptance set. The auth, movies and user clients only pick a method,
//! a path and a default status.
//!
//! # Design
//! - `Session` is a shared handle. Authenticating through `AuthApi` puts a
//!   bearer token on it, and every client built on the same session sends it.
//! - `Transport` is the I/O seam; `UreqTransport` does real blocking HTTP.
//! - Domain clients return a `Call`, so tests override the expected status
//!   (`expect_status(404)`) instead of catching errors.

pub mod api;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod http;
pub mod logging;
pub mod requester;
pub mod session;
pub mod status;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use api::{ApiManager, AuthApi, MoviesApi, UserApi};
pub use config::Config;
pub use error::{ApiError, ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use requester::{ApiRequest, Call, Requester};
pub use session::Session;
pub use status::ExpectedStatus;
pub use transport::{Transport, UreqTransport};
pub use types::{Credentials, Location, Movie, MovieList, MoviePatch, NewMovie, RegisterUser, User};
