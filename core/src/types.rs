//! Request and response payloads of the movies and auth services.
//!
//! # Design
//! These types mirror the backend's camelCase JSON. The mock server defines
//! its own copies; the end-to-end suite catches any drift between the two.
//! Negative tests that need malformed payloads use `serde_json::Value`
//! instead of these types.

use serde::{Deserialize, Serialize};

/// Cities a movie can be shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "MSK")]
    Moscow,
    #[serde(rename = "SPB")]
    SaintPetersburg,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
}

/// A movie as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub location: Location,
    pub published: bool,
    pub genre_id: i64,
    #[serde(default)]
    pub genre: Option<Genre>,
    #[serde(default)]
    pub rating: f64,
}

/// Payload for `POST /movies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub price: i64,
    pub description: String,
    pub location: Location,
    pub published: bool,
    pub genre_id: i64,
}

/// Payload for `PATCH /movies/{id}`. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<i64>,
}

/// One page of `GET /movies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieList {
    pub movies: Vec<Movie>,
    pub count: usize,
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
}

/// E-mail and password pair used to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub password_repeat: String,
}

impl RegisterUser {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.email, &self.password)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub banned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
    #[serde(default)]
    pub expires_in: u64,
}
