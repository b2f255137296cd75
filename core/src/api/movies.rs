//! Movies CRUD endpoints.
//!
//! # Design
//! Each method fixes a method, a path and a default status, then hands a
//! `Call` back so tests can override the status for negative cases.

use std::fmt::Display;

use serde::Serialize;

use crate::requester::{ApiRequest, Call, Requester};

pub const MOVIES_ENDPOINT: &str = "/movies";

fn movie_endpoint(id: impl Display) -> String {
    format!("{MOVIES_ENDPOINT}/{id}")
}

/// Client for the movies service.
///
/// Ids are taken as `Display` so tests can send malformed ones.
#[derive(Debug, Clone)]
pub struct MoviesApi {
    requester: Requester,
}

impl MoviesApi {
    pub fn new(requester: Requester) -> Self {
        Self { requester }
    }

    /// `GET /movies`, expecting 200. Filters go through `Call::param`.
    pub fn list_movies(&self) -> Call<'_> {
        self.requester.call(ApiRequest::get(MOVIES_ENDPOINT))
    }

    /// `POST /movies`, expecting 201.
    pub fn create_movie<T: Serialize + ?Sized>(&self, movie: &T) -> Call<'_> {
        Call::with_json(
            &self.requester,
            ApiRequest::post(MOVIES_ENDPOINT).expect_status(201),
            movie,
        )
    }

    pub fn get_movie(&self, id: impl Display) -> Call<'_> {
        self.requester.call(ApiRequest::get(movie_endpoint(id)))
    }

    pub fn patch_movie<T: Serialize + ?Sized>(&self, id: impl Display, patch: &T) -> Call<'_> {
        Call::with_json(&self.requester, ApiRequest::patch(movie_endpoint(id)), patch)
    }

    /// `DELETE /movies/{id}`, expecting 200 or 204.
    pub fn delete_movie(&self, id: impl Display) -> Call<'_> {
        self.requester
            .call(ApiRequest::delete(movie_endpoint(id)).expect_status([200, 204]))
    }
}
