//! User administration endpoints on the auth service.

use std::fmt::Display;

use crate::requester::{ApiRequest, Call, Requester};

pub const USER_ENDPOINT: &str = "/user";

/// Client for user administration on the auth service.
#[derive(Debug, Clone)]
pub struct UserApi {
    requester: Requester,
}

impl UserApi {
    pub fn new(requester: Requester) -> Self {
        Self { requester }
    }

    pub fn get_user(&self, id: impl Display) -> Call<'_> {
        self.requester
            .call(ApiRequest::get(format!("{USER_ENDPOINT}/{id}")))
    }

    /// `DELETE /user/{id}`, expecting 204.
    pub fn delete_user(&self, id: impl Display) -> Call<'_> {
        self.requester
            .call(ApiRequest::delete(format!("{USER_ENDPOINT}/{id}")).expect_status(204))
    }
}
