//! Unique test payloads.
//!
//! Names and e-mails embed a random uuid so repeated runs against a shared
//! backend never collide on uniqueness constraints.

use uuid::Uuid;

use crate::types::{Location, MoviePatch, NewMovie, RegisterUser};

fn suffix() -> String {
    Uuid::new_v4().simple().to_string()
}

/// A valid movie with a unique name.
pub fn movie_payload() -> NewMovie {
    let id = suffix();
    NewMovie {
        name: format!("Movie {id}"),
        image_url: Some(format!("https://images.example/{id}.png")),
        price: 250,
        description: format!("Generated movie {id}"),
        location: Location::Moscow,
        published: true,
        genre_id: 1,
    }
}

/// A patch renaming the movie and changing every editable field.
pub fn patch_movie_payload() -> MoviePatch {
    let id = suffix();
    MoviePatch {
        name: Some(format!("Patched {id}")),
        image_url: None,
        price: Some(400),
        description: Some(format!("Patched movie {id}")),
        location: Some(Location::SaintPetersburg),
        published: Some(false),
        genre_id: Some(2),
    }
}

pub fn random_email() -> String {
    format!("user-{}@movies.test", suffix())
}

/// Mixed-case alphanumeric password of 20 characters.
pub fn random_password() -> String {
    let id = suffix();
    format!("Pw{}9", &id[..17])
}

/// A registration with matching passwords.
pub fn register_payload() -> RegisterUser {
    let password = random_password();
    RegisterUser {
        email: random_email(),
        full_name: format!("Test User {}", &suffix()[..8]),
        password_repeat: password.clone(),
        password,
    }
}
