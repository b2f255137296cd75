//! In-memory state of the mock backend.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MockConfig;

pub const GENRES: [&str; 10] = [
    "Drama",
    "Comedy",
    "Thriller",
    "Horror",
    "Documentary",
    "Animation",
    "Fantasy",
    "Science fiction",
    "Crime",
    "Romance",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "MSK")]
    Moscow,
    #[serde(rename = "SPB")]
    SaintPetersburg,
}

impl std::str::FromStr for Location {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MSK" => Ok(Location::Moscow),
            "SPB" => Ok(Location::SaintPetersburg),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub description: String,
    pub image_url: Option<String>,
    pub location: Location,
    pub published: bool,
    pub genre_id: i64,
    pub genre: Genre,
    pub rating: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub name: String,
    pub image_url: Option<String>,
    pub price: i64,
    pub description: String,
    pub location: Location,
    pub published: bool,
    pub genre_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePatch {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub location: Option<Location>,
    pub published: Option<bool>,
    pub genre_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<Role>,
    pub verified: bool,
    pub banned: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.roles
            .iter()
            .any(|role| matches!(role, Role::Admin | Role::SuperAdmin))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub password_repeat: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieList {
    pub movies: Vec<Movie>,
    pub count: usize,
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

/// Users, sessions and movies.
#[derive(Debug)]
pub struct Store {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    movies: BTreeMap<i64, Movie>,
    next_movie_id: i64,
}

impl Store {
    /// An empty store holding only the configured super admin.
    pub fn seeded(config: &MockConfig) -> Self {
        let mut store = Self {
            accounts: HashMap::new(),
            tokens: HashMap::new(),
            movies: BTreeMap::new(),
            next_movie_id: 1,
        };
        store.insert_account(
            &config.admin_email,
            "Super Admin",
            &config.admin_password,
            vec![Role::SuperAdmin],
        );
        store
    }

    pub fn insert_account(
        &mut self,
        email: &str,
        full_name: &str,
        password: &str,
        roles: Vec<Role>,
    ) -> User {
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            roles,
            verified: true,
            banned: false,
        };
        self.accounts.insert(
            user.id.clone(),
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        user
    }

    pub fn email_taken(&self, email: &str) -> bool {
        self.accounts
            .values()
            .any(|account| account.user.email.eq_ignore_ascii_case(email))
    }

    /// Issues a fresh token when the credentials match an account.
    pub fn login(&mut self, email: &str, password: &str) -> Option<(String, User)> {
        let user = self
            .accounts
            .values()
            .find(|account| account.user.email.eq_ignore_ascii_case(email) && account.password == password)?
            .user
            .clone();
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), user.id.clone());
        Some((token, user))
    }

    pub fn user_for_token(&self, token: &str) -> Option<&User> {
        let id = self.tokens.get(token)?;
        self.accounts.get(id).map(|account| &account.user)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.accounts.get(id).map(|account| &account.user)
    }

    /// Removes the account and every token issued to it.
    pub fn remove_user(&mut self, id: &str) -> Option<User> {
        let account = self.accounts.remove(id)?;
        self.tokens.retain(|_, user_id| user_id != id);
        Some(account.user)
    }

    pub fn movies(&self) -> impl DoubleEndedIterator<Item = &Movie> {
        self.movies.values()
    }

    pub fn movie(&self, id: i64) -> Option<&Movie> {
        self.movies.get(&id)
    }

    pub fn movie_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.movies
            .values()
            .any(|movie| movie.name == name && Some(movie.id) != except)
    }

    pub fn insert_movie(&mut self, input: NewMovie, genre: Genre) -> Movie {
        let movie = Movie {
            id: self.next_movie_id,
            name: input.name,
            price: input.price,
            description: input.description,
            image_url: input.image_url,
            location: input.location,
            published: input.published,
            genre_id: input.genre_id,
            genre,
            rating: 0.0,
        };
        self.next_movie_id += 1;
        self.movies.insert(movie.id, movie.clone());
        movie
    }

    pub fn movie_mut(&mut self, id: i64) -> Option<&mut Movie> {
        self.movies.get_mut(&id)
    }

    pub fn remove_movie(&mut self, id: i64) -> Option<Movie> {
        self.movies.remove(&id)
    }
}

/// Genre for a 1-based genre id.
pub fn genre(id: i64) -> Option<Genre> {
    let index = usize::try_from(id).ok()?.checked_sub(1)?;
    GENRES.get(index).map(|name| Genre {
        name: (*name).to_string(),
    })
}
