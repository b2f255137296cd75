//! Route handlers.
//!
//! Handlers check the bearer token before looking at the body or the
//! resource, so anonymous callers always get 401.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Failure;
use crate::store::{
    genre, Credentials, Genre, Location, LoginResponse, Movie, MovieList, MoviePatch, NewMovie,
    RegisterUser, Role, Store, User,
};
use crate::Db;

const TOKEN_TTL_SECS: u64 = 3600;
const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 20;
const MIN_PASSWORD_LEN: usize = 8;

type JsonBody = Result<Json<Value>, JsonRejection>;

fn parse_body<T: DeserializeOwned>(body: JsonBody) -> Result<T, Failure> {
    let Json(value) = body.map_err(|rejection| Failure::BadRequest(rejection.body_text()))?;
    serde_json::from_value(value).map_err(|err| Failure::BadRequest(err.to_string()))
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn authorize<'a>(store: &'a Store, headers: &HeaderMap) -> Result<&'a User, Failure> {
    bearer(headers)
        .and_then(|token| store.user_for_token(token))
        .ok_or(Failure::Unauthorized)
}

fn require_admin(store: &Store, headers: &HeaderMap) -> Result<(), Failure> {
    if authorize(store, headers)?.is_admin() {
        Ok(())
    } else {
        Err(Failure::Forbidden)
    }
}

/// Non-numeric ids fail with 500; the real backend does the same.
fn movie_id(raw: &str) -> Result<i64, Failure> {
    raw.parse().map_err(|_| Failure::Internal)
}

fn movie_not_found(id: i64) -> Failure {
    Failure::NotFound(format!("Movie with id {id} not found"))
}

fn valid_genre(id: i64) -> Result<Genre, Failure> {
    genre(id).ok_or_else(|| Failure::BadRequest(format!("genreId {id} does not exist")))
}

// --- auth ---

pub async fn register(
    State(db): State<Db>,
    body: JsonBody,
) -> Result<(StatusCode, Json<User>), Failure> {
    let input: RegisterUser = parse_body(body)?;
    if !input.email.contains('@') {
        return Err(Failure::BadRequest("email must be an email".to_string()));
    }
    if input.full_name.trim().is_empty() {
        return Err(Failure::BadRequest("fullName should not be empty".to_string()));
    }
    if input.password.len() < MIN_PASSWORD_LEN {
        return Err(Failure::BadRequest(format!(
            "password must be longer than or equal to {MIN_PASSWORD_LEN} characters"
        )));
    }
    if input.password != input.password_repeat {
        return Err(Failure::BadRequest("Passwords do not match".to_string()));
    }

    let mut store = db.write().await;
    if store.email_taken(&input.email) {
        return Err(Failure::Conflict("User with this email already exists".to_string()));
    }
    let user = store.insert_account(&input.email, &input.full_name, &input.password, vec![Role::User]);
    tracing::debug!(id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(db): State<Db>,
    body: JsonBody,
) -> Result<(StatusCode, Json<LoginResponse>), Failure> {
    let input: Credentials = parse_body(body)?;
    let (access_token, user) = db
        .write()
        .await
        .login(&input.email, &input.password)
        .ok_or(Failure::Unauthorized)?;
    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            access_token,
            user,
            expires_in: TOKEN_TTL_SECS,
        }),
    ))
}

// --- users ---

pub async fn get_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<User>, Failure> {
    let store = db.read().await;
    require_admin(&store, &headers)?;
    store
        .user(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| Failure::NotFound(format!("User with id {id} not found")))
}

pub async fn delete_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    require_admin(&store, &headers)?;
    store
        .remove_user(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| Failure::NotFound(format!("User with id {id} not found")))
}

// --- movies ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug)]
struct ListQuery {
    page_size: u32,
    page: u32,
    min_price: Option<i64>,
    max_price: Option<i64>,
    locations: Option<Vec<Location>>,
    published: Option<bool>,
    genre_id: Option<i64>,
    order: SortOrder,
}

fn number_param<T: FromStr>(params: &HashMap<String, String>, key: &str) -> Result<Option<T>, Failure> {
    params
        .get(key)
        .map(|raw| {
            raw.parse()
                .map_err(|_| Failure::BadRequest(format!("{key} must be a number")))
        })
        .transpose()
}

impl ListQuery {
    fn parse(params: &HashMap<String, String>) -> Result<Self, Failure> {
        let page_size = number_param(params, "pageSize")?.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(Failure::BadRequest(format!(
                "pageSize must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        let page = number_param(params, "page")?.unwrap_or(1);
        if page == 0 {
            return Err(Failure::BadRequest("page must not be less than 1".to_string()));
        }

        let locations = params
            .get("locations")
            .map(|raw| {
                raw.split(',')
                    .map(|code| {
                        Location::from_str(code.trim()).map_err(|()| {
                            Failure::BadRequest("each value in locations must be one of: MSK, SPB".to_string())
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let order = match params.get("createdAt").map(String::as_str) {
            None | Some("desc") => SortOrder::Desc,
            Some("asc") => SortOrder::Asc,
            Some(_) => {
                return Err(Failure::BadRequest("createdAt must be one of: asc, desc".to_string()))
            }
        };

        Ok(Self {
            page_size,
            page,
            min_price: number_param(params, "minPrice")?,
            max_price: number_param(params, "maxPrice")?,
            locations,
            // unparseable values skip the filter instead of failing, like the real backend
            published: params.get("published").and_then(|raw| raw.parse().ok()),
            genre_id: number_param(params, "genreId")?,
            order,
        })
    }

    fn matches(&self, movie: &Movie) -> bool {
        self.min_price.is_none_or(|min| movie.price >= min)
            && self.max_price.is_none_or(|max| movie.price <= max)
            && self
                .locations
                .as_ref()
                .is_none_or(|locations| locations.contains(&movie.location))
            && self.published.is_none_or(|published| movie.published == published)
            && self.genre_id.is_none_or(|genre_id| movie.genre_id == genre_id)
    }
}

pub async fn list_movies(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<MovieList>, Failure> {
    let query = ListQuery::parse(&params)?;
    let store = db.read().await;

    let mut matching: Vec<Movie> = store.movies().filter(|movie| query.matches(movie)).cloned().collect();
    if query.order == SortOrder::Desc {
        matching.reverse();
    }
    let count = matching.len();
    let page_size = query.page_size as usize;
    let page_count = u32::try_from(count.div_ceil(page_size)).unwrap_or(u32::MAX);
    let movies = matching
        .into_iter()
        .skip((query.page as usize - 1) * page_size)
        .take(page_size)
        .collect();

    Ok(Json(MovieList {
        movies,
        count,
        page: query.page,
        page_size: query.page_size,
        page_count,
    }))
}

pub async fn create_movie(
    State(db): State<Db>,
    headers: HeaderMap,
    body: JsonBody,
) -> Result<(StatusCode, Json<Movie>), Failure> {
    let mut store = db.write().await;
    require_admin(&store, &headers)?;

    let input: NewMovie = parse_body(body)?;
    if input.name.trim().is_empty() {
        return Err(Failure::BadRequest("name should not be empty".to_string()));
    }
    if input.price < 0 {
        return Err(Failure::BadRequest("price must not be less than 0".to_string()));
    }
    let genre = valid_genre(input.genre_id)?;
    if store.movie_name_taken(&input.name, None) {
        return Err(Failure::Conflict("Movie with this name already exists".to_string()));
    }

    let movie = store.insert_movie(input, genre);
    tracing::debug!(id = movie.id, name = %movie.name, "movie created");
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn get_movie(State(db): State<Db>, Path(raw_id): Path<String>) -> Result<Json<Movie>, Failure> {
    let id = movie_id(&raw_id)?;
    db.read()
        .await
        .movie(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| movie_not_found(id))
}

pub async fn patch_movie(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    body: JsonBody,
) -> Result<Json<Movie>, Failure> {
    let mut store = db.write().await;
    require_admin(&store, &headers)?;
    let id = movie_id(&raw_id)?;
    let patch: MoviePatch = parse_body(body)?;

    if store.movie(id).is_none() {
        return Err(movie_not_found(id));
    }
    if let Some(name) = &patch.name {
        if store.movie_name_taken(name, Some(id)) {
            return Err(Failure::Conflict("Movie with this name already exists".to_string()));
        }
    }
    if patch.price.is_some_and(|price| price < 0) {
        return Err(Failure::BadRequest("price must not be less than 0".to_string()));
    }
    let genre = patch.genre_id.map(valid_genre).transpose()?;

    let movie = store.movie_mut(id).ok_or_else(|| movie_not_found(id))?;
    if let Some(name) = patch.name {
        movie.name = name;
    }
    if let Some(image_url) = patch.image_url {
        movie.image_url = Some(image_url);
    }
    if let Some(price) = patch.price {
        movie.price = price;
    }
    if let Some(description) = patch.description {
        movie.description = description;
    }
    if let Some(location) = patch.location {
        movie.location = location;
    }
    if let Some(published) = patch.published {
        movie.published = published;
    }
    if let (Some(genre_id), Some(genre)) = (patch.genre_id, genre) {
        movie.genre_id = genre_id;
        movie.genre = genre;
    }
    Ok(Json(movie.clone()))
}

pub async fn delete_movie(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<Json<Movie>, Failure> {
    let mut store = db.write().await;
    require_admin(&store, &headers)?;
    let id = movie_id(&raw_id)?;
    let movie = store.remove_movie(id).ok_or_else(|| movie_not_found(id))?;
    tracing::debug!(id, "movie deleted");
    Ok(Json(movie))
}
