//! Movie collection endpoints.
//!
//! Each handler validates with `movies_core`, then reads or mutates the
//! injected [`MovieStore`](crate::storage::MovieStore). CORS headers are
//! attached by the origin gate middleware, not here, except for the extra
//! pre-flight allowances.

use axum::extract::{Path, Query, State};
use axum::http::header::{LOCATION, ORIGIN};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use movies_core::{validate_full, validate_partial, Movie};

use super::{ApiError, AppState};

/// Query string accepted by `GET /movies`.
#[derive(Debug, Default, Deserialize)]
pub struct MovieQuery {
    /// Genre to filter by (case-insensitive). Empty means no filter.
    pub genre: Option<String>,
}

/// `GET /` -- greeting, doubles as a trivial liveness check.
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Hello world" }))
}

/// `GET /movies` -- every movie, or only those of `?genre=`.
pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<MovieQuery>,
) -> Json<Vec<Movie>> {
    let movies = match query.genre.as_deref() {
        Some(genre) if !genre.is_empty() => state.store.filter_by_genre(genre),
        _ => state.store.list(),
    };
    Json(movies)
}

/// `GET /movies/{id}`
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    state.store.find_by_id(&id).map(Json).ok_or(ApiError::NotFound)
}

/// `POST /movies` -- validates a full payload and stores it under a fresh id.
pub async fn create_movie(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = validate_full(&payload).inspect_err(|err| {
        warn!(violations = err.violations.len(), "rejected movie create");
    })?;

    let movie = state
        .store
        .append(draft.into_movie(Uuid::new_v4().to_string()))?;
    info!(id = %movie.id, title = %movie.title, "movie created");

    let location = format!("/movies/{}", movie.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(movie)))
}

/// `PATCH /movies/{id}` -- validates a partial payload, then merges it.
///
/// The body is validated before the id is looked up, so a bad body on an
/// unknown id answers 400.
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Movie>, ApiError> {
    let patch = validate_partial(&payload).inspect_err(|err| {
        warn!(%id, violations = err.violations.len(), "rejected movie update");
    })?;

    let movie = state
        .store
        .replace_by_id(&id, &patch)
        .ok_or(ApiError::NotFound)?;
    info!(%id, "movie updated");
    Ok(Json(movie))
}

/// `DELETE /movies/{id}`
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.store.remove_by_id(&id).ok_or(ApiError::NotFound)?;
    info!(%id, "movie deleted");
    Ok(Json(json!({ "message": "Movie deleted" })))
}

/// `OPTIONS /movies` and `OPTIONS /movies/{id}` -- CORS pre-flight.
///
/// Always 200. Method and header allowances are added only for allowed
/// origins.
pub async fn preflight_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let decision = state.gate.decide(headers.get(ORIGIN));
    let mut response_headers = HeaderMap::new();
    decision.apply_preflight(&mut response_headers);
    (StatusCode::OK, response_headers)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::network::NetworkConfig;
    use crate::storage::InMemoryMovieStore;
    use axum::http::header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN};
    use axum::http::HeaderValue;

    fn matrix() -> Movie {
        Movie {
            id: "1".to_string(),
            title: "The Matrix".to_string(),
            year: 1999,
            director: "Lana Wachowski".to_string(),
            duration: 136,
            poster: "https://img.example.com/matrix.jpg".to_string(),
            genre: vec!["Action".to_string(), "Sci-Fi".to_string()],
            rate: 8.7,
        }
    }

    fn amelie() -> Movie {
        Movie {
            id: "2".to_string(),
            title: "Amelie".to_string(),
            year: 2001,
            director: "Jean-Pierre Jeunet".to_string(),
            duration: 122,
            poster: "https://img.example.com/amelie.jpg".to_string(),
            genre: vec!["Comedy".to_string(), "Romance".to_string()],
            rate: 8.3,
        }
    }

    fn test_state() -> AppState {
        let store = InMemoryMovieStore::with_movies(vec![matrix(), amelie()]).unwrap();
        AppState::new(Arc::new(store), NetworkConfig::default())
    }

    fn full_payload() -> Value {
        json!({
            "title": "Heat",
            "year": 1995,
            "director": "Michael Mann",
            "duration": 170,
            "poster": "https://img.example.com/heat.jpg",
            "genre": ["Crime", "Drama"],
            "rate": 8.3
        })
    }

    #[tokio::test]
    async fn root_greets() {
        let Json(body) = root_handler().await;
        assert_eq!(body["message"], "Hello world");
    }

    #[tokio::test]
    async fn list_without_filter_returns_all_in_order() {
        let Json(movies) = list_movies(State(test_state()), Query(MovieQuery::default())).await;
        assert_eq!(movies, vec![matrix(), amelie()]);
    }

    #[tokio::test]
    async fn list_with_genre_filters_case_insensitively() {
        let query = MovieQuery {
            genre: Some("action".to_string()),
        };
        let Json(movies) = list_movies(State(test_state()), Query(query)).await;
        assert_eq!(movies, vec![matrix()]);
    }

    #[tokio::test]
    async fn list_with_empty_genre_returns_all() {
        let query = MovieQuery {
            genre: Some(String::new()),
        };
        let Json(movies) = list_movies(State(test_state()), Query(query)).await;
        assert_eq!(movies.len(), 2);
    }

    #[tokio::test]
    async fn get_known_and_unknown_ids() {
        let state = test_state();
        let Json(movie) = get_movie(State(state.clone()), Path("1".to_string()))
            .await
            .unwrap();
        assert_eq!(movie, matrix());

        let err = get_movie(State(state), Path("99".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn create_stores_record_with_fresh_id() {
        let state = test_state();
        let response = create_movie(State(state.clone()), Json(full_payload()))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let location = response.headers()[LOCATION].to_str().unwrap().to_string();
        let id = location.trim_start_matches("/movies/");
        let stored = state.store.find_by_id(id).unwrap();
        assert_eq!(stored.title, "Heat");
        assert_ne!(stored.id, "1");
        assert_eq!(state.store.list().last(), Some(&stored));
    }

    #[tokio::test]
    async fn create_rejects_missing_title() {
        let state = test_state();
        let mut payload = full_payload();
        payload.as_object_mut().unwrap().remove("title");

        let err = create_movie(State(state.clone()), Json(payload))
            .await
            .err()
            .unwrap();
        match err {
            ApiError::Validation(err) => assert!(err.mentions("title")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(state.store.len(), 2);
    }

    #[tokio::test]
    async fn update_merges_and_keeps_id() {
        let state = test_state();
        let Json(movie) = update_movie(
            State(state.clone()),
            Path("1".to_string()),
            Json(json!({ "year": 2000 })),
        )
        .await
        .unwrap();

        assert_eq!(movie.id, "1");
        assert_eq!(movie.year, 2000);
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(state.store.find_by_id("1"), Some(movie));
    }

    #[tokio::test]
    async fn update_validates_before_lookup() {
        let state = test_state();
        let err = update_movie(
            State(state.clone()),
            Path("99".to_string()),
            Json(json!({ "year": "2000" })),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = update_movie(State(state), Path("99".to_string()), Json(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let state = test_state();
        let Json(body) = delete_movie(State(state.clone()), Path("2".to_string()))
            .await
            .unwrap();
        assert_eq!(body["message"], "Movie deleted");

        assert!(matches!(
            get_movie(State(state.clone()), Path("2".to_string())).await,
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            delete_movie(State(state), Path("2".to_string())).await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn preflight_advertises_methods_for_allowed_origin() {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, HeaderValue::from_static("http://localhost:8080"));

        let response = preflight_handler(State(test_state()), headers)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, PATCH, DELETE"
        );
        // The origin itself is echoed by middleware, not by the handler.
        assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn preflight_for_unknown_origin_has_no_allowances() {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, HeaderValue::from_static("http://evil.example.com"));

        let response = preflight_handler(State(test_state()), headers)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(ACCESS_CONTROL_ALLOW_METHODS).is_none());
    }
}
