// src/routes.rs

use crate::auth::{middleware::require_auth, Validator};
use crate::jokes::{Joke, JokeStore};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::path::Path as FsPath;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::debug;

/// Shared application state cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: JokeStore,
    pub validator: Validator,
}

/// Builds the service router.
///
/// The joke routes sit behind the auth gate; the ping route and the static
/// site at `/` are public.
pub fn build_routes(state: AppState, static_dir: &FsPath) -> Router {
    let protected = Router::new()
        .route("/api/jokes", get(list_jokes))
        .route("/api/jokes/like/:joke_id", post(like_joke))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/api/", get(ping))
        .merge(protected)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "message": "pong" }))
}

async fn list_jokes(State(state): State<AppState>) -> Json<Vec<Joke>> {
    Json(state.store.list().await)
}

/// Registers a like and responds with the full post-increment list.
///
/// A non-numeric id is 404; a numeric id with no matching joke leaves the
/// list untouched and still responds 200.
async fn like_joke(State(state): State<AppState>, Path(joke_id): Path<String>) -> Response {
    let Ok(id) = joke_id.parse::<u64>() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if state.store.like(id).await.is_none() {
        debug!(id, "like for unknown joke id ignored");
    }

    Json(state.store.list().await).into_response()
}
