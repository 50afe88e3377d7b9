use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    domain::Collection,
    error::{ApiError, ErrorCode},
    protocol::{BeersResponse, MessageResponse, BEERS_ROUTE},
};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::ApiContext;
use app_state::AppState;
use config::{load_settings, prepare_database_url};

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::open(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "beer menu server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            BEERS_ROUTE,
            get(http_get_beers)
                .post(http_seed_beers)
                .put(http_update_beers),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    api::health(&state.api).await.map_err(internal_error)?;
    Ok("ok")
}

async fn http_get_beers(State(state): State<Arc<AppState>>) -> ApiResult<Json<BeersResponse>> {
    let beers = api::fetch_beers(&state.api).await.map_err(internal_error)?;
    Ok(Json(beers))
}

async fn http_seed_beers(State(state): State<Arc<AppState>>) -> ApiResult<Json<MessageResponse>> {
    let message = api::seed_beers(&state.api).await.map_err(internal_error)?;
    Ok(Json(message))
}

async fn http_update_beers(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Collection>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(collection) = body.map_err(rejected_body)?;
    let message = api::update_beers(&state.api, &collection)
        .await
        .map_err(internal_error)?;
    Ok(Json(message))
}

fn rejected_body(rejection: JsonRejection) -> (StatusCode, Json<ApiError>) {
    let message = rejection.body_text();
    warn!(%message, "rejected beer collection body");
    (
        rejection.status(),
        Json(ApiError::new(ErrorCode::Validation, message)),
    )
}

fn internal_error(err: ApiError) -> (StatusCode, Json<ApiError>) {
    error!(message = %err.message, "beer store operation failed");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
