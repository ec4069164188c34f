use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use riggs_core::catalog::CatalogStats;
use riggs_core::geo::Marker;
use riggs_core::locale::ResolvedZone;
use riggs_core::model::Category;
use riggs_core::selection::ChannelSummary;
use riggs_core::{FavoritesError, ResolveError, SelectionError};
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::session::{
    CountryRow, NumericLookup, RandomChoice, SelectionView, SessionManager, Status, StreamInfo,
};

/// Error body is always `{ "error": "<message>" }`.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Internal(String),
    BadGateway(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
            ApiError::BadGateway(m) => (StatusCode::BAD_GATEWAY, m),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<SelectionError> for ApiError {
    fn from(e: SelectionError) -> Self {
        ApiError::NotFound(e.to_string())
    }
}

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        ApiError::NotFound(e.to_string())
    }
}

impl From<FavoritesError> for ApiError {
    fn from(e: FavoritesError) -> Self {
        error!("favorites not persisted: {}", e);
        ApiError::Internal(e.to_string())
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Serialize)]
struct FavoriteToggled {
    channel_id: String,
    favorite: bool,
}

pub fn router(sessions: SessionManager) -> Router {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/countries", get(get_countries))
        .route("/api/categories", get(get_categories))
        .route("/api/countries/:code/channels", get(country_channels))
        .route("/api/categories/:id/channels", get(category_channels))
        .route("/api/favorites", get(favorite_channels))
        .route("/api/favorites/:id", post(toggle_favorite))
        .route("/api/random", post(random_channel))
        .route("/api/channels/:id/stream", get(channel_stream))
        .route("/api/timezones/:code", get(country_timezone))
        .route("/api/selection", get(get_selection))
        .route("/api/markers", get(get_markers))
        .route("/api/geo/numeric/:num", get(numeric_lookup))
        .route("/api/reload", post(reload))
        .layer(CorsLayer::permissive())
        .with_state(sessions)
}

pub fn start_server(
    bind_address: String,
    port: u16,
    sessions: SessionManager,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let app = router(sessions);

        let addr = format!("{}:{}", bind_address, port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}", addr, e);
                return;
            }
        };

        info!("HTTP API server listening on http://{}", addr);

        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    })
}

async fn get_status(State(sessions): State<SessionManager>) -> Json<Status> {
    Json(sessions.status().await)
}

async fn get_countries(State(sessions): State<SessionManager>) -> Json<Vec<CountryRow>> {
    Json(sessions.countries().await)
}

async fn get_categories(State(sessions): State<SessionManager>) -> Json<Vec<Category>> {
    Json(sessions.categories().await)
}

async fn country_channels(
    State(sessions): State<SessionManager>,
    Path(code): Path<String>,
) -> ApiResult<Vec<ChannelSummary>> {
    info!("HTTP API: select country {}", code);
    Ok(Json(sessions.select_country(&code).await?))
}

async fn category_channels(
    State(sessions): State<SessionManager>,
    Path(id): Path<String>,
) -> Json<Vec<ChannelSummary>> {
    info!("HTTP API: select category {}", id);
    Json(sessions.select_category(&id).await)
}

async fn favorite_channels(State(sessions): State<SessionManager>) -> Json<Vec<ChannelSummary>> {
    info!("HTTP API: select favorites");
    Json(sessions.select_favorites().await)
}

async fn toggle_favorite(
    State(sessions): State<SessionManager>,
    Path(id): Path<String>,
) -> ApiResult<FavoriteToggled> {
    let favorite = sessions.toggle_favorite(&id).await?;
    info!("HTTP API: favorite {} -> {}", id, favorite);
    Ok(Json(FavoriteToggled {
        channel_id: id,
        favorite,
    }))
}

async fn random_channel(State(sessions): State<SessionManager>) -> ApiResult<RandomChoice> {
    Ok(Json(sessions.select_random().await?))
}

async fn channel_stream(
    State(sessions): State<SessionManager>,
    Path(id): Path<String>,
) -> ApiResult<StreamInfo> {
    Ok(Json(sessions.resolve(&id).await?))
}

async fn country_timezone(
    State(sessions): State<SessionManager>,
    Path(code): Path<String>,
) -> ApiResult<ResolvedZone> {
    Ok(Json(sessions.timezone(&code).await?))
}

async fn get_selection(State(sessions): State<SessionManager>) -> Json<SelectionView> {
    Json(sessions.selection().await)
}

async fn get_markers(State(sessions): State<SessionManager>) -> Json<Vec<Marker>> {
    Json(sessions.markers().await)
}

async fn numeric_lookup(
    State(sessions): State<SessionManager>,
    Path(num): Path<u16>,
) -> ApiResult<NumericLookup> {
    sessions
        .lookup_numeric(num)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no country mapped to numeric code {}", num)))
}

async fn reload(State(sessions): State<SessionManager>) -> ApiResult<CatalogStats> {
    info!("HTTP API: reload");
    match sessions.reload().await {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => {
            warn!("HTTP API: reload failed: {:#}", e);
            Err(ApiError::BadGateway(format!("{:#}", e)))
        }
    }
}
