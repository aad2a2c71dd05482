//! HTTP surface: the public menu endpoint and the key-protected admin API.

use crate::admin::{CategoryDraft, CategoryPatch, ItemDraft, ItemPatch, MenuAdmin, MenuStats};
use crate::config::Config;
use crate::error::MenuError;
use crate::i18n::{Language, LanguageStrings};
use crate::menu::{ItemId, RawItem, ResolvedCategory, TranslatedText};
use crate::ordering::{MoveDirection, OrderingService};
use crate::refresh::MenuSnapshot;
use crate::security::is_authorized_admin;
use crate::store::MenuStore;
use axum::{
    extract::{Path, Query, Request, State},
    http::{header::ACCEPT_LANGUAGE, HeaderMap, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

// ==================== State ====================

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub admin: MenuAdmin,
    pub ordering: OrderingService,
    pub snapshot: Arc<MenuSnapshot>,
}

impl AppState {
    pub fn new(config: Config, store: MenuStore) -> Self {
        Self {
            config: Arc::new(config),
            admin: MenuAdmin::new(store.clone()),
            ordering: OrderingService::new(store.clone()),
            snapshot: Arc::new(MenuSnapshot::new(store)),
        }
    }

    /// Make a write visible to storefront readers without waiting for the
    /// next poll. A failure here is logged by the snapshot and retried by
    /// the poller.
    async fn refresh_after_write(&self) {
        let _ = self.snapshot.refresh().await;
    }
}

// ==================== Errors ====================

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Menu(#[from] MenuError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid or missing admin key")]
    Unauthorized,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Menu(MenuError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Menu(MenuError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Menu(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ==================== Storefront ====================

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub lang: Option<String>,
}

/// Entry in the storefront's language picker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageOption {
    pub code: Language,
    pub name: &'static str,
    pub native_name: &'static str,
    pub canonical: bool,
}

impl From<Language> for LanguageOption {
    fn from(language: Language) -> Self {
        Self {
            code: language,
            name: language.name(),
            native_name: language.native_name(),
            canonical: language.is_canonical(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub language: Language,
    pub languages: Vec<LanguageOption>,
    pub strings: &'static LanguageStrings,
    pub categories: Vec<ResolvedCategory>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// `?lang=` wins, then the browser's Accept-Language, then the configured default.
fn request_language(
    query: &MenuQuery,
    headers: &HeaderMap,
    default: Language,
) -> ApiResult<Language> {
    if let Some(code) = query.lang.as_deref() {
        return Language::from_code(code.trim())
            .map_err(|_| ApiError::BadRequest(format!("Unsupported language '{}'", code)));
    }

    match headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()) {
        Some(accept) => Ok(Language::detect(Some(accept))),
        None => Ok(default),
    }
}

async fn get_menu(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
    headers: HeaderMap,
) -> ApiResult<Json<MenuResponse>> {
    let language = request_language(&query, &headers, state.config.default_language)?;
    let view = state.snapshot.view(language).await;

    Ok(Json(MenuResponse {
        language,
        languages: Language::all().into_iter().map(LanguageOption::from).collect(),
        strings: LanguageStrings::for_language(language),
        categories: view.categories,
        refreshed_at: view.refreshed_at,
    }))
}

// ==================== Admin ====================

async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let presented = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if !is_authorized_admin(presented, &state.config.admin_api_key) {
        warn!("Rejected admin request to {}", request.uri().path());
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Category as the admin editor sees it: every translation, raw icon name,
/// items in store order.
#[derive(Debug, Serialize)]
pub struct AdminCategory {
    pub id: String,
    pub title: Option<TranslatedText>,
    pub icon: String,
    pub items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: MoveDirection,
}

async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<AdminCategory>>> {
    let categories = state
        .admin
        .list_raw()
        .await?
        .into_iter()
        .map(|c| AdminCategory {
            id: c.id,
            title: c.title,
            icon: c.icon,
            items: c.items,
        })
        .collect();

    Ok(Json(categories))
}

async fn menu_stats(State(state): State<AppState>) -> ApiResult<Json<MenuStats>> {
    Ok(Json(state.admin.stats().await?))
}

async fn create_category(
    State(state): State<AppState>,
    Json(draft): Json<CategoryDraft>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let id = state.admin.add_category(draft).await?;
    state.refresh_after_write().await;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<CategoryPatch>,
) -> ApiResult<StatusCode> {
    state.admin.update_category(&id, patch).await?;
    state.refresh_after_write().await;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.admin.delete_category(&id).await?;
    state.refresh_after_write().await;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_item(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Json(draft): Json<ItemDraft>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let id = state.admin.add_item(&category_id, draft).await?;
    state.refresh_after_write().await;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn update_item(
    State(state): State<AppState>,
    Path((category_id, item_id)): Path<(String, ItemId)>,
    Json(patch): Json<ItemPatch>,
) -> ApiResult<StatusCode> {
    state.admin.update_item(&category_id, item_id, patch).await?;
    state.refresh_after_write().await;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_item(
    State(state): State<AppState>,
    Path((category_id, item_id)): Path<(String, ItemId)>,
) -> ApiResult<StatusCode> {
    state.admin.delete_item(&category_id, item_id).await?;
    state.refresh_after_write().await;
    Ok(StatusCode::NO_CONTENT)
}

async fn reorder_items(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Json(item_ids): Json<Vec<ItemId>>,
) -> ApiResult<StatusCode> {
    let result = state.ordering.reorder(&category_id, &item_ids).await;
    // Partial reorders still changed something
    state.refresh_after_write().await;
    result?;
    Ok(StatusCode::NO_CONTENT)
}

async fn move_item(
    State(state): State<AppState>,
    Path((category_id, item_id)): Path<(String, ItemId)>,
    Json(request): Json<MoveRequest>,
) -> ApiResult<StatusCode> {
    let result = state
        .ordering
        .move_item(&category_id, item_id, request.direction)
        .await;
    state.refresh_after_write().await;
    result?;
    Ok(StatusCode::NO_CONTENT)
}

async fn refresh_menu(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let published = state.snapshot.refresh().await?;
    Ok(Json(json!({ "published": published })))
}

// ==================== Router ====================

pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            patch(update_category).delete(delete_category),
        )
        .route("/categories/:id/items", post(create_item))
        .route(
            "/categories/:id/items/:item_id",
            patch(update_item).delete(delete_item),
        )
        .route("/categories/:id/order", put(reorder_items))
        .route("/categories/:id/items/:item_id/move", post(move_item))
        .route("/stats", get(menu_stats))
        .route("/refresh", post(refresh_menu))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health))
        .route("/api/menu", get(get_menu))
        .nest("/api/admin", admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let address = listener.local_addr()?;
    info!("Server running on {}", address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    // ==================== Error Mapping Tests ====================

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (ApiError::from(MenuError::Validation("bad".into())), StatusCode::BAD_REQUEST),
            (ApiError::from(MenuError::category_not_found("x")), StatusCode::NOT_FOUND),
            (ApiError::from(MenuError::Store("down".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::from(MenuError::PartialReorder { failed: 1, total: 3 }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::BadRequest("nope".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_menu_error_message_passes_through() {
        let err = ApiError::from(MenuError::Validation("Please enter a valid price".into()));
        assert_eq!(err.to_string(), "Please enter a valid price");
    }

    // ==================== Language Selection Tests ====================

    #[test]
    fn test_language_options_for_picker() {
        let options: Vec<LanguageOption> =
            Language::all().into_iter().map(LanguageOption::from).collect();

        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json[0]["code"], "en");
        assert_eq!(json[0]["canonical"], true);
        assert_eq!(json[1]["nativeName"], "Türkçe");
        assert_eq!(json[2]["name"], "Russian");
        assert_eq!(json[2]["canonical"], false);
    }

    #[test]
    fn test_query_language_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ru-RU"));
        let query = MenuQuery { lang: Some("tr".to_string()) };

        let language = request_language(&query, &headers, Language::ENGLISH).unwrap();
        assert_eq!(language, Language::TURKISH);
    }

    #[test]
    fn test_accept_language_detection() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ru-RU,ru;q=0.9"));
        let query = MenuQuery { lang: None };

        let language = request_language(&query, &headers, Language::TURKISH).unwrap();
        assert_eq!(language, Language::RUSSIAN);
    }

    #[test]
    fn test_default_language_without_hints() {
        let query = MenuQuery { lang: None };
        let language = request_language(&query, &HeaderMap::new(), Language::TURKISH).unwrap();
        assert_eq!(language, Language::TURKISH);
    }

    #[test]
    fn test_unsupported_query_language() {
        let query = MenuQuery { lang: Some("de".to_string()) };
        let err = request_language(&query, &HeaderMap::new(), Language::ENGLISH).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
