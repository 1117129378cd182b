use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::Uri,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use dua_model::{Category, CategoryId, FieldSelection, PartialDua, Subcategory, SubcategoryId};
use dua_store::ContentStore;

use crate::{error::ApiError, state::AppState};

/// Endpoints advertised by `/` and by 404 responses.
pub const ENDPOINTS: &[&str] = &[
    "/categories",
    "/categories/{catId}/subcategories",
    "/subcategories/{subcatId}/duas?fields={comma-list}",
    "/search?q={term}",
];

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiIndex {
    pub status: String,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DuasParams {
    pub fields: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn index_handler() -> Json<ApiIndex> {
    Json(ApiIndex {
        status: "API is working".to_string(),
        endpoints: ENDPOINTS.iter().map(|e| (*e).to_string()).collect(),
    })
}

pub async fn categories_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = run_blocking(&state, ContentStore::list_categories).await?;
    Ok(Json(categories))
}

pub async fn subcategories_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    uri: Uri,
) -> Result<Json<Vec<Subcategory>>, ApiError> {
    let category: CategoryId = raw_id
        .parse()
        .map_err(|_| ApiError::not_found(uri.path()))?;
    let subcategories =
        run_blocking(&state, move |store| store.list_subcategories(category)).await?;
    Ok(Json(subcategories))
}

pub async fn duas_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<DuasParams>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let subcategory: SubcategoryId = raw_id
        .parse()
        .map_err(|_| ApiError::not_found(uri.path()))?;

    match params.fields {
        Some(selector) => {
            let selection = FieldSelection::parse(&selector)?;
            debug!(%subcategory, ?selection, "Projected dua listing");
            let duas =
                run_blocking(&state, move |store| store.list_dua_fields(subcategory, &selection))
                    .await?;
            Ok(Json(duas).into_response())
        }
        None => {
            let duas = run_blocking(&state, move |store| store.list_duas(subcategory)).await?;
            Ok(Json(duas).into_response())
        }
    }
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PartialDua>>, ApiError> {
    let term = params.q.unwrap_or_default();
    let hits = run_blocking(&state, move |store| store.search_duas(&term)).await?;
    Ok(Json(hits))
}

pub async fn fallback_handler(uri: Uri) -> ApiError {
    ApiError::not_found(uri.path())
}

/// Run a store query on the blocking pool.
async fn run_blocking<T, F>(state: &AppState, query: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&ContentStore) -> dua_store::Result<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || query(&store))
        .await
        .map_err(|e| ApiError::StoreUnavailable(format!("query task failed: {e}")))?
        .map_err(ApiError::from)
}
