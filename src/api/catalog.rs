//! Catalog home endpoint

use axum::extract::State;

use crate::{
    error::AppResult,
    services::catalog::CatalogCounts,
    views::Page,
    AppState,
};

/// Record counts for the catalog home page
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses((status = 200, description = "Catalog home page", body = CatalogCounts))
)]
pub async fn index(State(state): State<AppState>) -> AppResult<Page<CatalogCounts>> {
    state.services.catalog.summary().await
}
