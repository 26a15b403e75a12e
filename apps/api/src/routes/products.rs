//! Menu listing for the storefront webview.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use comanda_core::{Product, DEFAULT_ESTABLISHMENT_ID};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub establishment_id: Option<i64>,
}

/// `GET /api/products?establishment_id=N`
///
/// Returns the tenant's active catalog, newest first. Inactive products
/// never appear here.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let establishment_id = query.establishment_id.unwrap_or(DEFAULT_ESTABLISHMENT_ID);

    let products = state.db.products().list_active(establishment_id).await?;

    Ok(Json(products))
}
