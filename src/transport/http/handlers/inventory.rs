use crate::app::SellOutcome;
use crate::transport::http::handlers::common::{not_found, ok_product, product_json, repository_error};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    put,
    path = "/products/{id}/add_unit",
    params(
        ("id" = u64, Path, description = "The product identifier")
    ),
    responses(
        (status = 200, description = "One unit added", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse)
    )
)]
pub async fn add_unit_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    match state.repository.add_unit(id).await {
        Ok(Some(product)) => {
            tracing::info!(id, count = product.count, "unit added");
            ok_product(StatusCode::OK, &product)
        }
        Ok(None) => not_found(id),
        Err(e) => repository_error(e),
    }
}

#[utoipa::path(
    put,
    path = "/products/{id}/sell_products",
    params(
        ("id" = u64, Path, description = "The product identifier")
    ),
    responses(
        (status = 200, description = "One unit sold", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse),
        (status = 409, description = "Product is out of stock", body = ApiResponse)
    )
)]
pub async fn sell_product_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    match state.repository.sell_one(id).await {
        Ok(SellOutcome::Sold(product)) => {
            tracing::info!(id, count = product.count, "unit sold");
            ok_product(StatusCode::OK, &product)
        }
        Ok(SellOutcome::OutOfStock(product)) => (
            StatusCode::CONFLICT,
            Json(ApiResponse {
                success: false,
                data: Some(product_json(&product)),
                error: Some(format!("Product with id: {} is out of Stock", id)),
            }),
        )
            .into_response(),
        Ok(SellOutcome::NotFound) => not_found(id),
        Err(e) => repository_error(e),
    }
}
