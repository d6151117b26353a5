use crate::app::RepositoryError;
use crate::domain::Product;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value as JsonValue;

pub fn product_json(product: &Product) -> JsonValue {
    JsonValue::Object(product.serialize())
}

pub fn products_json(products: &[Product]) -> JsonValue {
    JsonValue::Array(products.iter().map(product_json).collect())
}

pub fn ok_product(status: StatusCode, product: &Product) -> Response {
    (status, Json(ApiResponse::ok(product_json(product)))).into_response()
}

pub fn ok_products(products: &[Product]) -> Response {
    (StatusCode::OK, Json(ApiResponse::ok(products_json(products)))).into_response()
}

pub fn not_found(id: u64) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::err(format!(
            "Product with id '{}' was not found.",
            id
        ))),
    )
        .into_response()
}

/// Each repository error kind gets its own status; validation is the
/// client's fault, everything else is ours.
pub fn repository_error(err: RepositoryError) -> Response {
    let status = match &err {
        RepositoryError::Validation(e) => {
            tracing::warn!(error = %e, "rejected product data");
            StatusCode::BAD_REQUEST
        }
        RepositoryError::Store(e) => {
            tracing::error!(error = %e, "record store failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        RepositoryError::Corrupt { key, .. } => {
            tracing::error!(%key, error = %err, "corrupt record");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ApiResponse::err(err.to_string()))).into_response()
}
