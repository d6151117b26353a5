use crate::transport::http::handlers::common::{
    not_found, ok_product, ok_products, product_json, repository_error,
};
use crate::transport::http::types::{
    json_rejection, ApiResponse, AppState, ProductBody, ProductQuery,
};
use crate::domain::Product;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    get,
    path = "/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Matching products", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> impl IntoResponse {
    tracing::info!(category = ?query.category, name = ?query.name, "request to list products");
    let repository = &state.repository;
    let result = match (query.category.as_deref(), query.name.as_deref()) {
        (Some(category), _) if !category.is_empty() => repository.find_by_category(category).await,
        (_, Some(name)) if !name.is_empty() => repository.find_by_name(name).await,
        _ => repository.all().await,
    };
    match result {
        Ok(products) => {
            tracing::info!(returned = products.len(), "products listed");
            ok_products(&products)
        }
        Err(e) => repository_error(e),
    }
}

#[utoipa::path(
    get,
    path = "/products/available",
    responses(
        (status = 200, description = "Products with at least one unit on hand", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_available_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.repository.available().await {
        Ok(products) => ok_products(&products),
        Err(e) => repository_error(e),
    }
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = u64, Path, description = "The product identifier")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse)
    )
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    tracing::info!(id, "request to retrieve a product");
    match state.repository.find(id).await {
        Ok(Some(product)) => ok_product(StatusCode::OK, &product),
        Ok(None) => not_found(id),
        Err(e) => repository_error(e),
    }
}

#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductBody,
    responses(
        (status = 201, description = "Product created", body = ApiResponse),
        (status = 400, description = "The posted data was not valid", body = ApiResponse),
        (status = 415, description = "Content-Type must be application/json", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    request: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    tracing::info!("request to create a product");
    let Json(payload) = match request {
        Ok(v) => v,
        Err(e) => return json_rejection(e).into_response(),
    };

    let mut product = match Product::deserialize(&payload) {
        Ok(p) => p,
        Err(e) => return repository_error(e.into()),
    };
    // Ids are always assigned by the repository on create.
    product.id = 0;

    match state.repository.save(product).await {
        Ok(saved) => {
            tracing::info!(id = saved.id, "product saved");
            (
                StatusCode::CREATED,
                [(header::LOCATION, format!("/products/{}", saved.id))],
                Json(ApiResponse::ok(product_json(&saved))),
            )
                .into_response()
        }
        Err(e) => repository_error(e),
    }
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    params(
        ("id" = u64, Path, description = "The product identifier")
    ),
    request_body = ProductBody,
    responses(
        (status = 200, description = "Product replaced", body = ApiResponse),
        (status = 400, description = "The posted data was not valid", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse),
        (status = 415, description = "Content-Type must be application/json", body = ApiResponse)
    )
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    request: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    tracing::info!(id, "request to update a product");
    let Json(payload) = match request {
        Ok(v) => v,
        Err(e) => return json_rejection(e).into_response(),
    };

    match state.repository.find(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found(id),
        Err(e) => return repository_error(e),
    }

    let mut product = match Product::deserialize(&payload) {
        Ok(p) => p,
        Err(e) => return repository_error(e.into()),
    };
    product.id = id;

    match state.repository.save(product).await {
        Ok(saved) => ok_product(StatusCode::OK, &saved),
        Err(e) => repository_error(e),
    }
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(
        ("id" = u64, Path, description = "The product identifier")
    ),
    responses(
        (status = 204, description = "Product deleted (or never existed)"),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    tracing::info!(id, "request to delete a product");
    match state.repository.delete_by_id(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => repository_error(e),
    }
}
