use crate::transport::http::handlers::common::repository_error;
use crate::transport::http::types::{ApiResponse, AppState, ResetQuery};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    delete,
    path = "/products/reset",
    params(ResetQuery),
    responses(
        (status = 204, description = "All products removed and the id sequence reset"),
        (status = 400, description = "confirm=true was not given", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn reset_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ResetQuery>,
) -> impl IntoResponse {
    if !query.confirm {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::err("confirm must be true to reset products")),
        )
            .into_response();
    }

    match state.repository.remove_all().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => repository_error(e),
    }
}
