use crate::app::ProductRepository;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub repository: ProductRepository,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// A stored product as returned by the API.
#[allow(dead_code)]
#[derive(Serialize, Debug, ToSchema)]
pub struct ProductRecord {
    /// Assigned by the service on creation.
    pub id: u64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub color: String,
    /// Units on hand.
    pub count: u32,
}

/// Body accepted by create and update. Numeric strings are accepted for
/// `price` and `count`.
#[allow(dead_code)]
#[derive(Deserialize, Debug, ToSchema)]
pub struct ProductBody {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub color: String,
    pub count: u32,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Case-insensitive category filter.
    pub category: Option<String>,
    /// Case-insensitive name filter. Ignored when `category` is given.
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResetQuery {
    /// Safety switch to prevent accidental wipes.
    #[serde(default)]
    pub confirm: bool,
}

/// Maps a body extraction failure: wrong content type is 415, anything else
/// about the body is a bad request.
pub fn json_rejection(err: JsonRejection) -> (StatusCode, Json<ApiResponse>) {
    let status = match err {
        JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ApiResponse::err(format!("Invalid JSON body: {}", err))),
    )
}
