use crate::transport::http::handlers::{health, inventory, products, reset};
use crate::transport::http::types::{ApiResponse, AppState, ProductBody, ProductRecord};
use axum::routing::{delete, get, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Catalog REST API Service",
        version = "1.0.0",
        description = "Create, read, update and delete catalog products."
    ),
    paths(
        health::healthcheck_handler,
        products::list_products_handler,
        products::list_available_handler,
        products::get_product_handler,
        products::create_product_handler,
        products::update_product_handler,
        products::delete_product_handler,
        inventory::add_unit_handler,
        inventory::sell_product_handler,
        reset::reset_products_handler
    ),
    components(schemas(ApiResponse, ProductRecord, ProductBody))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(health::healthcheck_handler))
        .route(
            "/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route("/products/available", get(products::list_available_handler))
        .route("/products/reset", delete(reset::reset_products_handler))
        .route(
            "/products/:id",
            get(products::get_product_handler)
                .put(products::update_product_handler)
                .delete(products::delete_product_handler),
        )
        .route("/products/:id/add_unit", put(inventory::add_unit_handler))
        .route(
            "/products/:id/sell_products",
            put(inventory::sell_product_handler),
        )
        .with_state(app_state)
}

/// The router plus Swagger UI, permissive CORS and request tracing.
pub fn create_app(app_state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
