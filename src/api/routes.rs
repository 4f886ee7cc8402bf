//! Route definitions for the API.

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers;
use crate::auth::require_jwt;
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check,
        handlers::login,
        handlers::create_account,
        handlers::list_accounts,
        handlers::get_account,
        handlers::update_account,
        handlers::delete_account,
        handlers::create_device,
        handlers::list_devices,
        handlers::get_device,
        handlers::update_device,
        handlers::delete_device,
    ),
    components(schemas(
        crate::api::types::CreateAccountRequest,
        crate::api::types::UpdateAccountRequest,
        crate::api::types::ListAccountsResponse,
        crate::api::types::DeviceRequest,
        crate::api::types::ListDevicesResponse,
        crate::api::types::HealthResponse,
        crate::api::types::LoginRequest,
        crate::api::types::LoginResponse,
        crate::domain::Account,
        crate::domain::Device,
        crate::error::ErrorResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "accounts", description = "Account management"),
        (name = "devices", description = "Device management"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Account Hub API",
        version = "0.1.0",
        description = "JSON API for accounts and devices",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the API router with optional authentication.
pub fn build_router(state: AppState, auth_enabled: bool) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes requiring a JWT when auth is enabled
    let protected_routes = Router::new()
        .route("/v1/accounts", get(handlers::list_accounts))
        .route(
            "/v1/accounts/{id}",
            get(handlers::get_account)
                .put(handlers::update_account)
                .delete(handlers::delete_account),
        )
        .route(
            "/v1/devices",
            get(handlers::list_devices).post(handlers::create_device),
        )
        .route(
            "/v1/devices/{id}",
            get(handlers::get_device)
                .put(handlers::update_device)
                .delete(handlers::delete_device),
        );

    let protected_routes = if auth_enabled {
        protected_routes.route_layer(middleware::from_fn_with_state(
            state.jwt_manager.clone(),
            require_jwt,
        ))
    } else {
        tracing::warn!("Authentication is DISABLED - enable for production");
        protected_routes
    };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/v1/health", get(handlers::health_check))
        .route("/v1/auth/login", post(handlers::login))
        .route("/v1/accounts", post(handlers::create_account))
        .route("/api-docs/openapi.json", get(openapi_json));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
