//! API handlers for the restaurant REST endpoints

pub mod auth;
pub mod health;
pub mod openapi;
pub mod restaurants;
pub mod users;

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes that need a resolved caller
    let protected = Router::new()
        .route("/my/user", get(users::get_current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_identity,
        ));

    let api = Router::new()
        .route("/restaurant/search/:city", get(restaurants::search_restaurants))
        .route("/restaurant/:restaurant_id", get(restaurants::get_restaurant))
        .merge(protected)
        .with_state(state);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
