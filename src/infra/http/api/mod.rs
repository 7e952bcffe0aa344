pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, patch, post},
};

pub fn build_api_router(state: ApiState) -> Router {
    let auth_state = state.clone();

    Router::new()
        .route(
            "/api/v1/listings",
            get(handlers::list_listings).post(handlers::create_listing),
        )
        .route(
            "/api/v1/listings/{id}",
            get(handlers::get_listing)
                .patch(handlers::update_listing)
                .delete(handlers::delete_listing),
        )
        .route(
            "/api/v1/users/{id}/listings",
            get(handlers::list_owner_listings),
        )
        .route("/api/v1/users", post(handlers::register_user))
        .route("/api/v1/me", get(handlers::current_user))
        .route("/api/v1/admin/users", get(handlers::admin_list_users))
        .route(
            "/api/v1/admin/users/{id}/status",
            patch(handlers::admin_set_user_status),
        )
        .route(
            "/api/v1/admin/users/{id}/role",
            patch(handlers::admin_set_user_role),
        )
        .route(
            "/api/v1/admin/listings/{id}",
            delete(handlers::admin_delete_listing),
        )
        .route("/api/v1/admin/stats", get(handlers::admin_stats))
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(
            auth_state,
            middleware::resolve_caller,
        ))
}
