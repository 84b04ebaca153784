//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Redirect to /shops
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (data service reachable)
//!
//! # Public directory
//! GET  /shops                         - Shop list (?refresh=true, ?selected=<id>)
//! GET  /shops/{id}/detail             - Detail modal fragment (HTMX)
//! GET  /shops/{id}/contact            - Redirect to WhatsApp
//!
//! # Admin directory (only when ADMIN_ENABLED)
//! GET  /admin/shops                   - Shop list with delete affordances
//! GET  /admin/shops/{id}/detail       - Detail modal fragment (HTMX)
//! GET  /admin/shops/{id}/delete       - Confirmation dialog
//! POST /admin/shops/{id}/delete       - Delete (form: confirm=yes|no)
//! ```

pub mod admin;
pub mod health;
pub mod shops;

use axum::{Router, extract::Request, response::Redirect, routing::get};
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the public shop routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shops::index))
        .route("/{id}/detail", get(shops::detail))
        .route("/{id}/contact", get(shops::contact))
}

/// Create the admin shop routes router.
pub fn admin_shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shops::admin_index))
        .route("/{id}/detail", get(shops::admin_detail))
        .route("/{id}/contact", get(shops::contact))
        .route(
            "/{id}/delete",
            get(admin::confirm_delete).post(admin::delete),
        )
}

/// Create all routes. Admin routes are mounted only when `admin_enabled`.
pub fn routes(admin_enabled: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/", get(|| async { Redirect::to(shops::PUBLIC_BASE) }))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest(shops::PUBLIC_BASE, shop_routes());

    if admin_enabled {
        router.nest(shops::ADMIN_BASE, admin_shop_routes())
    } else {
        router
    }
}

/// Build the application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let admin_enabled = state.config().admin_enabled;

    routes(admin_enabled)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
