//! Route registration — collects module routes + system endpoints.

use std::path::Path;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;
use tower::Layer;
use tower::util::MapRequest;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::method_override::{self, OverrideFn};

/// The full HTTP application: method override in front of the router.
pub type App = MapRequest<Router, OverrideFn>;

/// Build the complete router with all routes.
///
/// Module routes are already `Router<()>` (they called `.with_state()`
/// internally). Unmatched paths fall through to the static asset directory.
pub fn build_router(module_routes: Vec<Router>, public_dir: &Path) -> Router {
    let mut app = Router::new().route("/health", get(health));

    for router in module_routes {
        app = app.merge(router);
    }

    app.fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
}

/// Wrap the router so `?_method=` is applied before routing.
pub fn build_app(router: Router) -> App {
    method_override::layer().layer(router)
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
