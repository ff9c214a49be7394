use crate::config::Deployment;
use axum::Router;
use tower_http::cors::CorsLayer;

/// Cross-origin requests are only opened up for development setups.
pub fn add_cors(router: Router, deployment: Deployment) -> Router {
    match deployment {
        Deployment::Dev => router.layer(CorsLayer::very_permissive()),
        Deployment::Prod => router,
    }
}
