use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{create_url_handler, health_handler, redirect_handler};
use crate::state::AppState;

const X_AMZ_DATE: HeaderName = HeaderName::from_static("x-amz-date");
const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");
const X_AMZ_SECURITY_TOKEN: HeaderName = HeaderName::from_static("x-amz-security-token");

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", post(create_url_handler))
            .route("/health", get(health_handler))
            .route("/{short_code}", get(redirect_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(Self::cors())
    }

    /// Browsers may call the API from any origin. Preflight requests are
    /// answered by the layer without reaching a handler.
    fn cors() -> CorsLayer {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                X_AMZ_DATE,
                X_API_KEY,
                X_AMZ_SECURITY_TOKEN,
            ])
    }
}
