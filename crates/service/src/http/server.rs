use axum::handler::Handler;
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::io;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::bridge::{run_server, shutdown_signal};
use super::handlers;
use super::state::AppState;

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

pub fn build_router(state: AppState) -> Router {
    let cors_enabled = state.config().cors_enabled;
    let static_dir = state.config().static_dir.clone();

    let routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/api", get(handlers::api_doc))
        .route(
            "/api/generate",
            post(handlers::generate).fallback(handlers::not_found),
        );

    let routes = match static_dir {
        Some(dir) => {
            let not_found = handlers::not_found.with_state(state.clone());
            routes.fallback_service(ServeDir::new(dir).not_found_service(not_found))
        }
        None => routes.fallback(handlers::not_found),
    };

    let mut app = routes.with_state(state);
    if cors_enabled {
        app = app.layer(cors_layer());
    }
    app.layer(TraceLayer::new_for_http())
}

pub(crate) async fn serve<F>(addr: &str, state: AppState, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);
    run_server(addr, app, shutdown).await
}

pub(crate) fn start_http(addr: &str, state: AppState) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(addr, state, shutdown_signal()))
}
