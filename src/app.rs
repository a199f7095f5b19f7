use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    http::{Method, header},
    routing::{delete, get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/data",
            get(handlers::list_records).post(handlers::save_record),
        )
        .route(
            "/api/weight-data",
            get(handlers::list_records).post(handlers::save_record),
        )
        .route(
            "/api/analysis-data",
            get(handlers::list_analyses).post(handlers::save_analysis),
        )
        .route("/api/analysis-data/:date", delete(handlers::delete_analysis))
        .route("/api/model-analysis", post(handlers::model_analysis))
        .route("/api/progress", get(handlers::get_progress))
        .route("/api/summary", get(handlers::get_summary))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
