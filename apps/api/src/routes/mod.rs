pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::career::handlers as career;
use crate::index::handlers as index;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Index API
        .route("/api/v1/index/migrate", post(index::handle_migrate))
        .route(
            "/api/v1/index/:content_type",
            post(index::handle_add_item)
                .get(index::handle_get_corpus)
                .delete(index::handle_clear),
        )
        .route(
            "/api/v1/index/:content_type/search",
            post(index::handle_search),
        )
        // Course API
        .route("/api/v1/courses/import", post(career::handle_import_courses))
        .route(
            "/api/v1/courses/recommend",
            post(career::handle_recommend_courses),
        )
        // Resume API
        .route("/api/v1/resumes/process", post(career::handle_process_resume))
        .with_state(state)
}
