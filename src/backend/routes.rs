use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::{handlers, AppState};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/students",
            get(handlers::list_students).post(handlers::create_student),
        )
        .route(
            "/students/:id",
            get(handlers::get_student)
                .put(handlers::update_student)
                .delete(handlers::delete_student),
        )
        .route(
            "/calculate_financial_metrics",
            post(handlers::calculate_financial_metrics),
        )
        .route("/initial_data", post(handlers::initial_data))
}
