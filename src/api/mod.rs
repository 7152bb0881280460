//! HTTP API module
//! 
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/pomodoro", get(pomodoro_handler))
        .route("/pomodoro/toggle", post(toggle_handler))
        .route("/pomodoro/reset", post(reset_handler))
        .route("/pomodoro/mode/:phase", post(mode_handler))
        .route("/pomodoro/adjust", post(adjust_handler))
        .route("/pomodoro/events", get(pomodoro_events_handler))
        .route("/todos", get(todos_handler).post(add_todo_handler))
        .route("/todos/clear-completed", post(clear_completed_handler))
        .route("/todos/filter/:filter", post(todo_filter_handler))
        .route("/todos/:id", delete(remove_todo_handler))
        .route("/todos/:id/toggle", post(toggle_todo_handler))
        .route("/groceries", get(groceries_handler).post(add_grocery_handler))
        .route("/groceries/clear-checked", post(clear_checked_handler))
        .route("/groceries/:id", delete(remove_grocery_handler))
        .route("/groceries/:id/toggle", post(toggle_grocery_handler))
        .route("/tab", get(tab_handler))
        .route("/tab/:name", post(switch_tab_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
