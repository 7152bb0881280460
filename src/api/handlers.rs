//! HTTP endpoint handlers
//!
//! Every command answers with the tool's snapshot after the command ran.
//! Invalid input is absorbed the same way the tools absorb it: nothing
//! changes and the current snapshot comes back.

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tracing::debug;

use crate::{
    services::{GrocerySnapshot, TodoFilter, TodoSnapshot},
    state::{AppState, Tab, TimerSnapshot},
};
use super::responses::{
    AdjustRequest, HealthResponse, NewGroceryRequest, NewTodoRequest, TabResponse,
};

/// Handle GET /pomodoro - Current timer snapshot
pub async fn pomodoro_handler(State(state): State<Arc<AppState>>) -> Json<TimerSnapshot> {
    Json(state.pomodoro.snapshot())
}

/// Handle POST /pomodoro/toggle - Start or pause the timer
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Json<TimerSnapshot> {
    state.pomodoro.toggle_timer();
    Json(state.pomodoro.snapshot())
}

/// Handle POST /pomodoro/reset - Full restart of the timer
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<TimerSnapshot> {
    state.pomodoro.reset();
    Json(state.pomodoro.snapshot())
}

/// Handle POST /pomodoro/mode/:phase - Switch phase
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
) -> Json<TimerSnapshot> {
    state.pomodoro.set_mode_named(&phase);
    Json(state.pomodoro.snapshot())
}

/// Handle POST /pomodoro/adjust - Change the current phase length
pub async fn adjust_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdjustRequest>,
) -> Json<TimerSnapshot> {
    state.pomodoro.adjust_time(request.delta);
    Json(state.pomodoro.snapshot())
}

/// Handle GET /pomodoro/events - Stream every published snapshot
pub async fn pomodoro_events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let mut updates = state.pomodoro.updates();
    let current = updates.borrow_and_update().clone();
    debug!("Timer event stream opened");

    let changes = stream::unfold(updates, |mut updates| async move {
        updates.changed().await.ok()?;
        let snapshot = updates.borrow_and_update().clone();
        Some((snapshot, updates))
    });

    let events = stream::once(async move { current })
        .chain(changes)
        .map(|snapshot| Event::default().event("timer").json_data(&snapshot));

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /todos - Current task list
pub async fn todos_handler(State(state): State<Arc<AppState>>) -> Json<TodoSnapshot> {
    Json(state.todos.snapshot())
}

/// Handle POST /todos - Add a task
pub async fn add_todo_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewTodoRequest>,
) -> Json<TodoSnapshot> {
    state.todos.add_todo(&request.text);
    Json(state.todos.snapshot())
}

/// Handle POST /todos/:id/toggle - Complete or reopen a task
pub async fn toggle_todo_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<TodoSnapshot> {
    state.todos.toggle_todo(&id);
    Json(state.todos.snapshot())
}

/// Handle DELETE /todos/:id - Remove a task
pub async fn remove_todo_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<TodoSnapshot> {
    state.todos.remove_todo(&id);
    Json(state.todos.snapshot())
}

/// Handle POST /todos/clear-completed - Drop finished tasks
pub async fn clear_completed_handler(State(state): State<Arc<AppState>>) -> Json<TodoSnapshot> {
    state.todos.clear_completed();
    Json(state.todos.snapshot())
}

/// Handle POST /todos/filter/:filter - Change the visible tasks
pub async fn todo_filter_handler(
    State(state): State<Arc<AppState>>,
    Path(filter): Path<String>,
) -> Json<TodoSnapshot> {
    match filter.parse::<TodoFilter>() {
        Ok(filter) => state.todos.set_filter(filter),
        Err(e) => debug!("Ignoring filter change: {}", e),
    }
    Json(state.todos.snapshot())
}

/// Handle GET /groceries - Current shopping list
pub async fn groceries_handler(State(state): State<Arc<AppState>>) -> Json<GrocerySnapshot> {
    Json(state.groceries.snapshot())
}

/// Handle POST /groceries - Add an item
pub async fn add_grocery_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewGroceryRequest>,
) -> Json<GrocerySnapshot> {
    state.groceries.add_item(&request.item, &request.quantity);
    Json(state.groceries.snapshot())
}

/// Handle POST /groceries/:id/toggle - Check or uncheck an item
pub async fn toggle_grocery_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<GrocerySnapshot> {
    state.groceries.toggle_item(&id);
    Json(state.groceries.snapshot())
}

/// Handle DELETE /groceries/:id - Remove an item
pub async fn remove_grocery_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<GrocerySnapshot> {
    state.groceries.remove_item(&id);
    Json(state.groceries.snapshot())
}

/// Handle POST /groceries/clear-checked - Drop items already in the cart
pub async fn clear_checked_handler(State(state): State<Arc<AppState>>) -> Json<GrocerySnapshot> {
    state.groceries.clear_checked();
    Json(state.groceries.snapshot())
}

/// Handle GET /tab - Currently active tab
pub async fn tab_handler(State(state): State<Arc<AppState>>) -> Json<TabResponse> {
    Json(TabResponse {
        active_tab: state.active_tab(),
    })
}

/// Handle POST /tab/:name - Switch tab
pub async fn switch_tab_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Json<TabResponse> {
    match name.parse::<Tab>() {
        Ok(tab) => state.switch_tab(tab),
        Err(e) => debug!("Ignoring tab switch: {}", e),
    }
    Json(TabResponse {
        active_tab: state.active_tab(),
    })
}

/// Handle GET /health - Health check
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse::ok(state.get_uptime(), state.active_tab()))
}
