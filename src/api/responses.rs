//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::Tab;

/// Body of `POST /pomodoro/adjust`
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustRequest {
    /// Minutes to add to the current phase, usually -1 or +1
    pub delta: i64,
}

/// Body of `POST /todos`
#[derive(Debug, Clone, Deserialize)]
pub struct NewTodoRequest {
    pub text: String,
}

/// Body of `POST /groceries`
#[derive(Debug, Clone, Deserialize)]
pub struct NewGroceryRequest {
    pub item: String,
    pub quantity: String,
}

/// Active tab response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabResponse {
    pub active_tab: Tab,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
    pub active_tab: Tab,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok(uptime: String, active_tab: Tab) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
            active_tab,
        }
    }
}
