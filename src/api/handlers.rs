//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{debug, error, warn};

use crate::{
    presentation::ClockView,
    state::{AppState, Toggle},
};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

type LengthResult = Result<(bool, ClockView), String>;

fn length_response(what: &str, result: LengthResult) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok((changed, clock)) => Ok(Json(ApiResponse::length_change(what, changed, clock))),
        Err(e) => {
            error!("Failed to change {}: {}", what, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /break/increment
pub async fn break_increment_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    length_response("Break length", state.increment_break())
}

/// Handle POST /break/decrement
pub async fn break_decrement_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    length_response("Break length", state.decrement_break())
}

/// Handle POST /session/increment
pub async fn session_increment_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    length_response("Session length", state.increment_session())
}

/// Handle POST /session/decrement
pub async fn session_decrement_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    length_response("Session length", state.decrement_session())
}

/// Handle POST /start_stop - Start, pause, or begin the next phase after an alert
pub async fn start_stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start_stop() {
        Ok((toggle, clock)) => {
            let message = match toggle {
                Toggle::Started => format!("{} running", clock.label),
                Toggle::Paused => format!("{} paused", clock.label),
                Toggle::Advanced(phase) => format!("{} started", phase),
            };
            Ok(Json(ApiResponse::new(message, clock)))
        }
        Err(e) => {
            error!("Failed to toggle clock: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Restore defaults and stop the alert
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(clock) => Ok(Json(ApiResponse::new("Clock reset".to_string(), clock))),
        Err(e) => {
            error!("Failed to reset clock: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current clock and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let clock = match state.get_clock_view() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get clock state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        clock,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        tick_millis: state.tick_interval.as_millis() as u64,
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream a clock view on every change
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Event stream client connected");
    let rx = state.subscribe();

    // The current view goes out first, then one event per update
    let events = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let view = rx.borrow_and_update().clone();
        let event = match serde_json::to_string(&view) {
            Ok(json) => Event::default().event("clock").data(json),
            Err(e) => {
                warn!("Failed to serialize clock view: {}", e);
                Event::default().comment("serialization error")
            }
        };
        Some((Ok(event), (rx, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
