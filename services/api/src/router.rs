use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use planner_core::health::healthz;
use planner_core::middleware::request_id_layer;

use crate::handlers::{
    auth::{consume_login_link, logout, request_login_link},
    availability::{create_period, delete_period, list_my_periods},
    calendar::calendar,
    event::{create_event, delete_event, get_event, list_events, rsvp, update_event},
    readyz,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/api/auth/request", post(request_login_link))
        .route("/api/auth/consume", get(consume_login_link))
        .route("/api/auth/logout", post(logout))
        // Availability
        .route("/api/availability", post(create_period))
        .route("/api/availability/me", get(list_my_periods))
        .route("/api/availability/{id}", delete(delete_period))
        // Events
        .route("/api/events", get(list_events))
        .route("/api/events", post(create_event))
        .route("/api/events/{id}", get(get_event))
        .route("/api/events/{id}", patch(update_event))
        .route("/api/events/{id}", delete(delete_event))
        .route("/api/events/{id}/rsvp", post(rsvp))
        // Calendar feed
        .route("/api/calendar", get(calendar))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
