use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use registry_core::health::{healthz, readyz};
use registry_core::middleware::request_id_layer;

use crate::handlers::{
    claim::{approve_regional, quick_approve, reject_regional},
    crew::register_crew,
    otp::{issue_challenge, verify_challenge},
    payment::{approve_payment, get_payment, reject_payment, submit_proof},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // OTP gate
        .route("/claims/{id}/otp", post(issue_challenge))
        .route("/claims/{id}/otp/verify", post(verify_challenge))
        // Claim review
        .route("/claims/{id}/regional-approval", post(approve_regional))
        .route("/claims/{id}/regional-rejection", post(reject_regional))
        .route("/claims/{id}/quick-approval", post(quick_approve))
        // Payments
        .route("/claims/{id}/payment", get(get_payment))
        .route("/payments/{id}/proof", post(submit_proof))
        .route("/payments/{id}/approval", post(approve_payment))
        .route("/payments/{id}/rejection", post(reject_payment))
        // Crew roster
        .route("/profiles/{id}/crew", post(register_crew))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
