use axum::http::StatusCode;

/// Handler for `GET /healthz` (liveness). Answers as long as the process
/// serves requests.
pub async fn healthz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Handler for `GET /readyz` (readiness). Services with external
/// dependencies swap in their own handler; this default reports ready.
pub async fn readyz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
