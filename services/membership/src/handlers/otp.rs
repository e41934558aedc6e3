use axum::{Json, extract::Path, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MembershipServiceError;
use crate::state::AppState;
use crate::usecase::otp::{
    IssueChallengeInput, IssueChallengeUseCase, VerifyChallengeInput, VerifyChallengeUseCase,
};

// ── POST /claims/{id}/otp ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct IssueChallengeResponse {
    pub challenge_id: String,
    #[serde(serialize_with = "registry_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub masked_phone: String,
    /// Present only when the service runs with `OTP_DEBUG_ECHO=true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_code: Option<String>,
}

pub async fn issue_challenge(
    State(state): State<AppState>,
    Path(claim_id): Path<Uuid>,
) -> Result<Json<IssueChallengeResponse>, MembershipServiceError> {
    let usecase = IssueChallengeUseCase {
        claims: state.claim_store(),
        profiles: state.profile_store(),
        otp: state.otp_store(),
        notifier: state.notifier(),
        debug_echo: state.otp_debug_echo,
    };
    let out = usecase.execute(IssueChallengeInput { claim_id }).await?;
    Ok(Json(IssueChallengeResponse {
        challenge_id: out.challenge_id.to_string(),
        expires_at: out.expires_at,
        masked_phone: out.masked_phone,
        debug_code: out.debug_code,
    }))
}

// ── POST /claims/{id}/otp/verify ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyChallengeRequest {
    pub code: String,
}

#[derive(Serialize)]
pub struct VerifyChallengeResponse {
    pub claim_id: String,
}

pub async fn verify_challenge(
    State(state): State<AppState>,
    Path(claim_id): Path<Uuid>,
    Json(body): Json<VerifyChallengeRequest>,
) -> Result<Json<VerifyChallengeResponse>, MembershipServiceError> {
    let usecase = VerifyChallengeUseCase {
        claims: state.claim_store(),
        profiles: state.profile_store(),
        otp: state.otp_store(),
    };
    let out = usecase
        .execute(VerifyChallengeInput {
            claim_id,
            code: body.code,
        })
        .await?;
    Ok(Json(VerifyChallengeResponse {
        claim_id: out.claim_id.to_string(),
    }))
}
