use axum::{Json, extract::Path, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::Claim;
use crate::error::MembershipServiceError;
use crate::handlers::identity::{IdentityHeaders, ROLE_CENTRAL_ADMIN, ROLE_REGIONAL_REVIEWER};
use crate::state::AppState;
use crate::usecase::claim::{
    ApproveRegionalInput, ApproveRegionalUseCase, QuickApproveInput, QuickApproveUseCase,
    RejectRegionalInput, RejectRegionalUseCase,
};

#[derive(Serialize)]
pub struct ClaimResponse {
    pub id: String,
    pub status: &'static str,
    pub submission_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_note: Option<String>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id.to_string(),
            status: claim.status.as_str(),
            submission_type: claim.submission_type.as_str(),
            institution_code: claim.institution_code,
            rejection_note: claim.rejection_note,
        }
    }
}

fn reviewer_region(identity: &IdentityHeaders) -> Result<Uuid, MembershipServiceError> {
    if identity.user_role < ROLE_REGIONAL_REVIEWER {
        return Err(MembershipServiceError::Forbidden);
    }
    identity
        .region_id
        .ok_or(MembershipServiceError::Forbidden)
}

// ── POST /claims/{id}/regional-approval ──────────────────────────────────────

pub async fn approve_regional(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(claim_id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, MembershipServiceError> {
    let region = reviewer_region(&identity)?;
    let usecase = ApproveRegionalUseCase {
        claims: state.claim_store(),
        payments: state.payment_store(),
        settings: state.settings_store(),
    };
    let claim = usecase
        .execute(ApproveRegionalInput {
            claim_id,
            reviewer_id: identity.user_id,
            reviewer_region: region,
        })
        .await?;
    Ok(Json(claim.into()))
}

// ── POST /claims/{id}/regional-rejection ─────────────────────────────────────

#[derive(Deserialize)]
pub struct RejectClaimRequest {
    pub reason: String,
}

pub async fn reject_regional(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(claim_id): Path<Uuid>,
    Json(body): Json<RejectClaimRequest>,
) -> Result<Json<ClaimResponse>, MembershipServiceError> {
    let region = reviewer_region(&identity)?;
    let usecase = RejectRegionalUseCase {
        claims: state.claim_store(),
    };
    let claim = usecase
        .execute(RejectRegionalInput {
            claim_id,
            reviewer_id: identity.user_id,
            reviewer_region: region,
            reason: body.reason,
        })
        .await?;
    Ok(Json(claim.into()))
}

// ── POST /claims/{id}/quick-approval ─────────────────────────────────────────

#[derive(Serialize)]
pub struct QuickApproveResponse {
    pub claim_id: String,
    pub institution_code: String,
}

pub async fn quick_approve(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(claim_id): Path<Uuid>,
) -> Result<Json<QuickApproveResponse>, MembershipServiceError> {
    if identity.user_role < ROLE_CENTRAL_ADMIN {
        return Err(MembershipServiceError::Forbidden);
    }
    let usecase = QuickApproveUseCase {
        claims: state.claim_store(),
        regions: state.region_store(),
    };
    let out = usecase
        .execute(QuickApproveInput {
            claim_id,
            reviewer_id: identity.user_id,
        })
        .await?;
    Ok(Json(QuickApproveResponse {
        claim_id: out.claim_id.to_string(),
        institution_code: out.institution_code,
    }))
}
