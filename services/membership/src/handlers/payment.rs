use axum::body::Bytes;
use axum::{Json, extract::Path, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::Payment;
use crate::error::MembershipServiceError;
use crate::handlers::identity::{IdentityHeaders, ROLE_CENTRAL_ADMIN};
use crate::state::AppState;
use crate::usecase::payment::{
    ApprovePaymentInput, ApprovePaymentUseCase, EnsurePaymentInput, EnsurePaymentUseCase,
    RejectPaymentInput, RejectPaymentUseCase, SubmitProofInput, SubmitProofUseCase,
};

#[derive(Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub claim_id: String,
    pub base_amount: i64,
    pub unique_suffix: i32,
    pub total_amount: i64,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(serialize_with = "registry_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            claim_id: payment.claim_id.to_string(),
            base_amount: payment.base_amount,
            unique_suffix: payment.unique_suffix,
            total_amount: payment.total_amount,
            status: payment.status.as_str(),
            proof_ref: payment.proof_ref,
            rejection_reason: payment.rejection_reason,
            created_at: payment.created_at,
        }
    }
}

// ── GET /claims/{id}/payment ─────────────────────────────────────────────────

/// Payment row plus the transfer destination the applicant needs to pay it.
#[derive(Serialize)]
pub struct PaymentInstructionsResponse {
    #[serde(flatten)]
    pub payment: PaymentResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_name: Option<String>,
}

pub async fn get_payment(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(claim_id): Path<Uuid>,
) -> Result<Json<PaymentInstructionsResponse>, MembershipServiceError> {
    let usecase = EnsurePaymentUseCase {
        claims: state.claim_store(),
        payments: state.payment_store(),
        settings: state.settings_store(),
    };
    let out = usecase
        .execute(EnsurePaymentInput {
            claim_id,
            caller_profile_id: identity.user_id,
        })
        .await?;
    Ok(Json(PaymentInstructionsResponse {
        payment: out.payment.into(),
        bank_account_number: out.bank_account_number,
        bank_account_name: out.bank_account_name,
    }))
}

// ── POST /payments/{id}/proof ────────────────────────────────────────────────

pub async fn submit_proof(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<PaymentResponse>, MembershipServiceError> {
    let usecase = SubmitProofUseCase {
        payments: state.payment_store(),
        documents: state.document_store(),
    };
    let payment = usecase
        .execute(SubmitProofInput {
            payment_id,
            caller_profile_id: identity.user_id,
            proof: body.to_vec(),
        })
        .await?;
    Ok(Json(payment.into()))
}

// ── POST /payments/{id}/approval ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct ApprovePaymentResponse {
    pub payment_id: String,
    pub institution_code: String,
}

pub async fn approve_payment(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<ApprovePaymentResponse>, MembershipServiceError> {
    if identity.user_role < ROLE_CENTRAL_ADMIN {
        return Err(MembershipServiceError::Forbidden);
    }
    let usecase = ApprovePaymentUseCase {
        payments: state.payment_store(),
        claims: state.claim_store(),
        profiles: state.profile_store(),
        regions: state.region_store(),
        notifier: state.notifier(),
    };
    let out = usecase
        .execute(ApprovePaymentInput {
            payment_id,
            reviewer_id: identity.user_id,
        })
        .await?;
    Ok(Json(ApprovePaymentResponse {
        payment_id: out.payment_id.to_string(),
        institution_code: out.institution_code,
    }))
}

// ── POST /payments/{id}/rejection ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RejectPaymentRequest {
    pub reason: String,
}

pub async fn reject_payment(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    Json(body): Json<RejectPaymentRequest>,
) -> Result<Json<PaymentResponse>, MembershipServiceError> {
    if identity.user_role < ROLE_CENTRAL_ADMIN {
        return Err(MembershipServiceError::Forbidden);
    }
    let usecase = RejectPaymentUseCase {
        payments: state.payment_store(),
    };
    let payment = usecase
        .execute(RejectPaymentInput {
            payment_id,
            reason: body.reason,
        })
        .await?;
    Ok(Json(payment.into()))
}
