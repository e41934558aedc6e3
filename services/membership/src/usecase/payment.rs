use chrono::{Datelike, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{
    CentralApproval, ClaimStore, DocumentStore, NotificationSender, PaymentStore, ProfileStore,
    RegionStore, SettingsStore,
};
use crate::domain::status::{ClaimStatus, PaymentStatus, SubmissionType};
use crate::domain::types::{
    Claim, DEFAULT_LEGACY_CLAIM_FEE, DEFAULT_NEW_INSTITUTION_FEE, Payment, SEQUENCE_RETRY_LIMIT,
    UNIQUE_SUFFIX_MAX, UNIQUE_SUFFIX_MIN,
};
use crate::domain::identifier;
use crate::error::MembershipServiceError;

pub const PRICE_KEY_NEW_INSTITUTION: &str = "pricing.new_institution";
pub const PRICE_KEY_LEGACY_CLAIM: &str = "pricing.legacy_claim";
pub const BANK_KEY_ACCOUNT_NUMBER: &str = "bank.account_number";
pub const BANK_KEY_ACCOUNT_NAME: &str = "bank.account_name";

fn draw_unique_suffix() -> i32 {
    let mut rng = rand::rng();
    rng.random_range(UNIQUE_SUFFIX_MIN..=UNIQUE_SUFFIX_MAX)
}

async fn base_amount_for<S: SettingsStore>(
    settings: &S,
    submission: SubmissionType,
) -> Result<i64, MembershipServiceError> {
    let (key, default) = match submission {
        SubmissionType::NewInstitution => (PRICE_KEY_NEW_INSTITUTION, DEFAULT_NEW_INSTITUTION_FEE),
        SubmissionType::LegacyClaim => (PRICE_KEY_LEGACY_CLAIM, DEFAULT_LEGACY_CLAIM_FEE),
    };
    let amount = settings
        .get(key)
        .await?
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default);
    Ok(amount)
}

/// Idempotent payment creation: returns the existing payment for the claim,
/// or creates one in awaiting_transfer with the tier price and a fresh
/// unique suffix. Shared by `EnsurePaymentUseCase` and regional approval.
pub(crate) async fn ensure_payment<Pay, S>(
    payments: &Pay,
    settings: &S,
    claim: &Claim,
) -> Result<Payment, MembershipServiceError>
where
    Pay: PaymentStore,
    S: SettingsStore,
{
    if let Some(existing) = payments.find_by_claim(claim.id).await? {
        return Ok(existing);
    }

    let base_amount = base_amount_for(settings, claim.submission_type).await?;
    let unique_suffix = draw_unique_suffix();
    let payment = Payment {
        id: Uuid::now_v7(),
        profile_id: claim.profile_id,
        claim_id: claim.id,
        base_amount,
        unique_suffix,
        total_amount: base_amount + i64::from(unique_suffix),
        status: PaymentStatus::AwaitingTransfer,
        proof_ref: None,
        rejection_reason: None,
        verified_by: None,
        verified_at: None,
        created_at: Utc::now(),
    };
    payments.create(&payment).await?;
    Ok(payment)
}

// ── EnsurePayment ────────────────────────────────────────────────────────────

pub struct EnsurePaymentInput {
    pub claim_id: Uuid,
    pub caller_profile_id: Uuid,
}

#[derive(Debug)]
pub struct EnsurePaymentOutput {
    pub payment: Payment,
    /// Transfer destination from settings; absent until an admin configures it.
    pub bank_account_number: Option<String>,
    pub bank_account_name: Option<String>,
}

pub struct EnsurePaymentUseCase<C, Pay, S>
where
    C: ClaimStore,
    Pay: PaymentStore,
    S: SettingsStore,
{
    pub claims: C,
    pub payments: Pay,
    pub settings: S,
}

impl<C, Pay, S> EnsurePaymentUseCase<C, Pay, S>
where
    C: ClaimStore,
    Pay: PaymentStore,
    S: SettingsStore,
{
    pub async fn execute(
        &self,
        input: EnsurePaymentInput,
    ) -> Result<EnsurePaymentOutput, MembershipServiceError> {
        let claim = self
            .claims
            .find_by_id(input.claim_id)
            .await?
            .ok_or(MembershipServiceError::ClaimNotFound)?;
        if claim.profile_id != input.caller_profile_id {
            return Err(MembershipServiceError::Forbidden);
        }
        // Payment exists only between regional approval and final approval,
        // and never for legacy claims.
        if claim.status != ClaimStatus::RegionalApproved
            || claim.submission_type == SubmissionType::LegacyClaim
        {
            return Err(MembershipServiceError::Conflict);
        }
        let payment = ensure_payment(&self.payments, &self.settings, &claim).await?;
        Ok(EnsurePaymentOutput {
            payment,
            bank_account_number: self.settings.get(BANK_KEY_ACCOUNT_NUMBER).await?,
            bank_account_name: self.settings.get(BANK_KEY_ACCOUNT_NAME).await?,
        })
    }
}

// ── SubmitProof ──────────────────────────────────────────────────────────────

pub struct SubmitProofInput {
    pub payment_id: Uuid,
    pub caller_profile_id: Uuid,
    pub proof: Vec<u8>,
}

pub struct SubmitProofUseCase<Pay, D>
where
    Pay: PaymentStore,
    D: DocumentStore,
{
    pub payments: Pay,
    pub documents: D,
}

impl<Pay, D> SubmitProofUseCase<Pay, D>
where
    Pay: PaymentStore,
    D: DocumentStore,
{
    pub async fn execute(
        &self,
        input: SubmitProofInput,
    ) -> Result<Payment, MembershipServiceError> {
        if input.proof.is_empty() {
            return Err(MembershipServiceError::MissingData);
        }
        let payment = self
            .payments
            .find_by_id(input.payment_id)
            .await?
            .ok_or(MembershipServiceError::PaymentNotFound)?;
        if payment.profile_id != input.caller_profile_id {
            return Err(MembershipServiceError::Forbidden);
        }
        if !payment
            .status
            .can_transition(PaymentStatus::AwaitingVerification)
        {
            return Err(MembershipServiceError::Conflict);
        }

        let proof_ref = self.documents.store(&input.proof).await?;
        self.payments
            .mark_awaiting_verification(payment.id, &proof_ref)
            .await?;

        Ok(Payment {
            status: PaymentStatus::AwaitingVerification,
            proof_ref: Some(proof_ref),
            rejection_reason: None,
            ..payment
        })
    }
}

// ── RejectPayment (central rejection) ────────────────────────────────────────

pub struct RejectPaymentInput {
    pub payment_id: Uuid,
    pub reason: String,
}

pub struct RejectPaymentUseCase<Pay: PaymentStore> {
    pub payments: Pay,
}

impl<Pay: PaymentStore> RejectPaymentUseCase<Pay> {
    pub async fn execute(
        &self,
        input: RejectPaymentInput,
    ) -> Result<Payment, MembershipServiceError> {
        if input.reason.trim().is_empty() {
            return Err(MembershipServiceError::MissingData);
        }
        let payment = self
            .payments
            .find_by_id(input.payment_id)
            .await?
            .ok_or(MembershipServiceError::PaymentNotFound)?;
        if !payment
            .status
            .can_transition(PaymentStatus::AwaitingTransfer)
        {
            return Err(MembershipServiceError::Conflict);
        }

        // Recycle, never replace: the original base amount and unique suffix
        // must survive resubmission.
        self.payments.recycle(payment.id, &input.reason).await?;

        Ok(Payment {
            status: PaymentStatus::AwaitingTransfer,
            proof_ref: None,
            rejection_reason: Some(input.reason),
            ..payment
        })
    }
}

// ── ApprovePayment (central approval) ────────────────────────────────────────

pub struct ApprovePaymentInput {
    pub payment_id: Uuid,
    pub reviewer_id: Uuid,
}

#[derive(Debug)]
pub struct ApprovePaymentOutput {
    pub payment_id: Uuid,
    pub institution_code: String,
    /// Contact phone for the caller-side notification trigger.
    pub phone: Option<String>,
}

pub struct ApprovePaymentUseCase<Pay, C, P, R, N>
where
    Pay: PaymentStore,
    C: ClaimStore,
    P: ProfileStore,
    R: RegionStore,
    N: NotificationSender,
{
    pub payments: Pay,
    pub claims: C,
    pub profiles: P,
    pub regions: R,
    pub notifier: N,
}

impl<Pay, C, P, R, N> ApprovePaymentUseCase<Pay, C, P, R, N>
where
    Pay: PaymentStore,
    C: ClaimStore,
    P: ProfileStore,
    R: RegionStore,
    N: NotificationSender,
{
    pub async fn execute(
        &self,
        input: ApprovePaymentInput,
    ) -> Result<ApprovePaymentOutput, MembershipServiceError> {
        let payment = self
            .payments
            .find_by_id(input.payment_id)
            .await?
            .ok_or(MembershipServiceError::PaymentNotFound)?;
        if !payment.status.can_transition(PaymentStatus::Verified) {
            return Err(MembershipServiceError::Conflict);
        }

        let claim = self
            .claims
            .find_by_id(payment.claim_id)
            .await?
            .ok_or(MembershipServiceError::ClaimNotFound)?;
        if !claim.status.can_transition(ClaimStatus::Approved) {
            return Err(MembershipServiceError::Conflict);
        }

        let region = self
            .regions
            .find_by_id(claim.region_id)
            .await?
            .ok_or(MembershipServiceError::RegionNotFound)?;
        // Issuance is blocked entirely until an admin fixes the region record.
        if !identifier::is_valid_region_code(&region.code) {
            return Err(MembershipServiceError::InvalidRegionCode);
        }

        let profile = self
            .profiles
            .find_by_id(claim.profile_id)
            .await?
            .ok_or(MembershipServiceError::ProfileNotFound)?;

        let approval = CentralApproval {
            payment_id: payment.id,
            claim_id: claim.id,
            profile_id: claim.profile_id,
            region_id: region.id,
            region_code: region.code.clone(),
            reviewer_id: input.reviewer_id,
            reviewed_at: Utc::now(),
            year: Utc::now().year(),
        };

        // The sequence read-and-increment lives inside the approval
        // transaction; bounded retry on conflict, then surface it.
        let mut attempt = 0;
        let institution_code = loop {
            match self.payments.apply_central_approval(&approval).await {
                Ok(code) => break code,
                Err(MembershipServiceError::Conflict) if attempt + 1 < SEQUENCE_RETRY_LIMIT => {
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        if let Some(ref phone) = profile.phone {
            self.notifier.send(
                phone,
                &format!("Membership approved. Your institution code is {institution_code}."),
            );
        }

        Ok(ApprovePaymentOutput {
            payment_id: payment.id,
            institution_code,
            phone: profile.phone,
        })
    }
}
