use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::domain::identifier;
use crate::domain::projection;
use crate::domain::repository::{
    ClaimStore, PaymentStore, QuickApproval, RegionStore, RegionalApproval, RegionalRejection,
    SettingsStore,
};
use crate::domain::status::{ClaimStatus, SubmissionType};
use crate::domain::types::{Claim, SEQUENCE_RETRY_LIMIT};
use crate::error::MembershipServiceError;
use crate::usecase::payment::ensure_payment;

// ── ApproveRegional ──────────────────────────────────────────────────────────

pub struct ApproveRegionalInput {
    pub claim_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewer_region: Uuid,
}

pub struct ApproveRegionalUseCase<C, Pay, S>
where
    C: ClaimStore,
    Pay: PaymentStore,
    S: SettingsStore,
{
    pub claims: C,
    pub payments: Pay,
    pub settings: S,
}

impl<C, Pay, S> ApproveRegionalUseCase<C, Pay, S>
where
    C: ClaimStore,
    Pay: PaymentStore,
    S: SettingsStore,
{
    pub async fn execute(
        &self,
        input: ApproveRegionalInput,
    ) -> Result<Claim, MembershipServiceError> {
        let claim = self
            .claims
            .find_by_id(input.claim_id)
            .await?
            .ok_or(MembershipServiceError::ClaimNotFound)?;
        if claim.region_id != input.reviewer_region {
            return Err(MembershipServiceError::Forbidden);
        }
        if !claim.status.can_transition(ClaimStatus::RegionalApproved) {
            return Err(MembershipServiceError::Conflict);
        }

        let legacy = claim.submission_type == SubmissionType::LegacyClaim;
        let now = Utc::now();
        let decision = RegionalApproval {
            claim_id: claim.id,
            profile_id: claim.profile_id,
            reviewer_id: input.reviewer_id,
            reviewed_at: now,
            // Legacy claims skip payment and activate the account right away.
            profile_patch: legacy.then(projection::on_legacy_activation),
        };
        self.claims.apply_regional_approval(&decision).await?;

        if !legacy {
            ensure_payment(&self.payments, &self.settings, &claim).await?;
        }

        Ok(Claim {
            status: ClaimStatus::RegionalApproved,
            regional_reviewed_by: Some(input.reviewer_id),
            regional_reviewed_at: Some(now),
            rejection_note: None,
            ..claim
        })
    }
}

// ── RejectRegional ───────────────────────────────────────────────────────────

pub struct RejectRegionalInput {
    pub claim_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewer_region: Uuid,
    pub reason: String,
}

pub struct RejectRegionalUseCase<C: ClaimStore> {
    pub claims: C,
}

impl<C: ClaimStore> RejectRegionalUseCase<C> {
    pub async fn execute(
        &self,
        input: RejectRegionalInput,
    ) -> Result<Claim, MembershipServiceError> {
        if input.reason.trim().is_empty() {
            return Err(MembershipServiceError::MissingData);
        }
        let claim = self
            .claims
            .find_by_id(input.claim_id)
            .await?
            .ok_or(MembershipServiceError::ClaimNotFound)?;
        if claim.region_id != input.reviewer_region {
            return Err(MembershipServiceError::Forbidden);
        }
        if !claim.status.can_transition(ClaimStatus::Rejected) {
            return Err(MembershipServiceError::Conflict);
        }

        let now = Utc::now();
        let decision = RegionalRejection {
            claim_id: claim.id,
            profile_id: claim.profile_id,
            reviewer_id: input.reviewer_id,
            reviewed_at: now,
            reason: input.reason.clone(),
            profile_patch: projection::on_regional_rejection(),
        };
        self.claims.apply_regional_rejection(&decision).await?;

        Ok(Claim {
            status: ClaimStatus::Rejected,
            rejection_note: Some(input.reason),
            regional_reviewed_by: Some(input.reviewer_id),
            regional_reviewed_at: Some(now),
            ..claim
        })
    }
}

// ── QuickApprove (central admin shortcut) ────────────────────────────────────

pub struct QuickApproveInput {
    pub claim_id: Uuid,
    pub reviewer_id: Uuid,
}

#[derive(Debug)]
pub struct QuickApproveOutput {
    pub claim_id: Uuid,
    pub institution_code: String,
}

pub struct QuickApproveUseCase<C, R>
where
    C: ClaimStore,
    R: RegionStore,
{
    pub claims: C,
    pub regions: R,
}

impl<C, R> QuickApproveUseCase<C, R>
where
    C: ClaimStore,
    R: RegionStore,
{
    pub async fn execute(
        &self,
        input: QuickApproveInput,
    ) -> Result<QuickApproveOutput, MembershipServiceError> {
        let claim = self
            .claims
            .find_by_id(input.claim_id)
            .await?
            .ok_or(MembershipServiceError::ClaimNotFound)?;
        if !claim.status.can_transition(ClaimStatus::CentralApproved) {
            return Err(MembershipServiceError::Conflict);
        }

        let region = self
            .regions
            .find_by_id(claim.region_id)
            .await?
            .ok_or(MembershipServiceError::RegionNotFound)?;
        if !identifier::is_valid_region_code(&region.code) {
            return Err(MembershipServiceError::InvalidRegionCode);
        }

        // Random-draw sequence policy: collision-tolerant, retried with a
        // fresh draw when the unique code column clashes.
        let year = Utc::now().year();
        let mut attempt = 0;
        let institution_code = loop {
            let code =
                identifier::institution_code(year, &region.code, identifier::random_institution_seq());
            let approval = QuickApproval {
                claim_id: claim.id,
                profile_id: claim.profile_id,
                reviewer_id: input.reviewer_id,
                reviewed_at: Utc::now(),
                institution_code: code.clone(),
                profile_patch: projection::on_quick_approval(code.clone()),
            };
            match self.claims.apply_quick_approval(&approval).await {
                Ok(()) => break code,
                Err(MembershipServiceError::Conflict) if attempt + 1 < SEQUENCE_RETRY_LIMIT => {
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        Ok(QuickApproveOutput {
            claim_id: claim.id,
            institution_code,
        })
    }
}
