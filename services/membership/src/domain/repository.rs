#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::projection::ProfilePatch;
use crate::domain::types::{Claim, CrewMember, JobTitle, OtpChallenge, Payment, Profile, Region};
use crate::error::MembershipServiceError;

/// Read access to account profiles. Profile mutations only happen through
/// the transactional claim/payment store methods below.
pub trait ProfileStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, MembershipServiceError>;
}

/// Read access to regions.
pub trait RegionStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Region>, MembershipServiceError>;
}

/// Regional approval decision. When `profile_patch` is set (legacy claims)
/// the profile is activated in the same transaction.
#[derive(Debug, Clone)]
pub struct RegionalApproval {
    pub claim_id: Uuid,
    pub profile_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewed_at: DateTime<Utc>,
    pub profile_patch: Option<ProfilePatch>,
}

/// Regional rejection: claim and profile move to rejected atomically.
#[derive(Debug, Clone)]
pub struct RegionalRejection {
    pub claim_id: Uuid,
    pub profile_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewed_at: DateTime<Utc>,
    pub reason: String,
    pub profile_patch: ProfilePatch,
}

/// Administrative quick approval carrying a pre-computed (random-sequence)
/// institution code.
#[derive(Debug, Clone)]
pub struct QuickApproval {
    pub claim_id: Uuid,
    pub profile_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewed_at: DateTime<Utc>,
    pub institution_code: String,
    pub profile_patch: ProfilePatch,
}

/// Repository for membership claims. Multi-row decisions run inside a single
/// transaction in the implementation; partial application never commits.
pub trait ClaimStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Claim>, MembershipServiceError>;

    /// Claim → regional_approved (stamps reviewer, clears rejection note);
    /// applies the profile patch when present, all in one transaction.
    async fn apply_regional_approval(
        &self,
        decision: &RegionalApproval,
    ) -> Result<(), MembershipServiceError>;

    /// Claim → rejected with note; profile → rejected. One transaction.
    async fn apply_regional_rejection(
        &self,
        decision: &RegionalRejection,
    ) -> Result<(), MembershipServiceError>;

    /// Claim → central_approved with the supplied code; profile activated.
    /// One transaction.
    async fn apply_quick_approval(
        &self,
        approval: &QuickApproval,
    ) -> Result<(), MembershipServiceError>;
}

/// Central approval of a verified transfer. The implementation increments the
/// per-region sequence, formats the institution code, and writes payment,
/// claim and profile rows in one transaction, returning the issued code.
#[derive(Debug, Clone)]
pub struct CentralApproval {
    pub payment_id: Uuid,
    pub claim_id: Uuid,
    pub profile_id: Uuid,
    pub region_id: Uuid,
    pub region_code: String,
    pub reviewer_id: Uuid,
    pub reviewed_at: DateTime<Utc>,
    pub year: i32,
}

/// Repository for payments.
pub trait PaymentStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, MembershipServiceError>;

    async fn find_by_claim(
        &self,
        claim_id: Uuid,
    ) -> Result<Option<Payment>, MembershipServiceError>;

    async fn create(&self, payment: &Payment) -> Result<(), MembershipServiceError>;

    /// awaiting_transfer → awaiting_verification with the proof reference;
    /// clears any prior rejection reason.
    async fn mark_awaiting_verification(
        &self,
        id: Uuid,
        proof_ref: &str,
    ) -> Result<(), MembershipServiceError>;

    /// Recycle a rejected transfer back to awaiting_transfer: record the
    /// reason, clear the proof, keep base amount and unique suffix.
    async fn recycle(&self, id: Uuid, reason: &str) -> Result<(), MembershipServiceError>;

    /// Atomic central approval; returns the issued institution code.
    /// Surfaces `Conflict` when the sequence or unique-code write races;
    /// the caller retries bounded.
    async fn apply_central_approval(
        &self,
        approval: &CentralApproval,
    ) -> Result<String, MembershipServiceError>;
}

/// Repository for OTP challenges (append-only).
pub trait OtpStore: Send + Sync {
    /// Challenges issued for this phone since the given instant (sliding
    /// rate-limit window over created_at).
    async fn count_issued_since(
        &self,
        phone: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, MembershipServiceError>;

    /// Consume all prior unconsumed challenges for the phone and insert the
    /// new one, atomically (single-active-challenge invariant).
    async fn create_superseding(
        &self,
        challenge: &OtpChallenge,
    ) -> Result<(), MembershipServiceError>;

    /// Newest unconsumed, unexpired challenge for the selector.
    async fn find_active(
        &self,
        phone: &str,
        claim_id: Option<Uuid>,
    ) -> Result<Option<OtpChallenge>, MembershipServiceError>;

    async fn record_attempt(
        &self,
        id: Uuid,
        attempts: i32,
    ) -> Result<(), MembershipServiceError>;

    /// Mark the challenge verified and, when claim-bound, re-queue the claim
    /// to pending in the same transaction.
    async fn mark_verified_and_requeue(
        &self,
        id: Uuid,
        claim_id: Option<Uuid>,
    ) -> Result<(), MembershipServiceError>;
}

/// Crew draft; the store computes the per-institution sequence and the
/// personnel code inside the insert transaction.
#[derive(Debug, Clone)]
pub struct CrewDraft {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub name: String,
    pub job_title_id: Uuid,
    pub role_code: String,
    pub institution_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Repository for crew members.
pub trait CrewStore: Send + Sync {
    /// Insert with `seq = count(existing crew for profile) + 1`, computed in
    /// the same transaction as the insert.
    async fn create_with_seq(
        &self,
        draft: &CrewDraft,
    ) -> Result<CrewMember, MembershipServiceError>;
}

/// Job-title registry lookup.
pub trait JobTitleStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobTitle>, MembershipServiceError>;
}

/// Key-value configuration store (pricing overrides, bank details).
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, MembershipServiceError>;
}

/// Document storage port: accepts a byte blob, returns an opaque reference.
pub trait DocumentStore: Send + Sync {
    async fn store(&self, bytes: &[u8]) -> Result<String, MembershipServiceError>;
}

/// Outbound notification port. Fire-and-forget, never awaited by the core.
pub trait NotificationSender: Send + Sync {
    fn send(&self, phone: &str, message: &str);
}
