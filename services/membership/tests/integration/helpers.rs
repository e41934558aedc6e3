use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use registry_membership::domain::identifier;
use registry_membership::domain::projection::ProfilePatch;
use registry_membership::domain::repository::{
    CentralApproval, ClaimStore, CrewDraft, CrewStore, DocumentStore, JobTitleStore,
    NotificationSender, OtpStore, PaymentStore, ProfileStore, QuickApproval, RegionStore,
    RegionalApproval, RegionalRejection, SettingsStore,
};
use registry_membership::domain::status::{
    AccountStatus, ClaimStatus, FeeStatus, PaymentStatus, SubmissionType,
};
use registry_membership::domain::types::{
    Claim, CrewMember, JobTitle, OtpChallenge, Payment, Profile, Region,
};
use registry_membership::error::MembershipServiceError;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_region(code: &str) -> Region {
    Region {
        id: Uuid::new_v4(),
        name: format!("Region {code}"),
        code: code.to_owned(),
    }
}

pub fn test_profile(region_id: Uuid) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        institution_name: "Al-Hikmah".to_owned(),
        caretaker_name: "Pak Ahmad".to_owned(),
        region_id,
        city: "Bandung".to_owned(),
        phone: Some("+6281234567890".to_owned()),
        role: 0,
        account_status: AccountStatus::Pending,
        payment_status: FeeStatus::Unpaid,
        institution_code: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_claim(
    profile: &Profile,
    status: ClaimStatus,
    submission_type: SubmissionType,
) -> Claim {
    Claim {
        id: Uuid::new_v4(),
        profile_id: profile.id,
        submission_type,
        status,
        region_id: profile.region_id,
        manager_name: "Bu Siti".to_owned(),
        notes: None,
        institution_code: None,
        rejection_note: None,
        regional_reviewed_by: None,
        regional_reviewed_at: None,
        final_reviewed_by: None,
        final_reviewed_at: None,
        created_at: Utc::now(),
    }
}

pub fn test_payment(claim: &Claim, status: PaymentStatus) -> Payment {
    Payment {
        id: Uuid::now_v7(),
        profile_id: claim.profile_id,
        claim_id: claim.id,
        base_amount: 50_000,
        unique_suffix: 123,
        total_amount: 50_123,
        status,
        proof_ref: None,
        rejection_reason: None,
        verified_by: None,
        verified_at: None,
        created_at: Utc::now(),
    }
}

pub fn test_challenge(phone: &str, claim_id: Option<Uuid>, code: &str) -> OtpChallenge {
    let now = Utc::now();
    OtpChallenge {
        id: Uuid::new_v4(),
        phone: phone.to_owned(),
        code: code.to_owned(),
        claim_id,
        expires_at: now + chrono::Duration::seconds(600),
        attempts: 0,
        consumed_at: None,
        verified_at: None,
        created_at: now,
    }
}

// ── MockProfileStore ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockProfileStore {
    pub profiles: Vec<Profile>,
}

impl MockProfileStore {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }
}

impl ProfileStore for MockProfileStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, MembershipServiceError> {
        Ok(self.profiles.iter().find(|p| p.id == id).cloned())
    }
}

// ── MockRegionStore ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockRegionStore {
    pub regions: Vec<Region>,
}

impl MockRegionStore {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }
}

impl RegionStore for MockRegionStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Region>, MembershipServiceError> {
        Ok(self.regions.iter().find(|r| r.id == id).cloned())
    }
}

// ── MockClaimStore ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockClaimStore {
    pub claims: Arc<Mutex<Vec<Claim>>>,
    pub patches: Arc<Mutex<Vec<ProfilePatch>>>,
    conflicts_left: Arc<AtomicU32>,
}

impl MockClaimStore {
    pub fn new(claims: Vec<Claim>) -> Self {
        Self {
            claims: Arc::new(Mutex::new(claims)),
            patches: Arc::new(Mutex::new(vec![])),
            conflicts_left: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Makes the next `n` write attempts fail with `Conflict`, simulating a
    /// unique-code collision inside the store transaction.
    pub fn fail_next_with_conflict(self, n: u32) -> Self {
        self.conflicts_left.store(n, Ordering::SeqCst);
        self
    }

    pub fn claims_handle(&self) -> Arc<Mutex<Vec<Claim>>> {
        Arc::clone(&self.claims)
    }

    pub fn patches_handle(&self) -> Arc<Mutex<Vec<ProfilePatch>>> {
        Arc::clone(&self.patches)
    }

    fn take_conflict(&self) -> bool {
        self.conflicts_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl ClaimStore for MockClaimStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Claim>, MembershipServiceError> {
        Ok(self.claims.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn apply_regional_approval(
        &self,
        decision: &RegionalApproval,
    ) -> Result<(), MembershipServiceError> {
        let mut claims = self.claims.lock().unwrap();
        let claim = claims
            .iter_mut()
            .find(|c| c.id == decision.claim_id)
            .expect("claim present in mock");
        claim.status = ClaimStatus::RegionalApproved;
        claim.regional_reviewed_by = Some(decision.reviewer_id);
        claim.regional_reviewed_at = Some(decision.reviewed_at);
        claim.rejection_note = None;
        if let Some(ref patch) = decision.profile_patch {
            self.patches.lock().unwrap().push(patch.clone());
        }
        Ok(())
    }

    async fn apply_regional_rejection(
        &self,
        decision: &RegionalRejection,
    ) -> Result<(), MembershipServiceError> {
        let mut claims = self.claims.lock().unwrap();
        let claim = claims
            .iter_mut()
            .find(|c| c.id == decision.claim_id)
            .expect("claim present in mock");
        claim.status = ClaimStatus::Rejected;
        claim.rejection_note = Some(decision.reason.clone());
        claim.regional_reviewed_by = Some(decision.reviewer_id);
        claim.regional_reviewed_at = Some(decision.reviewed_at);
        self.patches.lock().unwrap().push(decision.profile_patch.clone());
        Ok(())
    }

    async fn apply_quick_approval(
        &self,
        approval: &QuickApproval,
    ) -> Result<(), MembershipServiceError> {
        if self.take_conflict() {
            return Err(MembershipServiceError::Conflict);
        }
        let mut claims = self.claims.lock().unwrap();
        let claim = claims
            .iter_mut()
            .find(|c| c.id == approval.claim_id)
            .expect("claim present in mock");
        claim.status = ClaimStatus::CentralApproved;
        claim.institution_code = Some(approval.institution_code.clone());
        claim.final_reviewed_by = Some(approval.reviewer_id);
        claim.final_reviewed_at = Some(approval.reviewed_at);
        self.patches.lock().unwrap().push(approval.profile_patch.clone());
        Ok(())
    }
}

// ── MockPaymentStore ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockPaymentStore {
    pub payments: Arc<Mutex<Vec<Payment>>>,
    /// Per-region sequence stand-in; approvals take the current value and
    /// increment, like the counter row in the real store transaction.
    next_seq: Arc<AtomicU32>,
    conflicts_left: Arc<AtomicU32>,
}

impl MockPaymentStore {
    pub fn new(payments: Vec<Payment>) -> Self {
        Self::with_next_seq(payments, 1)
    }

    pub fn with_next_seq(payments: Vec<Payment>, next_seq: u32) -> Self {
        Self {
            payments: Arc::new(Mutex::new(payments)),
            next_seq: Arc::new(AtomicU32::new(next_seq)),
            conflicts_left: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn fail_next_with_conflict(self, n: u32) -> Self {
        self.conflicts_left.store(n, Ordering::SeqCst);
        self
    }

    pub fn payments_handle(&self) -> Arc<Mutex<Vec<Payment>>> {
        Arc::clone(&self.payments)
    }

    fn take_conflict(&self) -> bool {
        self.conflicts_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl PaymentStore for MockPaymentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, MembershipServiceError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_claim(
        &self,
        claim_id: Uuid,
    ) -> Result<Option<Payment>, MembershipServiceError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.claim_id == claim_id)
            .cloned())
    }

    async fn create(&self, payment: &Payment) -> Result<(), MembershipServiceError> {
        self.payments.lock().unwrap().push(payment.clone());
        Ok(())
    }

    async fn mark_awaiting_verification(
        &self,
        id: Uuid,
        proof_ref: &str,
    ) -> Result<(), MembershipServiceError> {
        let mut payments = self.payments.lock().unwrap();
        let payment = payments
            .iter_mut()
            .find(|p| p.id == id)
            .expect("payment present in mock");
        payment.status = PaymentStatus::AwaitingVerification;
        payment.proof_ref = Some(proof_ref.to_owned());
        payment.rejection_reason = None;
        Ok(())
    }

    async fn recycle(&self, id: Uuid, reason: &str) -> Result<(), MembershipServiceError> {
        let mut payments = self.payments.lock().unwrap();
        let payment = payments
            .iter_mut()
            .find(|p| p.id == id)
            .expect("payment present in mock");
        payment.status = PaymentStatus::AwaitingTransfer;
        payment.proof_ref = None;
        payment.rejection_reason = Some(reason.to_owned());
        Ok(())
    }

    async fn apply_central_approval(
        &self,
        approval: &CentralApproval,
    ) -> Result<String, MembershipServiceError> {
        if self.take_conflict() {
            return Err(MembershipServiceError::Conflict);
        }
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let code = identifier::institution_code(approval.year, &approval.region_code, seq);
        let mut payments = self.payments.lock().unwrap();
        let payment = payments
            .iter_mut()
            .find(|p| p.id == approval.payment_id)
            .expect("payment present in mock");
        payment.status = PaymentStatus::Verified;
        payment.verified_by = Some(approval.reviewer_id);
        payment.verified_at = Some(approval.reviewed_at);
        Ok(code)
    }
}

// ── MockOtpStore ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockOtpStore {
    pub challenges: Arc<Mutex<Vec<OtpChallenge>>>,
}

impl MockOtpStore {
    pub fn new(challenges: Vec<OtpChallenge>) -> Self {
        Self {
            challenges: Arc::new(Mutex::new(challenges)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn challenges_handle(&self) -> Arc<Mutex<Vec<OtpChallenge>>> {
        Arc::clone(&self.challenges)
    }
}

impl OtpStore for MockOtpStore {
    async fn count_issued_since(
        &self,
        phone: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, MembershipServiceError> {
        Ok(self
            .challenges
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.phone == phone && c.created_at >= since)
            .count() as u64)
    }

    async fn create_superseding(
        &self,
        challenge: &OtpChallenge,
    ) -> Result<(), MembershipServiceError> {
        let mut challenges = self.challenges.lock().unwrap();
        let now = Utc::now();
        for c in challenges
            .iter_mut()
            .filter(|c| c.phone == challenge.phone && c.consumed_at.is_none())
        {
            c.consumed_at = Some(now);
        }
        challenges.push(challenge.clone());
        Ok(())
    }

    async fn find_active(
        &self,
        phone: &str,
        claim_id: Option<Uuid>,
    ) -> Result<Option<OtpChallenge>, MembershipServiceError> {
        Ok(self
            .challenges
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.phone == phone && c.is_active())
            .filter(|c| claim_id.is_none() || c.claim_id == claim_id)
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn record_attempt(&self, id: Uuid, attempts: i32) -> Result<(), MembershipServiceError> {
        let mut challenges = self.challenges.lock().unwrap();
        if let Some(c) = challenges.iter_mut().find(|c| c.id == id) {
            c.attempts = attempts;
        }
        Ok(())
    }

    async fn mark_verified_and_requeue(
        &self,
        id: Uuid,
        _claim_id: Option<Uuid>,
    ) -> Result<(), MembershipServiceError> {
        let mut challenges = self.challenges.lock().unwrap();
        if let Some(c) = challenges.iter_mut().find(|c| c.id == id) {
            c.verified_at = Some(Utc::now());
            c.consumed_at = Some(Utc::now());
        }
        Ok(())
    }
}

// ── MockCrewStore ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockCrewStore {
    pub members: Arc<Mutex<Vec<CrewMember>>>,
}

impl MockCrewStore {
    pub fn empty() -> Self {
        Self {
            members: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn members_handle(&self) -> Arc<Mutex<Vec<CrewMember>>> {
        Arc::clone(&self.members)
    }
}

impl CrewStore for MockCrewStore {
    async fn create_with_seq(
        &self,
        draft: &CrewDraft,
    ) -> Result<CrewMember, MembershipServiceError> {
        let mut members = self.members.lock().unwrap();
        let seq = members
            .iter()
            .filter(|m| m.profile_id == draft.profile_id)
            .count() as i32
            + 1;
        let member = CrewMember {
            id: draft.id,
            profile_id: draft.profile_id,
            name: draft.name.clone(),
            job_title_id: draft.job_title_id,
            seq,
            personnel_code: identifier::personnel_code(
                &draft.role_code,
                draft.institution_code.as_deref(),
                seq,
            ),
            created_at: draft.created_at,
        };
        members.push(member.clone());
        Ok(member)
    }
}

// ── MockJobTitleStore ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockJobTitleStore {
    pub titles: Vec<JobTitle>,
}

impl MockJobTitleStore {
    pub fn new(titles: Vec<JobTitle>) -> Self {
        Self { titles }
    }
}

impl JobTitleStore for MockJobTitleStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobTitle>, MembershipServiceError> {
        Ok(self.titles.iter().find(|t| t.id == id).cloned())
    }
}

// ── MockSettingsStore ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockSettingsStore {
    pub entries: Vec<(String, String)>,
}

impl MockSettingsStore {
    pub fn empty() -> Self {
        Self { entries: vec![] }
    }

    pub fn with(key: &str, value: &str) -> Self {
        Self {
            entries: vec![(key.to_owned(), value.to_owned())],
        }
    }

    pub fn and(mut self, key: &str, value: &str) -> Self {
        self.entries.push((key.to_owned(), value.to_owned()));
        self
    }
}

impl SettingsStore for MockSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, MembershipServiceError> {
        Ok(self
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }
}

// ── MockDocumentStore ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockDocumentStore {
    pub blobs: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockDocumentStore {
    pub fn empty() -> Self {
        Self {
            blobs: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn blobs_handle(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.blobs)
    }
}

impl DocumentStore for MockDocumentStore {
    async fn store(&self, bytes: &[u8]) -> Result<String, MembershipServiceError> {
        let mut blobs = self.blobs.lock().unwrap();
        blobs.push(bytes.to_vec());
        Ok(format!("doc-{}", blobs.len()))
    }
}

// ── MockNotifier ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockNotifier {
    pub messages: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn messages_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.messages)
    }
}

impl NotificationSender for MockNotifier {
    fn send(&self, phone: &str, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((phone.to_owned(), message.to_owned()));
    }
}
