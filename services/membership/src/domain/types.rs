use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::status::{
    AccountStatus, ClaimStatus, FeeStatus, PaymentStatus, SubmissionType,
};

/// Applicant/institution account profile.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub institution_name: String,
    pub caretaker_name: String,
    pub region_id: Uuid,
    pub city: String,
    pub phone: Option<String>,
    pub role: u8,
    pub account_status: AccountStatus,
    pub payment_status: FeeStatus,
    pub institution_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Membership claim.
#[derive(Debug, Clone)]
pub struct Claim {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub submission_type: SubmissionType,
    pub status: ClaimStatus,
    pub region_id: Uuid,
    pub manager_name: String,
    pub notes: Option<String>,
    pub institution_code: Option<String>,
    pub rejection_note: Option<String>,
    pub regional_reviewed_by: Option<Uuid>,
    pub regional_reviewed_at: Option<DateTime<Utc>>,
    pub final_reviewed_by: Option<Uuid>,
    pub final_reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Membership fee payment with unique-amount suffix for manual transfer
/// reconciliation.
#[derive(Debug, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub claim_id: Uuid,
    pub base_amount: i64,
    pub unique_suffix: i32,
    pub total_amount: i64,
    pub status: PaymentStatus,
    pub proof_ref: Option<String>,
    pub rejection_reason: Option<String>,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One-time verification challenge bound to a phone number.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    pub id: Uuid,
    pub phone: String,
    pub code: String,
    pub claim_id: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub consumed_at: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OtpChallenge {
    /// A challenge is active while it is unconsumed, unverified and unexpired.
    pub fn is_active(&self) -> bool {
        self.consumed_at.is_none() && self.verified_at.is_none() && self.expires_at > Utc::now()
    }
}

/// Administrative region.
#[derive(Debug, Clone)]
pub struct Region {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

/// Personnel registered under an institution.
#[derive(Debug, Clone)]
pub struct CrewMember {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub name: String,
    pub job_title_id: Uuid,
    pub seq: i32,
    pub personnel_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Job-title registry entry; `code` prefixes personnel identifiers.
#[derive(Debug, Clone)]
pub struct JobTitle {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

/// OTP code length in digits (leading zeros allowed).
pub const OTP_CODE_LEN: usize = 6;

/// OTP challenge time-to-live in seconds.
pub const OTP_TTL_SECS: i64 = 600;

/// Maximum verification attempts per challenge.
pub const OTP_MAX_ATTEMPTS: i32 = 5;

/// Maximum challenges issued per phone within the sliding window.
pub const OTP_ISSUE_LIMIT: u64 = 3;

/// Sliding rate-limit window in seconds.
pub const OTP_ISSUE_WINDOW_SECS: i64 = 3600;

/// Fallback base fee for new-institution claims (settings key
/// `pricing.new_institution` overrides).
pub const DEFAULT_NEW_INSTITUTION_FEE: i64 = 50_000;

/// Fallback base fee for legacy claims (settings key `pricing.legacy_claim`
/// overrides). Legacy claims skip payment entirely; the price only applies
/// if a deployment opts legacy claims into the fee later.
pub const DEFAULT_LEGACY_CLAIM_FEE: i64 = 25_000;

/// Unique payment suffix range (inclusive).
pub const UNIQUE_SUFFIX_MIN: i32 = 100;
pub const UNIQUE_SUFFIX_MAX: i32 = 999;

/// Bounded retry for the institution-code sequence transaction.
pub const SEQUENCE_RETRY_LIMIT: u32 = 3;

/// Mask a phone number for display: keep the last 4 digits.
pub fn mask_phone(phone: &str) -> String {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    phone
        .chars()
        .scan(0usize, |seen, c| {
            if c.is_ascii_digit() {
                *seen += 1;
                if *seen + 4 <= digits {
                    return Some('*');
                }
            }
            Some(c)
        })
        .collect()
}
