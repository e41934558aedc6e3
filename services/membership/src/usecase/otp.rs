use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{ClaimStore, NotificationSender, OtpStore, ProfileStore};
use crate::domain::status::ClaimStatus;
use crate::domain::types::{
    OTP_CODE_LEN, OTP_ISSUE_LIMIT, OTP_ISSUE_WINDOW_SECS, OTP_MAX_ATTEMPTS, OTP_TTL_SECS,
    OtpChallenge, mask_phone,
};
use crate::error::MembershipServiceError;

/// Uniformly random `OTP_CODE_LEN`-digit code, leading zeros allowed.
fn generate_code() -> String {
    let mut rng = rand::rng();
    let upper = 10u32.pow(OTP_CODE_LEN as u32);
    format!("{:0width$}", rng.random_range(0..upper), width = OTP_CODE_LEN)
}

// ── IssueChallenge ───────────────────────────────────────────────────────────

pub struct IssueChallengeInput {
    pub claim_id: Uuid,
}

#[derive(Debug)]
pub struct IssueChallengeOutput {
    pub challenge_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub masked_phone: String,
    /// Echoed only when the service runs with `OTP_DEBUG_ECHO=true`.
    pub debug_code: Option<String>,
}

pub struct IssueChallengeUseCase<C, P, O, N>
where
    C: ClaimStore,
    P: ProfileStore,
    O: OtpStore,
    N: NotificationSender,
{
    pub claims: C,
    pub profiles: P,
    pub otp: O,
    pub notifier: N,
    pub debug_echo: bool,
}

impl<C, P, O, N> IssueChallengeUseCase<C, P, O, N>
where
    C: ClaimStore,
    P: ProfileStore,
    O: OtpStore,
    N: NotificationSender,
{
    pub async fn execute(
        &self,
        input: IssueChallengeInput,
    ) -> Result<IssueChallengeOutput, MembershipServiceError> {
        let claim = self
            .claims
            .find_by_id(input.claim_id)
            .await?
            .ok_or(MembershipServiceError::ClaimNotFound)?;
        let profile = self
            .profiles
            .find_by_id(claim.profile_id)
            .await?
            .ok_or(MembershipServiceError::ProfileNotFound)?;
        let phone = profile
            .phone
            .ok_or(MembershipServiceError::MissingPhone)?;

        // Sliding window over challenge creation timestamps, not a fixed bucket.
        let window_start = Utc::now() - Duration::seconds(OTP_ISSUE_WINDOW_SECS);
        let issued = self.otp.count_issued_since(&phone, window_start).await?;
        if issued >= OTP_ISSUE_LIMIT {
            return Err(MembershipServiceError::RateLimited);
        }

        let code = generate_code();
        let now = Utc::now();
        let challenge = OtpChallenge {
            id: Uuid::new_v4(),
            phone: phone.clone(),
            code: code.clone(),
            claim_id: Some(claim.id),
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
            attempts: 0,
            consumed_at: None,
            verified_at: None,
            created_at: now,
        };

        // Supersedes all prior unconsumed challenges for the phone.
        self.otp.create_superseding(&challenge).await?;

        self.notifier.send(
            &phone,
            &format!("Your verification code is {code}. It expires in 10 minutes."),
        );

        Ok(IssueChallengeOutput {
            challenge_id: challenge.id,
            expires_at: challenge.expires_at,
            masked_phone: mask_phone(&phone),
            debug_code: self.debug_echo.then_some(code),
        })
    }
}

// ── VerifyChallenge ──────────────────────────────────────────────────────────

pub struct VerifyChallengeInput {
    pub claim_id: Uuid,
    pub code: String,
}

#[derive(Debug)]
pub struct VerifyChallengeOutput {
    pub claim_id: Uuid,
}

pub struct VerifyChallengeUseCase<C, P, O>
where
    C: ClaimStore,
    P: ProfileStore,
    O: OtpStore,
{
    pub claims: C,
    pub profiles: P,
    pub otp: O,
}

impl<C, P, O> VerifyChallengeUseCase<C, P, O>
where
    C: ClaimStore,
    P: ProfileStore,
    O: OtpStore,
{
    pub async fn execute(
        &self,
        input: VerifyChallengeInput,
    ) -> Result<VerifyChallengeOutput, MembershipServiceError> {
        let claim = self
            .claims
            .find_by_id(input.claim_id)
            .await?
            .ok_or(MembershipServiceError::ClaimNotFound)?;
        let profile = self
            .profiles
            .find_by_id(claim.profile_id)
            .await?
            .ok_or(MembershipServiceError::ProfileNotFound)?;
        // Without a phone there can be no challenge; same response as expired
        // so callers cannot distinguish.
        let phone = profile
            .phone
            .ok_or(MembershipServiceError::ChallengeNotFound)?;

        let challenge = self
            .otp
            .find_active(&phone, Some(claim.id))
            .await?
            .ok_or(MembershipServiceError::ChallengeNotFound)?;

        // Attempt cap is checked before the code comparison: a locked
        // challenge rejects even the correct code.
        if challenge.attempts >= OTP_MAX_ATTEMPTS {
            return Err(MembershipServiceError::TooManyAttempts);
        }

        if challenge.code != input.code {
            let attempts = challenge.attempts + 1;
            self.otp.record_attempt(challenge.id, attempts).await?;
            let remaining = (OTP_MAX_ATTEMPTS - attempts).max(0) as u8;
            return Err(MembershipServiceError::WrongCode { remaining });
        }

        if !claim.status.can_transition(ClaimStatus::Pending) {
            return Err(MembershipServiceError::Conflict);
        }

        self.otp
            .mark_verified_and_requeue(challenge.id, challenge.claim_id)
            .await?;

        Ok(VerifyChallengeOutput { claim_id: claim.id })
    }
}
