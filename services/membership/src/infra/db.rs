use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionError, TransactionTrait,
};
use uuid::Uuid;

use membership_schema::{
    claims, crew_members, job_titles, otp_challenges, payments, profiles, region_sequences,
    regions,
};

use crate::domain::identifier;
use crate::domain::projection::{self, ProfilePatch};
use crate::domain::repository::{
    CentralApproval, ClaimStore, CrewDraft, CrewStore, JobTitleStore, OtpStore, PaymentStore,
    ProfileStore, QuickApproval, RegionStore, RegionalApproval, RegionalRejection,
};
use crate::domain::status::{AccountStatus, ClaimStatus, FeeStatus, PaymentStatus, SubmissionType};
use crate::domain::types::{Claim, CrewMember, JobTitle, OtpChallenge, Payment, Profile, Region};
use crate::error::MembershipServiceError;

/// Unique-constraint violations surface as `Conflict` (the bounded-retry
/// path); everything else is internal.
fn map_txn_err(err: TransactionError<DbErr>, context: &'static str) -> MembershipServiceError {
    let db_err = match err {
        TransactionError::Connection(e) => e,
        TransactionError::Transaction(e) => e,
    };
    if matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return MembershipServiceError::Conflict;
    }
    MembershipServiceError::Internal(anyhow::Error::new(db_err).context(context))
}

fn unknown_status(entity: &'static str, value: &str) -> MembershipServiceError {
    MembershipServiceError::Internal(anyhow::anyhow!(
        "unknown {entity} status in storage: {value:?}"
    ))
}

/// Profile patch application, shared by every lifecycle transaction. This is
/// the only writer of the denormalized profile fields.
async fn apply_profile_patch(
    txn: &DatabaseTransaction,
    profile_id: Uuid,
    patch: &ProfilePatch,
    now: DateTime<Utc>,
) -> Result<(), DbErr> {
    let mut model = profiles::ActiveModel {
        id: Set(profile_id),
        account_status: Set(patch.account_status.as_str().to_owned()),
        updated_at: Set(now),
        ..Default::default()
    };
    if let Some(fee) = patch.payment_status {
        model.payment_status = Set(fee.as_str().to_owned());
    }
    if let Some(ref code) = patch.institution_code {
        model.institution_code = Set(Some(code.clone()));
    }
    model.update(txn).await?;
    Ok(())
}

// ── Profile store ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileStore {
    pub db: DatabaseConnection,
}

impl ProfileStore for DbProfileStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, MembershipServiceError> {
        let model = profiles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find profile by id")?;
        model.map(profile_from_model).transpose()
    }
}

fn profile_from_model(model: profiles::Model) -> Result<Profile, MembershipServiceError> {
    Ok(Profile {
        id: model.id,
        institution_name: model.institution_name,
        caretaker_name: model.caretaker_name,
        region_id: model.region_id,
        city: model.city,
        phone: model.phone,
        role: model.role as u8,
        account_status: AccountStatus::parse(&model.account_status)
            .ok_or_else(|| unknown_status("account", &model.account_status))?,
        payment_status: FeeStatus::parse(&model.payment_status)
            .ok_or_else(|| unknown_status("fee", &model.payment_status))?,
        institution_code: model.institution_code,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Region store ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRegionStore {
    pub db: DatabaseConnection,
}

impl RegionStore for DbRegionStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Region>, MembershipServiceError> {
        let model = regions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find region by id")?;
        Ok(model.map(|m| Region {
            id: m.id,
            name: m.name,
            code: m.code,
        }))
    }
}

// ── Claim store ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbClaimStore {
    pub db: DatabaseConnection,
}

impl ClaimStore for DbClaimStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Claim>, MembershipServiceError> {
        let model = claims::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find claim by id")?;
        model.map(claim_from_model).transpose()
    }

    async fn apply_regional_approval(
        &self,
        decision: &RegionalApproval,
    ) -> Result<(), MembershipServiceError> {
        let decision = decision.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    claims::ActiveModel {
                        id: Set(decision.claim_id),
                        status: Set(ClaimStatus::RegionalApproved.as_str().to_owned()),
                        rejection_note: Set(None),
                        regional_reviewed_by: Set(Some(decision.reviewer_id)),
                        regional_reviewed_at: Set(Some(decision.reviewed_at)),
                        updated_at: Set(decision.reviewed_at),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    if let Some(ref patch) = decision.profile_patch {
                        apply_profile_patch(txn, decision.profile_id, patch, decision.reviewed_at)
                            .await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(|e| map_txn_err(e, "apply regional approval"))
    }

    async fn apply_regional_rejection(
        &self,
        decision: &RegionalRejection,
    ) -> Result<(), MembershipServiceError> {
        let decision = decision.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    claims::ActiveModel {
                        id: Set(decision.claim_id),
                        status: Set(ClaimStatus::Rejected.as_str().to_owned()),
                        rejection_note: Set(Some(decision.reason.clone())),
                        regional_reviewed_by: Set(Some(decision.reviewer_id)),
                        regional_reviewed_at: Set(Some(decision.reviewed_at)),
                        updated_at: Set(decision.reviewed_at),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    apply_profile_patch(
                        txn,
                        decision.profile_id,
                        &decision.profile_patch,
                        decision.reviewed_at,
                    )
                    .await?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| map_txn_err(e, "apply regional rejection"))
    }

    async fn apply_quick_approval(
        &self,
        approval: &QuickApproval,
    ) -> Result<(), MembershipServiceError> {
        let approval = approval.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    claims::ActiveModel {
                        id: Set(approval.claim_id),
                        status: Set(ClaimStatus::CentralApproved.as_str().to_owned()),
                        institution_code: Set(Some(approval.institution_code.clone())),
                        final_reviewed_by: Set(Some(approval.reviewer_id)),
                        final_reviewed_at: Set(Some(approval.reviewed_at)),
                        updated_at: Set(approval.reviewed_at),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    apply_profile_patch(
                        txn,
                        approval.profile_id,
                        &approval.profile_patch,
                        approval.reviewed_at,
                    )
                    .await?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| map_txn_err(e, "apply quick approval"))
    }
}

fn claim_from_model(model: claims::Model) -> Result<Claim, MembershipServiceError> {
    Ok(Claim {
        id: model.id,
        profile_id: model.profile_id,
        submission_type: SubmissionType::parse(&model.submission_type)
            .ok_or_else(|| unknown_status("submission", &model.submission_type))?,
        status: ClaimStatus::parse(&model.status)
            .ok_or_else(|| unknown_status("claim", &model.status))?,
        region_id: model.region_id,
        manager_name: model.manager_name,
        notes: model.notes,
        institution_code: model.institution_code,
        rejection_note: model.rejection_note,
        regional_reviewed_by: model.regional_reviewed_by,
        regional_reviewed_at: model.regional_reviewed_at,
        final_reviewed_by: model.final_reviewed_by,
        final_reviewed_at: model.final_reviewed_at,
        created_at: model.created_at,
    })
}

// ── Payment store ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPaymentStore {
    pub db: DatabaseConnection,
}

impl PaymentStore for DbPaymentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, MembershipServiceError> {
        let model = payments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find payment by id")?;
        model.map(payment_from_model).transpose()
    }

    async fn find_by_claim(
        &self,
        claim_id: Uuid,
    ) -> Result<Option<Payment>, MembershipServiceError> {
        let model = payments::Entity::find()
            .filter(payments::Column::ClaimId.eq(claim_id))
            .one(&self.db)
            .await
            .context("find payment by claim")?;
        model.map(payment_from_model).transpose()
    }

    async fn create(&self, payment: &Payment) -> Result<(), MembershipServiceError> {
        payments::ActiveModel {
            id: Set(payment.id),
            profile_id: Set(payment.profile_id),
            claim_id: Set(payment.claim_id),
            base_amount: Set(payment.base_amount),
            unique_suffix: Set(payment.unique_suffix),
            total_amount: Set(payment.total_amount),
            status: Set(payment.status.as_str().to_owned()),
            proof_ref: Set(payment.proof_ref.clone()),
            rejection_reason: Set(payment.rejection_reason.clone()),
            verified_by: Set(payment.verified_by),
            verified_at: Set(payment.verified_at),
            created_at: Set(payment.created_at),
            updated_at: Set(payment.created_at),
        }
        .insert(&self.db)
        .await
        .context("create payment")?;
        Ok(())
    }

    async fn mark_awaiting_verification(
        &self,
        id: Uuid,
        proof_ref: &str,
    ) -> Result<(), MembershipServiceError> {
        payments::ActiveModel {
            id: Set(id),
            status: Set(PaymentStatus::AwaitingVerification.as_str().to_owned()),
            proof_ref: Set(Some(proof_ref.to_owned())),
            rejection_reason: Set(None),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark payment awaiting verification")?;
        Ok(())
    }

    async fn recycle(&self, id: Uuid, reason: &str) -> Result<(), MembershipServiceError> {
        payments::ActiveModel {
            id: Set(id),
            status: Set(PaymentStatus::AwaitingTransfer.as_str().to_owned()),
            proof_ref: Set(None),
            rejection_reason: Set(Some(reason.to_owned())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("recycle rejected payment")?;
        Ok(())
    }

    async fn apply_central_approval(
        &self,
        approval: &CentralApproval,
    ) -> Result<String, MembershipServiceError> {
        let approval = approval.clone();
        self.db
            .transaction::<_, String, DbErr>(|txn| {
                Box::pin(async move {
                    // The counter row is read with SELECT ... FOR UPDATE, so
                    // concurrent approvals in one region queue on the row lock
                    // and each reads a fresh value; a plain read would let two
                    // transactions take the same sequence under READ COMMITTED.
                    // The first approval for a region creates the counter; a
                    // racing create hits the primary key and the caller retries.
                    let seq = match region_sequences::Entity::find_by_id(approval.region_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                    {
                        Some(row) => {
                            region_sequences::ActiveModel {
                                region_id: Set(approval.region_id),
                                next_seq: Set(row.next_seq + 1),
                            }
                            .update(txn)
                            .await?;
                            row.next_seq
                        }
                        None => {
                            region_sequences::ActiveModel {
                                region_id: Set(approval.region_id),
                                next_seq: Set(2),
                            }
                            .insert(txn)
                            .await?;
                            1
                        }
                    };

                    let code = identifier::institution_code(
                        approval.year,
                        &approval.region_code,
                        seq as u32,
                    );

                    payments::ActiveModel {
                        id: Set(approval.payment_id),
                        status: Set(PaymentStatus::Verified.as_str().to_owned()),
                        verified_by: Set(Some(approval.reviewer_id)),
                        verified_at: Set(Some(approval.reviewed_at)),
                        updated_at: Set(approval.reviewed_at),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    claims::ActiveModel {
                        id: Set(approval.claim_id),
                        status: Set(ClaimStatus::Approved.as_str().to_owned()),
                        institution_code: Set(Some(code.clone())),
                        final_reviewed_by: Set(Some(approval.reviewer_id)),
                        final_reviewed_at: Set(Some(approval.reviewed_at)),
                        updated_at: Set(approval.reviewed_at),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    apply_profile_patch(
                        txn,
                        approval.profile_id,
                        &projection::on_final_approval(code.clone()),
                        approval.reviewed_at,
                    )
                    .await?;

                    Ok(code)
                })
            })
            .await
            .map_err(|e| map_txn_err(e, "apply central approval"))
    }
}

fn payment_from_model(model: payments::Model) -> Result<Payment, MembershipServiceError> {
    Ok(Payment {
        id: model.id,
        profile_id: model.profile_id,
        claim_id: model.claim_id,
        base_amount: model.base_amount,
        unique_suffix: model.unique_suffix,
        total_amount: model.total_amount,
        status: PaymentStatus::parse(&model.status)
            .ok_or_else(|| unknown_status("payment", &model.status))?,
        proof_ref: model.proof_ref,
        rejection_reason: model.rejection_reason,
        verified_by: model.verified_by,
        verified_at: model.verified_at,
        created_at: model.created_at,
    })
}

// ── OTP store ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpStore {
    pub db: DatabaseConnection,
}

impl OtpStore for DbOtpStore {
    async fn count_issued_since(
        &self,
        phone: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, MembershipServiceError> {
        let count = otp_challenges::Entity::find()
            .filter(otp_challenges::Column::Phone.eq(phone))
            .filter(otp_challenges::Column::CreatedAt.gt(since))
            .count(&self.db)
            .await
            .context("count otp challenges in window")?;
        Ok(count)
    }

    async fn create_superseding(
        &self,
        challenge: &OtpChallenge,
    ) -> Result<(), MembershipServiceError> {
        let challenge = challenge.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    otp_challenges::Entity::update_many()
                        .col_expr(
                            otp_challenges::Column::ConsumedAt,
                            sea_orm::sea_query::Expr::value(Some(now)),
                        )
                        .filter(otp_challenges::Column::Phone.eq(challenge.phone.clone()))
                        .filter(otp_challenges::Column::ConsumedAt.is_null())
                        .filter(otp_challenges::Column::VerifiedAt.is_null())
                        .exec(txn)
                        .await?;

                    otp_challenges::ActiveModel {
                        id: Set(challenge.id),
                        phone: Set(challenge.phone.clone()),
                        code: Set(challenge.code.clone()),
                        claim_id: Set(challenge.claim_id),
                        expires_at: Set(challenge.expires_at),
                        attempts: Set(challenge.attempts),
                        consumed_at: Set(None),
                        verified_at: Set(None),
                        created_at: Set(challenge.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| map_txn_err(e, "create superseding otp challenge"))
    }

    async fn find_active(
        &self,
        phone: &str,
        claim_id: Option<Uuid>,
    ) -> Result<Option<OtpChallenge>, MembershipServiceError> {
        let now = Utc::now();
        let mut query = otp_challenges::Entity::find()
            .filter(otp_challenges::Column::Phone.eq(phone))
            .filter(otp_challenges::Column::ConsumedAt.is_null())
            .filter(otp_challenges::Column::VerifiedAt.is_null())
            .filter(otp_challenges::Column::ExpiresAt.gt(now));
        if let Some(claim_id) = claim_id {
            query = query.filter(otp_challenges::Column::ClaimId.eq(claim_id));
        }
        let model = query
            .order_by(otp_challenges::Column::CreatedAt, Order::Desc)
            .one(&self.db)
            .await
            .context("find active otp challenge")?;
        Ok(model.map(challenge_from_model))
    }

    async fn record_attempt(
        &self,
        id: Uuid,
        attempts: i32,
    ) -> Result<(), MembershipServiceError> {
        otp_challenges::ActiveModel {
            id: Set(id),
            attempts: Set(attempts),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("record otp attempt")?;
        Ok(())
    }

    async fn mark_verified_and_requeue(
        &self,
        id: Uuid,
        claim_id: Option<Uuid>,
    ) -> Result<(), MembershipServiceError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    otp_challenges::ActiveModel {
                        id: Set(id),
                        verified_at: Set(Some(now)),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    if let Some(claim_id) = claim_id {
                        claims::ActiveModel {
                            id: Set(claim_id),
                            status: Set(ClaimStatus::Pending.as_str().to_owned()),
                            updated_at: Set(now),
                            ..Default::default()
                        }
                        .update(txn)
                        .await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(|e| map_txn_err(e, "mark otp verified"))
    }
}

fn challenge_from_model(model: otp_challenges::Model) -> OtpChallenge {
    OtpChallenge {
        id: model.id,
        phone: model.phone,
        code: model.code,
        claim_id: model.claim_id,
        expires_at: model.expires_at,
        attempts: model.attempts,
        consumed_at: model.consumed_at,
        verified_at: model.verified_at,
        created_at: model.created_at,
    }
}

// ── Crew store ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCrewStore {
    pub db: DatabaseConnection,
}

impl CrewStore for DbCrewStore {
    async fn create_with_seq(
        &self,
        draft: &CrewDraft,
    ) -> Result<CrewMember, MembershipServiceError> {
        let draft = draft.clone();
        self.db
            .transaction::<_, CrewMember, DbErr>(|txn| {
                Box::pin(async move {
                    let existing = crew_members::Entity::find()
                        .filter(crew_members::Column::ProfileId.eq(draft.profile_id))
                        .count(txn)
                        .await?;
                    let seq = existing as i32 + 1;
                    let personnel_code = identifier::personnel_code(
                        &draft.role_code,
                        draft.institution_code.as_deref(),
                        seq,
                    );

                    crew_members::ActiveModel {
                        id: Set(draft.id),
                        profile_id: Set(draft.profile_id),
                        name: Set(draft.name.clone()),
                        job_title_id: Set(draft.job_title_id),
                        seq: Set(seq),
                        personnel_code: Set(personnel_code.clone()),
                        created_at: Set(draft.created_at),
                    }
                    .insert(txn)
                    .await?;

                    Ok(CrewMember {
                        id: draft.id,
                        profile_id: draft.profile_id,
                        name: draft.name,
                        job_title_id: draft.job_title_id,
                        seq,
                        personnel_code,
                        created_at: draft.created_at,
                    })
                })
            })
            .await
            .map_err(|e| map_txn_err(e, "register crew member"))
    }
}

// ── Job-title store ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbJobTitleStore {
    pub db: DatabaseConnection,
}

impl JobTitleStore for DbJobTitleStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobTitle>, MembershipServiceError> {
        let model = job_titles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find job title by id")?;
        Ok(model.map(|m| JobTitle {
            id: m.id,
            name: m.name,
            code: m.code,
        }))
    }
}
