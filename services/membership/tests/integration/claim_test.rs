use chrono::{Datelike, Utc};
use uuid::Uuid;

use registry_membership::domain::status::{
    AccountStatus, ClaimStatus, PaymentStatus, SubmissionType,
};
use registry_membership::error::MembershipServiceError;
use registry_membership::usecase::claim::{
    ApproveRegionalInput, ApproveRegionalUseCase, QuickApproveInput, QuickApproveUseCase,
    RejectRegionalInput, RejectRegionalUseCase,
};

use crate::helpers::{
    MockClaimStore, MockPaymentStore, MockRegionStore, MockSettingsStore, test_claim,
    test_profile, test_region,
};

#[tokio::test]
async fn regional_approval_transitions_claim_and_creates_payment() {
    let region = test_region("07");
    let profile = test_profile(region.id);
    let claim = test_claim(&profile, ClaimStatus::Pending, SubmissionType::NewInstitution);
    let reviewer = Uuid::new_v4();

    let claims = MockClaimStore::new(vec![claim.clone()]);
    let claims_handle = claims.claims_handle();
    let patches = claims.patches_handle();
    let payments = MockPaymentStore::empty();
    let payments_handle = payments.payments_handle();

    let uc = ApproveRegionalUseCase {
        claims,
        payments,
        settings: MockSettingsStore::empty(),
    };

    let updated = uc
        .execute(ApproveRegionalInput {
            claim_id: claim.id,
            reviewer_id: reviewer,
            reviewer_region: region.id,
        })
        .await
        .unwrap();

    assert_eq!(updated.status, ClaimStatus::RegionalApproved);
    assert_eq!(updated.regional_reviewed_by, Some(reviewer));
    assert_eq!(
        claims_handle.lock().unwrap()[0].status,
        ClaimStatus::RegionalApproved
    );
    // A regular claim does not touch the profile at this stage.
    assert!(patches.lock().unwrap().is_empty());

    let payments = payments_handle.lock().unwrap();
    assert_eq!(payments.len(), 1);
    let payment = &payments[0];
    assert_eq!(payment.claim_id, claim.id);
    assert_eq!(payment.status, PaymentStatus::AwaitingTransfer);
    assert_eq!(payment.base_amount, 50_000);
    assert!((100..=999).contains(&payment.unique_suffix));
    assert_eq!(
        payment.total_amount,
        payment.base_amount + i64::from(payment.unique_suffix)
    );
}

#[tokio::test]
async fn legacy_claim_activates_profile_without_payment() {
    let region = test_region("07");
    let profile = test_profile(region.id);
    let claim = test_claim(&profile, ClaimStatus::Pending, SubmissionType::LegacyClaim);

    let claims = MockClaimStore::new(vec![claim.clone()]);
    let patches = claims.patches_handle();
    let payments = MockPaymentStore::empty();
    let payments_handle = payments.payments_handle();

    let uc = ApproveRegionalUseCase {
        claims,
        payments,
        settings: MockSettingsStore::empty(),
    };

    uc.execute(ApproveRegionalInput {
        claim_id: claim.id,
        reviewer_id: Uuid::new_v4(),
        reviewer_region: region.id,
    })
    .await
    .unwrap();

    assert!(
        payments_handle.lock().unwrap().is_empty(),
        "legacy claims never get a payment"
    );
    let patches = patches.lock().unwrap();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].account_status, AccountStatus::Active);
    assert_eq!(patches[0].payment_status, None);
    assert_eq!(patches[0].institution_code, None);
}

#[tokio::test]
async fn reviewer_from_another_region_is_forbidden() {
    let region = test_region("07");
    let profile = test_profile(region.id);
    let claim = test_claim(&profile, ClaimStatus::Pending, SubmissionType::NewInstitution);

    let claims = MockClaimStore::new(vec![claim.clone()]);
    let claims_handle = claims.claims_handle();

    let uc = ApproveRegionalUseCase {
        claims,
        payments: MockPaymentStore::empty(),
        settings: MockSettingsStore::empty(),
    };

    let result = uc
        .execute(ApproveRegionalInput {
            claim_id: claim.id,
            reviewer_id: Uuid::new_v4(),
            reviewer_region: Uuid::new_v4(),
        })
        .await;

    assert!(matches!(result, Err(MembershipServiceError::Forbidden)));
    assert_eq!(claims_handle.lock().unwrap()[0].status, ClaimStatus::Pending);
}

#[tokio::test]
async fn approving_a_non_pending_claim_conflicts() {
    let region = test_region("07");
    let profile = test_profile(region.id);
    let claim = test_claim(
        &profile,
        ClaimStatus::RegionalApproved,
        SubmissionType::NewInstitution,
    );

    let uc = ApproveRegionalUseCase {
        claims: MockClaimStore::new(vec![claim.clone()]),
        payments: MockPaymentStore::empty(),
        settings: MockSettingsStore::empty(),
    };

    let result = uc
        .execute(ApproveRegionalInput {
            claim_id: claim.id,
            reviewer_id: Uuid::new_v4(),
            reviewer_region: region.id,
        })
        .await;

    assert!(matches!(result, Err(MembershipServiceError::Conflict)));
}

#[tokio::test]
async fn rejection_requires_a_reason() {
    let region = test_region("07");
    let profile = test_profile(region.id);
    let claim = test_claim(&profile, ClaimStatus::Pending, SubmissionType::NewInstitution);

    let uc = RejectRegionalUseCase {
        claims: MockClaimStore::new(vec![claim.clone()]),
    };

    let result = uc
        .execute(RejectRegionalInput {
            claim_id: claim.id,
            reviewer_id: Uuid::new_v4(),
            reviewer_region: region.id,
            reason: "   ".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(MembershipServiceError::MissingData)));
}

#[tokio::test]
async fn rejection_records_note_and_marks_profile_rejected() {
    let region = test_region("07");
    let profile = test_profile(region.id);
    let claim = test_claim(&profile, ClaimStatus::Pending, SubmissionType::NewInstitution);

    let claims = MockClaimStore::new(vec![claim.clone()]);
    let claims_handle = claims.claims_handle();
    let patches = claims.patches_handle();

    let uc = RejectRegionalUseCase { claims };

    let updated = uc
        .execute(RejectRegionalInput {
            claim_id: claim.id,
            reviewer_id: Uuid::new_v4(),
            reviewer_region: region.id,
            reason: "incomplete documents".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(updated.status, ClaimStatus::Rejected);
    assert_eq!(updated.rejection_note.as_deref(), Some("incomplete documents"));
    assert_eq!(claims_handle.lock().unwrap()[0].status, ClaimStatus::Rejected);
    assert_eq!(
        patches.lock().unwrap()[0].account_status,
        AccountStatus::Rejected
    );
}

#[tokio::test]
async fn quick_approval_mints_code_and_activates_profile() {
    let region = test_region("07");
    let profile = test_profile(region.id);
    let claim = test_claim(&profile, ClaimStatus::Pending, SubmissionType::NewInstitution);

    let claims = MockClaimStore::new(vec![claim.clone()]);
    let claims_handle = claims.claims_handle();
    let patches = claims.patches_handle();

    let uc = QuickApproveUseCase {
        claims,
        regions: MockRegionStore::new(vec![region]),
    };

    let out = uc
        .execute(QuickApproveInput {
            claim_id: claim.id,
            reviewer_id: Uuid::new_v4(),
        })
        .await
        .unwrap();

    let yy = Utc::now().year().rem_euclid(100);
    assert_eq!(out.institution_code.len(), 7);
    assert!(out.institution_code.starts_with(&format!("{yy:02}07")));

    let stored = &claims_handle.lock().unwrap()[0];
    assert_eq!(stored.status, ClaimStatus::CentralApproved);
    assert_eq!(stored.institution_code, Some(out.institution_code.clone()));

    let patches = patches.lock().unwrap();
    assert_eq!(patches[0].account_status, AccountStatus::Active);
    assert_eq!(patches[0].institution_code, Some(out.institution_code.clone()));
    // Quick approval reconciles no payment, so the fee status is untouched.
    assert_eq!(patches[0].payment_status, None);
}

#[tokio::test]
async fn quick_approval_retries_code_collisions() {
    let region = test_region("07");
    let profile = test_profile(region.id);
    let claim = test_claim(&profile, ClaimStatus::Pending, SubmissionType::NewInstitution);

    let claims = MockClaimStore::new(vec![claim.clone()]).fail_next_with_conflict(2);

    let uc = QuickApproveUseCase {
        claims,
        regions: MockRegionStore::new(vec![region]),
    };

    uc.execute(QuickApproveInput {
        claim_id: claim.id,
        reviewer_id: Uuid::new_v4(),
    })
    .await
    .expect("two collisions are within the retry budget");
}

#[tokio::test]
async fn quick_approval_surfaces_conflict_after_retry_budget() {
    let region = test_region("07");
    let profile = test_profile(region.id);
    let claim = test_claim(&profile, ClaimStatus::Pending, SubmissionType::NewInstitution);

    let claims = MockClaimStore::new(vec![claim.clone()]).fail_next_with_conflict(3);

    let uc = QuickApproveUseCase {
        claims,
        regions: MockRegionStore::new(vec![region]),
    };

    let result = uc
        .execute(QuickApproveInput {
            claim_id: claim.id,
            reviewer_id: Uuid::new_v4(),
        })
        .await;

    assert!(matches!(result, Err(MembershipServiceError::Conflict)));
}

#[tokio::test]
async fn quick_approval_blocks_on_malformed_region_code() {
    let region = test_region("7A");
    let profile = test_profile(region.id);
    let claim = test_claim(&profile, ClaimStatus::Pending, SubmissionType::NewInstitution);

    let uc = QuickApproveUseCase {
        claims: MockClaimStore::new(vec![claim.clone()]),
        regions: MockRegionStore::new(vec![region]),
    };

    let result = uc
        .execute(QuickApproveInput {
            claim_id: claim.id,
            reviewer_id: Uuid::new_v4(),
        })
        .await;

    assert!(matches!(
        result,
        Err(MembershipServiceError::InvalidRegionCode)
    ));
}
