//! Profile status projection. The denormalized account-facing fields
//! (`account_status`, `payment_status`, `institution_code`) are derived here
//! for each lifecycle outcome and applied only inside the store transactions.
//! Nothing else in the service writes these fields.

use crate::domain::status::{AccountStatus, FeeStatus};

/// Field update for the owning profile. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePatch {
    pub account_status: AccountStatus,
    pub payment_status: Option<FeeStatus>,
    pub institution_code: Option<String>,
}

/// Payment verified and claim finally approved: account goes active, fee is
/// paid, the issued code lands on the profile.
pub fn on_final_approval(institution_code: String) -> ProfilePatch {
    ProfilePatch {
        account_status: AccountStatus::Active,
        payment_status: Some(FeeStatus::Paid),
        institution_code: Some(institution_code),
    }
}

/// Administrative quick approval: account activates with the issued code;
/// the fee status is left as-is (no payment was reconciled).
pub fn on_quick_approval(institution_code: String) -> ProfilePatch {
    ProfilePatch {
        account_status: AccountStatus::Active,
        payment_status: None,
        institution_code: Some(institution_code),
    }
}

/// Legacy claim cleared regional review: account activates immediately, no
/// payment, no code yet.
pub fn on_legacy_activation() -> ProfilePatch {
    ProfilePatch {
        account_status: AccountStatus::Active,
        payment_status: None,
        institution_code: None,
    }
}

/// Regional rejection: account is rejected; other fields untouched.
pub fn on_regional_rejection() -> ProfilePatch {
    ProfilePatch {
        account_status: AccountStatus::Rejected,
        payment_status: None,
        institution_code: None,
    }
}
