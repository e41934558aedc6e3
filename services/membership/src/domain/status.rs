//! Closed status enums with an explicit transition table. Every status write
//! goes through `can_transition`; call sites never re-derive validity from
//! string comparisons.

/// Claim lifecycle status.
///
/// `Approved` and `CentralApproved` are both terminal-approved and grant the
/// same access level; they differ in provenance. `Approved` is minted by the
/// payment-verification path, `CentralApproved` by the administrative
/// quick-approve path. Reporting keeps them distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimStatus {
    Pending,
    RegionalApproved,
    Approved,
    CentralApproved,
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::RegionalApproved => "regional_approved",
            Self::Approved => "approved",
            Self::CentralApproved => "central_approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "regional_approved" => Some(Self::RegionalApproved),
            "approved" => Some(Self::Approved),
            "central_approved" => Some(Self::CentralApproved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Terminal-approved category: access checks test this, never the
    /// individual variants.
    pub fn is_terminal_approved(self) -> bool {
        matches!(self, Self::Approved | Self::CentralApproved)
    }

    /// The claim transition table. Anything not listed here is rejected
    /// with `Conflict` by the dispatching usecase.
    pub fn can_transition(self, next: Self) -> bool {
        use ClaimStatus::*;
        matches!(
            (self, next),
            (Pending, RegionalApproved)
                | (Pending, Rejected)
                | (Pending, CentralApproved)
                | (RegionalApproved, Approved)
                | (RegionalApproved, CentralApproved)
                | (RegionalApproved, Rejected)
                // identity re-confirmation re-queues a rejected claim
                | (Rejected, Pending)
                | (Pending, Pending)
        )
    }
}

/// Payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    AwaitingTransfer,
    AwaitingVerification,
    Verified,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingTransfer => "awaiting_transfer",
            Self::AwaitingVerification => "awaiting_verification",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "awaiting_transfer" => Some(Self::AwaitingTransfer),
            "awaiting_verification" => Some(Self::AwaitingVerification),
            "verified" => Some(Self::Verified),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn can_transition(self, next: Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, next),
            (AwaitingTransfer, AwaitingVerification)
                | (AwaitingVerification, Verified)
                // rejection recycles the row back to awaiting_transfer
                | (AwaitingVerification, AwaitingTransfer)
        )
    }
}

/// Account status on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Pending,
    Active,
    Rejected,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Denormalized fee status on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeStatus {
    Paid,
    Unpaid,
}

impl FeeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paid" => Some(Self::Paid),
            "unpaid" => Some(Self::Unpaid),
            _ => None,
        }
    }
}

/// How the claim was submitted. Legacy claims skip the payment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionType {
    NewInstitution,
    LegacyClaim,
}

impl SubmissionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewInstitution => "new_institution",
            Self::LegacyClaim => "legacy_claim",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new_institution" => Some(Self::NewInstitution),
            "legacy_claim" => Some(Self::LegacyClaim),
            _ => None,
        }
    }
}
