use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Membership service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum MembershipServiceError {
    #[error("claim not found")]
    ClaimNotFound,
    #[error("payment not found")]
    PaymentNotFound,
    #[error("profile not found")]
    ProfileNotFound,
    #[error("region not found")]
    RegionNotFound,
    #[error("job title not found")]
    JobTitleNotFound,
    #[error("challenge not found or expired")]
    ChallengeNotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("state conflict")]
    Conflict,
    #[error("too many challenges issued, retry later")]
    RateLimited,
    #[error("too many verification attempts")]
    TooManyAttempts,
    #[error("wrong code, {remaining} attempts remaining")]
    WrongCode { remaining: u8 },
    #[error("profile has no contact phone")]
    MissingPhone,
    #[error("missing data")]
    MissingData,
    #[error("region code is not a two-digit code")]
    InvalidRegionCode,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl MembershipServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClaimNotFound => "CLAIM_NOT_FOUND",
            Self::PaymentNotFound => "PAYMENT_NOT_FOUND",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::RegionNotFound => "REGION_NOT_FOUND",
            Self::JobTitleNotFound => "JOB_TITLE_NOT_FOUND",
            Self::ChallengeNotFound => "CHALLENGE_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::RateLimited => "RATE_LIMITED",
            Self::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            Self::WrongCode { .. } => "WRONG_CODE",
            Self::MissingPhone => "MISSING_PHONE",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidRegionCode => "INVALID_REGION_CODE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for MembershipServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ClaimNotFound
            | Self::PaymentNotFound
            | Self::ProfileNotFound
            | Self::RegionNotFound
            | Self::JobTitleNotFound
            | Self::ChallengeNotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict => StatusCode::CONFLICT,
            Self::RateLimited | Self::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            Self::WrongCode { .. } | Self::MissingPhone | Self::MissingData => {
                StatusCode::BAD_REQUEST
            }
            // Administrative data defect, not a caller error.
            Self::InvalidRegionCode => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only; tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
