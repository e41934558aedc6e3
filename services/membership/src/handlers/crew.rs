use axum::{Json, extract::Path, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MembershipServiceError;
use crate::handlers::identity::{IdentityHeaders, ROLE_CENTRAL_ADMIN};
use crate::state::AppState;
use crate::usecase::crew::{RegisterCrewInput, RegisterCrewUseCase};

// ── POST /profiles/{id}/crew ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterCrewRequest {
    pub name: String,
    pub job_title_id: Uuid,
}

#[derive(Serialize)]
pub struct CrewResponse {
    pub id: String,
    pub name: String,
    pub seq: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personnel_code: Option<String>,
}

pub async fn register_crew(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    Json(body): Json<RegisterCrewRequest>,
) -> Result<(StatusCode, Json<CrewResponse>), MembershipServiceError> {
    if identity.user_id != profile_id && identity.user_role < ROLE_CENTRAL_ADMIN {
        return Err(MembershipServiceError::Forbidden);
    }
    let usecase = RegisterCrewUseCase {
        profiles: state.profile_store(),
        job_titles: state.job_title_store(),
        crew: state.crew_store(),
    };
    let member = usecase
        .execute(RegisterCrewInput {
            profile_id,
            name: body.name,
            job_title_id: body.job_title_id,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CrewResponse {
            id: member.id.to_string(),
            name: member.name,
            seq: member.seq,
            personnel_code: member.personnel_code,
        }),
    ))
}
