use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{CrewDraft, CrewStore, JobTitleStore, ProfileStore};
use crate::domain::types::CrewMember;
use crate::error::MembershipServiceError;

// ── RegisterCrew ─────────────────────────────────────────────────────────────

pub struct RegisterCrewInput {
    pub profile_id: Uuid,
    pub name: String,
    pub job_title_id: Uuid,
}

pub struct RegisterCrewUseCase<P, J, Cr>
where
    P: ProfileStore,
    J: JobTitleStore,
    Cr: CrewStore,
{
    pub profiles: P,
    pub job_titles: J,
    pub crew: Cr,
}

impl<P, J, Cr> RegisterCrewUseCase<P, J, Cr>
where
    P: ProfileStore,
    J: JobTitleStore,
    Cr: CrewStore,
{
    pub async fn execute(
        &self,
        input: RegisterCrewInput,
    ) -> Result<CrewMember, MembershipServiceError> {
        if input.name.trim().is_empty() {
            return Err(MembershipServiceError::MissingData);
        }
        let profile = self
            .profiles
            .find_by_id(input.profile_id)
            .await?
            .ok_or(MembershipServiceError::ProfileNotFound)?;
        let job_title = self
            .job_titles
            .find_by_id(input.job_title_id)
            .await?
            .ok_or(MembershipServiceError::JobTitleNotFound)?;

        // Registration is never denied for a missing institution code; the
        // personnel code is simply withheld until the code is issued.
        let draft = CrewDraft {
            id: Uuid::now_v7(),
            profile_id: profile.id,
            name: input.name,
            job_title_id: job_title.id,
            role_code: job_title.code,
            institution_code: profile.institution_code,
            created_at: Utc::now(),
        };
        self.crew.create_with_seq(&draft).await
    }
}
