use sea_orm::entity::prelude::*;

/// Personnel registered under an institution profile. `personnel_code` is
/// null until the owning institution holds an issued institution code.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "crew_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub profile_id: Uuid,
    pub name: String,
    pub job_title_id: Uuid,
    pub seq: i32,
    pub personnel_code: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ProfileId",
        to = "super::profiles::Column::Id"
    )]
    Profile,
    #[sea_orm(
        belongs_to = "super::job_titles::Entity",
        from = "Column::JobTitleId",
        to = "super::job_titles::Column::Id"
    )]
    JobTitle,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::job_titles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobTitle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
