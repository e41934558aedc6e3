use sea_orm::entity::prelude::*;

/// Job-title registry. `code` is the 2–3 letter prefix used in personnel
/// identifiers. Seeded by migration.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "job_titles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::crew_members::Entity")]
    CrewMembers,
}

impl Related<super::crew_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CrewMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
