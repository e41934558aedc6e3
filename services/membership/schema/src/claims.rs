use sea_orm::entity::prelude::*;

/// Membership claim. One active claim per profile; rows are never deleted,
/// only status-transitioned.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "claims")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub profile_id: Uuid,
    pub submission_type: String,
    pub status: String,
    pub region_id: Uuid,
    pub manager_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub institution_code: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_note: Option<String>,
    pub regional_reviewed_by: Option<Uuid>,
    pub regional_reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub final_reviewed_by: Option<Uuid>,
    pub final_reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
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
        belongs_to = "super::regions::Entity",
        from = "Column::RegionId",
        to = "super::regions::Column::Id"
    )]
    Region,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::regions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Region.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
