use sea_orm::entity::prelude::*;

/// Applicant/institution account profile. The denormalized status fields
/// (`account_status`, `payment_status`, `institution_code`) are written only
/// by the claim lifecycle transactions.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub institution_name: String,
    pub caretaker_name: String,
    pub region_id: Uuid,
    pub city: String,
    pub phone: Option<String>,
    pub role: i16,
    pub account_status: String,
    pub payment_status: String,
    #[sea_orm(unique)]
    pub institution_code: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::claims::Entity")]
    Claims,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
    #[sea_orm(has_many = "super::crew_members::Entity")]
    CrewMembers,
    #[sea_orm(
        belongs_to = "super::regions::Entity",
        from = "Column::RegionId",
        to = "super::regions::Column::Id"
    )]
    Region,
}

impl Related<super::claims::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Claims.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::crew_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CrewMembers.def()
    }
}

impl Related<super::regions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Region.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
