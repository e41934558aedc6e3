use sea_orm::entity::prelude::*;

/// One-time verification code bound to a phone number and optionally a claim.
/// Expires after 10 minutes; max 5 verification attempts. Rows are never
/// deleted; superseded challenges get `consumed_at` set (append-only audit).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "otp_challenges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub phone: String,
    pub code: String,
    pub claim_id: Option<Uuid>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub attempts: i32,
    pub consumed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub verified_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::claims::Entity",
        from = "Column::ClaimId",
        to = "super::claims::Column::Id"
    )]
    Claim,
}

impl Related<super::claims::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Claim.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
