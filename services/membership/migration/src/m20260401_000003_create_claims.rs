use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Claims::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Claims::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Claims::ProfileId).uuid().not_null())
                    .col(ColumnDef::new(Claims::SubmissionType).string().not_null())
                    .col(ColumnDef::new(Claims::Status).string().not_null())
                    .col(ColumnDef::new(Claims::RegionId).uuid().not_null())
                    .col(ColumnDef::new(Claims::ManagerName).string().not_null())
                    .col(ColumnDef::new(Claims::Notes).text())
                    .col(ColumnDef::new(Claims::InstitutionCode).string())
                    .col(ColumnDef::new(Claims::RejectionNote).text())
                    .col(ColumnDef::new(Claims::RegionalReviewedBy).uuid())
                    .col(ColumnDef::new(Claims::RegionalReviewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Claims::FinalReviewedBy).uuid())
                    .col(ColumnDef::new(Claims::FinalReviewedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Claims::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Claims::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Claims::Table, Claims::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Claims::Table, Claims::RegionId)
                            .to(Regions::Table, Regions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Claims::Table)
                    .col(Claims::ProfileId)
                    .name("idx_claims_profile_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Claims::Table)
                    .col(Claims::RegionId)
                    .col(Claims::Status)
                    .name("idx_claims_region_id_status")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(institution_code_unique_index())
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Claims::Table).to_owned())
            .await
    }
}

/// Backstop for identifier issuance: a duplicate code fails the writing
/// transaction with a unique violation, which the caller's bounded retry
/// handles. NULLs (codes not yet issued) are not constrained.
fn institution_code_unique_index() -> IndexCreateStatement {
    Index::create()
        .table(Claims::Table)
        .col(Claims::InstitutionCode)
        .name("uq_claims_institution_code")
        .unique()
        .to_owned()
}

#[derive(Iden)]
enum Claims {
    Table,
    Id,
    ProfileId,
    SubmissionType,
    Status,
    RegionId,
    ManagerName,
    Notes,
    InstitutionCode,
    RejectionNote,
    RegionalReviewedBy,
    RegionalReviewedAt,
    FinalReviewedBy,
    FinalReviewedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
}

#[derive(Iden)]
enum Regions {
    Table,
    Id,
}
