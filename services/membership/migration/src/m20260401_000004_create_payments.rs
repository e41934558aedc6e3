use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::ProfileId).uuid().not_null())
                    .col(
                        ColumnDef::new(Payments::ClaimId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Payments::BaseAmount).big_integer().not_null())
                    .col(ColumnDef::new(Payments::UniqueSuffix).integer().not_null())
                    .col(
                        ColumnDef::new(Payments::TotalAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::Status).string().not_null())
                    .col(ColumnDef::new(Payments::ProofRef).string())
                    .col(ColumnDef::new(Payments::RejectionReason).text())
                    .col(ColumnDef::new(Payments::VerifiedBy).uuid())
                    .col(ColumnDef::new(Payments::VerifiedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::ClaimId)
                            .to(Claims::Table, Claims::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Payments::Table)
                    .col(Payments::ProfileId)
                    .name("idx_payments_profile_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    ProfileId,
    ClaimId,
    BaseAmount,
    UniqueSuffix,
    TotalAmount,
    Status,
    ProofRef,
    RejectionReason,
    VerifiedBy,
    VerifiedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
}

#[derive(Iden)]
enum Claims {
    Table,
    Id,
}
