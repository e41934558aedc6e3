use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OtpChallenges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OtpChallenges::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OtpChallenges::Phone).string().not_null())
                    .col(ColumnDef::new(OtpChallenges::Code).string().not_null())
                    .col(ColumnDef::new(OtpChallenges::ClaimId).uuid())
                    .col(
                        ColumnDef::new(OtpChallenges::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OtpChallenges::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(OtpChallenges::ConsumedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(OtpChallenges::VerifiedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(OtpChallenges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(OtpChallenges::Table, OtpChallenges::ClaimId)
                            .to(Claims::Table, Claims::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Issue rate-limiting counts recent rows per phone.
        manager
            .create_index(
                Index::create()
                    .table(OtpChallenges::Table)
                    .col(OtpChallenges::Phone)
                    .col(OtpChallenges::CreatedAt)
                    .name("idx_otp_challenges_phone_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OtpChallenges::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OtpChallenges {
    Table,
    Id,
    Phone,
    Code,
    ClaimId,
    ExpiresAt,
    Attempts,
    ConsumedAt,
    VerifiedAt,
    CreatedAt,
}

#[derive(Iden)]
enum Claims {
    Table,
    Id,
}
