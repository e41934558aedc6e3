use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::InstitutionName).string().not_null())
                    .col(ColumnDef::new(Profiles::CaretakerName).string().not_null())
                    .col(ColumnDef::new(Profiles::RegionId).uuid().not_null())
                    .col(ColumnDef::new(Profiles::City).string().not_null())
                    .col(ColumnDef::new(Profiles::Phone).string())
                    .col(ColumnDef::new(Profiles::Role).small_integer().not_null())
                    .col(ColumnDef::new(Profiles::AccountStatus).string().not_null())
                    .col(ColumnDef::new(Profiles::PaymentStatus).string().not_null())
                    .col(
                        ColumnDef::new(Profiles::InstitutionCode)
                            .string()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Profiles::Table, Profiles::RegionId)
                            .to(Regions::Table, Regions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Profiles::Table)
                    .col(Profiles::RegionId)
                    .name("idx_profiles_region_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    InstitutionName,
    CaretakerName,
    RegionId,
    City,
    Phone,
    Role,
    AccountStatus,
    PaymentStatus,
    InstitutionCode,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Regions {
    Table,
    Id,
}
