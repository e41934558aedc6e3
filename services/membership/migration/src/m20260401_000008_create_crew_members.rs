use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CrewMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CrewMembers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CrewMembers::ProfileId).uuid().not_null())
                    .col(ColumnDef::new(CrewMembers::Name).string().not_null())
                    .col(ColumnDef::new(CrewMembers::JobTitleId).uuid().not_null())
                    .col(ColumnDef::new(CrewMembers::Seq).integer().not_null())
                    .col(ColumnDef::new(CrewMembers::PersonnelCode).string())
                    .col(
                        ColumnDef::new(CrewMembers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CrewMembers::Table, CrewMembers::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CrewMembers::Table, CrewMembers::JobTitleId)
                            .to(JobTitles::Table, JobTitles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(CrewMembers::Table)
                    .col(CrewMembers::ProfileId)
                    .name("idx_crew_members_profile_id")
                    .to_owned(),
            )
            .await?;

        // One seq per profile; the roster transaction assigns seq = count + 1.
        manager
            .create_index(
                Index::create()
                    .table(CrewMembers::Table)
                    .col(CrewMembers::ProfileId)
                    .col(CrewMembers::Seq)
                    .unique()
                    .name("idx_crew_members_profile_id_seq")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CrewMembers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CrewMembers {
    Table,
    Id,
    ProfileId,
    Name,
    JobTitleId,
    Seq,
    PersonnelCode,
    CreatedAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
}

#[derive(Iden)]
enum JobTitles {
    Table,
    Id,
}
