use sea_orm_migration::prelude::*;
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Default roster roles; the code is the prefix of issued personnel identifiers.
const SEED: &[(&str, &str)] = &[
    ("Caretaker", "CT"),
    ("Teacher", "TC"),
    ("Administrator", "ADM"),
    ("Treasurer", "TR"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobTitles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobTitles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(JobTitles::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(JobTitles::Code).string().not_null())
                    .to_owned(),
            )
            .await?;

        for (name, code) in SEED {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(JobTitles::Table)
                        .columns([JobTitles::Id, JobTitles::Name, JobTitles::Code])
                        .values_panic([
                            Uuid::new_v4().into(),
                            (*name).into(),
                            (*code).into(),
                        ])
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobTitles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum JobTitles {
    Table,
    Id,
    Name,
    Code,
}
