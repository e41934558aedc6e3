use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RegionSequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RegionSequences::RegionId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RegionSequences::NextSeq)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RegionSequences::Table, RegionSequences::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RegionSequences::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RegionSequences {
    Table,
    RegionId,
    NextSeq,
}

#[derive(Iden)]
enum Regions {
    Table,
    Id,
}
