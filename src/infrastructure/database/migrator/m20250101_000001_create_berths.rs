//! Create berths table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Berths::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Berths::Number)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Berths::Kind).string_len(10).not_null())
                    .col(ColumnDef::new(Berths::State).string_len(300).not_null())
                    .col(
                        ColumnDef::new(Berths::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Berths::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Berths::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Berths {
    Table,
    Number,
    Kind,
    State,
    CreatedAt,
    UpdatedAt,
}
