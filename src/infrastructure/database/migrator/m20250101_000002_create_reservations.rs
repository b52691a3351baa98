//! Create reservations table
//!
//! The (berth_number, start_date) index serves the per-berth scans of
//! the conflict engine.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_berths::Berths;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Reservations::BerthNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::ClientName)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::BoatName)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_berth")
                            .from(Reservations::Table, Reservations::BerthNumber)
                            .to(Berths::Table, Berths::Number)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_berth_start")
                    .table(Reservations::Table)
                    .col(Reservations::BerthNumber)
                    .col(Reservations::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_end")
                    .table(Reservations::Table)
                    .col(Reservations::EndDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    BerthNumber,
    ClientName,
    BoatName,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}
