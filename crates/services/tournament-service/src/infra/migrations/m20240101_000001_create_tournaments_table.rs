//! Migration: Create tournaments table.

use sea_orm_migration::prelude::*;

use domain::MAX_TITLE_LENGTH;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tournaments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tournaments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tournaments::Title)
                            .string_len(MAX_TITLE_LENGTH as u32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tournaments::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique titles turn a racing second seed into a rejected insert
        manager
            .create_index(
                Index::create()
                    .name("idx_tournaments_title")
                    .table(Tournaments::Table)
                    .col(Tournaments::Title)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_tournaments_title")
                    .table(Tournaments::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Tournaments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tournaments {
    Table,
    Id,
    Title,
    StartDate,
}
