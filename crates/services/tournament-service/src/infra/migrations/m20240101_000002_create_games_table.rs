//! Migration: Create games table referencing tournaments.

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
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Games::TournamentId).integer().not_null())
                    .col(
                        ColumnDef::new(Games::Title)
                            .string_len(MAX_TITLE_LENGTH as u32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Games::Time).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_tournament_id")
                            .from(Games::Table, Games::TournamentId)
                            .to(Tournaments::Table, Tournaments::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Games are almost always read per tournament
        manager
            .create_index(
                Index::create()
                    .name("idx_games_tournament_id")
                    .table(Games::Table)
                    .col(Games::TournamentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_games_tournament_id")
                    .table(Games::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Games {
    Table,
    Id,
    TournamentId,
    Title,
    Time,
}

#[derive(Iden)]
enum Tournaments {
    Table,
    Id,
}
