//! Tournament database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Tournament;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tournaments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Unique; doubles as the seed marker constraint
    #[sea_orm(unique)]
    pub title: String,
    pub start_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game::Entity")]
    Game,
}

impl Related<super::game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity (games are loaded separately)
impl From<Model> for Tournament {
    fn from(model: Model) -> Self {
        Tournament {
            id: model.id,
            title: model.title,
            start_date: model.start_date,
            games: Vec::new(),
        }
    }
}
