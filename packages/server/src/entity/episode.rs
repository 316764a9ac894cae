use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "episode")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub number: i32,
    pub title: String,

    #[sea_orm(has_many)]
    pub assignments: HasMany<super::assignment::Entity>,

    #[sea_orm(has_many)]
    pub bangers: HasMany<super::banger::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
