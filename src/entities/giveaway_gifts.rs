use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 奖品条目实体
/// 一行是一个整体授予的奖励 token; amount 是该奖励内的数量
/// (如 "5x key"), 不会拆成多个名额
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "giveaway_gifts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub giveaway_id: i64,
    pub gift_name: String,
    pub amount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
