use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 用户等级记录, 首次查询时惰性创建 (0 级 / 0 xp / 需 100 xp)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "user_levels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub level: i32,
    pub xp: i64,
    /// 升到下一级还需要的总 xp
    pub xp_needed: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
