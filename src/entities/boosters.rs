use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 加成器类型, 决定收益归属与涨价曲线
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum BoosterType {
    /// 提升每条消息收入
    #[sea_orm(string_value = "message")]
    Message,
    /// 提升每分钟被动收入
    #[sea_orm(string_value = "minute")]
    Minute,
}

impl BoosterType {
    /// 第 (owned+1) 件的价格: 从 base_price 起步, 每持有一件,
    /// 下一次涨价的增量本身也在增长 (message +10/件, minute +25/件)
    pub fn price_after_owned(&self, base_price: i64, owned: i64) -> i64 {
        let step = match self {
            BoosterType::Message => 10,
            BoosterType::Minute => 25,
        };
        let mut price = base_price;
        let mut increment = 20;
        for _ in 0..owned {
            price += increment;
            increment += step;
        }
        price
    }
}

/// 加成器目录实体, 启动时按固定 id 播种
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "boosters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// 名称 (唯一)
    pub booster_name: String,
    pub booster_type: BoosterType,
    /// 每件提供的加成 (cents)
    pub bonus_amount: i64,
    /// 起步价 (cents)
    pub base_price: i64,
}

impl Model {
    /// 当前买家已持有 owned 件时的售价
    pub fn price_for(&self, owned: i64) -> i64 {
        self.booster_type.price_after_owned(self.base_price, owned)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
