use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 抽奖类型
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum GiveawayType {
    /// 金币奖励: 每个名额一份等额金币
    #[sea_orm(string_value = "coins")]
    Coins,
    /// 自由填写的实物/其它奖品
    #[sea_orm(string_value = "else")]
    Else,
}

/// 抽奖活动实体
/// 开奖是破坏性的: 选出赢家后整个活动连同奖品与参与记录一并删除
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "giveaways")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub giveaway_type: GiveawayType,
    pub description: String,
    pub end_time: DateTime<Utc>,
    /// 公告的名额数 = 奖品条目数
    pub winners_count: i32,
    /// 公告消息引用, 由 transport 回填
    pub message_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now > self.end_time
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
