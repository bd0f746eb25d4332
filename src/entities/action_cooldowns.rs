use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 冷却控制的动作种类
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    #[sea_orm(string_value = "message")]
    Message,
    #[sea_orm(string_value = "who")]
    Who,
    #[sea_orm(string_value = "eight_ball")]
    EightBall,
    #[sea_orm(string_value = "pick")]
    Pick,
    #[sea_orm(string_value = "rating")]
    Rating,
    #[sea_orm(string_value = "anime")]
    Anime,
    #[sea_orm(string_value = "image")]
    Image,
    #[sea_orm(string_value = "blackjack")]
    Blackjack,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActionKind::Message => "message",
            ActionKind::Who => "who",
            ActionKind::EightBall => "eight_ball",
            ActionKind::Pick => "pick",
            ActionKind::Rating => "rating",
            ActionKind::Anime => "anime",
            ActionKind::Image => "image",
            ActionKind::Blackjack => "blackjack",
        };
        write!(f, "{s}")
    }
}

/// 动作冷却配置实体, 启动时从配置整表重建
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "action_cooldowns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub action: ActionKind,
    /// 冷却时长 (秒)
    pub cooldown_secs: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
