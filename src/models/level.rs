use crate::entities::user_level_entity as user_levels;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LevelResponse {
    pub user_id: i64,
    pub level: i32,
    pub xp: i64,
    pub xp_needed: i64,
}

impl From<user_levels::Model> for LevelResponse {
    fn from(level: user_levels::Model) -> Self {
        Self {
            user_id: level.user_id,
            level: level.level,
            xp: level.xp,
            xp_needed: level.xp_needed,
        }
    }
}

/// 一次 XP 结算的结果
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct XpAwardResponse {
    pub xp_gained: i64,
    pub leveled_up: bool,
    pub level: i32,
    pub xp: i64,
    pub xp_needed: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: i64,
    pub user_nickname: String,
    pub level: i32,
    pub xp: i64,
}
