use crate::entities::user_entity as users;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 幂等注册: 已存在则不做任何事
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EnsureUserRequest {
    #[schema(example = 10001)]
    pub user_id: i64,
    #[schema(example = "john_doe")]
    pub user_name: Option<String>,
    #[schema(example = "John")]
    pub user_nickname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user_id: i64,
    pub user_name: Option<String>,
    pub user_nickname: String,
    /// 余额 (cents)
    pub balance: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            user_id: user.user_id,
            user_name: user.user_name,
            user_nickname: user.user_nickname,
            balance: user.user_coins,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    pub user_id: i64,
    /// 余额 (cents)
    pub balance: i64,
}

/// 有效收入速率 = 基础值 + 对应类型加成器之和
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RatesResponse {
    pub user_id: i64,
    /// 每条消息收入 (cents)
    pub coins_per_msg: i64,
    /// 每分钟被动收入 (cents)
    pub coins_per_min: i64,
}
