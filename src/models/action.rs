use crate::models::XpAwardResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 群消息活动事件: 冷却放行后发 XP 与每条消息收入
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageEventRequest {
    pub user_id: i64,
    pub user_name: Option<String>,
    pub user_nickname: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageEventResponse {
    /// 本条消息入账的金币 (cents)
    pub earned: i64,
    pub xp: XpAwardResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActorRequest {
    pub user_id: i64,
}

/// 随机点名结果
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WhoResponse {
    pub user_id: i64,
    pub user_nickname: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EightBallResponse {
    pub phrase: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PickRequest {
    pub user_id: i64,
    /// 候选项, 空白项会被剔除
    pub variants: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PickResponse {
    pub picked: String,
}

/// 付费媒体动作种类 (媒体内容本身由 transport 侧选取)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Anime,
    Image,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MediaRequest {
    pub user_id: i64,
    pub kind: MediaKind,
}

/// 扣费成功即授予, 内容选取不在本服务范围内
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MediaResponse {
    pub granted: bool,
    /// 实际扣除金额 (cents)
    pub charged: i64,
}
