use crate::entities::GiveawayType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GiftInput {
    #[schema(example = "steam key")]
    pub name: String,
    /// 奖励内的数量 (展示为 "Nx name"), 不拆分名额
    #[schema(example = 1)]
    pub amount: i64,
}

/// 创建抽奖 (管理员)
/// - coins 类型: 提供 coins_amount (整币) 与 winners, 合成 winners 份等额奖励
/// - else 类型: 提供 gifts 列表, 名额数 = 条目数
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateGiveawayRequest {
    pub admin_id: i64,
    pub giveaway_type: GiveawayType,
    pub description: String,
    /// 结束时间表达式: "3h" / "45m" / "2d" / "12:10 10.10.2023"
    #[schema(example = "1d")]
    pub end_time: String,
    pub gifts: Option<Vec<GiftInput>>,
    /// 每个名额的金币数 (整币, 入库时 x100)
    pub coins_amount: Option<i64>,
    pub winners: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GiveawayCreatedResponse {
    pub giveaway_id: i64,
    pub end_time: DateTime<Utc>,
    pub winners_count: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipateRequest {
    pub user_id: i64,
    pub user_name: Option<String>,
    pub user_nickname: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipateResponse {
    /// 报名成功后的总参与人数
    pub participant_count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GiveawayInfoResponse {
    pub giveaway_id: i64,
    pub giveaway_type: GiveawayType,
    pub description: String,
    pub end_time: DateTime<Utc>,
    pub winners_count: i32,
    pub participant_count: u64,
    pub message_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SetMessageRequest {
    pub message_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminRequest {
    pub admin_id: i64,
}

/// 开奖结果中的一名赢家
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WinnerEntry {
    pub user_id: i64,
    pub user_nickname: String,
    pub gift_name: String,
    pub gift_amount: i64,
}

/// 开奖产物; 开奖后活动记录已删除, 这是唯一能拿到结果的地方
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GiveawaySettlement {
    pub giveaway_id: i64,
    pub message_id: Option<i64>,
    pub participant_count: u64,
    pub winners: Vec<WinnerEntry>,
}
