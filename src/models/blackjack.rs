use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StartRoundRequest {
    pub user_id: i64,
    /// 下注金额 (cents), 不得低于配置的最小下注
    pub bet: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoundActionRequest {
    pub user_id: i64,
}

/// 一局的对外状态
/// outcome 为 awaiting_action 时玩家还可以 hit/stand, 其余均为终局
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    AwaitingAction,
    PlayerBust,
    PlayerBlackjack,
    DealerBust,
    PlayerWin,
    PlayerLose,
    Push,
}

impl RoundOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RoundOutcome::AwaitingAction)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundStateResponse {
    pub round_id: String,
    pub player_hand: Vec<i64>,
    pub player_total: i64,
    pub dealer_hand: Vec<i64>,
    pub dealer_total: i64,
    /// 下注 (cents)
    pub bet: i64,
    pub outcome: RoundOutcome,
    /// 终局时入账的金额 (cents): 赢 2x 下注, 平局退回 1x, 输为 0
    pub payout: i64,
}
