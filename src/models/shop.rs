use crate::entities::BoosterType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 商店条目, 价格按买家已持有数量实时计算
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShopItemResponse {
    pub booster_id: i64,
    pub booster_name: String,
    pub booster_type: BoosterType,
    /// 每件加成 (cents)
    pub bonus_amount: i64,
    /// 当前买家的下一件售价 (cents)
    pub price: i64,
    /// 买家已持有件数
    pub owned: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShopListResponse {
    pub items: Vec<ShopItemResponse>,
    /// 买家余额 (cents)
    pub balance: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseRequest {
    pub user_id: i64,
    pub booster_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseResponse {
    pub booster_id: i64,
    /// 实际成交价 (cents)
    pub price_paid: i64,
    /// 购买后的持有件数
    pub owned: i64,
    /// 购买后的余额 (cents)
    pub balance: i64,
}
