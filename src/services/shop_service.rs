use crate::entities::{
    BoosterType, booster_entity as boosters, user_booster_entity as user_boosters,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{PurchaseResponse, ShopItemResponse, ShopListResponse};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;

/// 商店服务: 目录/动态定价/购买
#[derive(Clone)]
pub struct ShopService {
    pool: Arc<DatabaseConnection>,
}

impl ShopService {
    pub fn new(pool: Arc<DatabaseConnection>) -> Self {
        Self { pool }
    }

    /// 启动时重建加成器目录, id 固定以保持持有记录有效
    pub async fn seed_catalog(&self) -> AppResult<()> {
        let catalog = [
            (1, "Quick Quill", BoosterType::Message, 5, 10),
            (2, "Golden Pen", BoosterType::Message, 10, 20),
            (3, "Copper Gear", BoosterType::Minute, 2, 5),
            (4, "Silver Gear", BoosterType::Minute, 4, 10),
            (5, "Gilded Gear", BoosterType::Minute, 8, 20),
        ];

        for (id, name, booster_type, bonus, price) in catalog {
            let row = boosters::ActiveModel {
                id: Set(id),
                booster_name: Set(name.to_string()),
                booster_type: Set(booster_type),
                bonus_amount: Set(bonus),
                base_price: Set(price),
            };
            if boosters::Entity::find_by_id(id).one(self.pool.as_ref()).await?.is_some() {
                row.update(self.pool.as_ref()).await?;
            } else {
                row.insert(self.pool.as_ref()).await?;
            }
        }
        log::info!("Booster catalog seeded");
        Ok(())
    }

    /// 商店列表: 每件商品按买家已持有数量报下一件的价格
    pub async fn list_items(&self, user_id: i64) -> AppResult<ShopListResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let owned: HashMap<i64, i64> = user_boosters::Entity::find()
            .filter(user_boosters::Column::UserId.eq(user_id))
            .all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|h| (h.booster_id, h.amount))
            .collect();

        let items = boosters::Entity::find()
            .all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|b| {
                let count = owned.get(&b.id).copied().unwrap_or(0);
                ShopItemResponse {
                    booster_id: b.id,
                    booster_name: b.booster_name.clone(),
                    booster_type: b.booster_type,
                    bonus_amount: b.bonus_amount,
                    price: b.price_for(count),
                    owned: count,
                }
            })
            .collect();

        Ok(ShopListResponse {
            items,
            balance: user.user_coins,
        })
    }

    /// 购买一件加成器: 定价/扣款/持仓 +1 在同一事务内完成
    pub async fn purchase(&self, user_id: i64, booster_id: i64) -> AppResult<PurchaseResponse> {
        let booster = boosters::Entity::find_by_id(booster_id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Booster not found".to_string()))?;

        let txn = self.pool.begin().await?;

        let holding = user_boosters::Entity::find()
            .filter(user_boosters::Column::UserId.eq(user_id))
            .filter(user_boosters::Column::BoosterId.eq(booster_id))
            .one(&txn)
            .await?;
        let owned = holding.as_ref().map(|h| h.amount).unwrap_or(0);
        let price = booster.price_for(owned);

        // 有条件扣款, 余额不足则整个事务回滚
        let debit = users::Entity::update_many()
            .col_expr(
                users::Column::UserCoins,
                Expr::col(users::Column::UserCoins).sub(price),
            )
            .filter(users::Column::UserId.eq(user_id))
            .filter(users::Column::UserCoins.gte(price))
            .exec(&txn)
            .await?;
        if debit.rows_affected == 0 {
            txn.rollback().await?;
            return Err(AppError::InsufficientFunds);
        }

        match holding {
            Some(row) => {
                let mut active = row.into_active_model();
                active.amount = Set(owned + 1);
                active.update(&txn).await?;
            }
            None => {
                user_boosters::ActiveModel {
                    user_id: Set(user_id),
                    booster_id: Set(booster_id),
                    amount: Set(1),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }

        let balance = users::Entity::find_by_id(user_id)
            .one(&txn)
            .await?
            .map(|u| u.user_coins)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        txn.commit().await?;
        log::info!("User {user_id} bought booster {booster_id} for {price}");

        Ok(PurchaseResponse {
            booster_id,
            price_paid: price,
            owned: owned + 1,
            balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::entities::{BoosterType, booster_entity as boosters};

    fn booster(booster_type: BoosterType, base_price: i64) -> boosters::Model {
        boosters::Model {
            id: 1,
            booster_name: "test".to_string(),
            booster_type,
            bonus_amount: 5,
            base_price,
        }
    }

    #[test]
    fn message_booster_price_grows_by_ten_per_step() {
        let b = booster(BoosterType::Message, 10);
        // 10, +20, +30, +40 ...
        assert_eq!(b.price_for(0), 10);
        assert_eq!(b.price_for(1), 30);
        assert_eq!(b.price_for(2), 60);
        assert_eq!(b.price_for(3), 100);
    }

    #[test]
    fn minute_booster_price_grows_by_twenty_five_per_step() {
        let b = booster(BoosterType::Minute, 5);
        // 5, +20, +45, +70 ...
        assert_eq!(b.price_for(0), 5);
        assert_eq!(b.price_for(1), 25);
        assert_eq!(b.price_for(2), 70);
        assert_eq!(b.price_for(3), 140);
    }
}
