use crate::config::EconomyConfig;
use crate::entities::{
    BoosterType, booster_entity as boosters, giveaway_participant_entity as participants,
    user_action_entity as user_actions, user_booster_entity as user_boosters,
    user_entity as users, user_level_entity as user_levels,
};
use crate::error::{AppError, AppResult};
use rand::seq::SliceRandom;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;

/// 账本服务: 余额/收支/收入速率与用户生命周期
/// 所有金额为 cents; 扣款永远是有条件的, 余额不可能为负
/// 连接共享为 Arc, 测试里的 Mock 连接不可克隆
#[derive(Clone)]
pub struct UserService {
    pool: Arc<DatabaseConnection>,
    economy: EconomyConfig,
}

impl UserService {
    pub fn new(pool: Arc<DatabaseConnection>, economy: EconomyConfig) -> Self {
        Self { pool, economy }
    }

    /// 幂等注册: 首次出现的身份建 user + level 记录, 已存在则不动
    pub async fn ensure_user(
        &self,
        user_id: i64,
        user_name: Option<String>,
        user_nickname: &str,
    ) -> AppResult<users::Model> {
        if let Some(existing) = users::Entity::find_by_id(user_id).one(self.pool.as_ref()).await? {
            return Ok(existing);
        }

        let user = users::ActiveModel {
            user_id: Set(user_id),
            user_name: Set(user_name),
            user_nickname: Set(user_nickname.to_string()),
            user_coins: Set(0),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await?;

        user_levels::ActiveModel {
            user_id: Set(user_id),
            level: Set(0),
            xp: Set(0),
            xp_needed: Set(100),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await?;

        log::info!("Created user {user_id} ({user_nickname})");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn balance(&self, user_id: i64) -> AppResult<i64> {
        Ok(self.get_user(user_id).await?.user_coins)
    }

    /// 无条件入账 (消息收入 / 游戏奖金 / 抽奖奖励)
    pub async fn credit(&self, user_id: i64, amount: i64) -> AppResult<()> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::UserCoins,
                Expr::col(users::Column::UserCoins).add(amount),
            )
            .filter(users::Column::UserId.eq(user_id))
            .exec(self.pool.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    /// 有条件扣款: 余额足够才成交, 否则不改动任何状态并返回 false
    /// 单条带条件的 UPDATE, 并发下不会把余额扣成负数
    pub async fn debit(&self, user_id: i64, amount: i64) -> AppResult<bool> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::UserCoins,
                Expr::col(users::Column::UserCoins).sub(amount),
            )
            .filter(users::Column::UserId.eq(user_id))
            .filter(users::Column::UserCoins.gte(amount))
            .exec(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// 每条消息的有效收入 = 基础值 + message 类加成器加成之和
    pub async fn per_message_rate(&self, user_id: i64) -> AppResult<i64> {
        Ok(self.economy.coins_per_msg + self.booster_bonus(user_id, BoosterType::Message).await?)
    }

    /// 每分钟的有效收入 = minute 类加成器加成之和 (无基础值)
    pub async fn per_minute_rate(&self, user_id: i64) -> AppResult<i64> {
        self.booster_bonus(user_id, BoosterType::Minute).await
    }

    /// 某类型加成器的总加成: sum(持有件数 x 单件加成)
    /// 类型来自目录而不是写死的 id, 目录扩充后依然正确
    async fn booster_bonus(&self, user_id: i64, booster_type: BoosterType) -> AppResult<i64> {
        let catalog: HashMap<i64, boosters::Model> = boosters::Entity::find()
            .filter(boosters::Column::BoosterType.eq(booster_type))
            .all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        let holdings = user_boosters::Entity::find()
            .filter(user_boosters::Column::UserId.eq(user_id))
            .all(self.pool.as_ref())
            .await?;

        Ok(holdings
            .iter()
            .filter_map(|h| catalog.get(&h.booster_id).map(|b| h.amount * b.bonus_amount))
            .sum())
    }

    /// 每分钟收入扫描: 给所有持有 minute 类加成器的用户入账
    pub async fn tick_minute_income(&self) -> AppResult<u64> {
        let catalog: HashMap<i64, i64> = boosters::Entity::find()
            .filter(boosters::Column::BoosterType.eq(BoosterType::Minute))
            .all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|b| (b.id, b.bonus_amount))
            .collect();

        let holdings = user_boosters::Entity::find().all(self.pool.as_ref()).await?;

        let mut per_user: HashMap<i64, i64> = HashMap::new();
        for h in &holdings {
            if let Some(bonus) = catalog.get(&h.booster_id) {
                *per_user.entry(h.user_id).or_insert(0) += h.amount * bonus;
            }
        }

        let mut credited = 0u64;
        for (user_id, amount) in per_user {
            if amount > 0 {
                self.credit(user_id, amount).await?;
                credited += 1;
            }
        }
        Ok(credited)
    }

    /// /who: 从全体用户里随机点一个
    pub async fn random_user(&self) -> AppResult<Option<users::Model>> {
        let all = users::Entity::find().all(self.pool.as_ref()).await?;
        let mut rng = rand::thread_rng();
        Ok(all.choose(&mut rng).cloned())
    }

    /// 删除用户并级联清理持有/等级/动作时间/抽奖参与记录
    pub async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        let txn = self.pool.begin().await?;

        user_boosters::Entity::delete_many()
            .filter(user_boosters::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        user_levels::Entity::delete_many()
            .filter(user_levels::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        user_actions::Entity::delete_many()
            .filter(user_actions::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        participants::Entity::delete_many()
            .filter(participants::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        users::Entity::delete_many()
            .filter(users::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        log::info!("Deleted user {user_id} and related records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn economy() -> EconomyConfig {
        EconomyConfig::default()
    }

    #[tokio::test]
    async fn debit_succeeds_when_balance_covers_amount() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let service = UserService::new(Arc::new(db), economy());
        assert!(service.debit(1, 500).await.unwrap());
    }

    #[tokio::test]
    async fn debit_rejects_insufficient_funds_without_mutation() {
        // 条件 UPDATE 没有命中任何行 = 余额不足
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let service = UserService::new(Arc::new(db), economy());
        assert!(!service.debit(1, 500).await.unwrap());
    }

    #[tokio::test]
    async fn credit_for_missing_user_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let service = UserService::new(Arc::new(db), economy());
        assert!(matches!(
            service.credit(42, 100).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn message_rate_adds_matching_booster_bonuses() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                boosters::Model {
                    id: 1,
                    booster_name: "Quick Quill".to_string(),
                    booster_type: BoosterType::Message,
                    bonus_amount: 5,
                    base_price: 10,
                },
                boosters::Model {
                    id: 2,
                    booster_name: "Golden Pen".to_string(),
                    booster_type: BoosterType::Message,
                    bonus_amount: 10,
                    base_price: 20,
                },
            ]])
            .append_query_results([vec![
                user_boosters::Model {
                    id: 1,
                    user_id: 7,
                    booster_id: 1,
                    amount: 2,
                },
                // minute 类持有不应计入每条消息收入
                user_boosters::Model {
                    id: 2,
                    user_id: 7,
                    booster_id: 3,
                    amount: 4,
                },
            ]])
            .into_connection();

        let service = UserService::new(Arc::new(db), economy());
        // 基础 10 + 2x5 = 20
        assert_eq!(service.per_message_rate(7).await.unwrap(), 20);
    }
}
