use crate::config::CooldownConfig;
use crate::entities::{
    ActionKind, action_cooldown_entity as cooldowns, user_action_entity as user_actions,
};
use crate::error::{AppError, AppResult};
use crate::models::CooldownEntry;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;

/// 冷却闸门的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownCheck {
    Permitted,
    Denied { remaining_secs: i64 },
}

/// 剩余冷却秒数; 恰好到期 (remaining == 0) 仍视为冷却中
pub fn remaining_secs(last_time: DateTime<Utc>, cooldown_secs: i64, now: DateTime<Utc>) -> i64 {
    last_time.timestamp() + cooldown_secs - now.timestamp()
}

#[derive(Clone)]
pub struct CooldownService {
    pool: Arc<DatabaseConnection>,
}

impl CooldownService {
    pub fn new(pool: Arc<DatabaseConnection>) -> Self {
        Self { pool }
    }

    /// 启动时整表重建冷却配置 (replace-all, 不做合并)
    pub async fn seed(&self, config: &CooldownConfig) -> AppResult<()> {
        cooldowns::Entity::delete_many().exec(self.pool.as_ref()).await?;

        let rows = [
            (ActionKind::Message, config.message),
            (ActionKind::Who, config.who),
            (ActionKind::EightBall, config.eight_ball),
            (ActionKind::Pick, config.pick),
            (ActionKind::Rating, config.rating),
            (ActionKind::Anime, config.anime),
            (ActionKind::Image, config.image),
            (ActionKind::Blackjack, config.blackjack),
        ]
        .into_iter()
        .map(|(action, secs)| cooldowns::ActiveModel {
            action: Set(action),
            cooldown_secs: Set(secs),
        });

        cooldowns::Entity::insert_many(rows).exec(self.pool.as_ref()).await?;
        Ok(())
    }

    /// 检查某用户能否执行动作
    /// 首次使用直接放行并顺带写入时间戳; 此后放行与否由
    /// last_time + cooldown - now 决定, 拒绝时不做任何写入
    /// 放行后由调用方在动作真正执行完再调 `mark`
    pub async fn check(&self, user_id: i64, action: ActionKind) -> AppResult<CooldownCheck> {
        let config = cooldowns::Entity::find_by_id(action)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("Cooldown config missing for action {action}"))
            })?;

        let record = user_actions::Entity::find()
            .filter(user_actions::Column::UserId.eq(user_id))
            .filter(user_actions::Column::Action.eq(action))
            .one(self.pool.as_ref())
            .await?;

        match record {
            None => {
                // 首次使用: 自注册时间戳
                user_actions::ActiveModel {
                    user_id: Set(user_id),
                    action: Set(action),
                    last_time: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(self.pool.as_ref())
                .await?;
                Ok(CooldownCheck::Permitted)
            }
            Some(record) => {
                let remaining = remaining_secs(record.last_time, config.cooldown_secs, Utc::now());
                if remaining < 0 {
                    Ok(CooldownCheck::Permitted)
                } else {
                    Ok(CooldownCheck::Denied {
                        remaining_secs: remaining,
                    })
                }
            }
        }
    }

    /// 动作成功执行后记录新的时间戳 (upsert)
    pub async fn mark(&self, user_id: i64, action: ActionKind) -> AppResult<()> {
        let record = user_actions::Entity::find()
            .filter(user_actions::Column::UserId.eq(user_id))
            .filter(user_actions::Column::Action.eq(action))
            .one(self.pool.as_ref())
            .await?;

        match record {
            Some(record) => {
                let mut am = record.into_active_model();
                am.last_time = Set(Utc::now());
                am.update(self.pool.as_ref()).await?;
            }
            None => {
                user_actions::ActiveModel {
                    user_id: Set(user_id),
                    action: Set(action),
                    last_time: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(self.pool.as_ref())
                .await?;
            }
        }
        Ok(())
    }

    /// 冷却配置列表 (/actions/cooldowns)
    pub async fn list(&self) -> AppResult<Vec<CooldownEntry>> {
        let rows = cooldowns::Entity::find()
            .order_by_asc(cooldowns::Column::Action)
            .all(self.pool.as_ref())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[test]
    fn remaining_counts_down_to_expiry() {
        let now = Utc::now();
        let last = now - Duration::seconds(10);
        assert_eq!(remaining_secs(last, 30, now), 20);
        // 刚好到期的那一秒仍然是冷却中 (严格小于零才放行)
        assert_eq!(remaining_secs(now - Duration::seconds(30), 30, now), 0);
        assert_eq!(remaining_secs(now - Duration::seconds(31), 30, now), -1);
    }

    #[tokio::test]
    async fn first_use_is_permitted_and_self_registers() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cooldowns::Model {
                action: ActionKind::Who,
                cooldown_secs: 30,
            }]])
            .append_query_results([Vec::<user_actions::Model>::new()])
            .append_query_results([vec![user_actions::Model {
                id: 1,
                user_id: 7,
                action: ActionKind::Who,
                last_time: Utc::now(),
            }]])
            .append_exec_results([MockExecResult {
                last_insert_id: 1,
                rows_affected: 1,
            }])
            .into_connection();

        let service = CooldownService::new(Arc::new(db));
        let check = service.check(7, ActionKind::Who).await.unwrap();
        assert_eq!(check, CooldownCheck::Permitted);
    }

    #[tokio::test]
    async fn active_cooldown_is_denied_with_remaining() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cooldowns::Model {
                action: ActionKind::Who,
                cooldown_secs: 30,
            }]])
            .append_query_results([vec![user_actions::Model {
                id: 1,
                user_id: 7,
                action: ActionKind::Who,
                last_time: Utc::now() - Duration::seconds(10),
            }]])
            .into_connection();

        let service = CooldownService::new(Arc::new(db));
        match service.check(7, ActionKind::Who).await.unwrap() {
            CooldownCheck::Denied { remaining_secs } => {
                assert!((18..=20).contains(&remaining_secs));
            }
            CooldownCheck::Permitted => panic!("expected denial"),
        }
    }

    #[tokio::test]
    async fn expired_cooldown_is_permitted_without_writes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cooldowns::Model {
                action: ActionKind::Who,
                cooldown_secs: 30,
            }]])
            .append_query_results([vec![user_actions::Model {
                id: 1,
                user_id: 7,
                action: ActionKind::Who,
                last_time: Utc::now() - Duration::seconds(31),
            }]])
            .into_connection();

        let service = CooldownService::new(Arc::new(db));
        let check = service.check(7, ActionKind::Who).await.unwrap();
        assert_eq!(check, CooldownCheck::Permitted);
    }
}
