use crate::config::EconomyConfig;
use crate::entities::{user_entity as users, user_level_entity as user_levels};
use crate::error::{AppError, AppResult};
use crate::models::{LeaderboardEntry, XpAwardResponse};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Order,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;

/// 升到 `level` 级之后还需要的经验
pub fn xp_needed_for(level: i32) -> i64 {
    let l = level as i64;
    5 * l * l + 50 * l + 100
}

/// 把一笔经验记入等级状态, 至多触发一次升级
/// 升级后溢出的经验保留, 下一笔继续累计
pub fn apply_xp(level: i32, xp: i64, xp_needed: i64, gained: i64) -> (i32, i64, i64, bool) {
    let xp = xp + gained;
    if xp >= xp_needed {
        let level = level + 1;
        (level, xp - xp_needed, xp_needed_for(level), true)
    } else {
        (level, xp, xp_needed, false)
    }
}

/// 等级服务: 经验累计/升级判定/排行榜
#[derive(Clone)]
pub struct LevelService {
    pool: Arc<DatabaseConnection>,
    economy: EconomyConfig,
}

impl LevelService {
    pub fn new(pool: Arc<DatabaseConnection>, economy: EconomyConfig) -> Self {
        Self { pool, economy }
    }

    /// 确保等级记录存在 (老数据补行用)
    pub async fn ensure_level(&self, user_id: i64) -> AppResult<user_levels::Model> {
        if let Some(existing) = user_levels::Entity::find()
            .filter(user_levels::Column::UserId.eq(user_id))
            .one(self.pool.as_ref())
            .await?
        {
            return Ok(existing);
        }

        let row = user_levels::ActiveModel {
            user_id: Set(user_id),
            level: Set(0),
            xp: Set(0),
            xp_needed: Set(xp_needed_for(0)),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await?;
        Ok(row)
    }

    pub async fn get_level(&self, user_id: i64) -> AppResult<user_levels::Model> {
        user_levels::Entity::find()
            .filter(user_levels::Column::UserId.eq(user_id))
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Level record not found".to_string()))
    }

    /// 每条消息发放随机经验并落库, 返回是否升级
    pub async fn award_xp(&self, user_id: i64) -> AppResult<XpAwardResponse> {
        let current = self.ensure_level(user_id).await?;

        let gained = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.economy.xp_min..=self.economy.xp_max)
        };

        let (level, xp, xp_needed, leveled_up) =
            apply_xp(current.level, current.xp, current.xp_needed, gained);

        let mut active = current.into_active_model();
        active.level = Set(level);
        active.xp = Set(xp);
        active.xp_needed = Set(xp_needed);
        active.update(self.pool.as_ref()).await?;

        if leveled_up {
            log::info!("User {user_id} leveled up to {level}");
        }

        Ok(XpAwardResponse {
            xp_gained: gained,
            leveled_up,
            level,
            xp,
            xp_needed,
        })
    }

    /// 排行榜前 20: 先按等级再按当前经验降序
    pub async fn leaderboard(&self) -> AppResult<Vec<LeaderboardEntry>> {
        let rows = user_levels::Entity::find()
            .order_by(user_levels::Column::Level, Order::Desc)
            .order_by(user_levels::Column::Xp, Order::Desc)
            .limit(20)
            .all(self.pool.as_ref())
            .await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.user_id).collect();
        let nicknames: std::collections::HashMap<i64, String> = users::Entity::find()
            .filter(users::Column::UserId.is_in(ids))
            .all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|u| (u.user_id, u.user_nickname))
            .collect();

        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| LeaderboardEntry {
                rank: (i + 1) as u32,
                user_id: row.user_id,
                user_nickname: nicknames.get(&row.user_id).cloned().unwrap_or_default(),
                level: row.level,
                xp: row.xp,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xp_threshold_follows_quadratic_curve() {
        assert_eq!(xp_needed_for(0), 100);
        assert_eq!(xp_needed_for(1), 155);
        assert_eq!(xp_needed_for(2), 220);
        assert_eq!(xp_needed_for(10), 1100);
    }

    #[test]
    fn apply_xp_accumulates_below_threshold() {
        let (level, xp, xp_needed, leveled_up) = apply_xp(0, 40, 100, 25);
        assert_eq!((level, xp, xp_needed), (0, 65, 100));
        assert!(!leveled_up);
    }

    #[test]
    fn apply_xp_levels_up_and_carries_overflow() {
        let (level, xp, xp_needed, leveled_up) = apply_xp(0, 90, 100, 25);
        assert_eq!(level, 1);
        assert_eq!(xp, 15);
        assert_eq!(xp_needed, xp_needed_for(1));
        assert!(leveled_up);
    }

    #[test]
    fn apply_xp_exact_threshold_levels_up_with_zero_remainder() {
        let (level, xp, _, leveled_up) = apply_xp(3, 80, 100, 20);
        assert_eq!((level, xp), (4, 0));
        assert!(leveled_up);
    }

    #[test]
    fn apply_xp_never_levels_twice_in_one_award() {
        // 单笔经验最多只推进一级, 即使溢出足够再升一次
        let (level, xp, xp_needed, _) = apply_xp(0, 99, 100, 25);
        assert_eq!(level, 1);
        assert_eq!(xp, 24);
        assert_eq!(xp_needed, xp_needed_for(1));
    }
}
