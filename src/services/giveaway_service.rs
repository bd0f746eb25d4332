use crate::config::EconomyConfig;
use crate::entities::{
    GiveawayType, giveaway_entity as giveaways, giveaway_gift_entity as gifts,
    giveaway_participant_entity as participants, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateGiveawayRequest, GiveawayCreatedResponse, GiveawayInfoResponse, GiveawaySettlement,
    ParticipateResponse, WinnerEntry,
};
use crate::utils::datetime::parse_end_time;
use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;

/// 配对赢家与奖励: 参与者洗牌后按序占位, 每个占位从剩余奖励里均匀抽一份
/// 名额数 = min(参与人数, 奖励份数), 多余的一方落空
pub fn pair_winners<R: Rng + ?Sized>(
    mut entrants: Vec<(i64, String)>,
    mut prizes: Vec<(String, i64)>,
    rng: &mut R,
) -> Vec<WinnerEntry> {
    entrants.shuffle(rng);

    let mut winners = Vec::new();
    for (user_id, user_nickname) in entrants {
        if prizes.is_empty() {
            break;
        }
        let idx = rng.gen_range(0..prizes.len());
        let (gift_name, gift_amount) = prizes.swap_remove(idx);
        winners.push(WinnerEntry {
            user_id,
            user_nickname,
            gift_name,
            gift_amount,
        });
    }
    winners
}

/// 抽奖服务: 创建/报名/开奖/撤销
/// 开奖是破坏性的, 活动与子记录在结算事务里一并删除
#[derive(Clone)]
pub struct GiveawayService {
    pool: Arc<DatabaseConnection>,
    economy: EconomyConfig,
}

impl GiveawayService {
    pub fn new(pool: Arc<DatabaseConnection>, economy: EconomyConfig) -> Self {
        Self { pool, economy }
    }

    /// 创建抽奖
    /// coins 类型把 coins_amount (整币) 换算成 cents, 合成 winners 份等额奖励;
    /// else 类型直接落 gifts, 名额数 = 条目数
    pub async fn create(&self, req: &CreateGiveawayRequest) -> AppResult<GiveawayCreatedResponse> {
        let now = Utc::now();
        let end_time = parse_end_time(&req.end_time, now).ok_or_else(|| {
            AppError::ValidationError(format!("Unrecognized end time: {}", req.end_time))
        })?;

        let prize_rows: Vec<(String, i64)> = match req.giveaway_type {
            GiveawayType::Coins => {
                let amount = req.coins_amount.ok_or_else(|| {
                    AppError::ValidationError("coins_amount is required".to_string())
                })?;
                if amount < self.economy.min_giveaway_coins
                    || amount > self.economy.max_giveaway_coins
                {
                    return Err(AppError::ValidationError(format!(
                        "coins_amount must be between {} and {}",
                        self.economy.min_giveaway_coins, self.economy.max_giveaway_coins
                    )));
                }
                let winners = req.winners.unwrap_or(1);
                if winners < 1 {
                    return Err(AppError::ValidationError(
                        "winners must be at least 1".to_string(),
                    ));
                }
                (0..winners).map(|_| ("coins".to_string(), amount * 100)).collect()
            }
            GiveawayType::Else => {
                let list = req
                    .gifts
                    .as_ref()
                    .filter(|g| !g.is_empty())
                    .ok_or_else(|| {
                        AppError::ValidationError("gifts must not be empty".to_string())
                    })?;
                list.iter().map(|g| (g.name.clone(), g.amount)).collect()
            }
        };

        let txn = self.pool.begin().await?;

        let giveaway = giveaways::ActiveModel {
            giveaway_type: Set(req.giveaway_type),
            description: Set(req.description.clone()),
            end_time: Set(end_time),
            winners_count: Set(prize_rows.len() as i32),
            message_id: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (name, amount) in &prize_rows {
            gifts::ActiveModel {
                giveaway_id: Set(giveaway.id),
                gift_name: Set(name.clone()),
                amount: Set(*amount),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        log::info!(
            "Created giveaway {} ({:?}, {} prizes, ends {end_time})",
            giveaway.id,
            req.giveaway_type,
            prize_rows.len()
        );

        Ok(GiveawayCreatedResponse {
            giveaway_id: giveaway.id,
            end_time,
            winners_count: giveaway.winners_count,
        })
    }

    /// 报名: 截止检查/查重/写入在同一事务内
    /// 并发下抢过查重的那条靠 (giveaway_id, user_id) 唯一索引兜底,
    /// 唯一冲突同样折算成重复报名
    pub async fn participate(&self, giveaway_id: i64, user_id: i64) -> AppResult<ParticipateResponse> {
        let txn = self.pool.begin().await?;

        let giveaway = giveaways::Entity::find_by_id(giveaway_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Giveaway not found".to_string()))?;
        if giveaway.has_ended(Utc::now()) {
            return Err(AppError::GiveawayEnded);
        }

        let already = participants::Entity::find()
            .filter(participants::Column::GiveawayId.eq(giveaway_id))
            .filter(participants::Column::UserId.eq(user_id))
            .one(&txn)
            .await?;
        if already.is_some() {
            return Err(AppError::AlreadyParticipated);
        }

        let inserted = participants::ActiveModel {
            giveaway_id: Set(giveaway_id),
            user_id: Set(user_id),
            ..Default::default()
        }
        .insert(&txn)
        .await;
        if let Err(e) = inserted {
            return match e.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                    Err(AppError::AlreadyParticipated)
                }
                _ => Err(AppError::DatabaseError(e)),
            };
        }

        let count = participants::Entity::find()
            .filter(participants::Column::GiveawayId.eq(giveaway_id))
            .count(&txn)
            .await?;
        txn.commit().await?;

        Ok(ParticipateResponse {
            participant_count: count,
        })
    }

    /// 开奖并删除活动
    /// 活动已不存在 (被撤销或被并发结算) 时返回 None, 调用方安静退出
    pub async fn settle(&self, giveaway_id: i64) -> AppResult<Option<GiveawaySettlement>> {
        let Some(giveaway) = giveaways::Entity::find_by_id(giveaway_id).one(self.pool.as_ref()).await?
        else {
            return Ok(None);
        };

        let entrant_rows = participants::Entity::find()
            .filter(participants::Column::GiveawayId.eq(giveaway_id))
            .all(self.pool.as_ref())
            .await?;
        let prize_rows = gifts::Entity::find()
            .filter(gifts::Column::GiveawayId.eq(giveaway_id))
            .all(self.pool.as_ref())
            .await?;

        let ids: Vec<i64> = entrant_rows.iter().map(|p| p.user_id).collect();
        let nicknames: HashMap<i64, String> = users::Entity::find()
            .filter(users::Column::UserId.is_in(ids))
            .all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|u| (u.user_id, u.user_nickname))
            .collect();

        let entrants: Vec<(i64, String)> = entrant_rows
            .iter()
            .map(|p| {
                (
                    p.user_id,
                    nicknames.get(&p.user_id).cloned().unwrap_or_default(),
                )
            })
            .collect();
        let prizes: Vec<(String, i64)> = prize_rows
            .iter()
            .map(|g| (g.gift_name.clone(), g.amount))
            .collect();

        let winners = {
            let mut rng = rand::thread_rng();
            pair_winners(entrants, prizes, &mut rng)
        };

        let txn = self.pool.begin().await?;

        // coins 类活动在结算时直接把奖励入账
        if giveaway.giveaway_type == GiveawayType::Coins {
            for winner in &winners {
                users::Entity::update_many()
                    .col_expr(
                        users::Column::UserCoins,
                        Expr::col(users::Column::UserCoins).add(winner.gift_amount),
                    )
                    .filter(users::Column::UserId.eq(winner.user_id))
                    .exec(&txn)
                    .await?;
            }
        }

        participants::Entity::delete_many()
            .filter(participants::Column::GiveawayId.eq(giveaway_id))
            .exec(&txn)
            .await?;
        gifts::Entity::delete_many()
            .filter(gifts::Column::GiveawayId.eq(giveaway_id))
            .exec(&txn)
            .await?;
        giveaways::Entity::delete_by_id(giveaway_id).exec(&txn).await?;

        txn.commit().await?;
        log::info!(
            "Settled giveaway {giveaway_id}: {} entrants, {} winners",
            entrant_rows.len(),
            winners.len()
        );

        Ok(Some(GiveawaySettlement {
            giveaway_id,
            message_id: giveaway.message_id,
            participant_count: entrant_rows.len() as u64,
            winners,
        }))
    }

    /// 撤销活动, 不开奖直接清理
    pub async fn cancel(&self, giveaway_id: i64) -> AppResult<()> {
        if giveaways::Entity::find_by_id(giveaway_id)
            .one(self.pool.as_ref())
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Giveaway not found".to_string()));
        }

        let txn = self.pool.begin().await?;
        participants::Entity::delete_many()
            .filter(participants::Column::GiveawayId.eq(giveaway_id))
            .exec(&txn)
            .await?;
        gifts::Entity::delete_many()
            .filter(gifts::Column::GiveawayId.eq(giveaway_id))
            .exec(&txn)
            .await?;
        giveaways::Entity::delete_by_id(giveaway_id).exec(&txn).await?;
        txn.commit().await?;

        log::info!("Cancelled giveaway {giveaway_id}");
        Ok(())
    }

    pub async fn info(&self, giveaway_id: i64) -> AppResult<GiveawayInfoResponse> {
        let giveaway = giveaways::Entity::find_by_id(giveaway_id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Giveaway not found".to_string()))?;
        let count = self.participant_count(giveaway_id).await?;

        Ok(GiveawayInfoResponse {
            giveaway_id: giveaway.id,
            giveaway_type: giveaway.giveaway_type,
            description: giveaway.description,
            end_time: giveaway.end_time,
            winners_count: giveaway.winners_count,
            participant_count: count,
            message_id: giveaway.message_id,
        })
    }

    pub async fn participant_count(&self, giveaway_id: i64) -> AppResult<u64> {
        Ok(participants::Entity::find()
            .filter(participants::Column::GiveawayId.eq(giveaway_id))
            .count(self.pool.as_ref())
            .await?)
    }

    /// 公告消息回填, 供开奖通知定位原帖
    pub async fn set_message_id(&self, giveaway_id: i64, message_id: i64) -> AppResult<()> {
        let giveaway = giveaways::Entity::find_by_id(giveaway_id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Giveaway not found".to_string()))?;

        let mut active = giveaway.into_active_model();
        active.message_id = Set(Some(message_id));
        active.update(self.pool.as_ref()).await?;
        Ok(())
    }

    /// 所有未开奖的活动, 启动时恢复等待任务用
    pub async fn all_giveaways(&self) -> AppResult<Vec<giveaways::Model>> {
        Ok(giveaways::Entity::find().all(self.pool.as_ref()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn giveaway_row(id: i64, end_time: chrono::DateTime<Utc>) -> giveaways::Model {
        giveaways::Model {
            id,
            giveaway_type: GiveawayType::Else,
            description: "test giveaway".to_string(),
            end_time,
            winners_count: 2,
            message_id: None,
            created_at: None,
        }
    }

    fn participant_row(id: i64, giveaway_id: i64, user_id: i64) -> participants::Model {
        participants::Model {
            id,
            giveaway_id,
            user_id,
            created_at: None,
        }
    }

    fn entrants(n: usize) -> Vec<(i64, String)> {
        (0..n).map(|i| (i as i64 + 1, format!("user{}", i + 1))).collect()
    }

    #[test]
    fn pairing_stops_when_prizes_run_out() {
        let mut rng = rand::thread_rng();
        let prizes = vec![("steam key".to_string(), 1), ("sticker".to_string(), 3)];
        let winners = pair_winners(entrants(3), prizes, &mut rng);

        assert_eq!(winners.len(), 2);
        // 同一参与者不会重复中奖
        let mut ids: Vec<i64> = winners.iter().map(|w| w.user_id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn pairing_stops_when_entrants_run_out() {
        let mut rng = rand::thread_rng();
        let prizes = vec![
            ("a".to_string(), 1),
            ("b".to_string(), 1),
            ("c".to_string(), 1),
        ];
        let winners = pair_winners(entrants(2), prizes, &mut rng);
        assert_eq!(winners.len(), 2);
    }

    #[test]
    fn pairing_with_no_entrants_yields_no_winners() {
        let mut rng = rand::thread_rng();
        let winners = pair_winners(Vec::new(), vec![("a".to_string(), 1)], &mut rng);
        assert!(winners.is_empty());
    }

    #[test]
    fn every_prize_is_awarded_exactly_once_when_enough_entrants() {
        let mut rng = rand::thread_rng();
        let prizes = vec![
            ("a".to_string(), 1),
            ("b".to_string(), 2),
            ("c".to_string(), 3),
        ];
        let winners = pair_winners(entrants(5), prizes, &mut rng);

        let mut names: Vec<String> = winners.iter().map(|w| w.gift_name.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn second_participation_is_rejected_as_duplicate() {
        let end = Utc::now() + Duration::days(1);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![giveaway_row(1, end)]])
            .append_query_results([vec![participant_row(1, 1, 7)]])
            .into_connection();

        let service = GiveawayService::new(Arc::new(db), EconomyConfig::default());
        assert!(matches!(
            service.participate(1, 7).await,
            Err(AppError::AlreadyParticipated)
        ));
    }

    #[tokio::test]
    async fn participation_after_end_time_is_rejected() {
        let end = Utc::now() - Duration::hours(1);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![giveaway_row(1, end)]])
            .into_connection();

        let service = GiveawayService::new(Arc::new(db), EconomyConfig::default());
        assert!(matches!(
            service.participate(1, 7).await,
            Err(AppError::GiveawayEnded)
        ));
    }

    #[tokio::test]
    async fn settlement_pairs_winners_and_destroys_the_record() {
        let end = Utc::now() - Duration::minutes(1);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![giveaway_row(1, end)]])
            .append_query_results([vec![participant_row(1, 1, 7), participant_row(2, 1, 8)]])
            .append_query_results([vec![
                gifts::Model {
                    id: 1,
                    giveaway_id: 1,
                    gift_name: "steam key".to_string(),
                    amount: 1,
                },
                gifts::Model {
                    id: 2,
                    giveaway_id: 1,
                    gift_name: "sticker".to_string(),
                    amount: 3,
                },
            ]])
            .append_query_results([vec![
                users::Model {
                    user_id: 7,
                    user_name: None,
                    user_nickname: "seven".to_string(),
                    user_coins: 0,
                    created_at: None,
                },
                users::Model {
                    user_id: 8,
                    user_name: None,
                    user_nickname: "eight".to_string(),
                    user_coins: 0,
                    created_at: None,
                },
            ]])
            // 参与者/奖励/活动行各一条 DELETE, 多余的 exec 会让 mock 报错
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 2 },
                MockExecResult { last_insert_id: 0, rows_affected: 2 },
                MockExecResult { last_insert_id: 0, rows_affected: 1 },
            ])
            .into_connection();

        let service = GiveawayService::new(Arc::new(db), EconomyConfig::default());
        let settlement = service.settle(1).await.unwrap().expect("giveaway present");

        assert_eq!(settlement.giveaway_id, 1);
        assert_eq!(settlement.participant_count, 2);
        assert_eq!(settlement.winners.len(), 2);
        let mut ids: Vec<i64> = settlement.winners.iter().map(|w| w.user_id).collect();
        ids.sort();
        assert_eq!(ids, vec![7, 8]);
    }

    #[tokio::test]
    async fn settling_a_missing_giveaway_yields_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<giveaways::Model>::new()])
            .into_connection();

        let service = GiveawayService::new(Arc::new(db), EconomyConfig::default());
        assert!(service.settle(1).await.unwrap().is_none());
    }
}
