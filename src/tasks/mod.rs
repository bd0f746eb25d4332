//! Background scheduled tasks for the application.
//!
//! Two kinds of jobs run here: the minute income ticker and one waiter task
//! per open giveaway. Call `spawn_all` once during startup; it resumes the
//! waiters for giveaways that were still open when the process last stopped.

use crate::outbound::{Announcement, OutboundQueue};
use crate::services::{GiveawayService, UserService};
use chrono::Utc;

/// Spawn all background tasks.
///
/// Notes
/// - Each task is idempotent as implemented in its service and runs on its own schedule.
/// - This function detaches tasks via `tokio::spawn`; it does not block.
pub async fn spawn_all(
    user_service: UserService,
    giveaway_service: GiveawayService,
    outbound: OutboundQueue,
) {
    // 每分钟被动收入: 先睡后发, 启动瞬间不立刻发一轮
    {
        let svc = user_service.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(std::time::Duration::from_secs(60)).await;
                match svc.tick_minute_income().await {
                    Ok(n) if n > 0 => log::debug!("Minute income credited to {n} users"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to credit minute income: {e:?}"),
                }
            }
        });
    }

    // 恢复上次进程停止时仍未开奖的活动
    match giveaway_service.all_giveaways().await {
        Ok(open) => {
            let count = open.len();
            for giveaway in open {
                spawn_giveaway_waiter(
                    giveaway_service.clone(),
                    outbound.clone(),
                    giveaway.id,
                    giveaway.end_time,
                );
            }
            if count > 0 {
                log::info!("Resumed {count} giveaway waiters");
            }
        }
        Err(e) => log::error!("Failed to resume giveaway waiters: {e:?}"),
    }
}

/// 为单个抽奖挂一个等待任务: 睡到截止时间, 开奖并发布公告
/// 活动已被撤销时开奖返回 None, 任务安静退出
pub fn spawn_giveaway_waiter(
    giveaway_service: GiveawayService,
    outbound: OutboundQueue,
    giveaway_id: i64,
    end_time: chrono::DateTime<Utc>,
) {
    tokio::spawn(async move {
        let remaining = (end_time - Utc::now()).num_seconds().max(0) as u64;
        tokio::time::sleep(std::time::Duration::from_secs(remaining)).await;

        match giveaway_service.settle(giveaway_id).await {
            Ok(Some(settlement)) => {
                outbound.publish(Announcement::GiveawayResult(settlement));
            }
            Ok(None) => {
                log::debug!("Giveaway {giveaway_id} already gone, waiter exits");
            }
            Err(e) => log::error!("Failed to settle giveaway {giveaway_id}: {e:?}"),
        }
    });
}
