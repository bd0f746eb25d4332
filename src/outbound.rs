//! Outbound announcements produced by background settlement.
//!
//! The HTTP surface is request/response, but giveaway results arrive on the
//! scheduler's clock. Settlement publishes an `Announcement` into this queue;
//! the transport adapter drains it and posts to the chat. Without an adapter
//! attached, `spawn_log_drain` keeps the channel from backing up.

use crate::models::GiveawaySettlement;
use tokio::sync::mpsc;

/// 需要推送到聊天侧的事件
#[derive(Debug, Clone)]
pub enum Announcement {
    /// 开奖结果, message_id 指向原公告帖 (若有)
    GiveawayResult(GiveawaySettlement),
}

/// 出站队列的发送端, 各后台任务共享
#[derive(Clone)]
pub struct OutboundQueue {
    tx: mpsc::UnboundedSender<Announcement>,
}

impl OutboundQueue {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Announcement>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// 入队; 接收端已关闭时只记日志, 不让结算失败
    pub fn publish(&self, announcement: Announcement) {
        if self.tx.send(announcement).is_err() {
            log::warn!("Outbound queue receiver dropped, announcement discarded");
        }
    }
}

/// 默认的队列消费者: 把公告写进日志
pub fn spawn_log_drain(mut rx: mpsc::UnboundedReceiver<Announcement>) {
    tokio::spawn(async move {
        while let Some(announcement) = rx.recv().await {
            match announcement {
                Announcement::GiveawayResult(settlement) => {
                    log::info!(
                        "Giveaway {} finished: {} entrants, winners: {}",
                        settlement.giveaway_id,
                        settlement.participant_count,
                        settlement
                            .winners
                            .iter()
                            .map(|w| format!("{} -> {}x {}", w.user_nickname, w.gift_amount, w.gift_name))
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn published_announcements_reach_the_receiver() {
        let (queue, mut rx) = OutboundQueue::new();
        queue.publish(Announcement::GiveawayResult(GiveawaySettlement {
            giveaway_id: 1,
            message_id: None,
            participant_count: 0,
            winners: Vec::new(),
        }));

        match rx.recv().await {
            Some(Announcement::GiveawayResult(s)) => assert_eq!(s.giveaway_id, 1),
            None => panic!("receiver closed"),
        }
    }

    #[tokio::test]
    async fn publish_after_receiver_drop_does_not_panic() {
        let (queue, rx) = OutboundQueue::new();
        drop(rx);
        queue.publish(Announcement::GiveawayResult(GiveawaySettlement {
            giveaway_id: 2,
            message_id: None,
            participant_count: 0,
            winners: Vec::new(),
        }));
    }
}
