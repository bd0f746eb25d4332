use crate::error::{AppError, AppResult};
use crate::games::blackjack::{deal_card, deal_hand, hand_value};
use crate::models::{RoundOutcome, RoundStateResponse};
use crate::services::UserService;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// 进行中的一局, 只存在于内存; 终局或进程退出即消失
#[derive(Debug, Clone)]
struct Round {
    player_id: i64,
    bet: i64,
    player_hand: Vec<i64>,
    dealer_hand: Vec<i64>,
}

/// 庄家补牌到点数 >= 17 为止, 返回最终手牌
pub fn dealer_play<R: rand::Rng + ?Sized>(mut hand: Vec<i64>, rng: &mut R) -> Vec<i64> {
    while hand_value(&hand) < 17 {
        hand.push(deal_card(rng));
    }
    hand
}

/// 双方都未爆牌时的比点
pub fn compare_hands(player_total: i64, dealer_total: i64) -> RoundOutcome {
    if dealer_total > 21 {
        RoundOutcome::DealerBust
    } else if player_total > dealer_total {
        RoundOutcome::PlayerWin
    } else if player_total < dealer_total {
        RoundOutcome::PlayerLose
    } else {
        RoundOutcome::Push
    }
}

/// 终局入账金额: 赢拿回 2x 下注, 平局退回下注, 输为 0
pub fn payout_for(outcome: RoundOutcome, bet: i64) -> i64 {
    match outcome {
        RoundOutcome::PlayerBlackjack
        | RoundOutcome::DealerBust
        | RoundOutcome::PlayerWin => bet * 2,
        RoundOutcome::Push => bet,
        RoundOutcome::PlayerBust | RoundOutcome::PlayerLose => 0,
        RoundOutcome::AwaitingAction => 0,
    }
}

/// 21 点服务: 下注先付, 终局结算
/// 局状态放内存, 钱的变动全走账本
#[derive(Clone)]
pub struct BlackjackService {
    users: UserService,
    rounds: Arc<Mutex<HashMap<String, Round>>>,
    min_bet: i64,
}

impl BlackjackService {
    pub fn new(users: UserService, min_bet: i64) -> Self {
        Self {
            users,
            rounds: Arc::new(Mutex::new(HashMap::new())),
            min_bet,
        }
    }

    /// 开局: 校验下注、预先扣款、各发两张牌
    /// 开局即 21 也停在等待态, 由玩家自己选择 hit/stand
    pub async fn start(&self, user_id: i64, bet: i64) -> AppResult<RoundStateResponse> {
        if bet < self.min_bet {
            return Err(AppError::ValidationError(format!(
                "Bet must be at least {} cents",
                self.min_bet
            )));
        }

        if !self.users.debit(user_id, bet).await? {
            return Err(AppError::InsufficientFunds);
        }

        let (player_hand, dealer_hand) = {
            let mut rng = rand::thread_rng();
            (deal_hand(&mut rng), deal_hand(&mut rng))
        };

        let round_id = Uuid::new_v4().to_string();
        let round = Round {
            player_id: user_id,
            bet,
            player_hand,
            dealer_hand,
        };

        let state = self.state_of(&round_id, &round, RoundOutcome::AwaitingAction, 0);
        self.rounds.lock().await.insert(round_id, round);
        Ok(state)
    }

    /// 要牌; 非本局玩家的操作返回 None, 调用方静默忽略
    pub async fn hit(&self, round_id: &str, user_id: i64) -> AppResult<Option<RoundStateResponse>> {
        let mut rounds = self.rounds.lock().await;
        let Some(round) = rounds.get_mut(round_id) else {
            return Err(AppError::NotFound("Round not found".to_string()));
        };
        if round.player_id != user_id {
            return Ok(None);
        }

        let card = {
            let mut rng = rand::thread_rng();
            deal_card(&mut rng)
        };
        round.player_hand.push(card);

        let total = hand_value(&round.player_hand);
        if total < 21 {
            return Ok(Some(self.state_of(round_id, round, RoundOutcome::AwaitingAction, 0)));
        }

        // 爆牌或打到 21 都是终局, 本局从表里摘除后结算
        let outcome = if total > 21 {
            RoundOutcome::PlayerBust
        } else {
            RoundOutcome::PlayerBlackjack
        };
        let Some(round) = rounds.remove(round_id) else {
            return Err(AppError::NotFound("Round not found".to_string()));
        };
        drop(rounds);
        Ok(Some(self.settle(round_id.to_string(), round, outcome).await?))
    }

    /// 停牌: 庄家补牌到 >= 17, 比点后结算
    pub async fn stand(
        &self,
        round_id: &str,
        user_id: i64,
    ) -> AppResult<Option<RoundStateResponse>> {
        let mut rounds = self.rounds.lock().await;
        let owner = rounds
            .get(round_id)
            .map(|r| r.player_id)
            .ok_or_else(|| AppError::NotFound("Round not found".to_string()))?;
        if owner != user_id {
            return Ok(None);
        }

        let Some(mut round) = rounds.remove(round_id) else {
            return Err(AppError::NotFound("Round not found".to_string()));
        };
        drop(rounds);

        round.dealer_hand = {
            let mut rng = rand::thread_rng();
            dealer_play(std::mem::take(&mut round.dealer_hand), &mut rng)
        };

        let outcome = compare_hands(hand_value(&round.player_hand), hand_value(&round.dealer_hand));
        Ok(Some(self.settle(round_id.to_string(), round, outcome).await?))
    }

    /// 终局结算: 按结果入账并吐出最终状态
    async fn settle(
        &self,
        round_id: String,
        round: Round,
        outcome: RoundOutcome,
    ) -> AppResult<RoundStateResponse> {
        let payout = payout_for(outcome, round.bet);
        if payout > 0 {
            self.users.credit(round.player_id, payout).await?;
        }
        log::info!(
            "Blackjack round {round_id} settled: user {} outcome {:?} payout {payout}",
            round.player_id,
            outcome
        );
        Ok(self.state_of(&round_id, &round, outcome, payout))
    }

    fn state_of(
        &self,
        round_id: &str,
        round: &Round,
        outcome: RoundOutcome,
        payout: i64,
    ) -> RoundStateResponse {
        RoundStateResponse {
            round_id: round_id.to_string(),
            player_hand: round.player_hand.clone(),
            player_total: hand_value(&round.player_hand),
            dealer_hand: round.dealer_hand.clone(),
            dealer_total: hand_value(&round.dealer_hand),
            bet: round.bet,
            outcome,
            payout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EconomyConfig;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn service_with_execs(n: usize) -> BlackjackService {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                };
                n
            ])
            .into_connection();
        BlackjackService::new(UserService::new(Arc::new(db), EconomyConfig::default()), 100)
    }

    #[test]
    fn dealer_stops_at_seventeen_or_more() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let hand = dealer_play(vec![2, 3], &mut rng);
            assert!(hand_value(&hand) >= 17);
        }
    }

    #[test]
    fn dealer_with_seventeen_takes_no_card() {
        let mut rng = rand::thread_rng();
        let hand = dealer_play(vec![10, 7], &mut rng);
        assert_eq!(hand, vec![10, 7]);
    }

    #[test]
    fn compare_twenty_vs_seventeen_is_player_win() {
        assert_eq!(compare_hands(20, 17), RoundOutcome::PlayerWin);
    }

    #[test]
    fn compare_detects_dealer_bust() {
        assert_eq!(compare_hands(18, 22), RoundOutcome::DealerBust);
    }

    #[test]
    fn compare_equal_totals_is_push() {
        assert_eq!(compare_hands(19, 19), RoundOutcome::Push);
    }

    #[test]
    fn payouts_follow_double_or_refund_rule() {
        assert_eq!(payout_for(RoundOutcome::PlayerWin, 100), 200);
        assert_eq!(payout_for(RoundOutcome::PlayerBlackjack, 100), 200);
        assert_eq!(payout_for(RoundOutcome::DealerBust, 100), 200);
        assert_eq!(payout_for(RoundOutcome::Push, 100), 100);
        assert_eq!(payout_for(RoundOutcome::PlayerLose, 100), 0);
        assert_eq!(payout_for(RoundOutcome::PlayerBust, 100), 0);
    }

    #[tokio::test]
    async fn fresh_round_always_waits_for_player_action() {
        let service = service_with_execs(200);
        for _ in 0..200 {
            let state = service.start(1, 100).await.unwrap();
            assert_eq!(state.outcome, RoundOutcome::AwaitingAction);
            assert_eq!(state.payout, 0);
        }
    }

    #[tokio::test]
    async fn hitting_to_twenty_one_or_beyond_ends_the_round() {
        let service = service_with_execs(4);

        let mut state = service.start(1, 100).await.unwrap();
        while state.outcome == RoundOutcome::AwaitingAction {
            state = service
                .hit(&state.round_id, 1)
                .await
                .unwrap()
                .expect("player owns the round");
        }

        if state.outcome == RoundOutcome::PlayerBlackjack {
            assert_eq!(state.player_total, 21);
            assert_eq!(state.payout, 200);
        } else {
            assert_eq!(state.outcome, RoundOutcome::PlayerBust);
            assert!(state.player_total > 21);
            assert_eq!(state.payout, 0);
        }

        // 终局已把这一局摘除, 继续要牌只能得到 NotFound
        assert!(matches!(
            service.hit(&state.round_id, 1).await,
            Err(AppError::NotFound(_))
        ));
    }
}
