//! 21 点发牌与算点
//!
//! 牌池按四副牌的比例固定 (2-9 各 4 张, 10/JQK 共 16 张, A 记 11 共 4 张),
//! 每次抽牌独立且放回, 不做消耗式牌靴

use rand::seq::SliceRandom;

/// 一副牌内 13 个点数, 10 重复 4 次对应 10/J/Q/K, A 记 11
/// 按比例抽取等价于四副牌合成的牌靴
pub const CARD_POOL: [i64; 13] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10, 11];

/// 抽一张牌
pub fn deal_card<R: rand::Rng + ?Sized>(rng: &mut R) -> i64 {
    *CARD_POOL.choose(rng).unwrap_or(&2)
}

/// 起手两张
pub fn deal_hand<R: rand::Rng + ?Sized>(rng: &mut R) -> Vec<i64> {
    vec![deal_card(rng), deal_card(rng)]
}

/// 手牌点数; 超过 21 且含 A(11) 时按软 A 规则减 10, 只减一次
pub fn hand_value(hand: &[i64]) -> i64 {
    let total: i64 = hand.iter().sum();
    if total <= 21 {
        return total;
    }
    if hand.contains(&11) { total - 10 } else { total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn soft_ace_counts_as_blackjack() {
        assert_eq!(hand_value(&[10, 11]), 21);
    }

    #[test]
    fn soft_ace_adjustment_applied_once() {
        // 11 + 11 = 22 -> 12
        assert_eq!(hand_value(&[11, 11]), 12);
        // 11 + 11 + 10 = 32 -> 22, 仍然爆牌
        assert_eq!(hand_value(&[11, 11, 10]), 22);
    }

    #[test]
    fn bust_without_ace_is_not_adjusted() {
        assert_eq!(hand_value(&[10, 10, 5]), 25);
    }

    #[test]
    fn small_hand_is_plain_sum() {
        assert_eq!(hand_value(&[5, 6]), 11);
    }

    #[test]
    fn dealt_cards_come_from_the_pool() {
        let mut rng = thread_rng();
        for _ in 0..100 {
            let card = deal_card(&mut rng);
            assert!(CARD_POOL.contains(&card));
        }
    }

    #[test]
    fn starting_hand_has_two_cards() {
        let mut rng = thread_rng();
        assert_eq!(deal_hand(&mut rng).len(), 2);
    }
}
