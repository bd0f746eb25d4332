pub mod blackjack;
pub mod eight_ball;
