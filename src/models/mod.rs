pub mod action;
pub mod blackjack;
pub mod cooldown;
pub mod giveaway;
pub mod level;
pub mod shop;
pub mod user;

pub use action::*;
pub use blackjack::*;
pub use cooldown::*;
pub use giveaway::*;
pub use level::*;
pub use shop::*;
pub use user::*;
