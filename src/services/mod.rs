pub mod blackjack_service;
pub mod cooldown_service;
pub mod giveaway_service;
pub mod level_service;
pub mod shop_service;
pub mod user_service;

pub use blackjack_service::BlackjackService;
pub use cooldown_service::{CooldownCheck, CooldownService};
pub use giveaway_service::GiveawayService;
pub use level_service::LevelService;
pub use shop_service::ShopService;
pub use user_service::UserService;
