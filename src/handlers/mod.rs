pub mod action;
pub mod blackjack;
pub mod giveaway;
pub mod shop;
pub mod user;

pub use action::action_config;
pub use blackjack::blackjack_config;
pub use giveaway::giveaway_config;
pub use shop::shop_config;
pub use user::user_config;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// 管理操作鉴权: 操作者必须在配置的管理员名单内
pub fn ensure_admin(config: &Config, user_id: i64) -> AppResult<()> {
    if config.bot.admins.contains(&user_id) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}
