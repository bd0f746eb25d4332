pub mod action_cooldowns;
pub mod boosters;
pub mod giveaway_gifts;
pub mod giveaway_participants;
pub mod giveaways;
pub mod user_actions;
pub mod user_boosters;
pub mod user_levels;
pub mod users;

pub use action_cooldowns as action_cooldown_entity;
pub use boosters as booster_entity;
pub use giveaway_gifts as giveaway_gift_entity;
pub use giveaway_participants as giveaway_participant_entity;
pub use giveaways as giveaway_entity;
pub use user_actions as user_action_entity;
pub use user_boosters as user_booster_entity;
pub use user_levels as user_level_entity;
pub use users as user_entity;

pub use action_cooldowns::ActionKind;
pub use boosters::BoosterType;
pub use giveaways::GiveawayType;
