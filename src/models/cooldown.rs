use crate::entities::ActionKind;
use crate::entities::action_cooldown_entity as action_cooldowns;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CooldownEntry {
    pub action: ActionKind,
    pub cooldown_secs: i64,
}

impl From<action_cooldowns::Model> for CooldownEntry {
    fn from(model: action_cooldowns::Model) -> Self {
        Self {
            action: model.action,
            cooldown_secs: model.cooldown_secs,
        }
    }
}
