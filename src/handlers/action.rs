use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::config::Config;
use crate::entities::ActionKind;
use crate::error::AppError;
use crate::games::eight_ball as eight_ball_game;
use crate::models::*;
use crate::services::{CooldownCheck, CooldownService, LevelService, UserService};

/// 冷却放行判定转 429, 用于拒绝时要报错的动作
fn deny(check: CooldownCheck) -> Option<AppError> {
    match check {
        CooldownCheck::Permitted => None,
        CooldownCheck::Denied { remaining_secs } => Some(AppError::CooldownActive(remaining_secs)),
    }
}

#[utoipa::path(
    post,
    path = "/actions/message",
    tag = "action",
    request_body = MessageEventRequest,
    responses(
        (status = 200, description = "消息已结算收入与经验", body = MessageEventResponse),
        (status = 204, description = "冷却未到, 本条消息不发奖励")
    )
)]
pub async fn message_event(
    user_service: web::Data<UserService>,
    level_service: web::Data<LevelService>,
    cooldown_service: web::Data<CooldownService>,
    request: web::Json<MessageEventRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();

    if let Err(e) = user_service
        .ensure_user(req.user_id, req.user_name.clone(), &req.user_nickname)
        .await
    {
        return Ok(e.error_response());
    }

    // 消息冷却内不报错, 静默不发奖
    match cooldown_service.check(req.user_id, ActionKind::Message).await {
        Ok(CooldownCheck::Permitted) => {}
        Ok(CooldownCheck::Denied { .. }) => return Ok(HttpResponse::NoContent().finish()),
        Err(e) => return Ok(e.error_response()),
    }
    if let Err(e) = cooldown_service.mark(req.user_id, ActionKind::Message).await {
        return Ok(e.error_response());
    }

    let earned = match user_service.per_message_rate(req.user_id).await {
        Ok(rate) => rate,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = user_service.credit(req.user_id, earned).await {
        return Ok(e.error_response());
    }

    match level_service.award_xp(req.user_id).await {
        Ok(xp) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": MessageEventResponse { earned, xp }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/actions/who",
    tag = "action",
    request_body = ActorRequest,
    responses(
        (status = 200, description = "随机点名成功", body = WhoResponse),
        (status = 429, description = "冷却未到")
    )
)]
pub async fn who(
    user_service: web::Data<UserService>,
    cooldown_service: web::Data<CooldownService>,
    request: web::Json<ActorRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();

    match cooldown_service.check(req.user_id, ActionKind::Who).await {
        Ok(check) => {
            if let Some(e) = deny(check) {
                return Ok(e.error_response());
            }
        }
        Err(e) => return Ok(e.error_response()),
    }
    if let Err(e) = cooldown_service.mark(req.user_id, ActionKind::Who).await {
        return Ok(e.error_response());
    }

    match user_service.random_user().await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": WhoResponse {
                user_id: user.user_id,
                user_nickname: user.user_nickname,
            }
        }))),
        Ok(None) => Ok(AppError::NotFound("No users registered yet".to_string()).error_response()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/actions/eight-ball",
    tag = "action",
    request_body = ActorRequest,
    responses(
        (status = 200, description = "魔法球回答", body = EightBallResponse),
        (status = 429, description = "冷却未到")
    )
)]
pub async fn eight_ball(
    cooldown_service: web::Data<CooldownService>,
    request: web::Json<ActorRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();

    match cooldown_service.check(req.user_id, ActionKind::EightBall).await {
        Ok(check) => {
            if let Some(e) = deny(check) {
                return Ok(e.error_response());
            }
        }
        Err(e) => return Ok(e.error_response()),
    }
    if let Err(e) = cooldown_service.mark(req.user_id, ActionKind::EightBall).await {
        return Ok(e.error_response());
    }

    let phrase = {
        let mut rng = rand::thread_rng();
        eight_ball_game::random_phrase(&mut rng).to_string()
    };
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": EightBallResponse { phrase }
    })))
}

#[utoipa::path(
    post,
    path = "/actions/pick",
    tag = "action",
    request_body = PickRequest,
    responses(
        (status = 200, description = "已从候选项中随机选取", body = PickResponse),
        (status = 400, description = "候选项为空"),
        (status = 429, description = "冷却未到")
    )
)]
pub async fn pick(
    cooldown_service: web::Data<CooldownService>,
    request: web::Json<PickRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();

    let variants: Vec<&str> = req
        .variants
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    if variants.is_empty() {
        return Ok(
            AppError::ValidationError("No variants to pick from".to_string()).error_response(),
        );
    }

    match cooldown_service.check(req.user_id, ActionKind::Pick).await {
        Ok(check) => {
            if let Some(e) = deny(check) {
                return Ok(e.error_response());
            }
        }
        Err(e) => return Ok(e.error_response()),
    }
    if let Err(e) = cooldown_service.mark(req.user_id, ActionKind::Pick).await {
        return Ok(e.error_response());
    }

    let picked = {
        use rand::seq::SliceRandom;
        let mut rng = rand::thread_rng();
        variants
            .choose(&mut rng)
            .map(|v| v.to_string())
            .unwrap_or_default()
    };
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": PickResponse { picked }
    })))
}

#[utoipa::path(
    post,
    path = "/actions/rating",
    tag = "action",
    request_body = ActorRequest,
    responses(
        (status = 200, description = "排行榜", body = [LeaderboardEntry]),
        (status = 429, description = "冷却未到")
    )
)]
pub async fn rating(
    level_service: web::Data<LevelService>,
    cooldown_service: web::Data<CooldownService>,
    request: web::Json<ActorRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();

    match cooldown_service.check(req.user_id, ActionKind::Rating).await {
        Ok(check) => {
            if let Some(e) = deny(check) {
                return Ok(e.error_response());
            }
        }
        Err(e) => return Ok(e.error_response()),
    }
    if let Err(e) = cooldown_service.mark(req.user_id, ActionKind::Rating).await {
        return Ok(e.error_response());
    }

    match level_service.leaderboard().await {
        Ok(entries) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": entries
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/actions/media",
    tag = "action",
    request_body = MediaRequest,
    responses(
        (status = 200, description = "扣费成功, 授予媒体动作", body = MediaResponse),
        (status = 400, description = "余额不足"),
        (status = 429, description = "冷却未到")
    )
)]
pub async fn media(
    config: web::Data<Config>,
    user_service: web::Data<UserService>,
    cooldown_service: web::Data<CooldownService>,
    request: web::Json<MediaRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();
    let (action, price) = match req.kind {
        MediaKind::Anime => (ActionKind::Anime, config.economy.anime_price),
        MediaKind::Image => (ActionKind::Image, config.economy.img_price),
    };

    match cooldown_service.check(req.user_id, action).await {
        Ok(check) => {
            if let Some(e) = deny(check) {
                return Ok(e.error_response());
            }
        }
        Err(e) => return Ok(e.error_response()),
    }

    // 先扣费再记时间戳, 余额不足时不消耗冷却
    match user_service.debit(req.user_id, price).await {
        Ok(true) => {}
        Ok(false) => return Ok(AppError::InsufficientFunds.error_response()),
        Err(e) => return Ok(e.error_response()),
    }
    if let Err(e) = cooldown_service.mark(req.user_id, action).await {
        return Ok(e.error_response());
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": MediaResponse { granted: true, charged: price }
    })))
}

#[utoipa::path(
    get,
    path = "/actions/cooldowns",
    tag = "action",
    responses(
        (status = 200, description = "冷却配置列表", body = [CooldownEntry])
    )
)]
pub async fn list_cooldowns(cooldown_service: web::Data<CooldownService>) -> Result<HttpResponse> {
    match cooldown_service.list().await {
        Ok(entries) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": entries
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn action_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/actions")
            .route("/message", web::post().to(message_event))
            .route("/who", web::post().to(who))
            .route("/eight-ball", web::post().to(eight_ball))
            .route("/pick", web::post().to(pick))
            .route("/rating", web::post().to(rating))
            .route("/media", web::post().to(media))
            .route("/cooldowns", web::get().to(list_cooldowns)),
    );
}
