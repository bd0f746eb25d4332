use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::entities::ActionKind;
use crate::models::*;
use crate::services::{BlackjackService, CooldownCheck, CooldownService};

#[utoipa::path(
    post,
    path = "/blackjack",
    tag = "blackjack",
    request_body = StartRoundRequest,
    responses(
        (status = 200, description = "开局成功, 等待玩家 hit/stand", body = RoundStateResponse),
        (status = 400, description = "下注不合法或余额不足"),
        (status = 429, description = "冷却未到")
    )
)]
pub async fn start_round(
    blackjack_service: web::Data<BlackjackService>,
    cooldown_service: web::Data<CooldownService>,
    request: web::Json<StartRoundRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();

    match cooldown_service.check(req.user_id, ActionKind::Blackjack).await {
        Ok(CooldownCheck::Permitted) => {}
        Ok(CooldownCheck::Denied { remaining_secs }) => {
            return Ok(crate::error::AppError::CooldownActive(remaining_secs).error_response());
        }
        Err(e) => return Ok(e.error_response()),
    }

    match blackjack_service.start(req.user_id, req.bet).await {
        Ok(state) => {
            // 下注成立才消耗冷却
            if let Err(e) = cooldown_service.mark(req.user_id, ActionKind::Blackjack).await {
                return Ok(e.error_response());
            }
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": state
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/blackjack/{round_id}/hit",
    tag = "blackjack",
    request_body = RoundActionRequest,
    params(("round_id" = String, Path, description = "局 id")),
    responses(
        (status = 200, description = "要牌后的局面", body = RoundStateResponse),
        (status = 204, description = "非本局玩家的操作, 忽略"),
        (status = 404, description = "局不存在")
    )
)]
pub async fn hit(
    blackjack_service: web::Data<BlackjackService>,
    path: web::Path<String>,
    request: web::Json<RoundActionRequest>,
) -> Result<HttpResponse> {
    match blackjack_service.hit(&path.into_inner(), request.user_id).await {
        Ok(Some(state)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": state
        }))),
        Ok(None) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/blackjack/{round_id}/stand",
    tag = "blackjack",
    request_body = RoundActionRequest,
    params(("round_id" = String, Path, description = "局 id")),
    responses(
        (status = 200, description = "停牌并结算后的局面", body = RoundStateResponse),
        (status = 204, description = "非本局玩家的操作, 忽略"),
        (status = 404, description = "局不存在")
    )
)]
pub async fn stand(
    blackjack_service: web::Data<BlackjackService>,
    path: web::Path<String>,
    request: web::Json<RoundActionRequest>,
) -> Result<HttpResponse> {
    match blackjack_service.stand(&path.into_inner(), request.user_id).await {
        Ok(Some(state)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": state
        }))),
        Ok(None) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn blackjack_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blackjack")
            .route("", web::post().to(start_round))
            .route("/{round_id}/hit", web::post().to(hit))
            .route("/{round_id}/stand", web::post().to(stand)),
    );
}
