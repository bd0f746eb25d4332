use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::config::Config;
use crate::handlers::ensure_admin;
use crate::models::*;
use crate::outbound::OutboundQueue;
use crate::services::{GiveawayService, UserService};
use crate::tasks::spawn_giveaway_waiter;

#[utoipa::path(
    post,
    path = "/giveaways",
    tag = "giveaway",
    request_body = CreateGiveawayRequest,
    responses(
        (status = 200, description = "创建成功并挂起开奖任务", body = GiveawayCreatedResponse),
        (status = 400, description = "参数不合法"),
        (status = 403, description = "无管理员权限")
    )
)]
pub async fn create_giveaway(
    config: web::Data<Config>,
    giveaway_service: web::Data<GiveawayService>,
    outbound: web::Data<OutboundQueue>,
    request: web::Json<CreateGiveawayRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();
    if let Err(e) = ensure_admin(&config, req.admin_id) {
        return Ok(e.error_response());
    }

    match giveaway_service.create(&req).await {
        Ok(created) => {
            spawn_giveaway_waiter(
                giveaway_service.get_ref().clone(),
                outbound.get_ref().clone(),
                created.giveaway_id,
                created.end_time,
            );
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": created
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/giveaways/{giveaway_id}",
    tag = "giveaway",
    params(("giveaway_id" = i64, Path, description = "抽奖 id")),
    responses(
        (status = 200, description = "抽奖详情", body = GiveawayInfoResponse),
        (status = 404, description = "抽奖不存在")
    )
)]
pub async fn get_giveaway(
    giveaway_service: web::Data<GiveawayService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match giveaway_service.info(path.into_inner()).await {
        Ok(info) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": info
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/giveaways/{giveaway_id}/participate",
    tag = "giveaway",
    request_body = ParticipateRequest,
    params(("giveaway_id" = i64, Path, description = "抽奖 id")),
    responses(
        (status = 200, description = "报名成功", body = ParticipateResponse),
        (status = 404, description = "抽奖不存在"),
        (status = 409, description = "重复报名"),
        (status = 410, description = "抽奖已截止")
    )
)]
pub async fn participate(
    user_service: web::Data<UserService>,
    giveaway_service: web::Data<GiveawayService>,
    path: web::Path<i64>,
    request: web::Json<ParticipateRequest>,
) -> Result<HttpResponse> {
    let giveaway_id = path.into_inner();
    let req = request.into_inner();

    // 报名视作首次接触, 顺带注册
    let nickname = req.user_nickname.clone().unwrap_or_else(|| req.user_id.to_string());
    if let Err(e) = user_service
        .ensure_user(req.user_id, req.user_name.clone(), &nickname)
        .await
    {
        return Ok(e.error_response());
    }

    match giveaway_service.participate(giveaway_id, req.user_id).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/giveaways/{giveaway_id}/message",
    tag = "giveaway",
    request_body = SetMessageRequest,
    params(("giveaway_id" = i64, Path, description = "抽奖 id")),
    responses(
        (status = 200, description = "公告消息回填成功"),
        (status = 404, description = "抽奖不存在")
    )
)]
pub async fn set_message(
    giveaway_service: web::Data<GiveawayService>,
    path: web::Path<i64>,
    request: web::Json<SetMessageRequest>,
) -> Result<HttpResponse> {
    match giveaway_service
        .set_message_id(path.into_inner(), request.message_id)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/giveaways/{giveaway_id}",
    tag = "giveaway",
    request_body = AdminRequest,
    params(("giveaway_id" = i64, Path, description = "抽奖 id")),
    responses(
        (status = 200, description = "撤销成功, 等待中的开奖任务会安静退出"),
        (status = 403, description = "无管理员权限"),
        (status = 404, description = "抽奖不存在")
    )
)]
pub async fn cancel_giveaway(
    config: web::Data<Config>,
    giveaway_service: web::Data<GiveawayService>,
    path: web::Path<i64>,
    request: web::Json<AdminRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = ensure_admin(&config, request.admin_id) {
        return Ok(e.error_response());
    }
    match giveaway_service.cancel(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn giveaway_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/giveaways")
            .route("", web::post().to(create_giveaway))
            .route("/{giveaway_id}", web::get().to(get_giveaway))
            .route("/{giveaway_id}", web::delete().to(cancel_giveaway))
            .route("/{giveaway_id}/participate", web::post().to(participate))
            .route("/{giveaway_id}/message", web::put().to(set_message)),
    );
}
