use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::config::Config;
use crate::handlers::ensure_admin;
use crate::models::*;
use crate::services::{LevelService, UserService};

#[utoipa::path(
    post,
    path = "/users",
    tag = "user",
    request_body = EnsureUserRequest,
    responses(
        (status = 200, description = "注册成功或用户已存在", body = UserResponse)
    )
)]
pub async fn ensure_user(
    user_service: web::Data<UserService>,
    request: web::Json<EnsureUserRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();
    match user_service
        .ensure_user(req.user_id, req.user_name, &req.user_nickname)
        .await
    {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": UserResponse::from(user)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "user",
    params(("user_id" = i64, Path, description = "用户 id")),
    responses(
        (status = 200, description = "获取用户资料成功", body = UserResponse),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    level_service: web::Data<LevelService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let user = match user_service.get_user(user_id).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match level_service.ensure_level(user_id).await {
        Ok(level) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "user": UserResponse::from(user),
                "level": LevelResponse::from(level)
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/level",
    tag = "level",
    params(("user_id" = i64, Path, description = "用户 id")),
    responses(
        (status = 200, description = "获取等级成功", body = LevelResponse)
    )
)]
pub async fn get_level(
    level_service: web::Data<LevelService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match level_service.ensure_level(path.into_inner()).await {
        Ok(level) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": LevelResponse::from(level)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/balance",
    tag = "user",
    params(("user_id" = i64, Path, description = "用户 id")),
    responses(
        (status = 200, description = "获取余额成功", body = BalanceResponse),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn get_balance(
    user_service: web::Data<UserService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match user_service.balance(user_id).await {
        Ok(balance) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": BalanceResponse { user_id, balance }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/rates",
    tag = "user",
    params(("user_id" = i64, Path, description = "用户 id")),
    responses(
        (status = 200, description = "获取有效收入速率成功", body = RatesResponse)
    )
)]
pub async fn get_rates(
    user_service: web::Data<UserService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let coins_per_msg = match user_service.per_message_rate(user_id).await {
        Ok(v) => v,
        Err(e) => return Ok(e.error_response()),
    };
    match user_service.per_minute_rate(user_id).await {
        Ok(coins_per_min) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": RatesResponse { user_id, coins_per_msg, coins_per_min }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    tag = "user",
    request_body = AdminRequest,
    params(("user_id" = i64, Path, description = "用户 id")),
    responses(
        (status = 200, description = "删除成功"),
        (status = 403, description = "无管理员权限")
    )
)]
pub async fn delete_user(
    config: web::Data<Config>,
    user_service: web::Data<UserService>,
    path: web::Path<i64>,
    request: web::Json<AdminRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = ensure_admin(&config, request.admin_id) {
        return Ok(e.error_response());
    }
    match user_service.delete_user(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "level",
    responses(
        (status = 200, description = "获取排行榜成功", body = [LeaderboardEntry])
    )
)]
pub async fn get_leaderboard(level_service: web::Data<LevelService>) -> Result<HttpResponse> {
    match level_service.leaderboard().await {
        Ok(entries) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": entries
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::post().to(ensure_user))
            .route("/{user_id}", web::get().to(get_profile))
            .route("/{user_id}", web::delete().to(delete_user))
            .route("/{user_id}/level", web::get().to(get_level))
            .route("/{user_id}/balance", web::get().to(get_balance))
            .route("/{user_id}/rates", web::get().to(get_rates)),
    )
    .route("/leaderboard", web::get().to(get_leaderboard));
}
