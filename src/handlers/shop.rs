use actix_web::{HttpResponse, ResponseError, Result, web};
use serde::Deserialize;
use serde_json::json;

use crate::models::*;
use crate::services::ShopService;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ShopQuery {
    /// 买家用户 id, 价格按其持有数量报价
    pub user_id: i64,
}

#[utoipa::path(
    get,
    path = "/shop",
    tag = "shop",
    params(ShopQuery),
    responses(
        (status = 200, description = "商店列表与买家余额", body = ShopListResponse),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn list_shop(
    shop_service: web::Data<ShopService>,
    query: web::Query<ShopQuery>,
) -> Result<HttpResponse> {
    match shop_service.list_items(query.user_id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/shop/purchase",
    tag = "shop",
    request_body = PurchaseRequest,
    responses(
        (status = 200, description = "购买成功", body = PurchaseResponse),
        (status = 400, description = "余额不足"),
        (status = 404, description = "加成器不存在")
    )
)]
pub async fn purchase(
    shop_service: web::Data<ShopService>,
    request: web::Json<PurchaseRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();
    match shop_service.purchase(req.user_id, req.booster_id).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn shop_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/shop")
            .route("", web::get().to(list_shop))
            .route("/purchase", web::post().to(purchase)),
    );
}
