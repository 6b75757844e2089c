use crate::models::*;
use crate::services::PrizeService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/prizes",
    tag = "prize",
    responses(
        (status = 200, description = "获取奖品及中奖名单成功", body = [PrizeSummaryResponse])
    )
)]
/// 全部奖品，附带剩余名额与中奖名单（汇总页）
pub async fn list_prizes(service: web::Data<PrizeService>) -> Result<HttpResponse> {
    match service.list_with_winners().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/prizes/available",
    tag = "prize",
    responses(
        (status = 200, description = "获取仍有名额的奖品成功", body = [PrizeSummaryResponse])
    )
)]
pub async fn list_available(service: web::Data<PrizeService>) -> Result<HttpResponse> {
    match service.list_available().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/prizes/{id}",
    tag = "prize",
    params(("id" = i64, Path, description = "奖品ID")),
    responses(
        (status = 200, description = "获取奖品成功", body = PrizeResponse),
        (status = 404, description = "奖品不存在")
    )
)]
pub async fn get_prize(
    service: web::Data<PrizeService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.get_prize(path.into_inner()).await {
        Ok(prize) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": prize }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/prizes",
    tag = "prize",
    request_body = CreatePrizeRequest,
    responses(
        (status = 200, description = "创建奖品成功", body = PrizeResponse),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn create_prize(
    service: web::Data<PrizeService>,
    request: web::Json<CreatePrizeRequest>,
) -> Result<HttpResponse> {
    match service.create_prize(request.into_inner()).await {
        Ok(prize) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": prize }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/prizes/{id}",
    tag = "prize",
    params(("id" = i64, Path, description = "奖品ID")),
    request_body = UpdatePrizeRequest,
    responses(
        (status = 200, description = "更新奖品成功", body = PrizeResponse),
        (status = 400, description = "请求参数错误或数量低于已中奖人数"),
        (status = 404, description = "奖品不存在")
    )
)]
pub async fn update_prize(
    service: web::Data<PrizeService>,
    path: web::Path<i64>,
    request: web::Json<UpdatePrizeRequest>,
) -> Result<HttpResponse> {
    match service
        .update_prize(path.into_inner(), request.into_inner())
        .await
    {
        Ok(prize) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": prize }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/prizes/{id}",
    tag = "prize",
    params(("id" = i64, Path, description = "奖品ID")),
    responses(
        (status = 200, description = "删除奖品成功"),
        (status = 400, description = "奖品仍有中奖者"),
        (status = 404, description = "奖品不存在")
    )
)]
pub async fn delete_prize(
    service: web::Data<PrizeService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.delete_prize(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn prize_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prizes")
            .route("", web::get().to(list_prizes))
            .route("", web::post().to(create_prize))
            .route("/available", web::get().to(list_available))
            .route("/{id}", web::get().to(get_prize))
            .route("/{id}", web::put().to(update_prize))
            .route("/{id}", web::delete().to(delete_prize)),
    );
}
