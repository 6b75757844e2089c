use crate::models::*;
use crate::services::{DrawEvent, DrawService, EventBroadcaster};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/game/validate",
    tag = "game",
    request_body = DrawRequest,
    responses(
        (status = 200, description = "可以抽奖（仅预检，不修改数据）", body = DrawEligibility),
        (status = 404, description = "奖品不存在"),
        (status = 409, description = "奖品已抽完或没有可抽人员")
    )
)]
/// 抽奖预检，不广播事件
pub async fn validate(
    service: web::Data<DrawService>,
    request: web::Json<DrawRequest>,
) -> Result<HttpResponse> {
    match service.validate(request.prize_id).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/game/draw",
    tag = "game",
    request_body = DrawRequest,
    responses(
        (status = 200, description = "抽奖成功，返回本次中奖者", body = [WinnerRecord]),
        (status = 404, description = "奖品不存在"),
        (status = 409, description = "奖品已抽完或没有可抽人员"),
        (status = 500, description = "事务失败，数据未变化")
    )
)]
/// 执行一次抽奖事务，不广播事件
pub async fn draw(
    service: web::Data<DrawService>,
    request: web::Json<DrawRequest>,
) -> Result<HttpResponse> {
    match service.draw(request.prize_id).await {
        Ok(winners) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": winners }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/game/start",
    tag = "game",
    request_body = DrawRequest,
    responses(
        (status = 200, description = "校验通过，已广播 spin_started", body = DrawEligibility),
        (status = 404, description = "奖品不存在，已广播 spin_error"),
        (status = 409, description = "奖品已抽完或没有可抽人员，已广播 spin_error")
    )
)]
/// 控制台"开始":
/// 1. 预检
/// 2. 通过则通知所有大屏开始滚动
/// 3. 失败则广播错误，大屏不进入滚动状态
pub async fn start_spin(
    service: web::Data<DrawService>,
    broadcaster: web::Data<EventBroadcaster>,
    request: web::Json<DrawRequest>,
) -> Result<HttpResponse> {
    let prize_id = request.prize_id;
    match service.validate(prize_id).await {
        Ok(data) => {
            broadcaster.publish(DrawEvent::SpinStarted { prize_id });
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
        }
        Err(e) => {
            log::warn!("Start spin rejected for prize {prize_id}: {e}");
            broadcaster.publish(DrawEvent::spin_error(&e));
            Ok(e.error_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/game/stop",
    tag = "game",
    request_body = DrawRequest,
    responses(
        (status = 200, description = "抽奖成功，已广播 spin_completed", body = [WinnerRecord]),
        (status = 404, description = "奖品不存在，已广播 spin_error"),
        (status = 409, description = "奖品已抽完或没有可抽人员，已广播 spin_error"),
        (status = 500, description = "事务失败，已广播 spin_error")
    )
)]
/// 控制台"停止": 执行抽奖事务并广播结果。
/// 即使之前 start 校验通过，这里的失败也以本次结果为准。
pub async fn stop_spin(
    service: web::Data<DrawService>,
    broadcaster: web::Data<EventBroadcaster>,
    request: web::Json<DrawRequest>,
) -> Result<HttpResponse> {
    let prize_id = request.prize_id;
    match service.draw(prize_id).await {
        Ok(winners) => {
            broadcaster.publish(DrawEvent::SpinCompleted {
                prize_id,
                winners: winners.clone(),
            });
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": winners })))
        }
        Err(e) => {
            log::warn!("Draw failed for prize {prize_id}: {e}");
            broadcaster.publish(DrawEvent::spin_error(&e));
            Ok(e.error_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/game/cancel",
    tag = "game",
    request_body = CancelRequest,
    responses(
        (status = 200, description = "已撤销中奖，已广播 data_refresh_required", body = ParticipantResponse),
        (status = 404, description = "人员不存在")
    )
)]
/// 撤销某人的中奖结果，该人员可再次参与抽奖
pub async fn cancel(
    service: web::Data<DrawService>,
    broadcaster: web::Data<EventBroadcaster>,
    request: web::Json<CancelRequest>,
) -> Result<HttpResponse> {
    match service.cancel(request.participant_id).await {
        Ok(participant) => {
            broadcaster.publish(DrawEvent::DataRefreshRequired);
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": participant })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/game/select-prize",
    tag = "game",
    request_body = SelectPrizeRequest,
    responses(
        (status = 200, description = "已广播 prize_selected")
    )
)]
/// 控制台切换奖品，大屏同步显示奖品图片
pub async fn select_prize(
    broadcaster: web::Data<EventBroadcaster>,
    request: web::Json<SelectPrizeRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    broadcaster.publish(DrawEvent::PrizeSelected {
        prize_id: request.prize_id,
        image_url: request.image_url,
    });
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// 路由配置
pub fn game_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/game")
            .route("/validate", web::post().to(validate))
            .route("/draw", web::post().to(draw))
            .route("/start", web::post().to(start_spin))
            .route("/stop", web::post().to(stop_spin))
            .route("/cancel", web::post().to(cancel))
            .route("/select-prize", web::post().to(select_prize)),
    );
}
