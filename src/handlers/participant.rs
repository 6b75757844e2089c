use crate::models::*;
use crate::services::{DrawEvent, EventBroadcaster, ParticipantService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/participants",
    tag = "participant",
    responses(
        (status = 200, description = "获取人员列表成功", body = [ParticipantResponse])
    )
)]
/// 全部人员及中奖状态（按姓名排序）
pub async fn list_participants(service: web::Data<ParticipantService>) -> Result<HttpResponse> {
    match service.list_participants().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/participants/{id}",
    tag = "participant",
    params(("id" = i64, Path, description = "人员ID")),
    responses(
        (status = 200, description = "获取人员成功", body = ParticipantResponse),
        (status = 404, description = "人员不存在")
    )
)]
pub async fn get_participant(
    service: web::Data<ParticipantService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.get_participant(path.into_inner()).await {
        Ok(p) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": p }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/participants/import",
    tag = "participant",
    request_body(content = String, content_type = "text/csv", description = "每行: code,name,department"),
    responses(
        (status = 200, description = "导入完成", body = ImportParticipantsResponse),
        (status = 400, description = "文件不是有效的 UTF-8")
    )
)]
/// 导入 CSV 名单（按编号去重，可重复导入）
pub async fn import_participants(
    service: web::Data<ParticipantService>,
    broadcaster: web::Data<EventBroadcaster>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let content = match std::str::from_utf8(&body) {
        Ok(s) => s,
        Err(_) => {
            return Ok(crate::error::AppError::ValidationError(
                "CSV file must be UTF-8 encoded".into(),
            )
            .error_response());
        }
    };

    match service.import_csv(content).await {
        Ok(result) => {
            if result.imported > 0 {
                broadcaster.publish(DrawEvent::ParticipantsImported {
                    imported: result.imported,
                });
            }
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/participants/reset",
    tag = "participant",
    responses(
        (status = 200, description = "已清空人员", body = ResetParticipantsResponse)
    )
)]
/// 清空全部人员（含中奖记录）
pub async fn reset_participants(
    service: web::Data<ParticipantService>,
    broadcaster: web::Data<EventBroadcaster>,
) -> Result<HttpResponse> {
    match service.reset().await {
        Ok(result) => {
            broadcaster.publish(DrawEvent::ParticipantsReset {
                deleted: result.deleted,
            });
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn participant_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/participants")
            .route("", web::get().to(list_participants))
            .route("/import", web::post().to(import_participants))
            .route("/reset", web::delete().to(reset_participants))
            .route("/{id}", web::get().to(get_participant)),
    );
}
