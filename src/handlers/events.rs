use crate::services::{DrawEvent, EventBroadcaster};
use actix_web::http::header;
use actix_web::{HttpResponse, Result, web};
use futures_util::{StreamExt, stream};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    responses(
        (status = 200, description = "Server-Sent Events 事件流 (text/event-stream)")
    )
)]
/// 大屏 / 控制台订阅事件流
/// 订阅者处理过慢丢失事件时，会收到 data_refresh_required 以便重新拉取数据
pub async fn subscribe(broadcaster: web::Data<EventBroadcaster>) -> Result<HttpResponse> {
    let rx = broadcaster.subscribe();
    log::info!(
        "Event subscriber connected, total: {}",
        broadcaster.subscriber_count()
    );

    let hello = stream::once(async {
        Ok::<_, actix_web::Error>(web::Bytes::from_static(b": connected\n\n"))
    });
    let period = broadcaster.keepalive();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // 空闲时按间隔发送心跳注释
    let events = stream::unfold((rx, ticker), |(mut rx, mut ticker)| async move {
        let frame = tokio::select! {
            received = rx.recv() => match received {
                Ok(event) => event.to_sse_frame(),
                Err(RecvError::Lagged(n)) => {
                    log::warn!("Event subscriber lagged, {n} event(s) skipped");
                    DrawEvent::DataRefreshRequired.to_sse_frame()
                }
                Err(RecvError::Closed) => return None,
            },
            _ = ticker.tick() => ": ping\n\n".to_string(),
        };
        Some((Ok::<_, actix_web::Error>(web::Bytes::from(frame)), (rx, ticker)))
    });

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(hello.chain(events)))
}

pub fn events_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/events", web::get().to(subscribe));
}
