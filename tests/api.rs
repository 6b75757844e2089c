mod common;

use std::future::poll_fn;
use std::pin::Pin;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::{App, http::StatusCode, http::header, test, web};
use luckydraw_backend::handlers;
use luckydraw_backend::services::{DrawEvent, EventBroadcaster};
use serde_json::{Value, json};

macro_rules! app {
    ($ctx:expr, $broadcaster:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx.draws.clone()))
                .app_data(web::Data::new($ctx.prizes.clone()))
                .app_data(web::Data::new($ctx.participants.clone()))
                .app_data(web::Data::new($broadcaster.clone()))
                .service(
                    web::scope("/api/v1")
                        .configure(handlers::game_config)
                        .configure(handlers::prize_config)
                        .configure(handlers::participant_config)
                        .configure(handlers::events_config),
                ),
        )
        .await
    };
}

/// 读取事件流的下一块数据
async fn next_frame<B: MessageBody>(body: &mut Pin<Box<B>>) -> String
where
    B::Error: std::fmt::Debug,
{
    let chunk = tokio::time::timeout(
        Duration::from_secs(5),
        poll_fn(|cx| body.as_mut().poll_next(cx)),
    )
    .await
    .expect("no frame within timeout")
    .expect("event stream ended")
    .unwrap();
    String::from_utf8(chunk.to_vec()).unwrap()
}

fn frame_json(frame: &str) -> Value {
    let payload = frame
        .strip_prefix("data: ")
        .and_then(|f| f.strip_suffix("\n\n"))
        .unwrap_or_else(|| panic!("not a data frame: {frame:?}"));
    serde_json::from_str(payload).unwrap()
}

#[actix_web::test]
async fn test_stop_broadcasts_winners() {
    let ctx = common::setup().await;
    let prize = ctx.create_prize("Drone", 2, 2).await;
    ctx.seed_participants(3).await;
    let broadcaster = EventBroadcaster::new(16);
    let mut display = broadcaster.subscribe();
    let app = app!(ctx, broadcaster);

    let req = test::TestRequest::post()
        .uri("/api/v1/game/start")
        .set_json(json!({ "prize_id": prize.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        display.recv().await.unwrap(),
        DrawEvent::SpinStarted { prize_id: prize.id }
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/game/stop")
        .set_json(json!({ "prize_id": prize.id }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    match display.recv().await.unwrap() {
        DrawEvent::SpinCompleted { prize_id, winners } => {
            assert_eq!(prize_id, prize.id);
            assert_eq!(winners.len(), 2);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[actix_web::test]
async fn test_start_on_exhausted_prize_broadcasts_error() {
    let ctx = common::setup().await;
    let prize = ctx.create_prize("Ticket", 1, 1).await;
    ctx.seed_participants(2).await;
    ctx.draws.draw(prize.id).await.unwrap();

    let broadcaster = EventBroadcaster::new(16);
    let mut display = broadcaster.subscribe();
    let app = app!(ctx, broadcaster);

    let req = test::TestRequest::post()
        .uri("/api/v1/game/start")
        .set_json(json!({ "prize_id": prize.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "PRIZE_EXHAUSTED");
    assert!(body["error"]["message"].as_str().unwrap().contains("1/1"));

    match display.recv().await.unwrap() {
        DrawEvent::SpinError { code, .. } => assert_eq!(code, "PRIZE_EXHAUSTED"),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[actix_web::test]
async fn test_draw_unknown_prize_returns_not_found() {
    let ctx = common::setup().await;
    let broadcaster = EventBroadcaster::new(4);
    let app = app!(ctx, broadcaster);

    let req = test::TestRequest::post()
        .uri("/api/v1/game/draw")
        .set_json(json!({ "prize_id": 42 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_cancel_requests_refresh() {
    let ctx = common::setup().await;
    let prize = ctx.create_prize("Lamp", 1, 1).await;
    ctx.seed_participants(1).await;
    let winner = ctx.draws.draw(prize.id).await.unwrap().remove(0);

    let broadcaster = EventBroadcaster::new(4);
    let mut display = broadcaster.subscribe();
    let app = app!(ctx, broadcaster);

    let req = test::TestRequest::post()
        .uri("/api/v1/game/cancel")
        .set_json(json!({ "participant_id": winner.participant_id }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["is_winner"], false);
    assert_eq!(display.recv().await.unwrap(), DrawEvent::DataRefreshRequired);

    let req = test::TestRequest::get().uri("/api/v1/prizes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["remaining"], 1);
}

#[actix_web::test]
async fn test_import_and_list_participants() {
    let ctx = common::setup().await;
    let broadcaster = EventBroadcaster::new(4);
    let app = app!(ctx, broadcaster);

    let req = test::TestRequest::post()
        .uri("/api/v1/participants/import")
        .insert_header(("content-type", "text/csv"))
        .set_payload("E1,Ann,HR\nE2,Ben,IT\n")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["imported"], 2);

    let req = test::TestRequest::get().uri("/api/v1/participants").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "Ann");
    assert_eq!(list[0]["is_winner"], false);
}

#[actix_web::test]
async fn test_event_stream_delivers_frames() {
    let ctx = common::setup().await;
    let prize = ctx.create_prize("Camera", 1, 1).await;
    ctx.seed_participants(2).await;
    let broadcaster = EventBroadcaster::new(16);
    let app = app!(ctx, broadcaster);

    let req = test::TestRequest::get().uri("/api/v1/events").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
    let mut body = Box::pin(resp.into_body());
    assert_eq!(next_frame(&mut body).await, ": connected\n\n");
    assert_eq!(broadcaster.subscriber_count(), 1);

    let req = test::TestRequest::post()
        .uri("/api/v1/game/start")
        .set_json(json!({ "prize_id": prize.id }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let event = frame_json(&next_frame(&mut body).await);
    assert_eq!(event["type"], "spin_started");
    assert_eq!(event["data"]["prize_id"], prize.id);

    let req = test::TestRequest::post()
        .uri("/api/v1/game/stop")
        .set_json(json!({ "prize_id": prize.id }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let event = frame_json(&next_frame(&mut body).await);
    assert_eq!(event["type"], "spin_completed");
    assert_eq!(event["data"]["winners"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_lagging_subscriber_is_told_to_refresh() {
    let ctx = common::setup().await;
    let broadcaster = EventBroadcaster::new(1);
    let app = app!(ctx, broadcaster);

    let req = test::TestRequest::get().uri("/api/v1/events").to_request();
    let resp = test::call_service(&app, req).await;
    let mut body = Box::pin(resp.into_body());
    assert_eq!(next_frame(&mut body).await, ": connected\n\n");

    for prize_id in 1..=3 {
        broadcaster.publish(DrawEvent::SpinStarted { prize_id });
    }

    let event = frame_json(&next_frame(&mut body).await);
    assert_eq!(event["type"], "data_refresh_required");
    let event = frame_json(&next_frame(&mut body).await);
    assert_eq!(event["type"], "spin_started");
    assert_eq!(event["data"]["prize_id"], 3);
}

#[actix_web::test]
async fn test_idle_event_stream_sends_keepalive() {
    let ctx = common::setup().await;
    let broadcaster = EventBroadcaster::new(4).with_keepalive(Duration::from_millis(50));
    let app = app!(ctx, broadcaster);

    let req = test::TestRequest::get().uri("/api/v1/events").to_request();
    let resp = test::call_service(&app, req).await;
    let mut body = Box::pin(resp.into_body());
    assert_eq!(next_frame(&mut body).await, ": connected\n\n");
    assert_eq!(next_frame(&mut body).await, ": ping\n\n");

    broadcaster.publish(DrawEvent::DataRefreshRequired);
    let event = frame_json(&next_frame(&mut body).await);
    assert_eq!(event["type"], "data_refresh_required");
}
