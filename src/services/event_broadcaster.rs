//! In-process fan-out of draw events to connected display / control clients.
//!
//! 每个订阅者持有一个 broadcast receiver，事件以 JSON 形式推送
//! (`{"type": ..., "data": ...}`)，由 SSE 接口写给客户端。

use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::error::AppError;
use crate::models::WinnerRecord;

/// 推送给大屏 / 控制台的事件
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DrawEvent {
    /// 控制台切换奖品，大屏同步奖品图片
    PrizeSelected {
        prize_id: i64,
        image_url: Option<String>,
    },
    /// 校验通过，大屏开始滚动动画
    SpinStarted { prize_id: i64 },
    /// 抽奖事务已提交
    SpinCompleted {
        prize_id: i64,
        winners: Vec<WinnerRecord>,
    },
    /// 校验或抽奖失败，大屏必须中止动画
    SpinError { code: String, message: String },
    /// 数据变化（撤销中奖等），客户端需重新拉取列表
    DataRefreshRequired,
    ParticipantsImported { imported: u64 },
    ParticipantsReset { deleted: u64 },
}

impl DrawEvent {
    pub fn spin_error(err: &AppError) -> Self {
        DrawEvent::SpinError {
            code: err.code().to_string(),
            message: err.public_message(),
        }
    }

    /// 序列化为一帧 SSE 数据
    pub fn to_sse_frame(&self) -> String {
        let payload = serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("Failed to serialize draw event: {e}");
            r#"{"type":"data_refresh_required","data":null}"#.to_string()
        });
        format!("data: {payload}\n\n")
    }
}

const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<DrawEvent>,
    keepalive: Duration,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            keepalive: DEFAULT_KEEPALIVE,
        }
    }

    /// 设置 SSE 心跳间隔（为 0 时使用默认值）
    pub fn with_keepalive(mut self, keepalive: Duration) -> Self {
        if !keepalive.is_zero() {
            self.keepalive = keepalive;
        }
        self
    }

    pub fn keepalive(&self) -> Duration {
        self.keepalive
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DrawEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// 广播事件；没有订阅者时直接丢弃
    pub fn publish(&self, event: DrawEvent) {
        log::debug!("Broadcasting event: {event:?}");
        if self.sender.send(event).is_err() {
            log::debug!("No subscribers connected, event dropped");
        }
    }
}
