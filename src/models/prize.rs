use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::prize_entity;

use super::ParticipantResponse;

/// 创建奖品请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreatePrizeRequest {
    #[schema(example = "iPhone 16")]
    pub name: String,
    /// 总名额 (> 0)
    #[schema(example = 3)]
    pub quantity: i32,
    /// 单次抽取人数 (> 0，默认 1)
    #[schema(example = 1)]
    pub batch_size: Option<i32>,
    pub image_url: Option<String>,
    /// 展示顺序 (默认 0)
    pub sort_order: Option<i32>,
}

/// 更新奖品请求（仅更新提供的字段）
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdatePrizeRequest {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub batch_size: Option<i32>,
    pub image_url: Option<String>,
    /// 为 true 时清除奖品图片（优先于 image_url）
    #[serde(default)]
    pub clear_image: bool,
    pub sort_order: Option<i32>,
}

/// 奖品基础信息
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrizeResponse {
    pub id: i64,
    pub name: String,
    pub quantity: i32,
    pub batch_size: i32,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<prize_entity::Model> for PrizeResponse {
    fn from(m: prize_entity::Model) -> Self {
        PrizeResponse {
            id: m.id,
            name: m.name,
            quantity: m.quantity,
            batch_size: m.batch_size,
            image_url: m.image_url,
            sort_order: m.sort_order,
            created_at: m.created_at,
        }
    }
}

/// 奖品及中奖情况（用于大屏与汇总页）
/// remaining 为展示数据，可能与抽奖时的实际剩余不一致
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrizeSummaryResponse {
    pub id: i64,
    pub name: String,
    pub quantity: i32,
    pub batch_size: i32,
    pub image_url: Option<String>,
    pub sort_order: i32,
    /// 已中奖人数
    pub awarded: i64,
    /// 剩余名额 = max(0, quantity - awarded)
    pub remaining: i64,
    /// 中奖名单
    pub winners: Vec<ParticipantResponse>,
}

impl PrizeSummaryResponse {
    pub fn new(prize: prize_entity::Model, winners: Vec<ParticipantResponse>) -> Self {
        let awarded = winners.len() as u64;
        PrizeSummaryResponse {
            remaining: prize.remaining(awarded),
            awarded: awarded as i64,
            id: prize.id,
            name: prize.name,
            quantity: prize.quantity,
            batch_size: prize.batch_size,
            image_url: prize.image_url,
            sort_order: prize.sort_order,
            winners,
        }
    }
}
