use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{participant_entity, prize_entity};

/// 校验 / 抽奖请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DrawRequest {
    pub prize_id: i64,
}

/// 撤销中奖请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CancelRequest {
    pub participant_id: i64,
}

/// 控制台切换当前奖品（大屏同步奖品图片）
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SelectPrizeRequest {
    pub prize_id: i64,
    pub image_url: Option<String>,
}

/// 校验通过时返回的抽奖资格信息（仅供参考，抽奖时会重新校验）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DrawEligibility {
    pub prize_id: i64,
    pub awarded: u64,
    pub quantity: i32,
    pub remaining: i64,
    /// 全部未中奖人数
    pub eligible_participants: u64,
}

/// 本次抽奖的中奖者（包含大屏直接展示所需的信息）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct WinnerRecord {
    pub participant_id: i64,
    pub code: String,
    pub name: String,
    pub department: Option<String>,
    pub avatar_url: Option<String>,
    pub prize_id: i64,
    pub prize_name: String,
    pub won_at: DateTime<Utc>,
}

impl WinnerRecord {
    pub fn new(
        participant: participant_entity::Model,
        prize: &prize_entity::Model,
        won_at: DateTime<Utc>,
    ) -> Self {
        WinnerRecord {
            participant_id: participant.id,
            code: participant.code,
            name: participant.name,
            department: participant.department,
            avatar_url: participant.avatar_url,
            prize_id: prize.id,
            prize_name: prize.name.clone(),
            won_at,
        }
    }
}
