use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{participant_entity, prize_entity};

/// 人员信息及中奖状态
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParticipantResponse {
    pub id: i64,
    #[schema(example = "E001")]
    pub code: String,
    pub name: String,
    pub department: Option<String>,
    pub avatar_url: Option<String>,
    pub is_winner: bool,
    pub prize_id: Option<i64>,
    /// 中奖奖品名称（未中奖为空）
    pub prize_name: Option<String>,
    pub won_at: Option<DateTime<Utc>>,
}

impl ParticipantResponse {
    pub fn with_prize(m: participant_entity::Model, prize: Option<&prize_entity::Model>) -> Self {
        let mut resp = ParticipantResponse::from(m);
        resp.prize_name = prize.map(|p| p.name.clone());
        resp
    }
}

impl From<participant_entity::Model> for ParticipantResponse {
    fn from(m: participant_entity::Model) -> Self {
        ParticipantResponse {
            id: m.id,
            code: m.code,
            name: m.name,
            department: m.department,
            avatar_url: m.avatar_url,
            is_winner: m.is_winner,
            prize_id: m.prize_id,
            prize_name: None,
            won_at: m.won_at,
        }
    }
}

/// CSV 导入结果
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportParticipantsResponse {
    /// 新增人数
    pub imported: u64,
    /// 已存在或无效而跳过的行数
    pub skipped: u64,
}

/// 清空人员结果
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResetParticipantsResponse {
    pub deleted: u64,
}
