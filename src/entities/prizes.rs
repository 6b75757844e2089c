use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 奖品配置实体
/// 概念说明:
/// - quantity: 奖品总名额，中奖人数不可超过该值
/// - batch_size: 每次抽奖最多抽出的人数（不强制 <= quantity，抽奖时按剩余名额截断）
/// - sort_order: 展示顺序（升序）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "prizes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    /// 总名额
    pub quantity: i32,
    /// 单次抽取人数
    pub batch_size: i32,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 剩余名额 (不会为负)
    pub fn remaining(&self, awarded: u64) -> i64 {
        (i64::from(self.quantity) - awarded as i64).max(0)
    }

    /// 本次抽奖可抽取的人数: min(batch_size, quantity - awarded)
    pub fn draw_limit(&self, awarded: u64) -> u64 {
        let batch = u64::try_from(self.batch_size).unwrap_or(0);
        batch.min(self.remaining(awarded) as u64)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::participants::Entity")]
    Participants,
}

impl Related<super::participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn prize(quantity: i32, batch_size: i32) -> Model {
        Model {
            id: 1,
            name: "Grand".into(),
            quantity,
            batch_size,
            image_url: None,
            sort_order: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_draw_limit_capped_by_batch() {
        assert_eq!(prize(3, 2).draw_limit(0), 2);
    }

    #[test]
    fn test_draw_limit_capped_by_remaining() {
        assert_eq!(prize(3, 2).draw_limit(2), 1);
        assert_eq!(prize(3, 5).draw_limit(0), 3);
    }

    #[test]
    fn test_remaining_never_negative() {
        assert_eq!(prize(3, 1).remaining(3), 0);
        assert_eq!(prize(3, 1).remaining(4), 0);
        assert_eq!(prize(3, 1).draw_limit(4), 0);
    }
}
