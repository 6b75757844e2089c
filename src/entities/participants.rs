use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 参与抽奖人员实体
/// 说明:
/// - code 为外部人员编号 (唯一, 大写)，导入时据此去重
/// - is_winner / prize_id / won_at 三者同时为空或同时有值
/// - 仅抽奖 (draw) 与撤销 (cancel) 会修改中奖字段
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    /// 部门 / 标签
    pub department: Option<String>,
    pub avatar_url: Option<String>,
    pub is_winner: bool,
    /// 中奖奖品 (指向 prizes.id)
    pub prize_id: Option<i64>,
    pub won_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 中奖状态三个字段是否一致
    pub fn is_consistent(&self) -> bool {
        self.is_winner == self.prize_id.is_some() && self.is_winner == self.won_at.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::prizes::Entity",
        from = "Column::PrizeId",
        to = "super::prizes::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Prize,
}

impl Related<super::prizes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prize.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
