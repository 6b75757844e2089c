use std::collections::HashMap;

use crate::entities::{participant_entity as participants, prize_entity as prizes};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreatePrizeRequest, ParticipantResponse, PrizeResponse, PrizeSummaryResponse,
    UpdatePrizeRequest,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct PrizeService {
    pool: DatabaseConnection,
}

impl PrizeService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 获取全部奖品（按 sort_order 排序），附带剩余名额与中奖名单
    /// 仅用于展示，剩余名额可能已过期
    pub async fn list_with_winners(&self) -> AppResult<Vec<PrizeSummaryResponse>> {
        let prize_list = prizes::Entity::find()
            .order_by_asc(prizes::Column::SortOrder)
            .order_by_asc(prizes::Column::Id)
            .all(&self.pool)
            .await?;

        let winners = participants::Entity::find()
            .filter(participants::Column::IsWinner.eq(true))
            .order_by_asc(participants::Column::WonAt)
            .order_by_asc(participants::Column::Id)
            .all(&self.pool)
            .await?;

        let mut by_prize: HashMap<i64, Vec<participants::Model>> = HashMap::new();
        for w in winners {
            if let Some(prize_id) = w.prize_id {
                by_prize.entry(prize_id).or_default().push(w);
            }
        }

        Ok(prize_list
            .into_iter()
            .map(|prize| {
                let winners = by_prize
                    .remove(&prize.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|w| ParticipantResponse::with_prize(w, Some(&prize)))
                    .collect();
                PrizeSummaryResponse::new(prize, winners)
            })
            .collect())
    }

    /// 仍有剩余名额的奖品
    pub async fn list_available(&self) -> AppResult<Vec<PrizeSummaryResponse>> {
        let mut list = self.list_with_winners().await?;
        list.retain(|p| p.remaining > 0);
        Ok(list)
    }

    pub async fn get_prize(&self, prize_id: i64) -> AppResult<PrizeResponse> {
        let prize = prizes::Entity::find_by_id(prize_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Prize {prize_id} not found")))?;
        Ok(prize.into())
    }

    pub async fn create_prize(&self, request: CreatePrizeRequest) -> AppResult<PrizeResponse> {
        let batch_size = request.batch_size.unwrap_or(1);
        validate_fields(&request.name, request.quantity, batch_size)?;

        let now = Utc::now();
        let created = prizes::ActiveModel {
            name: Set(request.name.trim().to_string()),
            quantity: Set(request.quantity),
            batch_size: Set(batch_size),
            image_url: Set(request.image_url),
            sort_order: Set(request.sort_order.unwrap_or(0)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Prize created: {} ({}) quantity={} batch_size={}",
            created.id,
            created.name,
            created.quantity,
            created.batch_size
        );
        Ok(created.into())
    }

    /// 更新奖品
    /// 数量不能低于已中奖人数；与抽奖一样先锁定奖品行
    pub async fn update_prize(
        &self,
        prize_id: i64,
        request: UpdatePrizeRequest,
    ) -> AppResult<PrizeResponse> {
        let txn = self.pool.begin().await?;

        let prize = prizes::Entity::find_by_id(prize_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Prize {prize_id} not found")))?;

        let name = request.name.unwrap_or_else(|| prize.name.clone());
        let quantity = request.quantity.unwrap_or(prize.quantity);
        let batch_size = request.batch_size.unwrap_or(prize.batch_size);
        validate_fields(&name, quantity, batch_size)?;

        let awarded = participants::Entity::find()
            .filter(participants::Column::PrizeId.eq(prize_id))
            .count(&txn)
            .await?;
        if (quantity as u64) < awarded {
            return Err(AppError::ValidationError(format!(
                "Quantity {quantity} is below the {awarded} winners already drawn"
            )));
        }

        let mut am = prize.into_active_model();
        am.name = Set(name.trim().to_string());
        am.quantity = Set(quantity);
        am.batch_size = Set(batch_size);
        if request.clear_image {
            am.image_url = Set(None);
        } else if let Some(image_url) = request.image_url {
            am.image_url = Set(Some(image_url));
        }
        if let Some(sort_order) = request.sort_order {
            am.sort_order = Set(sort_order);
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&txn).await?;

        txn.commit().await?;
        Ok(updated.into())
    }

    /// 删除奖品；已有中奖者时拒绝（需先撤销）
    pub async fn delete_prize(&self, prize_id: i64) -> AppResult<()> {
        let txn = self.pool.begin().await?;

        let prize = prizes::Entity::find_by_id(prize_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Prize {prize_id} not found")))?;

        let awarded = participants::Entity::find()
            .filter(participants::Column::PrizeId.eq(prize_id))
            .count(&txn)
            .await?;
        if awarded > 0 {
            return Err(AppError::ValidationError(format!(
                "Prize \"{}\" still has {awarded} winner(s); cancel them first",
                prize.name
            )));
        }

        prizes::Entity::delete_by_id(prize_id).exec(&txn).await?;
        txn.commit().await?;

        log::info!("Prize deleted: {} ({})", prize_id, prize.name);
        Ok(())
    }
}

fn validate_fields(name: &str, quantity: i32, batch_size: i32) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Prize name must not be empty".into(),
        ));
    }
    if quantity <= 0 {
        return Err(AppError::ValidationError(
            "Quantity must be positive".into(),
        ));
    }
    if batch_size <= 0 {
        return Err(AppError::ValidationError(
            "Batch size must be positive".into(),
        ));
    }
    Ok(())
}
