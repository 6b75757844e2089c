use crate::entities::{participant_entity as participants, prize_entity as prizes};
use crate::error::{AppError, AppResult};
use crate::models::{DrawEligibility, ParticipantResponse, WinnerRecord};
use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 抽奖核心服务
///
/// 唯一允许把人员从"未中奖"改为"已中奖"的地方，也是唯一校验奖品名额的地方。
/// `validate` 只做预检（无锁），`draw` 在事务内重新校验，以 `draw` 的结果为准。
#[derive(Clone)]
pub struct DrawService {
    pool: DatabaseConnection,
}

impl DrawService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 预检（不修改数据）
    ///
    /// 依次检查:
    /// 1. 奖品存在
    /// 2. 已中奖人数 < 奖品数量
    /// 3. 仍有未中奖人员
    pub async fn validate(&self, prize_id: i64) -> AppResult<DrawEligibility> {
        let prize = prizes::Entity::find_by_id(prize_id)
            .one(&self.pool)
            .await
            .map_err(transaction_failure)?
            .ok_or_else(|| prize_not_found(prize_id))?;

        let awarded = count_awarded(&self.pool, prize_id)
            .await
            .map_err(transaction_failure)?;
        if awarded >= quantity_of(&prize) {
            return Err(exhausted(&prize, awarded));
        }

        let eligible = participants::Entity::find()
            .filter(participants::Column::IsWinner.eq(false))
            .count(&self.pool)
            .await
            .map_err(transaction_failure)?;
        if eligible == 0 {
            return Err(AppError::NoEligibleParticipants);
        }

        Ok(DrawEligibility {
            prize_id,
            awarded,
            quantity: prize.quantity,
            remaining: prize.remaining(awarded),
            eligible_participants: eligible,
        })
    }

    /// 抽奖 (Draw)
    ///
    /// 逻辑（单个事务，任何一步失败整体回滚）:
    /// 1. 锁定并重新读取奖品 (FOR UPDATE)，同一奖品的并发抽奖在此串行
    /// 2. 重新统计已中奖人数，已满则失败
    /// 3. limit = min(batch_size, quantity - 已中奖人数)
    /// 4. 锁定全部未中奖人员 (FOR UPDATE)
    /// 5. 从锁定集合中等概率随机抽取 limit 人
    /// 6. 标记中奖 (is_winner / prize_id / won_at)
    /// 7. 提交并返回中奖者信息
    pub async fn draw(&self, prize_id: i64) -> AppResult<Vec<WinnerRecord>> {
        let txn = self.pool.begin().await.map_err(transaction_failure)?;

        let prize = prizes::Entity::find_by_id(prize_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(transaction_failure)?
            .ok_or_else(|| prize_not_found(prize_id))?;

        let awarded = count_awarded(&txn, prize_id)
            .await
            .map_err(transaction_failure)?;
        if awarded >= quantity_of(&prize) {
            return Err(exhausted(&prize, awarded));
        }
        let limit = prize.draw_limit(awarded) as usize;

        let candidates = participants::Entity::find()
            .filter(participants::Column::IsWinner.eq(false))
            .order_by_asc(participants::Column::Id)
            .lock_exclusive()
            .all(&txn)
            .await
            .map_err(transaction_failure)?;
        if candidates.is_empty() {
            return Err(AppError::NoEligibleParticipants);
        }

        // rng 不跨 await 持有
        let selected = {
            let mut rng = rand::thread_rng();
            pick_winners(&candidates, limit, &mut rng)
        };
        let ids: Vec<i64> = selected.iter().map(|p| p.id).collect();

        let won_at = Utc::now();
        let result = participants::Entity::update_many()
            .col_expr(participants::Column::IsWinner, Expr::value(true))
            .col_expr(participants::Column::PrizeId, Expr::value(prize.id))
            .col_expr(participants::Column::WonAt, Expr::value(won_at))
            .filter(participants::Column::Id.is_in(ids.clone()))
            .filter(participants::Column::IsWinner.eq(false))
            .exec(&txn)
            .await
            .map_err(transaction_failure)?;

        if result.rows_affected != ids.len() as u64 {
            return Err(AppError::TransactionFailure(format!(
                "Expected to mark {} winners but {} rows were updated",
                ids.len(),
                result.rows_affected
            )));
        }

        let awarded_after = count_awarded(&txn, prize_id)
            .await
            .map_err(transaction_failure)?;
        if awarded_after > quantity_of(&prize) {
            return Err(AppError::TransactionFailure(format!(
                "Prize {} would be over-allocated ({}/{})",
                prize.id, awarded_after, prize.quantity
            )));
        }

        txn.commit().await.map_err(transaction_failure)?;

        log::info!(
            "Draw committed for prize {} ({}): {} winner(s), {}/{} awarded",
            prize.id,
            prize.name,
            selected.len(),
            awarded_after,
            prize.quantity
        );

        Ok(selected
            .into_iter()
            .map(|p| WinnerRecord::new(p, &prize, won_at))
            .collect())
    }

    /// 撤销中奖（恢复为未中奖）
    ///
    /// 对未中奖人员调用同样合法。单行更新在独立事务中执行并对该行加锁，
    /// 与同时进行的抽奖在该行上串行。
    pub async fn cancel(&self, participant_id: i64) -> AppResult<ParticipantResponse> {
        let txn = self.pool.begin().await.map_err(transaction_failure)?;

        let participant = participants::Entity::find_by_id(participant_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(transaction_failure)?
            .ok_or_else(|| {
                AppError::NotFound(format!("Participant {participant_id} not found"))
            })?;

        let previous_prize = participant.prize_id;
        let mut am = participant.into_active_model();
        am.is_winner = Set(false);
        am.prize_id = Set(None);
        am.won_at = Set(None);
        let updated = am.update(&txn).await.map_err(transaction_failure)?;

        txn.commit().await.map_err(transaction_failure)?;

        match previous_prize {
            Some(prize_id) => log::info!(
                "Cancelled win of participant {} ({}) for prize {}",
                updated.id,
                updated.code,
                prize_id
            ),
            None => log::info!(
                "Cancel on participant {} ({}) who had not won",
                updated.id,
                updated.code
            ),
        }

        Ok(updated.into())
    }
}

/// 从候选集合中等概率抽取至多 `limit` 个（无放回），结果顺序随机
pub fn pick_winners<T: Clone, R: Rng + ?Sized>(
    candidates: &[T],
    limit: usize,
    rng: &mut R,
) -> Vec<T> {
    let mut selected: Vec<T> = candidates.choose_multiple(rng, limit).cloned().collect();
    selected.shuffle(rng);
    selected
}

async fn count_awarded<C: ConnectionTrait>(db: &C, prize_id: i64) -> Result<u64, DbErr> {
    participants::Entity::find()
        .filter(participants::Column::PrizeId.eq(prize_id))
        .count(db)
        .await
}

fn quantity_of(prize: &prizes::Model) -> u64 {
    u64::try_from(prize.quantity).unwrap_or(0)
}

fn prize_not_found(prize_id: i64) -> AppError {
    AppError::NotFound(format!("Prize {prize_id} not found"))
}

fn exhausted(prize: &prizes::Model, awarded: u64) -> AppError {
    AppError::PrizeExhausted {
        name: prize.name.clone(),
        awarded,
        quantity: prize.quantity,
    }
}

fn transaction_failure(err: DbErr) -> AppError {
    AppError::TransactionFailure(err.to_string())
}
