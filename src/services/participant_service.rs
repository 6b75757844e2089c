use std::collections::HashSet;

use crate::config::DrawConfig;
use crate::entities::{participant_entity as participants, prize_entity as prizes};
use crate::error::{AppError, AppResult};
use crate::models::{ImportParticipantsResponse, ParticipantResponse, ResetParticipantsResponse};
use crate::utils::parse_participant_csv;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 单条 INSERT 的行数上限
const INSERT_CHUNK: usize = 100;

#[derive(Clone)]
pub struct ParticipantService {
    pool: DatabaseConnection,
    draw_config: DrawConfig,
}

impl ParticipantService {
    pub fn new(pool: DatabaseConnection, draw_config: DrawConfig) -> Self {
        Self { pool, draw_config }
    }

    /// 获取全部人员（按姓名排序），附带中奖奖品
    pub async fn list_participants(&self) -> AppResult<Vec<ParticipantResponse>> {
        let rows = participants::Entity::find()
            .find_also_related(prizes::Entity)
            .order_by_asc(participants::Column::Name)
            .order_by_asc(participants::Column::Id)
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(p, prize)| ParticipantResponse::with_prize(p, prize.as_ref()))
            .collect())
    }

    pub async fn get_participant(&self, participant_id: i64) -> AppResult<ParticipantResponse> {
        let (participant, prize) = participants::Entity::find_by_id(participant_id)
            .find_also_related(prizes::Entity)
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Participant {participant_id} not found"))
            })?;
        Ok(ParticipantResponse::with_prize(participant, prize.as_ref()))
    }

    /// 从 CSV 导入人员
    ///
    /// 按编号去重：库中已存在或文件内重复的编号直接跳过，重复导入同一文件不会新增数据。
    pub async fn import_csv(&self, content: &str) -> AppResult<ImportParticipantsResponse> {
        let roster = parse_participant_csv(content);
        let mut skipped = roster.invalid;

        if roster.rows.is_empty() {
            return Ok(ImportParticipantsResponse {
                imported: 0,
                skipped,
            });
        }

        let txn = self.pool.begin().await?;

        let codes: Vec<String> = roster.rows.iter().map(|r| r.code.clone()).collect();
        let mut seen: HashSet<String> = HashSet::new();
        for chunk in codes.chunks(INSERT_CHUNK) {
            let existing = participants::Entity::find()
                .filter(participants::Column::Code.is_in(chunk.to_vec()))
                .all(&txn)
                .await?;
            seen.extend(existing.into_iter().map(|p| p.code));
        }

        let now = Utc::now();
        let mut new_rows = Vec::new();
        for row in roster.rows {
            if !seen.insert(row.code.clone()) {
                skipped += 1;
                continue;
            }
            let department = row
                .department
                .unwrap_or_else(|| self.draw_config.default_department.clone());
            new_rows.push(participants::ActiveModel {
                avatar_url: Set(Some(self.draw_config.avatar_for(&row.code))),
                code: Set(row.code),
                name: Set(row.name),
                department: Set(Some(department)),
                is_winner: Set(false),
                prize_id: Set(None),
                won_at: Set(None),
                created_at: Set(Some(now)),
                ..Default::default()
            });
        }

        let imported = new_rows.len() as u64;
        let mut rows = new_rows.into_iter().peekable();
        while rows.peek().is_some() {
            let chunk: Vec<_> = rows.by_ref().take(INSERT_CHUNK).collect();
            participants::Entity::insert_many(chunk).exec(&txn).await?;
        }

        txn.commit().await?;

        log::info!("Participants imported: {imported} new, {skipped} skipped");
        Ok(ImportParticipantsResponse { imported, skipped })
    }

    /// 清空所有人员（包括中奖记录）
    pub async fn reset(&self) -> AppResult<ResetParticipantsResponse> {
        let result = participants::Entity::delete_many().exec(&self.pool).await?;
        log::warn!("All participants deleted: {}", result.rows_affected);
        Ok(ResetParticipantsResponse {
            deleted: result.rows_affected,
        })
    }
}
