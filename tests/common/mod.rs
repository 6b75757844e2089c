#![allow(dead_code)]

use std::collections::HashMap;

use luckydraw_backend::config::DrawConfig;
use luckydraw_backend::entities::{participant_entity as participants, prize_entity as prizes};
use luckydraw_backend::models::{CreatePrizeRequest, PrizeResponse};
use luckydraw_backend::services::{DrawService, ParticipantService, PrizeService};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait};

pub struct TestContext {
    pub db: DatabaseConnection,
    pub draws: DrawService,
    pub prizes: PrizeService,
    pub participants: ParticipantService,
}

/// 单连接的内存 SQLite：事务独占连接，并发事务按获取顺序串行
pub async fn setup() -> TestContext {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory sqlite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    TestContext {
        draws: DrawService::new(db.clone()),
        prizes: PrizeService::new(db.clone()),
        participants: ParticipantService::new(db.clone(), DrawConfig::default()),
        db,
    }
}

impl TestContext {
    pub async fn create_prize(&self, name: &str, quantity: i32, batch_size: i32) -> PrizeResponse {
        self.prizes
            .create_prize(CreatePrizeRequest {
                name: name.to_string(),
                quantity,
                batch_size: Some(batch_size),
                image_url: None,
                sort_order: None,
            })
            .await
            .expect("Failed to create prize")
    }

    /// 导入 E001..E{n} 人员
    pub async fn seed_participants(&self, n: usize) {
        let csv: String = (1..=n)
            .map(|i| format!("E{i:03},Person {i:03},Dept {}\n", i % 3))
            .collect();
        let result = self
            .participants
            .import_csv(&csv)
            .await
            .expect("Failed to import participants");
        assert_eq!(result.imported, n as u64);
    }

    pub async fn all_participants(&self) -> Vec<participants::Model> {
        participants::Entity::find()
            .all(&self.db)
            .await
            .expect("Failed to load participants")
    }

    pub async fn unwon_count(&self) -> usize {
        self.all_participants()
            .await
            .iter()
            .filter(|p| !p.is_winner)
            .count()
    }

    /// 校验全局不变量:
    /// - 每个人员的中奖字段一致
    /// - 每个奖品的中奖人数不超过数量
    pub async fn assert_invariants(&self) {
        let people = self.all_participants().await;
        for p in &people {
            assert!(p.is_consistent(), "inconsistent participant: {p:?}");
        }

        let mut awarded: HashMap<i64, i32> = HashMap::new();
        for p in &people {
            if let Some(prize_id) = p.prize_id {
                *awarded.entry(prize_id).or_default() += 1;
            }
        }

        let prize_list = prizes::Entity::find()
            .all(&self.db)
            .await
            .expect("Failed to load prizes");
        for prize in prize_list {
            let count = awarded.get(&prize.id).copied().unwrap_or(0);
            assert!(
                count <= prize.quantity,
                "prize {} over-allocated: {count}/{}",
                prize.id,
                prize.quantity
            );
        }
    }
}
