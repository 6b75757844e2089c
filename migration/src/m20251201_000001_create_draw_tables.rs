use sea_orm_migration::prelude::*;

/// Prizes (奖品配置表)
#[derive(DeriveIden)]
enum Prizes {
    Table,
    Id,
    Name,
    Quantity,
    BatchSize,
    ImageUrl,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

/// Participants (参与抽奖人员)
#[derive(DeriveIden)]
enum Participants {
    Table,
    Id,
    Code,
    Name,
    Department,
    AvatarUrl,
    IsWinner,
    PrizeId,
    WonAt,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 中奖关系直接记录在 participants.prize_id 上:
/// - 一个奖品可对应多名中奖者 (不超过 quantity)
/// - 一个人员同一时间最多对应一个奖品
/// - is_winner / prize_id / won_at 三者必须同时为空或同时有值
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 奖品表
        manager
            .create_table(
                Table::create()
                    .table(Prizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prizes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prizes::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Prizes::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(Prizes::BatchSize)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Prizes::ImageUrl).string_len(512).null())
                    .col(
                        ColumnDef::new(Prizes::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Prizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Prizes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 人员表（外键不级联删除，有中奖者的奖品不可直接删除）
        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Participants::Code)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Participants::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Participants::Department)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Participants::AvatarUrl)
                            .string_len(512)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Participants::IsWinner)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Participants::PrizeId).big_integer().null())
                    .col(
                        ColumnDef::new(Participants::WonAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Participants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_prize")
                            .from(Participants::Table, Participants::PrizeId)
                            .to(Prizes::Table, Prizes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // 人员编号唯一（导入幂等）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participants_code_unique")
                    .table(Participants::Table)
                    .col(Participants::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 抽奖时按未中奖筛选
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participants_is_winner")
                    .table(Participants::Table)
                    .col(Participants::IsWinner)
                    .to_owned(),
            )
            .await?;

        // 统计每个奖品的中奖人数
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participants_prize")
                    .table(Participants::Table)
                    .col(Participants::PrizeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序：人员 -> 奖品
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(Participants::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Prizes::Table).to_owned())
            .await?;

        Ok(())
    }
}
