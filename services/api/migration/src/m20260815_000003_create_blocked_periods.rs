use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlockedPeriods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlockedPeriods::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlockedPeriods::UserId).integer().not_null())
                    .col(ColumnDef::new(BlockedPeriods::StartDate).date().not_null())
                    .col(ColumnDef::new(BlockedPeriods::EndDate).date().not_null())
                    .col(ColumnDef::new(BlockedPeriods::Reason).string())
                    .col(
                        ColumnDef::new(BlockedPeriods::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BlockedPeriods::Table, BlockedPeriods::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(BlockedPeriods::Table)
                    .col(BlockedPeriods::UserId)
                    .name("idx_blocked_periods_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlockedPeriods::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BlockedPeriods {
    Table,
    Id,
    UserId,
    StartDate,
    EndDate,
    Reason,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
