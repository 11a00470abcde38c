use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventAttendees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EventAttendees::EventId).integer().not_null())
                    .col(ColumnDef::new(EventAttendees::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(EventAttendees::Status)
                            .string()
                            .not_null()
                            .default("invited"),
                    )
                    .col(
                        ColumnDef::new(EventAttendees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(EventAttendees::EventId)
                            .col(EventAttendees::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EventAttendees::Table, EventAttendees::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EventAttendees::Table, EventAttendees::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventAttendees::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EventAttendees {
    Table,
    EventId,
    UserId,
    Status,
    UpdatedAt,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
