use sea_orm_migration::prelude::*;

mod m20260815_000001_create_users;
mod m20260815_000002_create_login_tokens;
mod m20260815_000003_create_blocked_periods;
mod m20260815_000004_create_events;
mod m20260815_000005_create_event_attendees;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260815_000001_create_users::Migration),
            Box::new(m20260815_000002_create_login_tokens::Migration),
            Box::new(m20260815_000003_create_blocked_periods::Migration),
            Box::new(m20260815_000004_create_events::Migration),
            Box::new(m20260815_000005_create_event_attendees::Migration),
        ]
    }
}
