pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_accounts;
mod m20260301_000002_create_rooms;
mod m20260301_000003_create_payments;
mod m20260301_000004_create_bookings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_accounts::Migration),
            Box::new(m20260301_000002_create_rooms::Migration),
            Box::new(m20260301_000003_create_payments::Migration),
            Box::new(m20260301_000004_create_bookings::Migration),
        ]
    }
}
