pub use sea_orm_migration::prelude::*;

mod m20251101_000001_family;
mod m20251101_000002_guardian;
mod m20251101_000003_child;
mod m20251101_000004_scan_code;
mod m20251101_000005_program;
mod m20251101_000006_attendance;
mod m20251101_000007_queued_message;
mod m20251101_000008_unlinked_contact;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_family::Migration),
            Box::new(m20251101_000002_guardian::Migration),
            Box::new(m20251101_000003_child::Migration),
            Box::new(m20251101_000004_scan_code::Migration),
            Box::new(m20251101_000005_program::Migration),
            Box::new(m20251101_000006_attendance::Migration),
            Box::new(m20251101_000007_queued_message::Migration),
            Box::new(m20251101_000008_unlinked_contact::Migration),
        ]
    }
}
