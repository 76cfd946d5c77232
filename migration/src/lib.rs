pub use sea_orm_migration::prelude::*;

mod m20251001_000001_create_accounts;
mod m20251001_000002_create_student_profiles;
mod m20251001_000003_create_companies;
mod m20251008_000001_add_company_verification;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_create_accounts::Migration),
            Box::new(m20251001_000002_create_student_profiles::Migration),
            Box::new(m20251001_000003_create_companies::Migration),
            Box::new(m20251008_000001_add_company_verification::Migration),
        ]
    }
}
