use sea_orm_migration::prelude::*;

mod m20260401_000001_create_regions;
mod m20260401_000002_create_profiles;
mod m20260401_000003_create_claims;
mod m20260401_000004_create_payments;
mod m20260401_000005_create_otp_challenges;
mod m20260401_000006_create_region_sequences;
mod m20260401_000007_create_job_titles;
mod m20260401_000008_create_crew_members;
mod m20260401_000009_create_app_settings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_regions::Migration),
            Box::new(m20260401_000002_create_profiles::Migration),
            Box::new(m20260401_000003_create_claims::Migration),
            Box::new(m20260401_000004_create_payments::Migration),
            Box::new(m20260401_000005_create_otp_challenges::Migration),
            Box::new(m20260401_000006_create_region_sequences::Migration),
            Box::new(m20260401_000007_create_job_titles::Migration),
            Box::new(m20260401_000008_create_crew_members::Migration),
            Box::new(m20260401_000009_create_app_settings::Migration),
        ]
    }
}
