use anyhow::Context as _;
use sea_orm::{DatabaseConnection, EntityTrait};

use membership_schema::app_settings;

use crate::domain::repository::SettingsStore;
use crate::error::MembershipServiceError;

/// Key-value settings backed by the `app_settings` table. Missing keys fall
/// back to the hard-coded defaults at the call site.
#[derive(Clone)]
pub struct DbSettingsStore {
    pub db: DatabaseConnection,
}

impl SettingsStore for DbSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, MembershipServiceError> {
        let model = app_settings::Entity::find_by_id(key.to_owned())
            .one(&self.db)
            .await
            .context("read app setting")?;
        Ok(model.map(|m| m.value))
    }
}
