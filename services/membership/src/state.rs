use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbClaimStore, DbCrewStore, DbJobTitleStore, DbOtpStore, DbPaymentStore, DbProfileStore,
    DbRegionStore,
};
use crate::infra::notify::WebhookNotifier;
use crate::infra::settings::DbSettingsStore;
use crate::infra::storage::FsDocumentStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub documents: FsDocumentStore,
    pub notifier: WebhookNotifier,
    pub otp_debug_echo: bool,
}

impl AppState {
    pub fn profile_store(&self) -> DbProfileStore {
        DbProfileStore {
            db: self.db.clone(),
        }
    }

    pub fn region_store(&self) -> DbRegionStore {
        DbRegionStore {
            db: self.db.clone(),
        }
    }

    pub fn claim_store(&self) -> DbClaimStore {
        DbClaimStore {
            db: self.db.clone(),
        }
    }

    pub fn payment_store(&self) -> DbPaymentStore {
        DbPaymentStore {
            db: self.db.clone(),
        }
    }

    pub fn otp_store(&self) -> DbOtpStore {
        DbOtpStore {
            db: self.db.clone(),
        }
    }

    pub fn crew_store(&self) -> DbCrewStore {
        DbCrewStore {
            db: self.db.clone(),
        }
    }

    pub fn job_title_store(&self) -> DbJobTitleStore {
        DbJobTitleStore {
            db: self.db.clone(),
        }
    }

    pub fn settings_store(&self) -> DbSettingsStore {
        DbSettingsStore {
            db: self.db.clone(),
        }
    }

    pub fn document_store(&self) -> FsDocumentStore {
        self.documents.clone()
    }

    pub fn notifier(&self) -> WebhookNotifier {
        self.notifier.clone()
    }
}
