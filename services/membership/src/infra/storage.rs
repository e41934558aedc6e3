use std::path::PathBuf;

use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::repository::DocumentStore;
use crate::error::MembershipServiceError;

/// Filesystem-backed document store. References are opaque UUID file names;
/// callers never see the directory layout.
#[derive(Clone)]
pub struct FsDocumentStore {
    pub dir: PathBuf,
}

impl DocumentStore for FsDocumentStore {
    async fn store(&self, bytes: &[u8]) -> Result<String, MembershipServiceError> {
        let doc_ref = Uuid::new_v4().to_string();
        tokio::fs::create_dir_all(&self.dir)
            .await
            .context("create document directory")?;
        tokio::fs::write(self.dir.join(&doc_ref), bytes)
            .await
            .context("write document blob")?;
        Ok(doc_ref)
    }
}
