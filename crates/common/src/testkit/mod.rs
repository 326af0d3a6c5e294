/// In-process fixtures for exercising a vault end to end.
///
/// Everything runs against the in-memory store and blob storage, and
/// invitation notices are captured instead of logged.
///
/// # Example
///
/// ```rust,ignore
/// use common::testkit::TestEnv;
///
/// #[tokio::test]
/// async fn test_owner_can_upload() -> anyhow::Result<()> {
///     let env = TestEnv::new();
///     let alice = env.user("alice").await?;
///     let room = env.vault.create_dataroom(alice.id, "Deals").await?;
///     let file = env.upload_pdf(alice.id, room.dataroom.id, None, "nda.pdf").await?;
///     assert_eq!(file.mime_type, "application/pdf");
///     Ok(())
/// }
/// ```
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::blobs::{BlobStorage, MemoryBlobStorage};
use crate::ids::{DataroomId, FolderId, UserId};
use crate::model::{FileRecord, UserProfile};
use crate::names::PDF_MIME_TYPE;
use crate::notify::{InvitationNotice, Notifier, NotifyError};
use crate::store::MemoryStore;
use crate::vault::{NewFile, Vault};

pub type MemoryVault = Vault<MemoryStore, MemoryBlobStorage>;

pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Placeholder PDF content.
pub const PDF_BYTES: &[u8] = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<<>>\nendobj\n%%EOF\n";

/// Captures invitation notices for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<InvitationNotice>>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<InvitationNotice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    /// Wait until at least `count` notices arrived, or give up after a
    ///  second.
    pub async fn wait_for(&self, count: usize) -> Vec<InvitationNotice> {
        for _ in 0..100 {
            let notices = self.notices();
            if notices.len() >= count {
                return notices;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.notices()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_invitation(&self, notice: &InvitationNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .map_err(|e| NotifyError(e.to_string()))?
            .push(notice.clone());
        Ok(())
    }
}

/// A vault over fresh in-memory providers.
pub struct TestEnv {
    pub vault: MemoryVault,
    pub store: MemoryStore,
    pub blobs: MemoryBlobStorage,
    pub notifier: RecordingNotifier,
}

impl TestEnv {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let blobs = MemoryBlobStorage::new();
        let notifier = RecordingNotifier::default();
        let vault = Vault::new(store.clone(), blobs.clone()).with_notifier(Arc::new(notifier.clone()));
        Self {
            vault,
            store,
            blobs,
            notifier,
        }
    }

    /// Sign up `<handle>@example.com`.
    pub async fn user(&self, handle: &str) -> Result<UserProfile> {
        let email = format!("{}@example.com", handle);
        Ok(self.vault.signup(handle, &email, TEST_PASSWORD).await?)
    }

    /// Issue a ticket, push placeholder bytes and register the file.
    pub async fn upload_pdf(
        &self,
        user: UserId,
        dataroom: DataroomId,
        folder: Option<FolderId>,
        name: &str,
    ) -> Result<FileRecord> {
        let ticket = self.vault.generate_upload_url(user).await?;
        self.blobs.put(ticket.storage_ref, PDF_BYTES.to_vec())?;
        let file = self
            .vault
            .create_file(
                user,
                dataroom,
                NewFile {
                    name: name.to_string(),
                    folder_id: folder,
                    storage_ref: ticket.storage_ref,
                    mime_type: PDF_MIME_TYPE.to_string(),
                    size: PDF_BYTES.len() as u64,
                },
            )
            .await?;
        Ok(file)
    }

    /// Whether the blob behind `file` still holds content.
    pub async fn blob_exists(&self, file: &FileRecord) -> Result<bool> {
        let url = self
            .blobs
            .get_url(file.storage_ref)
            .await
            .map_err(|e| anyhow!(e))?;
        Ok(url.is_some())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
