use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Vault, VaultError};
use crate::blobs::BlobStorage;
use crate::ids::FolderId;
use crate::model::FileRecord;
use crate::store::Store;

/// What a cascading delete removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CascadeReport {
    pub folders: usize,
    pub files: usize,
    pub blobs_released: usize,
    /// Only non-zero when a whole dataroom was deleted.
    pub grants: usize,
}

impl CascadeReport {
    pub fn merge(&mut self, other: CascadeReport) {
        self.folders += other.folders;
        self.files += other.files;
        self.blobs_released += other.blobs_released;
        self.grants += other.grants;
    }
}

impl<S: Store, B: BlobStorage> Vault<S, B> {
    /// Delete a folder and everything beneath it, depth first: at every
    ///  level the subfolders go first, then the files directly inside
    ///  (record, then blob), then the folder itself.
    ///
    /// Walks with an explicit stack so tree depth never grows the call
    ///  stack. A missing `root` deletes nothing.
    pub(crate) async fn cascade_folder(&self, root: FolderId) -> Result<CascadeReport, VaultError> {
        let mut report = CascadeReport::default();
        if self
            .store
            .get_folder(root)
            .await
            .map_err(VaultError::store)?
            .is_none()
        {
            return Ok(report);
        }

        // (folder, children already pushed)
        let mut stack: Vec<(FolderId, bool)> = vec![(root, false)];
        let mut seen: HashSet<FolderId> = HashSet::new();

        while let Some((folder, expanded)) = stack.pop() {
            if !expanded {
                if !seen.insert(folder) {
                    continue;
                }
                stack.push((folder, true));
                let children = self
                    .store
                    .list_child_folders(folder)
                    .await
                    .map_err(VaultError::store)?;
                // reversed so children are visited in insertion order
                for child in children.into_iter().rev() {
                    stack.push((child.id, false));
                }
                continue;
            }

            let files = self
                .store
                .list_files_in_folder(folder)
                .await
                .map_err(VaultError::store)?;
            for file in files {
                self.remove_file_record(&file).await?;
                report.files += 1;
                report.blobs_released += 1;
            }

            self.store
                .delete_folder(folder)
                .await
                .map_err(VaultError::store)?;
            report.folders += 1;
        }

        Ok(report)
    }

    /// Drop a file record, then release its blob.
    pub(crate) async fn remove_file_record(&self, file: &FileRecord) -> Result<(), VaultError> {
        self.store
            .delete_file(file.id)
            .await
            .map_err(VaultError::store)?;
        self.blobs
            .delete(file.storage_ref)
            .await
            .map_err(VaultError::blobs)?;
        tracing::debug!(file_id = %file.id, storage_ref = %file.storage_ref, "file removed");
        Ok(())
    }
}
