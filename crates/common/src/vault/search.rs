use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Vault, VaultError};
use crate::blobs::BlobStorage;
use crate::ids::{DataroomId, FolderId, UserId};
use crate::model::Folder;
use crate::role::Role;
use crate::store::Store;

pub const PATH_SEPARATOR: &str = " > ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Dataroom,
    Folder,
    File,
}

/// One entry of the flattened search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: SearchKind,
    pub id: Uuid,
    pub name: String,
    /// Display path from the dataroom down, e.g. `Deals > Q1 > report.pdf`.
    pub path: String,
    pub dataroom_id: DataroomId,
    /// The folder itself for folders, the containing folder for files.
    pub folder_id: Option<FolderId>,
    /// Only set on dataroom entries.
    pub role: Option<Role>,
}

impl<S: Store, B: BlobStorage> Vault<S, B> {
    /// Everything the user can reach through their grants, each entry
    ///  annotated with its full path.
    ///
    /// Cost is grants x entities x depth. Fine for small rooms.
    pub async fn search_all(&self, user: UserId) -> Result<Vec<SearchResult>, VaultError> {
        let user = self.require_user(user).await?;
        let grants = self
            .store
            .list_grants_for_user(&user.email)
            .await
            .map_err(VaultError::store)?;

        let mut results = Vec::new();
        for grant in grants {
            let Some(dataroom) = self
                .store
                .get_dataroom(grant.dataroom_id)
                .await
                .map_err(VaultError::store)?
            else {
                continue;
            };

            results.push(SearchResult {
                kind: SearchKind::Dataroom,
                id: *dataroom.id.as_uuid(),
                name: dataroom.name.clone(),
                path: dataroom.name.clone(),
                dataroom_id: dataroom.id,
                folder_id: None,
                role: Some(grant.role),
            });

            let folders = self
                .store
                .list_folders_in_dataroom(dataroom.id)
                .await
                .map_err(VaultError::store)?;
            let tree = FolderTree::new(dataroom.id, &folders);

            for folder in &folders {
                results.push(SearchResult {
                    kind: SearchKind::Folder,
                    id: *folder.id.as_uuid(),
                    name: folder.name.clone(),
                    path: tree.path(&dataroom.name, Some(folder.id), None),
                    dataroom_id: dataroom.id,
                    folder_id: Some(folder.id),
                    role: None,
                });
            }

            let files = self
                .store
                .list_files_in_dataroom(dataroom.id)
                .await
                .map_err(VaultError::store)?;
            for file in files {
                results.push(SearchResult {
                    kind: SearchKind::File,
                    id: *file.id.as_uuid(),
                    path: tree.path(&dataroom.name, file.folder_id, Some(&file.name)),
                    name: file.name,
                    dataroom_id: dataroom.id,
                    folder_id: file.folder_id,
                    role: None,
                });
            }
        }

        Ok(results)
    }
}

/// Case-insensitive substring match on name or path. An empty query
///  keeps everything.
pub fn filter_results(results: Vec<SearchResult>, query: &str) -> Vec<SearchResult> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return results;
    }
    results
        .into_iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&query) || r.path.to_lowercase().contains(&query)
        })
        .collect()
}

/// The folders of one dataroom indexed by id, so ancestor walks need no
///  further store round trips.
struct FolderTree<'a> {
    dataroom: DataroomId,
    by_id: HashMap<FolderId, &'a Folder>,
}

impl<'a> FolderTree<'a> {
    fn new(dataroom: DataroomId, folders: &'a [Folder]) -> Self {
        Self {
            dataroom,
            by_id: folders.iter().map(|f| (f.id, f)).collect(),
        }
    }

    /// Ancestor names of `folder`, root first, the folder included. Same
    ///  stopping rules as the breadcrumb walk.
    fn ancestors(&self, folder: FolderId) -> Vec<&'a str> {
        let mut names = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(folder);
        while let Some(id) = current {
            if !seen.insert(id) {
                break;
            }
            let Some(record) = self.by_id.get(&id) else {
                break;
            };
            if record.dataroom_id != self.dataroom {
                break;
            }
            names.push(record.name.as_str());
            current = record.parent_folder_id;
        }
        names.reverse();
        names
    }

    fn path(&self, dataroom_name: &str, folder: Option<FolderId>, leaf: Option<&str>) -> String {
        let mut parts = vec![dataroom_name];
        if let Some(folder) = folder {
            parts.extend(self.ancestors(folder));
        }
        if let Some(leaf) = leaf {
            parts.push(leaf);
        }
        parts.join(PATH_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, path: &str) -> SearchResult {
        SearchResult {
            kind: SearchKind::Folder,
            id: Uuid::new_v4(),
            name: name.to_string(),
            path: path.to_string(),
            dataroom_id: DataroomId::new(),
            folder_id: None,
            role: None,
        }
    }

    #[test]
    fn test_filter_matches_name_or_path() {
        let results = vec![
            result("Q1", "Deals > Q1"),
            result("report.pdf", "Deals > Q1 > report.pdf"),
            result("Legal", "Contracts > Legal"),
        ];

        let hits = filter_results(results.clone(), "q1");
        assert_eq!(hits.len(), 2);

        let hits = filter_results(results.clone(), "LEGAL");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Legal");

        assert_eq!(filter_results(results, "  ").len(), 3);
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let json = serde_json::to_value(result("Q1", "Deals > Q1")).unwrap();
        assert_eq!(json["type"], "folder");
    }
}
