/**
 * Typed identifiers for every stored entity.
 *  All ids are v4 UUIDs minted by the vault
 *  at insert time.
 */
pub mod ids;
/**
 * Records held by the document store:
 *  users, datarooms, access grants, folders
 *  and files, plus the small views derived
 *  from them.
 */
pub mod model;
/**
 * Name and content-type rules shared by
 *  every create/rename path.
 */
pub mod names;
/**
 * Invitation notification sink.
 */
pub mod notify;
/**
 * The four-level role hierarchy and the
 *  minimum-role predicate.
 */
pub mod role;
/**
 * Document store contract and an in-memory
 *  implementation used by tests and tooling.
 */
pub mod store;
/**
 * Object storage contract for the PDF blobs
 *  backing each file record.
 */
pub mod blobs;
/**
 * Fixtures for exercising a vault end to end
 *  against the in-memory providers.
 */
pub mod testkit;
/**
 * The vault: every user-facing operation,
 *  gated by the access guard.
 */
pub mod vault;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::blobs::{BlobStorage, MemoryBlobStorage, UploadTicket};
    pub use crate::ids::{DataroomId, FileId, FolderId, GrantId, StorageRef, UserId};
    pub use crate::model::{
        AccessGrant, Crumb, Dataroom, DataroomView, FileRecord, Folder, ItemCount, User,
        UserProfile,
    };
    pub use crate::notify::{InvitationNotice, Notifier, TracingNotifier};
    pub use crate::role::Role;
    pub use crate::store::{MemoryStore, Store};
    pub use crate::vault::{
        filter_results, CascadeReport, NewFile, SearchKind, SearchResult, Vault, VaultError,
    };
    pub use crate::version::build_info;
}
