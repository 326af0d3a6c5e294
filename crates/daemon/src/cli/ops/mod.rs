pub mod access;
pub mod daemon;
pub mod file;
pub mod folder;
pub mod health;
pub mod init;
pub mod room;
pub mod search;
pub mod user;
pub mod version;

pub use access::Access;
pub use daemon::Daemon;
pub use file::File;
pub use folder::Folder;
pub use health::Health;
pub use init::Init;
pub use room::Room;
pub use search::Search;
pub use user::User;
pub use version::Version;
