pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Access, Daemon, File, Folder, Health, Init, Room, Search, User, Version};
