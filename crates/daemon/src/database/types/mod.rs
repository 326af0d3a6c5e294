mod drole;
mod duuid;

pub use drole::DRole;
pub use duuid::DUuid;
