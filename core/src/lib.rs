pub mod error;
pub mod filesystem;

pub use error::ExodusError;
pub use filesystem::{FilesystemFormatter, FormatOptions};
