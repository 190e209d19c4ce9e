pub mod path;
pub mod permission;

pub use path::{display_path, NormalizedPath};
pub use permission::{Permission, PermissionSet};
