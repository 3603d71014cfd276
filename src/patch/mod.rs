pub mod builder;
pub mod types;

pub use builder::{build_from_contents, is_binary};
pub use types::{Hunk, LineKind, Patch, PatchLine};
