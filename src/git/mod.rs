pub mod object_store;
#[cfg(test)]
pub(crate) mod test_support;
pub mod tree_diff;
pub mod types;

// Re-export types to keep call sites short
pub use object_store::ObjectStore;
pub use tree_diff::{RenameOptions, TreeDiff, diff_trees};
pub use types::*;
