pub mod tree;
pub mod walker;

pub use tree::{ContentTree, FolderIndex};
pub use walker::ContentWalker;
