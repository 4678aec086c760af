mod arena;
mod handle;
mod node;
mod raw_avl_tree;
mod size;

pub(crate) use handle::Handle;
pub use node::Side;
pub(crate) use raw_avl_tree::{RawAvlTree, SearchResult};
