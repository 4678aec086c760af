/// A zero-based position in the sorted order of an [`AvlTree`](crate::AvlTree).
///
/// Used to index a tree by position rather than by key.
///
/// # Examples
///
/// ```
/// use avl_ost::{AvlTree, Rank};
///
/// let tree = AvlTree::from(["b", "a", "c"]);
/// assert_eq!(tree[Rank(0)], "a");
/// assert_eq!(tree[Rank(2)], "c");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
