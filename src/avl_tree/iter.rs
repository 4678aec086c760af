use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{Handle, RawAvlTree};

/// An iterator over the keys of an `AvlTree`, in ascending order.
///
/// This `struct` is created by the [`iter`] and [`range`] methods on
/// [`AvlTree`]. See their documentation for more.
///
/// # Examples
///
/// ```
/// use avl_ost::AvlTree;
///
/// let tree = AvlTree::from([3, 1, 2]);
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`AvlTree`]: crate::AvlTree
/// [`iter`]: crate::AvlTree::iter
/// [`range`]: crate::AvlTree::range
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K> {
    tree: &'a RawAvlTree<K>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    /// Iterates `remaining` keys starting at `front` and ending at `back`.
    pub(crate) fn new(tree: &'a RawAvlTree<K>, front: Option<Handle>, back: Option<Handle>, remaining: usize) -> Self {
        debug_assert_eq!(remaining == 0, front.is_none(), "`Iter::new()` - `front` disagrees with `remaining`");
        Self {
            tree,
            front,
            back,
            remaining,
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.front?;
        self.remaining -= 1;
        self.front = if self.remaining == 0 { None } else { self.tree.next(handle) };
        Some(self.tree.key(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.back?;
        self.remaining -= 1;
        self.back = if self.remaining == 0 { None } else { self.tree.prev(handle) };
        Some(self.tree.key(handle))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Iter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
