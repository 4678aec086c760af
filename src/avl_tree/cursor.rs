use core::fmt;
use core::ptr;

use crate::raw::{Handle, RawAvlTree};

/// A read-only position in an [`AvlTree`](crate::AvlTree): either a stored key
/// or the off-the-end sentinel.
///
/// Cursors step in sorted order by following parent links, so a full walk is
/// O(n) and each step is amortized O(1). Two cursors are equal when they are
/// on the same node of the same tree, or both at the end of the same tree.
///
/// # Examples
///
/// ```
/// use avl_ost::AvlTree;
///
/// let tree = AvlTree::from([30, 10, 20]);
/// let mut cursor = tree.begin();
/// assert_eq!(cursor.key(), &10);
/// cursor.move_next();
/// cursor.move_next();
/// assert_eq!(cursor.get(), Some(&30));
/// cursor.move_next();
/// assert!(cursor.is_end());
/// assert_eq!(cursor, tree.end());
///
/// // Stepping back from the end lands on the largest key.
/// cursor.move_prev();
/// assert_eq!(cursor.key(), &30);
/// ```
pub struct Cursor<'a, K> {
    tree: &'a RawAvlTree<K>,
    current: Option<Handle>,
}

impl<'a, K> Cursor<'a, K> {
    pub(crate) fn new(tree: &'a RawAvlTree<K>, current: Option<Handle>) -> Self {
        Self { tree, current }
    }

    /// Returns `true` if this is the off-the-end sentinel.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Returns the key under the cursor, or `None` at the end.
    #[must_use]
    pub fn get(&self) -> Option<&'a K> {
        let tree = self.tree;
        self.current.map(|handle| tree.key(handle))
    }

    /// Returns the key under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    #[must_use]
    #[track_caller]
    pub fn key(&self) -> &'a K {
        self.get().expect("`Cursor::key()` - cursor is at the end!")
    }

    /// Returns the height of the subtree rooted at the cursor's node (a leaf
    /// has height 1).
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    #[must_use]
    #[track_caller]
    pub fn height(&self) -> usize {
        usize::from(self.tree.node(self.handle("height")).height())
    }

    /// Returns the number of keys in the subtree rooted at the cursor's node,
    /// including its own.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    #[must_use]
    #[track_caller]
    pub fn subtree_size(&self) -> usize {
        self.tree.node(self.handle("subtree_size")).size().to_usize()
    }

    #[track_caller]
    fn handle(&self, method: &str) -> Handle {
        match self.current {
            Some(handle) => handle,
            None => panic!("`Cursor::{method}()` - cursor is at the end!"),
        }
    }

    /// Moves to the next key in sorted order, or to the end after the last
    /// key. Stays put at the end.
    pub fn move_next(&mut self) {
        self.current = self.current.and_then(|handle| self.tree.next(handle));
    }

    /// Moves to the previous key in sorted order.
    ///
    /// From the end this moves to the largest key. From the smallest key it
    /// moves to the end.
    pub fn move_prev(&mut self) {
        self.current = match self.current {
            Some(handle) => self.tree.prev(handle),
            None => self.tree.last(),
        };
    }
}

impl<K: Ord> Cursor<'_, K> {
    /// Returns the zero-based sorted position of the cursor; the end sits at
    /// position `len`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn position(&self) -> usize {
        self.current.map_or(self.tree.len(), |handle| self.tree.position(handle))
    }

    /// Returns the number of steps forward from `self` to `other`.
    ///
    /// # Panics
    ///
    /// Panics if the cursors belong to different trees or `other` comes
    /// before `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let tree = AvlTree::from([8, 10, 1]);
    /// assert_eq!(tree.lower_bound(&0).distance(&tree.upper_bound(&9)), 2);
    /// ```
    #[must_use]
    #[track_caller]
    pub fn distance(&self, other: &Self) -> usize {
        assert!(ptr::eq(self.tree, other.tree), "`Cursor::distance()` - cursors belong to different trees!");
        other
            .position()
            .checked_sub(self.position())
            .expect("`Cursor::distance()` - `other` comes before `self`!")
    }
}

impl<K> Clone for Cursor<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Cursor<'_, K> {}

impl<K> PartialEq for Cursor<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.current == other.current
    }
}

impl<K> Eq for Cursor<'_, K> {}

impl<K: fmt::Debug> fmt::Debug for Cursor<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("key", &self.get()).finish()
    }
}
