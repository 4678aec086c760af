use core::borrow::Borrow;
use core::ops::Index;

use super::AvlTree;
use crate::Rank;

impl<K: Ord> AvlTree<K> {
    /// Returns the number of keys in the closed interval `[lo, hi]`.
    ///
    /// An empty interval (`lo > hi`) holds no keys and yields 0.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let tree = AvlTree::from([-5, 0, -1, 11, 2, 8]);
    /// assert_eq!(tree.range_count(&-2, &10), 4);
    /// assert_eq!(tree.range_count(&10, &-2), 0);
    /// assert_eq!(tree.range_count(&12, &20), 0);
    /// ```
    #[must_use]
    pub fn range_count<Q>(&self, lo: &Q, hi: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.range_count(lo, hi)
    }

    /// Returns the number of stored keys `<= key`.
    ///
    /// For a stored key this is its one-based position in sorted order.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let tree = AvlTree::from([10, 20, 30]);
    /// assert_eq!(tree.rank(&20), 2);
    /// assert_eq!(tree.rank(&25), 2);
    /// assert_eq!(tree.rank(&5), 0);
    /// ```
    #[must_use]
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.count_below(key, true)
    }

    /// Returns the number of stored keys `< key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let tree = AvlTree::from([10, 20, 30]);
    /// assert_eq!(tree.count_less(&20), 1);
    /// assert_eq!(tree.count_less(&31), 3);
    /// ```
    #[must_use]
    pub fn count_less<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.count_below(key, false)
    }

    /// Returns the zero-based rank of `key` in sorted order, or `None` if the
    /// key is not present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let tree = AvlTree::from([10, 20]);
    /// assert_eq!(tree.rank_of(&20), Some(1));
    /// assert_eq!(tree.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key).map(|handle| self.raw.position(handle))
    }
}

impl<K> AvlTree<K> {
    /// Returns the key at zero-based position `rank` in sorted order, or
    /// `None` if `rank` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let tree = AvlTree::from([30, 10, 20]);
    /// assert_eq!(tree.get_by_rank(1), Some(&20));
    /// assert!(tree.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<&K> {
        self.raw.select(rank).map(|handle| self.raw.key(handle))
    }
}

/// Indexes into the tree by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use avl_ost::{AvlTree, Rank};
///
/// let tree = AvlTree::from([10, 20, 30]);
/// assert_eq!(tree[Rank(1)], 20);
/// ```
impl<K> Index<Rank> for AvlTree<K> {
    type Output = K;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).expect("index out of bounds")
    }
}
