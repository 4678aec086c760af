use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Bound, RangeBounds};

use crate::raw::{RawAvlTree, SearchResult};

mod capacity;
mod cursor;
mod iter;
mod order_statistic;

pub use crate::Side;
pub use cursor::Cursor;
pub use iter::Iter;

/// Validates that the start bound does not exceed the end bound.
///
/// # Panics
///
/// Panics if `start > end` or if `start == end` and both bounds are `Excluded`.
fn validate_range_bounds<T, R>(range: &R)
where
    T: ?Sized + Ord,
    R: RangeBounds<T>,
{
    if let (Bound::Included(start) | Bound::Excluded(start), Bound::Included(end) | Bound::Excluded(end)) =
        (range.start_bound(), range.end_bound())
    {
        let valid =
            if matches!(range.start_bound(), Bound::Excluded(_)) && matches!(range.end_bound(), Bound::Excluded(_)) {
                start < end
            } else {
                start <= end
            };
        assert!(valid, "range start is greater than range end in AvlTree");
    }
}

/// An ordered set of unique keys stored in an [AVL tree], with every node
/// augmented by the size of its subtree.
///
/// Besides the usual ordered-set operations, the size augmentation answers
/// order-statistic questions in O(log n): how many keys fall in a closed
/// interval ([`range_count`]), how many keys lie below a key ([`rank`],
/// [`count_less`]), and which key sits at a sorted position
/// ([`get_by_rank`]).
///
/// Keys are unique: inserting a key that is already present leaves the tree
/// unchanged. There is no removal.
///
/// It is a logic error for a key to be modified in such a way that the key's
/// ordering relative to any other key, as determined by the [`Ord`] trait,
/// changes while it is in the tree. This is normally only possible through
/// [`Cell`], [`RefCell`], global state, I/O, or unsafe code. The behavior
/// resulting from such a logic error is not specified, but will be encapsulated
/// to the `AvlTree` that observed the logic error and not result in undefined
/// behavior.
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
/// [`range_count`]: AvlTree::range_count
/// [`rank`]: AvlTree::rank
/// [`count_less`]: AvlTree::count_less
/// [`get_by_rank`]: AvlTree::get_by_rank
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
///
/// # Examples
///
/// ```
/// use avl_ost::AvlTree;
///
/// let mut tree = AvlTree::new();
/// for key in [9, -3, 79, -5, 0, -1, 10, 2, 8] {
///     tree.insert(key);
/// }
///
/// // 2, 8, 9 and 10 lie in [2, 10].
/// assert_eq!(tree.range_count(&2, &10), 4);
///
/// // Re-inserting is a no-op.
/// assert!(!tree.insert(10));
/// assert_eq!(tree.len(), 9);
///
/// let keys: Vec<_> = tree.iter().copied().collect();
/// assert_eq!(keys, [-5, -3, -1, 0, 2, 8, 9, 10, 79]);
/// ```
pub struct AvlTree<K> {
    raw: RawAvlTree<K>,
}

/// The outcome of [`AvlTree::find`].
#[derive(Debug, PartialEq, Eq)]
pub enum Search<'a, K> {
    /// The key is stored; the cursor is on it.
    Found(Cursor<'a, K>),
    /// The key is absent. A new node for it would be attached as the `side`
    /// child of the node under `parent`.
    Vacant {
        /// The last node visited by the search.
        parent: Cursor<'a, K>,
        /// The free child slot of `parent` the key belongs in.
        side: Side,
    },
    /// The tree is empty.
    Empty,
}

impl<'a, K> Search<'a, K> {
    /// Returns the cursor on the found key, if the key is stored.
    #[must_use]
    pub fn found(self) -> Option<Cursor<'a, K>> {
        match self {
            Search::Found(cursor) => Some(cursor),
            Search::Vacant { .. } | Search::Empty => None,
        }
    }
}

impl<K> AvlTree<K> {
    /// Makes a new, empty `AvlTree`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let mut tree: AvlTree<i32> = AvlTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> AvlTree<K> {
        AvlTree { raw: RawAvlTree::new() }
    }

    /// Removes every key, releasing all nodes at once.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let mut tree = AvlTree::from([1, 2, 3]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.begin(), tree.end());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of keys in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// // 2^4 - 1 ascending keys form a perfect tree of height 4.
    /// let tree: AvlTree<u32> = (0..15).collect();
    /// assert_eq!(tree.height(), 4);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns a cursor on the smallest key, or the end cursor if the tree is
    /// empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn begin(&self) -> Cursor<'_, K> {
        Cursor::new(&self.raw, self.raw.first())
    }

    /// Returns the off-the-end cursor.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn end(&self) -> Cursor<'_, K> {
        Cursor::new(&self.raw, None)
    }

    /// Returns the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let tree = AvlTree::from([2, 1, 3]);
    /// assert_eq!(tree.first(), Some(&1));
    /// assert_eq!(tree.last(), Some(&3));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        self.raw.first().map(|handle| self.raw.key(handle))
    }

    /// Returns the largest key.
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.raw.last().map(|handle| self.raw.key(handle))
    }

    /// Gets an iterator that visits the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let tree = AvlTree::from([3, 1, 2]);
    /// let keys: Vec<_> = tree.iter().rev().copied().collect();
    /// assert_eq!(keys, [3, 2, 1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.raw, self.raw.first(), self.raw.last(), self.raw.len())
    }
}

impl<K: Ord> AvlTree<K> {
    /// Adds a key to the tree.
    ///
    /// Returns whether the key was newly inserted. Inserting a key that is
    /// already present is a no-op and returns `false`.
    ///
    /// # Complexity
    ///
    /// O(log n), with at most one single or double rotation.
    ///
    /// # Panics
    ///
    /// Panics if the tree already holds `u32::MAX - 1` keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert!(tree.insert(2));
    /// assert!(!tree.insert(2));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key)
    }

    /// Looks `key` up, reporting either the node holding it or the node a new
    /// node for it would be attached to.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::{AvlTree, Search, Side};
    ///
    /// let tree = AvlTree::from([2, 1, 3]);
    /// assert_eq!(tree.find(&1).found().map(|c| *c.key()), Some(1));
    ///
    /// match tree.find(&4) {
    ///     Search::Vacant { parent, side } => {
    ///         assert_eq!(parent.key(), &3);
    ///         assert_eq!(side, Side::Right);
    ///     }
    ///     _ => unreachable!(),
    /// }
    ///
    /// let empty: AvlTree<i32> = AvlTree::new();
    /// assert_eq!(empty.find(&4), Search::Empty);
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Search<'_, K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.raw.search(key) {
            SearchResult::Found(handle) => Search::Found(Cursor::new(&self.raw, Some(handle))),
            SearchResult::NotFound { parent, side } => Search::Vacant {
                parent: Cursor::new(&self.raw, Some(parent)),
                side,
            },
            SearchResult::Empty => Search::Empty,
        }
    }

    /// Returns `true` if the tree contains `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let tree = AvlTree::from(["a", "b"]);
    /// assert!(tree.contains("a"));
    /// assert!(!tree.contains("c"));
    /// ```
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key).is_some()
    }

    /// Returns a reference to the stored key equal to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key).map(|handle| self.raw.key(handle))
    }

    /// Returns a cursor on the first key `>= key`, or the end cursor if there
    /// is none.
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
    /// assert_eq!(tree.lower_bound(&20).key(), &20);
    /// assert_eq!(tree.lower_bound(&21).key(), &30);
    /// assert!(tree.lower_bound(&31).is_end());
    /// ```
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Cursor::new(&self.raw, self.raw.lower_bound(key))
    }

    /// Returns a cursor on the first key `> key`, or the end cursor if there
    /// is none.
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
    /// assert_eq!(tree.upper_bound(&20).key(), &30);
    /// assert_eq!(tree.upper_bound(&9).key(), &10);
    /// assert!(tree.upper_bound(&30).is_end());
    /// ```
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Cursor::new(&self.raw, self.raw.upper_bound(key))
    }

    /// Constructs a double-ended iterator over a sub-range of keys.
    ///
    /// # Complexity
    ///
    /// O(log n) to construct; the iterator knows its exact length up front.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`, or if `start == end` and both bounds are
    /// `Excluded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTree;
    ///
    /// let tree = AvlTree::from([1, 3, 5, 7, 9]);
    /// let keys: Vec<_> = tree.range(3..=7).copied().collect();
    /// assert_eq!(keys, [3, 5, 7]);
    /// assert_eq!(tree.range(4..).len(), 3);
    /// ```
    pub fn range<Q, R>(&self, range: R) -> Iter<'_, K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
        R: RangeBounds<Q>,
    {
        validate_range_bounds(&range);

        let start = match range.start_bound() {
            Bound::Included(key) => self.raw.count_below(key, false),
            Bound::Excluded(key) => self.raw.count_below(key, true),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(key) => self.raw.count_below(key, true),
            Bound::Excluded(key) => self.raw.count_below(key, false),
            Bound::Unbounded => self.raw.len(),
        };

        if end <= start {
            return Iter::new(&self.raw, None, None, 0);
        }
        Iter::new(&self.raw, self.raw.select(start), self.raw.select(end - 1), end - start)
    }

    /// Asserts every structural invariant: BST order, the AVL balance bound,
    /// cached heights and sizes, and parent links.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first broken invariant. A panic here
    /// means the tree is corrupt.
    #[track_caller]
    pub fn assert_valid(&self) {
        self.raw.assert_valid();
    }
}

impl<K: Clone> Clone for AvlTree<K> {
    fn clone(&self) -> Self {
        AvlTree { raw: self.raw.clone() }
    }
}

impl<K: Hash> Hash for AvlTree<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for key in self {
            key.hash(state);
        }
    }
}

impl<K: PartialEq> PartialEq for AvlTree<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq> Eq for AvlTree<K> {}

impl<K: fmt::Debug> fmt::Debug for AvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K: Ord + Copy> Extend<&'a K> for AvlTree<K> {
    fn extend<T: IntoIterator<Item = &'a K>>(&mut self, iter: T) {
        for &key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for AvlTree<K> {
    fn from(arr: [K; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
