use core::borrow::Borrow;
use core::cmp::{Ordering, max};

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};
use super::size::Size;

/// Pending nodes for worklist traversals. A depth-first walk never holds more
/// than one entry per level, and no addressable AVL tree is 64 levels tall.
type Worklist<T> = SmallVec<[T; 64]>;

/// The core AVL tree backing `AvlTree`.
pub(crate) struct RawAvlTree<K> {
    /// Arena owning every node of the tree.
    nodes: Arena<Node<K>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
}

/// Outcome of descending the tree looking for a key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SearchResult {
    /// A node holds an equal key.
    Found(Handle),
    /// No equal key; a new node would hang off `parent` on `side`.
    NotFound { parent: Handle, side: Side },
    /// The tree has no nodes.
    Empty,
}

impl<K> RawAvlTree<K> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of keys in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree contains no keys.
    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node capacity of the tree.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Drops every node at once.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Returns the root handle, if any.
    #[cfg(test)]
    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle.
    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    /// Returns the key stored at `handle`.
    #[inline]
    pub(crate) fn key(&self, handle: Handle) -> &K {
        self.nodes.get(handle).key()
    }

    /// Height of the whole tree; 0 when empty.
    pub(crate) fn height(&self) -> usize {
        self.height_of(self.root)
    }

    #[inline]
    fn height_of(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |h| usize::from(self.nodes.get(h).height()))
    }

    #[inline]
    fn size_of(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |h| self.nodes.get(h).size().to_usize())
    }

    /// Height of the left subtree minus height of the right subtree.
    #[allow(clippy::cast_possible_wrap)]
    fn balance_factor(&self, handle: Handle) -> isize {
        let node = self.nodes.get(handle);
        self.height_of(node.left()) as isize - self.height_of(node.right()) as isize
    }

    /// Recomputes the cached height and size of `handle` from its children.
    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let (left, right) = (node.left(), node.right());
        let height = 1 + max(self.height_of(left), self.height_of(right));
        let size = Size::of_parent(self.size_of(left), self.size_of(right));
        self.nodes.get_mut(handle).set_cached(height as u8, size);
    }

    /// Returns the leftmost node of the subtree rooted at `handle`.
    pub(crate) fn minimum(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.nodes.get(handle).left() {
            handle = left;
        }
        handle
    }

    /// Returns the rightmost node of the subtree rooted at `handle`.
    pub(crate) fn maximum(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.nodes.get(handle).right() {
            handle = right;
        }
        handle
    }

    /// Returns the node holding the smallest key.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.minimum(root))
    }

    /// Returns the node holding the largest key.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.maximum(root))
    }

    /// In-order successor of `handle`, following parent links.
    pub(crate) fn next(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.nodes.get(handle).right() {
            return Some(self.minimum(right));
        }
        self.ascend_from(handle, Side::Right)
    }

    /// In-order predecessor of `handle`, following parent links.
    pub(crate) fn prev(&self, handle: Handle) -> Option<Handle> {
        if let Some(left) = self.nodes.get(handle).left() {
            return Some(self.maximum(left));
        }
        self.ascend_from(handle, Side::Left)
    }

    /// Climbs while the current node is its parent's `side` child and returns
    /// the first ancestor reached from the other side.
    fn ascend_from(&self, mut handle: Handle, side: Side) -> Option<Handle> {
        while let Some(parent) = self.nodes.get(handle).parent() {
            if self.nodes.get(parent).child(side) != Some(handle) {
                return Some(parent);
            }
            handle = parent;
        }
        None
    }

    /// Returns the zero-based sorted position of the node at `handle`.
    pub(crate) fn position(&self, handle: Handle) -> usize
    where
        K: Ord,
    {
        self.count_below(self.key(handle), false)
    }

    /// Returns the node at zero-based sorted position `rank`.
    pub(crate) fn select(&self, mut rank: usize) -> Option<Handle> {
        if rank >= self.len() {
            return None;
        }

        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left = self.size_of(node.left());
            match rank.cmp(&left) {
                Ordering::Less => current = node.left(),
                Ordering::Equal => return Some(handle),
                Ordering::Greater => {
                    rank -= left + 1;
                    current = node.right();
                }
            }
        }

        unreachable!("`RawAvlTree::select()` - cached subtree sizes are corrupt!")
    }

    /// Rotates the subtree rooted at `top` towards `direction` and returns the
    /// new subtree root.
    ///
    /// Rotating left lifts `top`'s right child; rotating right lifts its left
    /// child. The lifted node inherits `top`'s parent link, but the parent's
    /// child slot (or the tree root) still names `top`: relinking it is the
    /// caller's job.
    fn rotate(&mut self, top: Handle, direction: Side) -> Handle {
        let lifted_side = direction.opposite();
        let lifted = self
            .nodes
            .get(top)
            .child(lifted_side)
            .expect("`RawAvlTree::rotate()` - no child to lift!");
        let inner = self.nodes.get(lifted).child(direction);
        let parent = self.nodes.get(top).parent();

        self.nodes.get_mut(top).set_child(lifted_side, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(top));
        }

        self.nodes.get_mut(lifted).set_child(direction, Some(top));
        self.nodes.get_mut(lifted).set_parent(parent);
        self.nodes.get_mut(top).set_parent(Some(lifted));

        // `top` is now below `lifted`, so it is refreshed first.
        self.update(top);
        self.update(lifted);

        tracing::trace!(?top, ?lifted, %direction, "rotated");
        lifted
    }

    /// Points whatever referenced `old` (its parent's slot or the root) at `new`.
    fn replace_in_parent(&mut self, parent: Option<Handle>, old: Handle, new: Handle) {
        match parent {
            Some(parent) => {
                let side = self.nodes.get(parent).side_of(old);
                self.nodes.get_mut(parent).set_child(side, Some(new));
            }
            None => self.root = Some(new),
        }
    }

    /// Restores the AVL bound at `handle`, whose cached fields are current.
    /// Returns the root of the subtree after any rotation.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        let balance = self.balance_factor(handle);
        if (-1..=1).contains(&balance) {
            return handle;
        }

        // Left-heavy lifts the left child with a right rotation (LL), after
        // straightening a right-heavy left child first (LR). Mirrored for RR/RL.
        let (heavy, direction) = if balance > 1 {
            (Side::Left, Side::Right)
        } else {
            (Side::Right, Side::Left)
        };
        let child = self
            .nodes
            .get(handle)
            .child(heavy)
            .expect("`RawAvlTree::rebalance()` - heavy side has no child!");

        let child_balance = self.balance_factor(child);
        let zigzag = match heavy {
            Side::Left => child_balance < 0,
            Side::Right => child_balance > 0,
        };
        if zigzag {
            let lifted = self.rotate(child, heavy);
            self.nodes.get_mut(handle).set_child(heavy, Some(lifted));
        }

        let parent = self.nodes.get(handle).parent();
        let top = self.rotate(handle, direction);
        self.replace_in_parent(parent, handle, top);
        top
    }

    /// Walks from `start` to the root, refreshing cached fields and rotating
    /// where the AVL bound broke.
    fn retrace(&mut self, start: Handle) {
        let mut current = Some(start);
        let mut rotated = false;

        while let Some(handle) = current {
            self.update(handle);

            // One rotation restores the subtree's pre-insert height, so no
            // ancestor can be out of balance afterwards.
            let top = if rotated { handle } else { self.rebalance(handle) };
            if top != handle {
                rotated = true;
            }
            debug_assert!(
                (-1..=1).contains(&self.balance_factor(top)),
                "`RawAvlTree::retrace()` - AVL bound still broken after rebalance!"
            );

            current = self.nodes.get(top).parent();
        }

        tracing::trace!(len = self.len(), height = self.height(), rotated, "retrace finished");
    }
}

impl<K: Ord> RawAvlTree<K> {
    /// Descends from the root looking for `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(mut current) = self.root else {
            return SearchResult::Empty;
        };

        loop {
            let node = self.nodes.get(current);
            let side = match key.cmp(node.key().borrow()) {
                Ordering::Equal => return SearchResult::Found(current),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            match node.child(side) {
                Some(child) => current = child,
                None => return SearchResult::NotFound { parent: current, side },
            }
        }
    }

    /// Returns the handle of the node holding `key`.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.search(key) {
            SearchResult::Found(handle) => Some(handle),
            SearchResult::NotFound { .. } | SearchResult::Empty => None,
        }
    }

    /// Inserts `key`, returning `false` if it was already present.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        match self.search(&key) {
            SearchResult::Found(_) => false,
            SearchResult::Empty => {
                self.root = Some(self.nodes.alloc(Node::leaf(key, None)));
                true
            }
            SearchResult::NotFound { parent, side } => {
                let leaf = self.nodes.alloc(Node::leaf(key, Some(parent)));
                self.nodes.get_mut(parent).set_child(side, Some(leaf));
                self.retrace(parent);
                true
            }
        }
    }

    /// First node whose key is `>= key`.
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.search(key) {
            SearchResult::Found(handle) => Some(handle),
            SearchResult::NotFound { parent, side } => self.bound_after_miss(parent, side),
            SearchResult::Empty => None,
        }
    }

    /// First node whose key is `> key`.
    pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.search(key) {
            SearchResult::Found(handle) => self.next(handle),
            SearchResult::NotFound { parent, side } => self.bound_after_miss(parent, side),
            SearchResult::Empty => None,
        }
    }

    /// A missed key that would hang left of `parent` sorts just before it;
    /// one that would hang right sorts just before `parent`'s successor, and
    /// `parent` has no right child, so that successor is an ancestor.
    fn bound_after_miss(&self, parent: Handle, side: Side) -> Option<Handle> {
        match side {
            Side::Left => Some(parent),
            Side::Right => self.ascend_from(parent, Side::Right),
        }
    }

    /// Counts keys `< key`, or `<= key` when `inclusive`.
    pub(crate) fn count_below<Q>(&self, key: &Q, inclusive: bool) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut count = 0;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match key.cmp(node.key().borrow()) {
                Ordering::Less => current = node.left(),
                Ordering::Equal => {
                    count += self.size_of(node.left()) + usize::from(inclusive);
                    break;
                }
                Ordering::Greater => {
                    count += 1 + self.size_of(node.left());
                    current = node.right();
                }
            }
        }

        count
    }

    /// Number of keys in `[lo, hi]`.
    pub(crate) fn range_count<Q>(&self, lo: &Q, hi: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if lo > hi {
            return 0;
        }

        let Some(lower) = self.lower_bound(lo) else {
            return 0;
        };
        let start = self.position(lower);
        match self.upper_bound(hi) {
            Some(upper) => self.position(upper) - start,
            None => self.len() - start,
        }
    }

    /// Asserts every structural invariant of the tree.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first broken invariant.
    #[track_caller]
    pub(crate) fn assert_valid(&self) {
        let Some(root) = self.root else {
            assert!(self.is_empty(), "empty tree still owns {} nodes", self.len());
            return;
        };
        assert_eq!(self.nodes.get(root).parent(), None, "root has a parent link");

        let mut worklist: Worklist<Handle> = Worklist::new();
        worklist.push(root);
        let mut reached = 0;

        while let Some(handle) = worklist.pop() {
            reached += 1;
            let node = self.nodes.get(handle);

            for side in [Side::Left, Side::Right] {
                if let Some(child) = node.child(side) {
                    assert_eq!(
                        self.nodes.get(child).parent(),
                        Some(handle),
                        "{side} child {child:?} of {handle:?} does not link back"
                    );
                    worklist.push(child);
                }
            }

            let (left, right) = (node.left(), node.right());
            assert_eq!(
                usize::from(node.height()),
                1 + max(self.height_of(left), self.height_of(right)),
                "cached height of {handle:?} is stale"
            );
            assert_eq!(
                node.size().to_usize(),
                1 + self.size_of(left) + self.size_of(right),
                "cached size of {handle:?} is stale"
            );
            let balance = self.balance_factor(handle);
            assert!((-1..=1).contains(&balance), "{handle:?} is out of balance ({balance})");
        }
        assert_eq!(reached, self.len(), "tree reaches {reached} of {} nodes", self.len());

        // With parent links verified, the in-order walk checks BST order.
        let mut current = self.first();
        let mut previous: Option<Handle> = None;
        while let Some(handle) = current {
            if let Some(previous) = previous {
                assert!(
                    self.key(previous) < self.key(handle),
                    "keys of {previous:?} and {handle:?} are out of order"
                );
            }
            previous = Some(handle);
            current = self.next(handle);
        }
    }
}

impl<K: Clone> Clone for RawAvlTree<K> {
    /// Copies the tree node by node into a fresh arena, in pre-order.
    fn clone(&self) -> Self {
        let Some(root) = self.root else {
            return Self::new();
        };

        let mut nodes = Arena::with_capacity(self.len());
        let mut copy_root = None;
        let mut worklist: Worklist<(Handle, Option<(Handle, Side)>)> = Worklist::new();
        worklist.push((root, None));

        while let Some((source, attach)) = worklist.pop() {
            let node = self.nodes.get(source);
            let parent = attach.map(|(parent, _)| parent);
            let copy = nodes.alloc(Node::with_cached(node.key().clone(), node.height(), node.size(), parent));

            match attach {
                Some((parent, side)) => nodes.get_mut(parent).set_child(side, Some(copy)),
                None => copy_root = Some(copy),
            }

            if let Some(right) = node.right() {
                worklist.push((right, Some((copy, Side::Right))));
            }
            if let Some(left) = node.left() {
                worklist.push((left, Some((copy, Side::Left))));
            }
        }

        Self { nodes, root: copy_root }
    }
}
