use core::fmt;

use super::handle::Handle;
use super::size::Size;

/// Which child slot of a node a link occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    /// The left child, holding smaller keys.
    Left,
    /// The right child, holding larger keys.
    Right,
}

impl Side {
    /// Returns the other side.
    #[must_use]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

// AVL node. The arena owns the storage; `left`/`right` are the only links
// through which the tree shape reaches a node, `parent` is a back-link used for
// ascent only.
pub(crate) struct Node<K> {
    key: K,
    // A tree addressable by a 32-bit handle is never more than 64 levels tall.
    height: u8,
    // Nodes in the subtree rooted here, including this one.
    size: Size,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K> Node<K> {
    /// Creates a detached leaf: height 1, size 1.
    pub(crate) fn leaf(key: K, parent: Option<Handle>) -> Self {
        Self {
            key,
            height: 1,
            size: Size::ONE,
            parent,
            left: None,
            right: None,
        }
    }

    /// Creates a node carrying the given cached fields, with no links set.
    pub(crate) fn with_cached(key: K, height: u8, size: Size, parent: Option<Handle>) -> Self {
        Self {
            key,
            height,
            size,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub(crate) fn size(&self) -> Size {
        self.size
    }

    /// Overwrites both cached fields.
    pub(crate) fn set_cached(&mut self, height: u8, size: Size) {
        self.height = height;
        self.size = size;
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns the side on which `child` hangs off this node.
    ///
    /// # Panics
    ///
    /// Panics if `child` is not linked to this node, which means parent links
    /// are corrupt.
    pub(crate) fn side_of(&self, child: Handle) -> Side {
        if self.left == Some(child) {
            Side::Left
        } else {
            assert_eq!(self.right, Some(child), "`Node::side_of()` - `child` is not a child of this node!");
            Side::Right
        }
    }

    #[cfg(test)]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}
