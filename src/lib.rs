//! An order-statistic AVL tree for Rust.
//!
//! This crate provides [`AvlTree`], an ordered set of unique keys kept in a
//! height-balanced binary search tree whose nodes also track the size of their
//! subtrees. The size augmentation answers order-statistic queries in
//! O(log n):
//!
//! - [`range_count`](AvlTree::range_count) - Count the keys in a closed interval `[lo, hi]`
//! - [`rank`](AvlTree::rank) / [`count_less`](AvlTree::count_less) - Count the keys below a key
//! - [`get_by_rank`](AvlTree::get_by_rank) - Get the key at a given sorted position
//! - Indexing by [`Rank`] - e.g., `tree[Rank(0)]` for the smallest key
//!
//! Navigation goes through [`Cursor`]s, which step forward and backward in
//! sorted order and have an off-the-end position.
//!
//! # Example
//!
//! ```
//! use avl_ost::{AvlTree, Rank};
//!
//! let mut tree = AvlTree::new();
//! for key in [-5, 0, -1, 11, 2, 8] {
//!     tree.insert(key);
//! }
//!
//! // -1, 0, 2 and 8 lie in [-2, 10].
//! assert_eq!(tree.range_count(&-2, &10), 4);
//!
//! // Walk from the first key >= 0 up to, but excluding, the first key > 8.
//! let mut cursor = tree.lower_bound(&0);
//! let end = tree.upper_bound(&8);
//! let mut seen = Vec::new();
//! while cursor != end {
//!     seen.push(*cursor.key());
//!     cursor.move_next();
//! }
//! assert_eq!(seen, [0, 2, 8]);
//!
//! assert_eq!(tree[Rank(0)], -5);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **O(log n) rank operations** - Efficient order-statistic queries via subtree size augmentation
//! - **Arena storage** - Nodes live in one contiguous allocation and link to each other by index
//! - **`cli`** - Builds the `avl-range` binary, which answers range-count queries read from a file or stdin
//!
//! # Implementation
//!
//! Every node caches its height and subtree size and links to its parent. An
//! insertion walks down to a free slot, attaches a leaf, then retraces to the
//! root refreshing the cached values and performing at most one single or
//! double rotation.

#![cfg_attr(not(test), no_std)]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod order_statistic;
mod raw;

pub mod avl_tree;
pub mod protocol;

pub use avl_tree::{AvlTree, Cursor, Iter, Search};
pub use order_statistic::Rank;
pub use raw::Side;
