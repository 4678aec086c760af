//! The line-oriented request format consumed by the `avl-range` driver.
//!
//! A request stream is a sequence of whitespace-separated tokens:
//!
//! - `k <key>` inserts `key`,
//! - `q <lo> <hi>` asks for the number of keys in `[lo, hi]`.
//!
//! Line breaks carry no meaning, so `k 1 k 2 q 0 5` and one request per line
//! parse the same way.
//!
//! # Examples
//!
//! ```
//! use avl_ost::AvlTree;
//! use avl_ost::protocol::{self, Request};
//!
//! let input = "k 10 k 20\nq 8 31\nk 30\nq 8 31\n";
//! let mut tree = AvlTree::new();
//! let answers = protocol::replay(&mut tree, protocol::requests::<i64>(input)).unwrap();
//! assert_eq!(answers, [2, 3]);
//!
//! let first = protocol::requests::<i64>("q 1 2").next().unwrap();
//! assert_eq!(first, Ok(Request::Query { lo: 1, hi: 2 }));
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::marker::PhantomData;
use core::str::{FromStr, SplitAsciiWhitespace};

use thiserror::Error;

use crate::AvlTree;

/// Token introducing an insertion.
pub const INSERT_TOKEN: &str = "k";
/// Token introducing a range query.
pub const QUERY_TOKEN: &str = "q";

/// A single parsed request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Request<K> {
    /// `k <key>`: insert a key.
    Insert(K),
    /// `q <lo> <hi>`: count the keys in `[lo, hi]`.
    Query {
        /// Inclusive lower bound.
        lo: K,
        /// Inclusive upper bound.
        hi: K,
    },
}

impl<K: Ord> Request<K> {
    /// Applies the request to `tree`, returning the answer of a query.
    pub fn apply(&self, tree: &mut AvlTree<K>) -> Option<usize>
    where
        K: Clone,
    {
        match self {
            Request::Insert(key) => {
                tree.insert(key.clone());
                None
            }
            Request::Query { lo, hi } => Some(tree.range_count(lo, hi)),
        }
    }
}

/// Errors produced while parsing a request stream.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// A request started with a token other than `k` or `q`.
    #[error("unknown request `{0}`, expected `k` or `q`")]
    UnknownRequest(String),
    /// The input ended right after `k`.
    #[error("`k` request is missing its key")]
    MissingKey,
    /// The token after `k` is not a valid key.
    #[error("invalid key `{0}`")]
    InvalidKey(String),
    /// The input ended before both bounds of a `q` request.
    #[error("`q` request is missing a bound")]
    MissingBound,
    /// A bound of a `q` request is not a valid key.
    #[error("invalid bound `{0}`")]
    InvalidBound(String),
}

/// An iterator over the requests in a string.
///
/// Created by [`requests`]. Yields at most one error, after which it is
/// exhausted.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Requests<'a, K> {
    tokens: SplitAsciiWhitespace<'a>,
    failed: bool,
    _marker: PhantomData<fn() -> K>,
}

/// Parses `input` into a stream of requests with keys of type `K`.
pub fn requests<K: FromStr>(input: &str) -> Requests<'_, K> {
    Requests {
        tokens: input.split_ascii_whitespace(),
        failed: false,
        _marker: PhantomData,
    }
}

impl<K: FromStr> Requests<'_, K> {
    fn parse_next(&mut self) -> Option<Result<Request<K>, ParseError>> {
        let request = self.tokens.next()?;
        Some(match request {
            INSERT_TOKEN => self.key(ParseError::MissingKey, ParseError::InvalidKey).map(Request::Insert),
            QUERY_TOKEN => self
                .key(ParseError::MissingBound, ParseError::InvalidBound)
                .and_then(|lo| {
                    let hi = self.key(ParseError::MissingBound, ParseError::InvalidBound)?;
                    Ok(Request::Query { lo, hi })
                }),
            other => Err(ParseError::UnknownRequest(other.to_string())),
        })
    }

    fn key(&mut self, missing: ParseError, invalid: fn(String) -> ParseError) -> Result<K, ParseError> {
        let token = self.tokens.next().ok_or(missing)?;
        token.parse().map_err(|_| invalid(token.to_string()))
    }
}

impl<K: FromStr> Iterator for Requests<'_, K> {
    type Item = Result<Request<K>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let parsed = self.parse_next()?;
        self.failed = parsed.is_err();
        Some(parsed.inspect_err(|err| tracing::debug!(%err, "rejected request")))
    }
}

/// Applies `requests` to `tree` in order and returns one answer per query.
///
/// # Errors
///
/// Stops at, and returns, the first parse error. Requests before it have
/// already been applied.
pub fn replay<K, I>(tree: &mut AvlTree<K>, requests: I) -> Result<Vec<usize>, ParseError>
where
    K: Ord + Clone,
    I: IntoIterator<Item = Result<Request<K>, ParseError>>,
{
    let mut answers = Vec::new();
    for request in requests {
        if let Some(answer) = request?.apply(tree) {
            answers.push(answer);
        }
    }

    tracing::debug!(keys = tree.len(), queries = answers.len(), "replayed requests");
    Ok(answers)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;

    fn parse(input: &str) -> Vec<Result<Request<i32>, ParseError>> {
        requests(input).collect()
    }

    #[test]
    fn tokens_span_lines() {
        assert_eq!(
            parse("k 1\nk\t2 q\n0 5"),
            vec![Ok(Request::Insert(1)), Ok(Request::Insert(2)), Ok(Request::Query { lo: 0, hi: 5 })]
        );
    }

    #[test]
    fn empty_input() {
        assert!(parse("  \n ").is_empty());
    }

    #[test]
    fn stops_after_first_error() {
        assert_eq!(
            parse("k 1 x 2 k 3"),
            vec![Ok(Request::Insert(1)), Err(ParseError::UnknownRequest("x".to_string()))]
        );
    }

    #[test]
    fn missing_tokens() {
        assert_eq!(parse("k"), vec![Err(ParseError::MissingKey)]);
        assert_eq!(parse("q 1"), vec![Err(ParseError::MissingBound)]);
    }

    #[test]
    fn invalid_tokens() {
        assert_eq!(parse("k one"), vec![Err(ParseError::InvalidKey("one".to_string()))]);
        assert_eq!(parse("q 1 two"), vec![Err(ParseError::InvalidBound("two".to_string()))]);
    }

    #[test]
    fn apply_answers_queries_only() {
        let mut tree = AvlTree::new();
        assert_eq!(Request::Insert(4).apply(&mut tree), None);
        assert_eq!(Request::Query { lo: 0, hi: 9 }.apply(&mut tree), Some(1));
        assert_eq!(Request::Query { lo: 9, hi: 0 }.apply(&mut tree), Some(0));
    }
}
