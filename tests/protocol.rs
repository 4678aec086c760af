use std::collections::BTreeSet;

use avl_ost::AvlTree;
use avl_ost::protocol::{self, ParseError, Request};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn run(input: &str) -> Result<Vec<usize>, ParseError> {
    let mut tree = AvlTree::new();
    protocol::replay(&mut tree, protocol::requests::<i64>(input))
}

#[test]
fn replays_scenarios() {
    assert_eq!(run("k 8 k 10 k 1 q 0 9"), Ok(vec![2]));
    assert_eq!(run("k -1\nk 10\nk 2\nq -2 10\nq -2 9\n"), Ok(vec![3, 2]));
    assert_eq!(run("k 9 k -3 k 79 k -5 k 0 k -1 k 10 k 2 k 8 q 2 10"), Ok(vec![4]));
}

#[test]
fn queries_see_only_earlier_insertions() {
    assert_eq!(run("q 0 100 k 5 q 0 100 k 50 k 5 q 0 100 q 100 0"), Ok(vec![0, 1, 2, 0]));
}

#[test]
fn empty_input_has_no_answers() {
    assert_eq!(run(""), Ok(vec![]));
    assert_eq!(run("k 1 k 2"), Ok(vec![]));
}

#[test]
fn first_error_stops_replay() {
    let mut tree = AvlTree::new();
    let result = protocol::replay(&mut tree, protocol::requests::<i64>("k 1 q 0 5 k x k 2"));
    assert_eq!(result, Err(ParseError::InvalidKey("x".to_string())));
    // Requests before the error were applied, those after were not.
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1]);
}

#[test]
fn error_messages() {
    assert_eq!(
        run("d 1").unwrap_err().to_string(),
        "unknown request `d`, expected `k` or `q`"
    );
    assert_eq!(run("k").unwrap_err().to_string(), "`k` request is missing its key");
    assert_eq!(run("q 1 2.5").unwrap_err().to_string(), "invalid bound `2.5`");
    assert_eq!(run("q").unwrap_err(), ParseError::MissingBound);
}

#[test]
fn keys_out_of_range_are_invalid() {
    assert_eq!(
        run("k 9223372036854775808"),
        Err(ParseError::InvalidKey("9223372036854775808".to_string()))
    );
}

#[test]
fn requests_can_be_built_directly() {
    let mut tree = AvlTree::new();
    let requests = [Request::Insert("b"), Request::Insert("a"), Request::Query { lo: "a", hi: "az" }];
    let answers = protocol::replay(&mut tree, requests.into_iter().map(Ok));
    assert_eq!(answers, Ok(vec![1]));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replaying a rendered request stream answers like BTreeSet.
    #[test]
    fn replay_matches_btreeset(
        requests in proptest::collection::vec(
            prop_oneof![
                3 => (-1_000i64..1_000).prop_map(Request::Insert),
                1 => (-1_000i64..1_000, -1_000i64..1_000).prop_map(|(lo, hi)| Request::Query { lo, hi }),
            ],
            1..500,
        ),
    ) {
        let mut input = String::new();
        let mut model = BTreeSet::new();
        let mut expected = Vec::new();
        for request in &requests {
            match *request {
                Request::Insert(key) => {
                    input.push_str(&format!("{} {key}\n", protocol::INSERT_TOKEN));
                    model.insert(key);
                }
                Request::Query { lo, hi } => {
                    input.push_str(&format!("{} {lo} {hi}\n", protocol::QUERY_TOKEN));
                    expected.push(if lo <= hi { model.range(lo..=hi).count() } else { 0 });
                }
            }
        }

        let parsed: Vec<_> = protocol::requests::<i64>(&input).collect::<Result<_, _>>().unwrap();
        prop_assert_eq!(&parsed, &requests);
        prop_assert_eq!(run(&input), Ok(expected));
    }
}
