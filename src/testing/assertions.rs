//! Assertions for sequence outputs and sequence errors.

use crate::error::StreamError;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

/// Assert that two collections hold the same elements in the same order.
///
/// # Panics
///
/// Panics on the first differing index, or if the lengths differ.
///
/// # Example
///
/// ```
/// use ironstream::*;
/// use ironstream::testing::assert_collections_equal;
///
/// let out = from_vec(vec![3, 1, 2]).sorted().to_vec().unwrap();
/// assert_collections_equal(&out, &[1, 2, 3]);
/// ```
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "length mismatch: expected {}, got {}\n  expected: {expected:?}\n  actual:   {actual:?}",
        expected.len(),
        actual.len()
    );
    if let Some(i) = actual.iter().zip(expected).position(|(a, e)| a != e) {
        panic!(
            "mismatch at index {i}: expected {:?}, got {:?}\n  expected: {expected:?}\n  actual:   {actual:?}",
            expected[i], actual[i]
        );
    }
}

/// Assert that two collections hold the same elements, in any order. Multiplicity counts.
///
/// # Panics
///
/// Panics if some element occurs a different number of times in the two collections.
///
/// ```
/// use ironstream::testing::assert_collections_unordered_equal;
/// assert_collections_unordered_equal(&[3, 1, 1, 2], &[1, 2, 1, 3]);
/// ```
pub fn assert_collections_unordered_equal<T: Debug + Eq + Hash>(actual: &[T], expected: &[T]) {
    fn tally<T: Eq + Hash>(xs: &[T]) -> HashMap<&T, usize> {
        let mut m = HashMap::new();
        for x in xs {
            *m.entry(x).or_insert(0) += 1;
        }
        m
    }
    let (a, e) = (tally(actual), tally(expected));
    if a != e {
        let keys: HashSet<&&T> = a.keys().chain(e.keys()).collect();
        let diff: Vec<_> = keys
            .into_iter()
            .filter(|k| a.get(*k) != e.get(*k))
            .map(|k| (k, e.get(k).copied().unwrap_or(0), a.get(k).copied().unwrap_or(0)))
            .collect();
        panic!(
            "content mismatch (element, expected count, actual count): {diff:?}\n  expected: {expected:?}\n  actual:   {actual:?}"
        );
    }
}

/// Assert that every element satisfies `predicate`.
///
/// # Panics
///
/// Panics naming the first element that fails.
pub fn assert_all<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    if let Some(i) = collection.iter().position(|x| !predicate(x)) {
        panic!("predicate failed at index {i} for {:?}\n  collection: {collection:?}", collection[i]);
    }
}

/// Assert that at least one element satisfies `predicate`.
///
/// # Panics
///
/// Panics if none does.
pub fn assert_any<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    assert!(
        collection.iter().any(predicate),
        "no element satisfied the predicate\n  collection: {collection:?}"
    );
}

/// Assert that no element satisfies `predicate`.
///
/// # Panics
///
/// Panics naming the first element that matches.
pub fn assert_none<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    if let Some(i) = collection.iter().position(&predicate) {
        panic!("predicate unexpectedly held at index {i} for {:?}\n  collection: {collection:?}", collection[i]);
    }
}

/// Assert that two maps (e.g. from `grouping_by` or `to_map`) have the same entries.
///
/// # Panics
///
/// Panics on a missing key or a differing value.
pub fn assert_maps_equal<K, V, S: BuildHasher>(actual: &HashMap<K, V, S>, expected: &HashMap<K, V, S>)
where
    K: Debug + Eq + Hash,
    V: Debug + PartialEq,
{
    assert_eq!(
        actual.len(),
        expected.len(),
        "map size mismatch\n  expected: {expected:?}\n  actual:   {actual:?}"
    );
    for (key, want) in expected {
        match actual.get(key) {
            Some(got) if got == want => {}
            Some(got) => panic!("value mismatch for key {key:?}: expected {want:?}, got {got:?}"),
            None => panic!("missing key {key:?}\n  actual: {actual:?}"),
        }
    }
}

/// Assert that `result` failed with a [`StreamError`] matching `kind`.
///
/// # Panics
///
/// Panics if `result` is `Ok` or carries some other error.
///
/// ```
/// use ironstream::*;
/// use ironstream::testing::assert_stream_error;
///
/// let s = from_vec(vec![1]);
/// let again = s.clone();
/// s.count().unwrap();
/// assert_stream_error(&again.count(), |k| matches!(k, StreamError::Exhausted));
/// ```
pub fn assert_stream_error<T: Debug>(result: &anyhow::Result<T>, kind: impl Fn(&StreamError) -> bool) {
    match result {
        Ok(v) => panic!("expected a stream error, got Ok({v:?})"),
        Err(e) => assert!(crate::error::is_kind(e, kind), "unexpected error: {e:#}"),
    }
}
