//! Sources: where a [`Sequence`] gets its elements.
//!
//! | constructor          | length   | partitionable | restartable |
//! |----------------------|----------|---------------|-------------|
//! | [`from_vec`]         | finite   | yes           | no          |
//! | [`from_iter`]        | finite   | yes           | no          |
//! | [`from_slice`]       | finite   | yes           | no          |
//! | [`split`]            | finite   | yes           | no          |
//! | [`iterate`]          | infinite | no            | yes         |
//! | [`generate`]         | infinite | no            | no          |
//!
//! Line-based sources live in [`crate::io`].

use crate::error::StreamError;
use crate::node::{vec_pullers, Node, Pull, Puller, StageKind, VecPull};
use crate::Sequence;
use anyhow::Result;
use regex::Regex;
use std::sync::{Arc, Mutex};

/* ===================== Vec ===================== */

/// Owns the backing vector until the first (and only) evaluation takes it.
pub(crate) struct VecSource<T> {
    data: Mutex<Option<Vec<T>>>,
    name: &'static str,
}

impl<T> VecSource<T> {
    fn new(data: Vec<T>, name: &'static str) -> Self {
        Self { data: Mutex::new(Some(data)), name }
    }

    fn take(&self) -> Result<Vec<T>> {
        let mut slot = self.data.lock().unwrap_or_else(|p| p.into_inner());
        slot.take().ok_or_else(|| StreamError::Exhausted.into())
    }
}

impl<T: Send + 'static> Node<T> for VecSource<T> {
    fn open(&self) -> Result<Puller<T>> {
        Ok(Box::new(VecPull(self.take()?.into_iter())))
    }

    fn split(&self, parts: usize) -> Result<Vec<Puller<T>>> {
        Ok(vec_pullers(self.take()?, parts))
    }

    fn restartable(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Source
    }

    fn lineage(&self, out: &mut Vec<(&'static str, StageKind)>) {
        out.push((self.name, StageKind::Source));
    }
}

/// Sequence over the elements of a vector, in order.
///
/// ```
/// use ironstream::*;
/// let v = from_vec(vec![2, 3, 4, 5, 6, 5, 5, 10, 12, 13])
///     .filter(|a| *a > 4)
///     .distinct()
///     .skip(2)
///     .limit(2)
///     .to_vec()
///     .unwrap();
/// assert_eq!(v, vec![10, 12]);
/// ```
pub fn from_vec<T: Send + 'static>(data: Vec<T>) -> Sequence<T> {
    Sequence::from_node(Arc::new(VecSource::new(data, "vec")))
}

/// Sequence over any collection. The collection is drained into a vector up front so it
/// can be partitioned.
pub fn from_iter<T, I>(items: I) -> Sequence<T>
where
    T: Send + 'static,
    I: IntoIterator<Item = T>,
{
    Sequence::from_node(Arc::new(VecSource::new(items.into_iter().collect(), "collection")))
}

/// Sequence over clones of a slice's elements.
pub fn from_slice<T: Clone + Send + 'static>(items: &[T]) -> Sequence<T> {
    Sequence::from_node(Arc::new(VecSource::new(items.to_vec(), "slice")))
}

pub fn empty<T: Send + 'static>() -> Sequence<T> {
    from_vec(Vec::new())
}

/// Split `text` around matches of the regular expression `pattern`.
///
/// ```
/// let parts = ironstream::split(",", "a,b,c,d").unwrap().to_vec().unwrap();
/// assert_eq!(parts, vec!["a", "b", "c", "d"]);
/// ```
///
/// # Errors
/// [`StreamError::InvalidPattern`] if `pattern` does not compile.
pub fn split(pattern: &str, text: &str) -> Result<Sequence<String>> {
    let re = Regex::new(pattern).map_err(StreamError::from)?;
    let mut pieces: Vec<String> = re.split(text).map(str::to_string).collect();
    // trailing empty strings are dropped, leading ones kept
    while pieces.last().is_some_and(String::is_empty) {
        pieces.pop();
    }
    Ok(Sequence::from_node(Arc::new(VecSource::new(pieces, "split"))))
}

/* ===================== iterate ===================== */

struct IterateSource<T, F> {
    seed: T,
    next: Arc<F>,
}

struct IteratePull<T, F> {
    seed: Option<T>,
    prev: Option<T>,
    next: Arc<F>,
}

impl<T, F> Pull<T> for IteratePull<T, F>
where
    T: Clone + Send,
    F: Fn(&T) -> T + Send + Sync,
{
    fn next(&mut self) -> Result<Option<T>> {
        // the step function only runs when the following element is actually pulled
        let cur = match (self.seed.take(), self.prev.take()) {
            (Some(seed), _) => seed,
            (None, Some(prev)) => (self.next)(&prev),
            (None, None) => return Ok(None),
        };
        self.prev = Some(cur.clone());
        Ok(Some(cur))
    }
}

impl<T, F> Node<T> for IterateSource<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&T) -> T + Send + Sync + 'static,
{
    fn open(&self) -> Result<Puller<T>> {
        Ok(Box::new(IteratePull {
            seed: Some(self.seed.clone()),
            prev: None,
            next: Arc::clone(&self.next),
        }))
    }

    fn split(&self, _parts: usize) -> Result<Vec<Puller<T>>> {
        Ok(vec![self.open()?])
    }

    fn restartable(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "iterate"
    }

    fn kind(&self) -> StageKind {
        StageKind::Source
    }

    fn lineage(&self, out: &mut Vec<(&'static str, StageKind)>) {
        out.push(("iterate", StageKind::Source));
    }
}

/// Infinite sequence `seed, next(seed), next(next(seed)), ...`.
///
/// Restartable: every evaluation starts over from `seed`.
///
/// ```
/// let v = ironstream::iterate(0, |x| x + 2).limit(5).to_vec().unwrap();
/// assert_eq!(v, vec![0, 2, 4, 6, 8]);
/// ```
pub fn iterate<T, F>(seed: T, next: F) -> Sequence<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&T) -> T + Send + Sync + 'static,
{
    Sequence::from_node(Arc::new(IterateSource { seed, next: Arc::new(next) }))
}

/* ===================== generate ===================== */

struct GenerateSource<F>(Arc<F>);

struct GeneratePull<F>(Arc<F>);

impl<T, F> Pull<T> for GeneratePull<F>
where
    F: Fn() -> T + Send + Sync,
{
    fn next(&mut self) -> Result<Option<T>> {
        Ok(Some((self.0)()))
    }
}

impl<T, F> Node<T> for GenerateSource<F>
where
    T: Send + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    fn open(&self) -> Result<Puller<T>> {
        Ok(Box::new(GeneratePull(Arc::clone(&self.0))))
    }

    fn split(&self, _parts: usize) -> Result<Vec<Puller<T>>> {
        Ok(vec![self.open()?])
    }

    fn restartable(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "generate"
    }

    fn kind(&self) -> StageKind {
        StageKind::Source
    }

    fn lineage(&self, out: &mut Vec<(&'static str, StageKind)>) {
        out.push(("generate", StageKind::Source));
    }
}

/// Infinite sequence of values produced by calling `supplier` on every pull.
/// Not restartable.
pub fn generate<T, F>(supplier: F) -> Sequence<T>
where
    T: Send + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    Sequence::from_node(Arc::new(GenerateSource(Arc::new(supplier))))
}
