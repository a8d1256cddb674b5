//! Element-wise stages: `filter`, `map`, `flat_map`, `peek`, `try_map`.
//!
//! Each of these wraps every upstream puller independently, so they run inside the
//! worker that owns a partition and never need to see the rest of the sequence.

use crate::node::{Pull, Puller, StatelessNode};
use crate::sequence::Elem;
use crate::Sequence;
use anyhow::Result;
use std::sync::Arc;

struct FilterPull<T, P> {
    up: Puller<T>,
    pred: Arc<P>,
}

impl<T, P> Pull<T> for FilterPull<T, P>
where
    T: Elem,
    P: Fn(&T) -> bool + Send + Sync,
{
    fn next(&mut self) -> Result<Option<T>> {
        while let Some(item) = self.up.next()? {
            if (self.pred)(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

struct MapPull<T, F> {
    up: Puller<T>,
    f: Arc<F>,
}

impl<T, U, F> Pull<U> for MapPull<T, F>
where
    T: Elem,
    F: Fn(T) -> U + Send + Sync,
{
    fn next(&mut self) -> Result<Option<U>> {
        Ok(self.up.next()?.map(|item| (self.f)(item)))
    }
}

struct TryMapPull<T, F> {
    up: Puller<T>,
    f: Arc<F>,
}

impl<T, U, F> Pull<U> for TryMapPull<T, F>
where
    T: Elem,
    F: Fn(T) -> Result<U> + Send + Sync,
{
    fn next(&mut self) -> Result<Option<U>> {
        match self.up.next()? {
            Some(item) => (self.f)(item).map(Some),
            None => Ok(None),
        }
    }
}

struct PeekPull<T, F> {
    up: Puller<T>,
    f: Arc<F>,
}

impl<T, F> Pull<T> for PeekPull<T, F>
where
    T: Elem,
    F: Fn(&T) + Send + Sync,
{
    fn next(&mut self) -> Result<Option<T>> {
        let item = self.up.next()?;
        if let Some(x) = &item {
            (self.f)(x);
        }
        Ok(item)
    }
}

struct FlatMapPull<T, I: IntoIterator, F> {
    up: Puller<T>,
    f: Arc<F>,
    inner: Option<I::IntoIter>,
}

impl<T, I, F> Pull<I::Item> for FlatMapPull<T, I, F>
where
    T: Elem,
    I: IntoIterator,
    I::IntoIter: Send,
    F: Fn(T) -> I + Send + Sync,
{
    fn next(&mut self) -> Result<Option<I::Item>> {
        loop {
            if let Some(item) = self.inner.as_mut().and_then(Iterator::next) {
                return Ok(Some(item));
            }
            match self.up.next()? {
                Some(outer) => self.inner = Some((self.f)(outer).into_iter()),
                None => {
                    self.inner = None;
                    return Ok(None);
                }
            }
        }
    }
}

/// Flattens nested sequences. Each inner sequence is opened when reached and dropped
/// (releasing its resources) as soon as it is exhausted.
struct FlatSeqPull<T, U, F> {
    up: Puller<T>,
    f: Arc<F>,
    inner: Option<Puller<U>>,
}

impl<T, U, F> Pull<U> for FlatSeqPull<T, U, F>
where
    T: Elem,
    U: Elem,
    F: Fn(T) -> Sequence<U> + Send + Sync,
{
    fn next(&mut self) -> Result<Option<U>> {
        loop {
            if let Some(inner) = self.inner.as_mut() {
                if let Some(item) = inner.next()? {
                    return Ok(Some(item));
                }
                self.inner = None;
            }
            match self.up.next()? {
                Some(outer) => self.inner = Some((self.f)(outer).open_sequential()?),
                None => return Ok(None),
            }
        }
    }
}

impl<T: Elem> Sequence<T> {
    /// Keep the elements for which `pred` holds, in order.
    #[must_use]
    pub fn filter<P>(self, pred: P) -> Sequence<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let pred = Arc::new(pred);
        let node = StatelessNode::new(Arc::clone(&self.node), "filter", move |up| {
            Box::new(FilterPull { up, pred: Arc::clone(&pred) }) as Puller<T>
        });
        self.chain(node)
    }

    /// Transform every element, preserving order and count.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Sequence<U>
    where
        U: Elem,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let node = StatelessNode::new(Arc::clone(&self.node), "map", move |up| {
            Box::new(MapPull { up, f: Arc::clone(&f) }) as Puller<U>
        });
        self.chain(node)
    }

    /// Fallible `map`. The first `Err` aborts evaluation and is returned by the terminal
    /// operation.
    ///
    /// ```
    /// use ironstream::*;
    /// let err = from_vec(vec!["1", "x", "3"])
    ///     .try_map(|s| Ok(s.parse::<i32>()?))
    ///     .to_vec()
    ///     .unwrap_err();
    /// assert!(err.to_string().contains("invalid digit"));
    /// ```
    #[must_use]
    pub fn try_map<U, F>(self, f: F) -> Sequence<U>
    where
        U: Elem,
        F: Fn(T) -> Result<U> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let node = StatelessNode::new(Arc::clone(&self.node), "try_map", move |up| {
            Box::new(TryMapPull { up, f: Arc::clone(&f) }) as Puller<U>
        });
        self.chain(node)
    }

    /// Replace every element with the items of `f(element)`, concatenated in order.
    ///
    /// ```
    /// use ironstream::*;
    /// let v = from_vec(vec!["a,b,c", "1,2,3"])
    ///     .flat_map(|s| s.split(',').map(String::from).collect::<Vec<_>>())
    ///     .to_vec()
    ///     .unwrap();
    /// assert_eq!(v, vec!["a", "b", "c", "1", "2", "3"]);
    /// ```
    #[must_use]
    pub fn flat_map<I, F>(self, f: F) -> Sequence<I::Item>
    where
        I: IntoIterator + 'static,
        I::Item: Elem,
        I::IntoIter: Send + 'static,
        F: Fn(T) -> I + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let node = StatelessNode::new(Arc::clone(&self.node), "flat_map", move |up| {
            Box::new(FlatMapPull::<T, I, F> { up, f: Arc::clone(&f), inner: None })
                as Puller<I::Item>
        });
        self.chain(node)
    }

    /// Like [`flat_map`](Self::flat_map), but `f` returns a nested [`Sequence`]. Errors
    /// raised inside a nested sequence surface from the outer terminal operation.
    #[must_use]
    pub fn flat_map_seq<U, F>(self, f: F) -> Sequence<U>
    where
        U: Elem,
        F: Fn(T) -> Sequence<U> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let node = StatelessNode::new(Arc::clone(&self.node), "flat_map_seq", move |up| {
            Box::new(FlatSeqPull::<T, U, F> { up, f: Arc::clone(&f), inner: None })
                as Puller<U>
        });
        self.chain(node)
    }

    /// Run `f` on each element as it is pulled through, without changing it.
    ///
    /// Sequentially, `f` sees elements in encounter order, exactly when each one is
    /// pulled; elements that a downstream `limit` or short-circuit never pulls are never
    /// seen. In parallel, calls from different partitions may interleave.
    #[must_use]
    pub fn peek<F>(self, f: F) -> Sequence<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let node = StatelessNode::new(Arc::clone(&self.node), "peek", move |up| {
            Box::new(PeekPull { up, f: Arc::clone(&f) }) as Puller<T>
        });
        self.chain(node)
    }
}
