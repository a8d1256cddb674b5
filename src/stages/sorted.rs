//! Sorting stages.
//!
//! Sorting cannot be lazy: the first pull drains the whole upstream, sorts it, and then
//! hands elements out one by one. All sorts are stable.

use crate::error::StreamError;
use crate::node::{BarrierNode, Pull, Puller};
use crate::sequence::Elem;
use crate::Sequence;
use anyhow::Result;
use std::cmp::Ordering;
use std::sync::Arc;

type SortFn<T> = Arc<dyn Fn(&mut Vec<T>) -> Result<()> + Send + Sync>;

struct SortPull<T> {
    up: Option<Puller<T>>,
    sorted: std::vec::IntoIter<T>,
    sort: SortFn<T>,
}

impl<T: Elem> Pull<T> for SortPull<T> {
    fn next(&mut self) -> Result<Option<T>> {
        if let Some(mut up) = self.up.take() {
            let mut all = Vec::new();
            while let Some(item) = up.next()? {
                all.push(item);
            }
            drop(up);
            (self.sort)(&mut all)?;
            self.sorted = all.into_iter();
        }
        Ok(self.sorted.next())
    }
}

/// Sort by a partial order, failing if any element is incomparable (e.g. `NaN`).
fn sort_partial<T: PartialOrd>(v: &mut [T]) -> Result<()> {
    if let Some(i) = v.iter().position(|x| x.partial_cmp(x).is_none()) {
        return Err(StreamError::Unordered {
            detail: format!("element #{i} is not comparable with itself"),
        }
        .into());
    }
    let mut incomparable = false;
    v.sort_by(|a, b| {
        a.partial_cmp(b).unwrap_or_else(|| {
            incomparable = true;
            Ordering::Equal
        })
    });
    if incomparable {
        return Err(StreamError::Unordered {
            detail: "found a pair of elements with no defined order".to_string(),
        }
        .into());
    }
    Ok(())
}

impl<T: Elem> Sequence<T> {
    fn sorted_with(self, name: &'static str, sort: SortFn<T>) -> Self {
        let stream_sort = Arc::clone(&sort);
        let node = BarrierNode::new(
            Arc::clone(&self.node),
            name,
            move |up| {
                Box::new(SortPull {
                    up: Some(up),
                    sorted: Vec::new().into_iter(),
                    sort: Arc::clone(&stream_sort),
                }) as Puller<T>
            },
            move |mut all| {
                sort(&mut all)?;
                Ok(all)
            },
        );
        self.chain(node)
    }

    /// Sort with a comparator.
    ///
    /// ```
    /// use ironstream::*;
    /// // by name, then by age
    /// let people = vec![(1, "ye"), (2, "wang"), (3, "mei"), (4, "ye")];
    /// let v = from_vec(people)
    ///     .sorted_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(&b.0)))
    ///     .to_vec()
    ///     .unwrap();
    /// assert_eq!(v, vec![(3, "mei"), (2, "wang"), (1, "ye"), (4, "ye")]);
    /// ```
    #[must_use]
    pub fn sorted_by<F>(self, cmp: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.sorted_with(
            "sorted_by",
            Arc::new(move |v: &mut Vec<T>| {
                v.sort_by(&cmp);
                Ok(())
            }),
        )
    }

    #[must_use]
    pub fn sorted_by_key<K, F>(self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.sorted_with(
            "sorted_by_key",
            Arc::new(move |v: &mut Vec<T>| {
                v.sort_by_key(&key);
                Ok(())
            }),
        )
    }
}

impl<T: Elem + Ord> Sequence<T> {
    /// Sort by natural order. Only available for totally ordered element types.
    #[must_use]
    pub fn sorted(self) -> Self {
        self.sorted_with(
            "sorted",
            Arc::new(|v: &mut Vec<T>| {
                v.sort();
                Ok(())
            }),
        )
    }
}

impl<T: Elem + PartialOrd> Sequence<T> {
    /// Sort by a partial order (floats, for instance).
    ///
    /// # Errors
    /// The terminal operation fails with [`StreamError::Unordered`] if some element has
    /// no defined order relative to another one.
    ///
    /// ```
    /// use ironstream::*;
    /// assert_eq!(from_vec(vec![2.5, -1.0, 0.0]).sorted_partial().to_vec().unwrap(), vec![-1.0, 0.0, 2.5]);
    /// assert!(from_vec(vec![1.0, f64::NAN]).sorted_partial().to_vec().is_err());
    /// ```
    #[must_use]
    pub fn sorted_partial(self) -> Self {
        self.sorted_with("sorted_partial", Arc::new(|v: &mut Vec<T>| sort_partial(v)))
    }
}
