//! Grouping collectors: `grouping_by`, `partitioning_by`, and the `mapping` adapter.
//!
//! All three delegate per-group accumulation to a downstream collector, so groups can
//! be aggregated further (counted, summed, grouped again, ...).

use super::basic::ToList;
use super::{Characteristics, Collector};
use anyhow::Result;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

/* ===================== GroupingBy ===================== */

/// `key(x) -> downstream-collected group`. Within a group, elements reach the downstream
/// collector in encounter order.
pub struct GroupingBy<K, F, D> {
    key: F,
    downstream: D,
    concurrent: bool,
    _k: PhantomData<fn() -> K>,
}

/// Group elements into lists by key.
///
/// ```
/// use ironstream::*;
/// use ironstream::collectors::grouping_by;
///
/// let g = from_vec(vec![(1, "a"), (2, "b"), (1, "c")])
///     .collect(grouping_by(|e: &(i32, &str)| e.0))
///     .unwrap();
/// assert_eq!(g[&1], vec![(1, "a"), (1, "c")]);
/// assert_eq!(g[&2], vec![(2, "b")]);
/// ```
pub fn grouping_by<T, K, F>(key: F) -> GroupingBy<K, F, ToList>
where
    T: Send,
    F: Fn(&T) -> K,
{
    grouping_by_with(key, ToList)
}

/// Group elements by key and fold each group with `downstream`.
pub fn grouping_by_with<T, K, F, D>(key: F, downstream: D) -> GroupingBy<K, F, D>
where
    F: Fn(&T) -> K,
    D: Collector<T>,
{
    GroupingBy { key, downstream, concurrent: false, _k: PhantomData }
}

/// Like [`grouping_by`], but flagged `CONCURRENT | UNORDERED`: parallel evaluation shares
/// one map between workers instead of merging per-partition maps. Order inside groups
/// is then unspecified.
pub fn grouping_by_concurrent<T, K, F>(key: F) -> GroupingBy<K, F, ToList>
where
    T: Send,
    F: Fn(&T) -> K,
{
    GroupingBy { key, downstream: ToList, concurrent: true, _k: PhantomData }
}

impl<T, K, F, D> Collector<T> for GroupingBy<K, F, D>
where
    K: Eq + Hash + Send,
    F: Fn(&T) -> K + Send + Sync,
    D: Collector<T>,
{
    type Acc = HashMap<K, D::Acc>;
    type Output = HashMap<K, D::Output>;

    fn create(&self) -> Self::Acc {
        HashMap::new()
    }

    fn accumulate(&self, acc: &mut Self::Acc, item: T) -> Result<()> {
        let group = acc
            .entry((self.key)(&item))
            .or_insert_with(|| self.downstream.create());
        self.downstream.accumulate(group, item)
    }

    fn combine(&self, acc: &mut Self::Acc, other: Self::Acc) -> Result<()> {
        for (k, theirs) in other {
            match acc.entry(k) {
                Entry::Occupied(mut e) => self.downstream.combine(e.get_mut(), theirs)?,
                Entry::Vacant(e) => {
                    e.insert(theirs);
                }
            }
        }
        Ok(())
    }

    fn finish(&self, acc: Self::Acc) -> Result<Self::Output> {
        acc.into_iter()
            .map(|(k, a)| Ok((k, self.downstream.finish(a)?)))
            .collect()
    }

    fn characteristics(&self) -> Characteristics {
        if self.concurrent {
            Characteristics::CONCURRENT | Characteristics::UNORDERED
        } else {
            Characteristics::NONE
        }
    }
}

/* ===================== PartitioningBy ===================== */

/// Split elements by a predicate. The result always holds both `true` and `false`.
pub struct PartitioningBy<P, D> {
    pred: P,
    downstream: D,
}

/// ```
/// use ironstream::*;
/// use ironstream::collectors::partitioning_by;
///
/// let parts = from_vec(vec![1, 2, 3]).collect(partitioning_by(|age: &i32| *age > 2)).unwrap();
/// assert_eq!(parts[&true], vec![3]);
/// assert_eq!(parts[&false], vec![1, 2]);
/// assert_eq!(parts.len(), 2);
/// ```
pub fn partitioning_by<T, P>(pred: P) -> PartitioningBy<P, ToList>
where
    T: Send,
    P: Fn(&T) -> bool,
{
    partitioning_by_with(pred, ToList)
}

pub fn partitioning_by_with<T, P, D>(pred: P, downstream: D) -> PartitioningBy<P, D>
where
    P: Fn(&T) -> bool,
    D: Collector<T>,
{
    PartitioningBy { pred, downstream }
}

/// `(matching, not matching)` accumulators.
pub struct Halves<A> {
    yes: A,
    no: A,
}

impl<T, P, D> Collector<T> for PartitioningBy<P, D>
where
    P: Fn(&T) -> bool + Send + Sync,
    D: Collector<T>,
{
    type Acc = Halves<D::Acc>;
    type Output = HashMap<bool, D::Output>;

    fn create(&self) -> Self::Acc {
        Halves { yes: self.downstream.create(), no: self.downstream.create() }
    }

    fn accumulate(&self, acc: &mut Self::Acc, item: T) -> Result<()> {
        if (self.pred)(&item) {
            self.downstream.accumulate(&mut acc.yes, item)
        } else {
            self.downstream.accumulate(&mut acc.no, item)
        }
    }

    fn combine(&self, acc: &mut Self::Acc, other: Self::Acc) -> Result<()> {
        self.downstream.combine(&mut acc.yes, other.yes)?;
        self.downstream.combine(&mut acc.no, other.no)
    }

    fn finish(&self, acc: Self::Acc) -> Result<Self::Output> {
        let mut out = HashMap::with_capacity(2);
        out.insert(true, self.downstream.finish(acc.yes)?);
        out.insert(false, self.downstream.finish(acc.no)?);
        Ok(out)
    }
}

/* ===================== Mapping ===================== */

/// Apply `f` before handing elements to `downstream`.
pub struct Mapping<U, F, D> {
    f: F,
    downstream: D,
    _u: PhantomData<fn() -> U>,
}

/// ```
/// use ironstream::*;
/// use ironstream::collectors::{grouping_by_with, mapping, to_list};
///
/// let people = vec![(1, "xh".to_string()), (2, "xm".to_string()), (1, "xk".to_string())];
/// let names_by_age = from_vec(people)
///     .collect(grouping_by_with(|p: &(i32, String)| p.0, mapping(|p: (i32, String)| p.1, to_list())))
///     .unwrap();
/// assert_eq!(names_by_age[&1], vec!["xh", "xk"]);
/// ```
pub fn mapping<T, U, F, D>(f: F, downstream: D) -> Mapping<U, F, D>
where
    F: Fn(T) -> U,
    D: Collector<U>,
{
    Mapping { f, downstream, _u: PhantomData }
}

impl<T, U, F, D> Collector<T> for Mapping<U, F, D>
where
    F: Fn(T) -> U + Send + Sync,
    D: Collector<U>,
{
    type Acc = D::Acc;
    type Output = D::Output;

    fn create(&self) -> D::Acc {
        self.downstream.create()
    }

    fn accumulate(&self, acc: &mut D::Acc, item: T) -> Result<()> {
        self.downstream.accumulate(acc, (self.f)(item))
    }

    fn combine(&self, acc: &mut D::Acc, other: D::Acc) -> Result<()> {
        self.downstream.combine(acc, other)
    }

    fn finish(&self, acc: D::Acc) -> Result<D::Output> {
        self.downstream.finish(acc)
    }

    fn characteristics(&self) -> Characteristics {
        self.downstream.characteristics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::counting;

    #[test]
    fn partitioning_keeps_empty_halves() -> Result<()> {
        let c = partitioning_by(|x: &i32| *x > 100);
        let mut acc = c.create();
        c.accumulate(&mut acc, 1)?;
        let out = c.finish(acc)?;
        assert_eq!(out[&true], Vec::<i32>::new());
        assert_eq!(out[&false], vec![1]);
        Ok(())
    }

    #[test]
    fn grouping_combine_merges_shared_keys() -> Result<()> {
        let c = grouping_by_with(|s: &&str| s.len(), counting());
        let mut left = c.create();
        let mut right = c.create();
        c.accumulate(&mut left, "a")?;
        c.accumulate(&mut right, "b")?;
        c.accumulate(&mut right, "cc")?;
        c.combine(&mut left, right)?;
        let out = c.finish(left)?;
        assert_eq!(out[&1], 2);
        assert_eq!(out[&2], 1);
        Ok(())
    }

    fn halves<T: Send + Clone>(
        items: &[T],
        pred: impl Fn(&T) -> bool + Send + Sync,
    ) -> Result<HashMap<bool, Vec<T>>> {
        let c = partitioning_by(pred);
        let mut acc = c.create();
        for item in items {
            c.accumulate(&mut acc, item.clone())?;
        }
        c.finish(acc)
    }

    #[test]
    fn default_downstream_works_for_generic_elements() -> Result<()> {
        let out = halves(&["x".to_string(), "yy".to_string()], |s| s.len() > 1)?;
        assert_eq!(out[&true], vec!["yy".to_string()]);
        assert_eq!(out[&false], vec!["x".to_string()]);

        let c = grouping_by(|s: &String| s.len());
        let mut acc = c.create();
        c.accumulate(&mut acc, "ab".to_string())?;
        c.accumulate(&mut acc, "cd".to_string())?;
        assert_eq!(c.finish(acc)?[&2], vec!["ab".to_string(), "cd".to_string()]);
        Ok(())
    }

    #[test]
    fn concurrent_grouping_is_flagged() {
        let c = grouping_by_concurrent(|x: &u8| *x % 2);
        let ch = Collector::<u8>::characteristics(&c);
        assert!(ch.contains(Characteristics::CONCURRENT | Characteristics::UNORDERED));
    }
}
