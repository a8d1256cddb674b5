//! Whole-sequence terminals: counting, extremes, reductions, `for_each`, `sum`.

use crate::collectors::{max_by, min_by, reducing, reducing_from};
use crate::runner::Step;
use crate::sequence::Elem;
use crate::Sequence;
use anyhow::Result;
use std::cmp::Ordering;
use std::iter::Sum;

impl<T: Elem> Sequence<T> {
    /// Number of elements.
    pub fn count(self) -> Result<u64> {
        let counts = self.drive("count", || 0u64, |n, _| {
            *n += 1;
            Ok(Step::Continue)
        })?;
        Ok(counts.into_iter().sum())
    }

    /// Run `f` on every element. In parallel, calls from different partitions interleave.
    pub fn for_each<F>(self, f: F) -> Result<()>
    where
        F: Fn(T) + Sync,
    {
        self.drive("for_each", || (), |_, item| {
            f(item);
            Ok(Step::Continue)
        })?;
        Ok(())
    }

    /// Smallest element by `cmp`; the first one wins a tie. `None` when empty.
    pub fn min_by<C>(self, cmp: C) -> Result<Option<T>>
    where
        C: Fn(&T, &T) -> Ordering + Send + Sync,
    {
        self.collect_as("min_by", &min_by(cmp))
    }

    /// Largest element by `cmp`; the first one wins a tie. `None` when empty.
    ///
    /// ```
    /// use ironstream::*;
    /// let oldest = from_vec(vec![("xh", 30), ("xm", 41), ("xk", 41)])
    ///     .max_by(|a, b| a.1.cmp(&b.1))
    ///     .unwrap();
    /// assert_eq!(oldest, Some(("xm", 41)));
    /// ```
    pub fn max_by<C>(self, cmp: C) -> Result<Option<T>>
    where
        C: Fn(&T, &T) -> Ordering + Send + Sync,
    {
        self.collect_as("max_by", &max_by(cmp))
    }

    pub fn min_by_key<K, F>(self, key: F) -> Result<Option<T>>
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync,
    {
        self.collect_as("min_by_key", &min_by(move |a: &T, b: &T| key(a).cmp(&key(b))))
    }

    pub fn max_by_key<K, F>(self, key: F) -> Result<Option<T>>
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync,
    {
        self.collect_as("max_by_key", &max_by(move |a: &T, b: &T| key(a).cmp(&key(b))))
    }

    /// Left fold without a seed. `None` when empty.
    ///
    /// ```
    /// use ironstream::*;
    /// assert_eq!(from_vec(vec![1, 2, 3]).reduce(|a, b| a + b).unwrap(), Some(6));
    /// assert_eq!(empty::<i32>().reduce(|a, b| a + b).unwrap(), None);
    /// ```
    pub fn reduce<F>(self, op: F) -> Result<Option<T>>
    where
        F: Fn(T, T) -> T + Send + Sync,
    {
        self.collect_as("reduce", &reducing(op))
    }

    /// Left fold from `identity`. In parallel every partition starts from `identity` and
    /// the partial results are folded together with `op`, so `identity` has to be an
    /// identity for `op` and `op` associative.
    ///
    /// ```
    /// use ironstream::*;
    /// assert_eq!(empty::<i32>().fold(10, |a, b| a - b).unwrap(), 10);
    /// ```
    pub fn fold<F>(self, identity: T, op: F) -> Result<T>
    where
        T: Clone + Sync,
        F: Fn(T, T) -> T + Send + Sync,
    {
        self.collect_as("fold", &reducing_from(identity, op))
    }

    /// Fold into a different type.
    ///
    /// Sequentially this is a plain left fold with `accumulator`; `combiner` is never
    /// called. In parallel each partition folds from its own copy of `identity` and the
    /// partition results are merged left to right with `combiner`. The two modes agree
    /// only if `combiner` is associative, `identity` is its identity, and `accumulator`
    /// is compatible with it.
    ///
    /// ```
    /// use ironstream::*;
    /// let total_len = from_vec(vec!["ab", "cde", "f"])
    ///     .parallel()
    ///     .reduce_with(0usize, |n, s| n + s.len(), |a, b| a + b)
    ///     .unwrap();
    /// assert_eq!(total_len, 6);
    /// ```
    pub fn reduce_with<U, A, C>(self, identity: U, accumulator: A, combiner: C) -> Result<U>
    where
        U: Clone + Send + Sync,
        A: Fn(U, T) -> U + Sync,
        C: Fn(U, U) -> U,
    {
        let partials = self.drive(
            "reduce_with",
            || Some(identity.clone()),
            |slot: &mut Option<U>, item| {
                *slot = slot.take().map(|cur| accumulator(cur, item));
                Ok(Step::Continue)
            },
        )?;
        Ok(partials
            .into_iter()
            .flatten()
            .reduce(combiner)
            .unwrap_or(identity))
    }
}

impl<T: Elem + Ord> Sequence<T> {
    /// Smallest element by natural order; the earliest one on ties.
    pub fn min(self) -> Result<Option<T>> {
        self.min_by(T::cmp)
    }

    /// Largest element by natural order; the earliest one on ties.
    pub fn max(self) -> Result<Option<T>> {
        self.max_by(T::cmp)
    }
}

impl<T: Elem + Sum> Sequence<T> {
    /// Sum of all elements; the type's zero when empty.
    pub fn sum(self) -> Result<T> {
        let partials = self.drive("sum", || None, |slot: &mut Option<T>, item| {
            *slot = Some(match slot.take() {
                Some(cur) => [cur, item].into_iter().sum(),
                None => item,
            });
            Ok(Step::Continue)
        })?;
        Ok(partials.into_iter().flatten().sum())
    }
}

#[cfg(test)]
mod tests {
    use crate::{empty, from_vec};
    use anyhow::Result;

    #[test]
    fn reduce_with_sequential_is_left_fold() -> Result<()> {
        let v: Vec<i64> = (1..=24).collect();
        let got = from_vec(v).reduce_with(0i64, |a, b| a - b, |a, b| a * b)?;
        assert_eq!(got, -300);
        Ok(())
    }

    #[test]
    fn min_max_keep_first_on_ties() -> Result<()> {
        let data = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
        assert_eq!(from_vec(data.clone()).min_by_key(|p| p.0)?, Some((1, 'b')));
        assert_eq!(from_vec(data).parallel_with(None, Some(4)).max_by_key(|p| p.0)?, Some((2, 'a')));
        Ok(())
    }

    #[test]
    fn sum_and_count() -> Result<()> {
        assert_eq!(from_vec(vec![1.5f64, 2.5]).sum()?, 4.0);
        assert_eq!(empty::<u32>().sum()?, 0);
        assert_eq!(from_vec(vec![(); 9]).parallel().count()?, 9);
        Ok(())
    }

    #[test]
    fn min_and_max_of_empty_are_none() -> Result<()> {
        assert_eq!(empty::<u8>().min()?, None);
        assert_eq!(empty::<u8>().max()?, None);
        Ok(())
    }
}
