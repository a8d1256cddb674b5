//! The collector protocol and the standard collectors.
//!
//! A [`Collector`] describes how to fold a sequence into a result container:
//!
//! - `create` makes an empty accumulator,
//! - `accumulate` folds one element into it,
//! - `combine` merges the accumulator of a later partition into an earlier one,
//! - `finish` turns the accumulator into the result.
//!
//! Sequential evaluation uses one accumulator and never calls `combine`. Parallel
//! evaluation gives every partition its own accumulator and merges them in partition
//! order, so `combine` must be associative. A collector that is both
//! [`CONCURRENT`](Characteristics::CONCURRENT) and unordered (or run on an
//! [`unordered`](crate::Sequence::unordered) sequence) instead shares a single
//! mutex-guarded accumulator between workers.
//!
//! # Standard collectors
//! - [`to_list`], [`to_set`], [`to_map`]
//! - [`joining`], [`joining_with`]
//! - [`counting`], [`summing`], [`averaging`]
//! - [`min_by`], [`max_by`], [`reducing`], [`reducing_from`]
//! - [`grouping_by`], [`grouping_by_with`], [`grouping_by_concurrent`]
//! - [`partitioning_by`], [`partitioning_by_with`]
//! - [`mapping`]
//! - [`from_fns`] for ad-hoc collectors built from closures
//!
//! # Examples
//! ```
//! use ironstream::*;
//! use ironstream::collectors::*;
//!
//! let names = from_vec(vec!["xh", "xm", "xk"]).collect(joining(",", "(", ")")).unwrap();
//! assert_eq!(names, "(xh,xm,xk)");
//!
//! let by_len = from_vec(vec!["a", "bb", "cc", "d"])
//!     .collect(grouping_by_with(|s: &&str| s.len(), counting()))
//!     .unwrap();
//! assert_eq!(by_len[&1], 2);
//! assert_eq!(by_len[&2], 2);
//! ```

mod basic;
mod grouping;
mod numeric;

use anyhow::Result;
use std::ops::BitOr;

pub use basic::{
    counting, from_fns, joining, joining_with, to_list, to_map, to_set, Counting, FnCollector,
    Joining, ToList, ToMap, ToSet,
};
pub use grouping::{
    grouping_by, grouping_by_concurrent, grouping_by_with, mapping, partitioning_by,
    partitioning_by_with, GroupingBy, Mapping, PartitioningBy,
};
pub use numeric::{
    averaging, max_by, min_by, reducing, reducing_from, summing, Averaging, MaxBy, MinBy,
    Reducing, ReducingFrom, Summing,
};

/// Hints a collector gives the evaluator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Characteristics(u8);

impl Characteristics {
    pub const NONE: Self = Self(0);
    /// The accumulator tolerates `accumulate` calls from several workers, provided
    /// they are serialized by the evaluator.
    pub const CONCURRENT: Self = Self(1);
    /// The result does not depend on encounter order.
    pub const UNORDERED: Self = Self(1 << 1);
    /// `finish` returns the accumulator unchanged.
    pub const IDENTITY_FINISH: Self = Self(1 << 2);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for Characteristics {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Four-function accumulation protocol used by
/// [`Sequence::collect`](crate::Sequence::collect).
///
/// Collectors are shared by reference between workers, so they must be `Send + Sync`;
/// they hold no per-evaluation state and may be reused.
pub trait Collector<T>: Send + Sync {
    type Acc: Send;
    type Output;

    fn create(&self) -> Self::Acc;

    fn accumulate(&self, acc: &mut Self::Acc, item: T) -> Result<()>;

    /// Merge `other`, which covers elements that come after those in `acc`.
    fn combine(&self, acc: &mut Self::Acc, other: Self::Acc) -> Result<()>;

    fn finish(&self, acc: Self::Acc) -> Result<Self::Output>;

    fn characteristics(&self) -> Characteristics {
        Characteristics::NONE
    }
}

impl<T, C: Collector<T> + ?Sized> Collector<T> for &C {
    type Acc = C::Acc;
    type Output = C::Output;

    fn create(&self) -> C::Acc {
        (**self).create()
    }

    fn accumulate(&self, acc: &mut C::Acc, item: T) -> Result<()> {
        (**self).accumulate(acc, item)
    }

    fn combine(&self, acc: &mut C::Acc, other: C::Acc) -> Result<()> {
        (**self).combine(acc, other)
    }

    fn finish(&self, acc: C::Acc) -> Result<C::Output> {
        (**self).finish(acc)
    }

    fn characteristics(&self) -> Characteristics {
        (**self).characteristics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characteristics_union_and_contains() {
        let c = Characteristics::CONCURRENT | Characteristics::UNORDERED;
        assert!(c.contains(Characteristics::CONCURRENT));
        assert!(c.contains(Characteristics::UNORDERED));
        assert!(!c.contains(Characteristics::IDENTITY_FINISH));
        assert!(c.contains(Characteristics::NONE));
        assert_eq!(Characteristics::default(), Characteristics::NONE);
    }
}
