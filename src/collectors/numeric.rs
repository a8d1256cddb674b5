//! Arithmetic and folding collectors: summing, averaging, min/max, reducing.

use super::{Characteristics, Collector};
use anyhow::Result;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::mem::take;
use std::ops::Add;

/* ===================== Summing ===================== */

/// Sum of `f(x)`.
///
/// Requires `N: Add<Output=N> + Default`.
pub struct Summing<N, F> {
    f: F,
    _n: PhantomData<fn() -> N>,
}

pub fn summing<T, N, F>(f: F) -> Summing<N, F>
where
    F: Fn(&T) -> N,
{
    Summing { f, _n: PhantomData }
}

impl<T, N, F> Collector<T> for Summing<N, F>
where
    N: Add<Output = N> + Default + Send,
    F: Fn(&T) -> N + Send + Sync,
{
    type Acc = N;
    type Output = N;

    fn create(&self) -> N {
        N::default()
    }

    fn accumulate(&self, acc: &mut N, item: T) -> Result<()> {
        *acc = take(acc) + (self.f)(&item);
        Ok(())
    }

    fn combine(&self, acc: &mut N, other: N) -> Result<()> {
        *acc = take(acc) + other;
        Ok(())
    }

    fn finish(&self, acc: N) -> Result<N> {
        Ok(acc)
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::UNORDERED | Characteristics::IDENTITY_FINISH
    }
}

/* ===================== Averaging ===================== */

/// Arithmetic mean of `f(x)` as `f64`; `0.0` for an empty sequence.
pub struct Averaging<N, F> {
    f: F,
    _n: PhantomData<fn() -> N>,
}

pub fn averaging<T, N, F>(f: F) -> Averaging<N, F>
where
    F: Fn(&T) -> N,
    N: Into<f64>,
{
    Averaging { f, _n: PhantomData }
}

impl<T, N, F> Collector<T> for Averaging<N, F>
where
    N: Into<f64>,
    F: Fn(&T) -> N + Send + Sync,
{
    type Acc = (f64, u64);
    type Output = f64;

    fn create(&self) -> (f64, u64) {
        (0.0, 0)
    }

    fn accumulate(&self, acc: &mut (f64, u64), item: T) -> Result<()> {
        acc.0 += (self.f)(&item).into();
        acc.1 += 1;
        Ok(())
    }

    fn combine(&self, acc: &mut (f64, u64), other: (f64, u64)) -> Result<()> {
        acc.0 += other.0;
        acc.1 += other.1;
        Ok(())
    }

    fn finish(&self, acc: (f64, u64)) -> Result<f64> {
        Ok(if acc.1 == 0 { 0.0 } else { acc.0 / (acc.1 as f64) })
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::UNORDERED
    }
}

/* ===================== MinBy / MaxBy ===================== */

/// Keep `cur` unless `item` is strictly better; ties go to the earlier element.
fn keep_better<T, C>(acc: &mut Option<T>, item: T, cmp: &C, wanted: Ordering)
where
    C: Fn(&T, &T) -> Ordering,
{
    match acc {
        Some(cur) => {
            if cmp(&item, cur) == wanted {
                *cur = item;
            }
        }
        None => *acc = Some(item),
    }
}

/// Smallest element by a comparator, `None` if empty. Ties keep the first occurrence.
pub struct MinBy<C>(C);

/// Largest element by a comparator, `None` if empty. Ties keep the first occurrence.
pub struct MaxBy<C>(C);

pub fn min_by<T, C>(cmp: C) -> MinBy<C>
where
    C: Fn(&T, &T) -> Ordering,
{
    MinBy(cmp)
}

pub fn max_by<T, C>(cmp: C) -> MaxBy<C>
where
    C: Fn(&T, &T) -> Ordering,
{
    MaxBy(cmp)
}

macro_rules! extreme_collector {
    ($name:ident, $wanted:expr) => {
        impl<T, C> Collector<T> for $name<C>
        where
            T: Send,
            C: Fn(&T, &T) -> Ordering + Send + Sync,
        {
            type Acc = Option<T>;
            type Output = Option<T>;

            fn create(&self) -> Option<T> {
                None
            }

            fn accumulate(&self, acc: &mut Option<T>, item: T) -> Result<()> {
                keep_better(acc, item, &self.0, $wanted);
                Ok(())
            }

            fn combine(&self, acc: &mut Option<T>, other: Option<T>) -> Result<()> {
                if let Some(b) = other {
                    keep_better(acc, b, &self.0, $wanted);
                }
                Ok(())
            }

            fn finish(&self, acc: Option<T>) -> Result<Option<T>> {
                Ok(acc)
            }

            fn characteristics(&self) -> Characteristics {
                Characteristics::IDENTITY_FINISH
            }
        }
    };
}

extreme_collector!(MinBy, Ordering::Less);
extreme_collector!(MaxBy, Ordering::Greater);

/* ===================== Reducing ===================== */

/// Left fold with `op`, `None` if empty.
pub struct Reducing<F>(F);

pub fn reducing<T, F>(op: F) -> Reducing<F>
where
    F: Fn(T, T) -> T,
{
    Reducing(op)
}

impl<T, F> Collector<T> for Reducing<F>
where
    T: Send,
    F: Fn(T, T) -> T + Send + Sync,
{
    type Acc = Option<T>;
    type Output = Option<T>;

    fn create(&self) -> Option<T> {
        None
    }

    fn accumulate(&self, acc: &mut Option<T>, item: T) -> Result<()> {
        *acc = Some(match acc.take() {
            Some(cur) => (self.0)(cur, item),
            None => item,
        });
        Ok(())
    }

    fn combine(&self, acc: &mut Option<T>, other: Option<T>) -> Result<()> {
        if let Some(b) = other {
            self.accumulate(acc, b)?;
        }
        Ok(())
    }

    fn finish(&self, acc: Option<T>) -> Result<Option<T>> {
        Ok(acc)
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::IDENTITY_FINISH
    }
}

/// Left fold with `op` starting from `identity`. `identity` must be an identity for `op`
/// for parallel results to match sequential ones.
pub struct ReducingFrom<T, F> {
    identity: T,
    op: F,
}

pub fn reducing_from<T, F>(identity: T, op: F) -> ReducingFrom<T, F>
where
    T: Clone,
    F: Fn(T, T) -> T,
{
    ReducingFrom { identity, op }
}

impl<T, F> Collector<T> for ReducingFrom<T, F>
where
    T: Clone + Send + Sync,
    F: Fn(T, T) -> T + Send + Sync,
{
    type Acc = T;
    type Output = T;

    fn create(&self) -> T {
        self.identity.clone()
    }

    fn accumulate(&self, acc: &mut T, item: T) -> Result<()> {
        let cur = std::mem::replace(acc, self.identity.clone());
        *acc = (self.op)(cur, item);
        Ok(())
    }

    fn combine(&self, acc: &mut T, other: T) -> Result<()> {
        self.accumulate(acc, other)
    }

    fn finish(&self, acc: T) -> Result<T> {
        Ok(acc)
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::IDENTITY_FINISH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_by_keeps_first_of_equals() -> Result<()> {
        let c = max_by(|a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
        let mut acc = c.create();
        for x in [(1, 'a'), (3, 'b'), (3, 'c'), (2, 'd')] {
            c.accumulate(&mut acc, x)?;
        }
        assert_eq!(c.finish(acc)?, Some((3, 'b')));
        Ok(())
    }

    #[test]
    fn min_by_combine_prefers_earlier_partition() -> Result<()> {
        let c = min_by(|a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
        let mut left = Some((0, 'l'));
        c.combine(&mut left, Some((0, 'r')))?;
        assert_eq!(left, Some((0, 'l')));
        let mut empty = None;
        c.combine(&mut empty, Some((5, 'r')))?;
        assert_eq!(empty, Some((5, 'r')));
        Ok(())
    }

    #[test]
    fn averaging_empty_is_zero() -> Result<()> {
        let c = averaging(|x: &u32| *x);
        assert_eq!(Collector::<u32>::finish(&c, (0.0, 0))?, 0.0);
        Ok(())
    }

    #[test]
    fn reducing_empty_is_none() -> Result<()> {
        let c = reducing(|a: i32, b: i32| a + b);
        let acc = Collector::<i32>::create(&c);
        assert_eq!(c.finish(acc)?, None);
        Ok(())
    }
}
