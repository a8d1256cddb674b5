//! Container collectors: list, set, map, joined string, count, closures.

use super::{Characteristics, Collector};
use crate::error::StreamError;
use anyhow::Result;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

/* ===================== ToList ===================== */

/// Elements in encounter order.
#[derive(Clone, Copy, Debug, Default)]
pub struct ToList;

/// Collect into a `Vec` in encounter order.
pub fn to_list() -> ToList {
    ToList
}

impl<T: Send> Collector<T> for ToList {
    type Acc = Vec<T>;
    type Output = Vec<T>;

    fn create(&self) -> Vec<T> {
        Vec::new()
    }

    fn accumulate(&self, acc: &mut Vec<T>, item: T) -> Result<()> {
        acc.push(item);
        Ok(())
    }

    fn combine(&self, acc: &mut Vec<T>, mut other: Vec<T>) -> Result<()> {
        acc.append(&mut other);
        Ok(())
    }

    fn finish(&self, acc: Vec<T>) -> Result<Vec<T>> {
        Ok(acc)
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::IDENTITY_FINISH
    }
}

/* ===================== ToSet ===================== */

/// Distinct elements, no order.
#[derive(Clone, Copy, Debug, Default)]
pub struct ToSet;

/// Collect into a `HashSet`.
pub fn to_set() -> ToSet {
    ToSet
}

impl<T: Send + Eq + Hash> Collector<T> for ToSet {
    type Acc = HashSet<T>;
    type Output = HashSet<T>;

    fn create(&self) -> HashSet<T> {
        HashSet::new()
    }

    fn accumulate(&self, acc: &mut HashSet<T>, item: T) -> Result<()> {
        acc.insert(item);
        Ok(())
    }

    fn combine(&self, acc: &mut HashSet<T>, other: HashSet<T>) -> Result<()> {
        if acc.is_empty() {
            *acc = other;
        } else {
            acc.extend(other);
        }
        Ok(())
    }

    fn finish(&self, acc: HashSet<T>) -> Result<HashSet<T>> {
        Ok(acc)
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::UNORDERED | Characteristics::IDENTITY_FINISH
    }
}

/* ===================== ToMap ===================== */

/// `key(&x) -> value(x)` for every element. A repeated key is an error, never an
/// overwrite.
pub struct ToMap<K, V, KF, VF> {
    key: KF,
    value: VF,
    _kv: PhantomData<fn() -> (K, V)>,
}

/// ```
/// use ironstream::*;
/// use ironstream::collectors::to_map;
///
/// let m = from_vec(vec![("xh", 1), ("xm", 2)])
///     .collect(to_map(|p: &(&str, i32)| p.0.to_string(), |p: (&str, i32)| p.1))
///     .unwrap();
/// assert_eq!(m["xm"], 2);
///
/// let err = from_vec(vec![(1, 10), (1, 20)])
///     .collect(to_map(|p: &(i32, i32)| p.0, |p: (i32, i32)| p.1))
///     .unwrap_err();
/// assert!(matches!(err.downcast_ref::<StreamError>(), Some(StreamError::DuplicateKey { .. })));
/// ```
pub fn to_map<T, K, V, KF, VF>(key: KF, value: VF) -> ToMap<K, V, KF, VF>
where
    KF: Fn(&T) -> K,
    VF: Fn(T) -> V,
{
    ToMap { key, value, _kv: PhantomData }
}

fn insert_unique<K: Eq + Hash + Debug, V>(map: &mut HashMap<K, V>, k: K, v: V) -> Result<()> {
    match map.entry(k) {
        Entry::Occupied(e) => Err(StreamError::duplicate_key(e.key()).into()),
        Entry::Vacant(e) => {
            e.insert(v);
            Ok(())
        }
    }
}

impl<T, K, V, KF, VF> Collector<T> for ToMap<K, V, KF, VF>
where
    K: Eq + Hash + Debug + Send,
    V: Send,
    KF: Fn(&T) -> K + Send + Sync,
    VF: Fn(T) -> V + Send + Sync,
{
    type Acc = HashMap<K, V>;
    type Output = HashMap<K, V>;

    fn create(&self) -> HashMap<K, V> {
        HashMap::new()
    }

    fn accumulate(&self, acc: &mut HashMap<K, V>, item: T) -> Result<()> {
        let k = (self.key)(&item);
        insert_unique(acc, k, (self.value)(item))
    }

    fn combine(&self, acc: &mut HashMap<K, V>, other: HashMap<K, V>) -> Result<()> {
        for (k, v) in other {
            insert_unique(acc, k, v)?;
        }
        Ok(())
    }

    fn finish(&self, acc: HashMap<K, V>) -> Result<HashMap<K, V>> {
        Ok(acc)
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::IDENTITY_FINISH
    }
}

/* ===================== Joining ===================== */

/// String elements joined by a delimiter, wrapped in a prefix and suffix.
#[derive(Clone, Debug, Default)]
pub struct Joining {
    delimiter: String,
    prefix: String,
    suffix: String,
}

pub fn joining(delimiter: &str, prefix: &str, suffix: &str) -> Joining {
    Joining {
        delimiter: delimiter.to_string(),
        prefix: prefix.to_string(),
        suffix: suffix.to_string(),
    }
}

pub fn joining_with(delimiter: &str) -> Joining {
    joining(delimiter, "", "")
}

/// `None` until the first element arrives, so an empty run never contributes a delimiter.
type JoinAcc = Option<String>;

impl<T: AsRef<str>> Collector<T> for Joining {
    type Acc = JoinAcc;
    type Output = String;

    fn create(&self) -> JoinAcc {
        None
    }

    fn accumulate(&self, acc: &mut JoinAcc, item: T) -> Result<()> {
        match acc {
            Some(buf) => {
                buf.push_str(&self.delimiter);
                buf.push_str(item.as_ref());
            }
            None => *acc = Some(item.as_ref().to_string()),
        }
        Ok(())
    }

    fn combine(&self, acc: &mut JoinAcc, other: JoinAcc) -> Result<()> {
        match (acc.as_mut(), other) {
            (Some(buf), Some(more)) => {
                buf.push_str(&self.delimiter);
                buf.push_str(&more);
            }
            (None, more) => *acc = more,
            (Some(_), None) => {}
        }
        Ok(())
    }

    fn finish(&self, acc: JoinAcc) -> Result<String> {
        Ok(format!("{}{}{}", self.prefix, acc.unwrap_or_default(), self.suffix))
    }
}

/* ===================== Counting ===================== */

#[derive(Clone, Copy, Debug, Default)]
pub struct Counting;

/// Count elements as a `u64`.
pub fn counting() -> Counting {
    Counting
}

impl<T> Collector<T> for Counting {
    type Acc = u64;
    type Output = u64;

    fn create(&self) -> u64 {
        0
    }

    fn accumulate(&self, acc: &mut u64, _item: T) -> Result<()> {
        *acc += 1;
        Ok(())
    }

    fn combine(&self, acc: &mut u64, other: u64) -> Result<()> {
        *acc += other;
        Ok(())
    }

    fn finish(&self, acc: u64) -> Result<u64> {
        Ok(acc)
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::UNORDERED | Characteristics::IDENTITY_FINISH
    }
}

/* ===================== FnCollector ===================== */

/// Collector assembled from four closures.
pub struct FnCollector<A, R, C, Ac, Cb, Fi> {
    create: C,
    accumulate: Ac,
    combine: Cb,
    finish: Fi,
    characteristics: Characteristics,
    _ar: PhantomData<fn() -> (A, R)>,
}

/// Build a collector out of closures.
///
/// ```
/// use ironstream::*;
/// use ironstream::collectors::from_fns;
///
/// let longest = from_vec(vec!["aa", "b", "cccc", "dd"])
///     .collect(from_fns(
///         || 0usize,
///         |acc: &mut usize, s: &str| *acc = (*acc).max(s.len()),
///         |acc: &mut usize, other: usize| *acc = (*acc).max(other),
///         |acc| acc,
///     ))
///     .unwrap();
/// assert_eq!(longest, 4);
/// ```
pub fn from_fns<A, R, C, Ac, Cb, Fi>(
    create: C,
    accumulate: Ac,
    combine: Cb,
    finish: Fi,
) -> FnCollector<A, R, C, Ac, Cb, Fi>
where
    C: Fn() -> A,
    Fi: Fn(A) -> R,
{
    FnCollector {
        create,
        accumulate,
        combine,
        finish,
        characteristics: Characteristics::NONE,
        _ar: PhantomData,
    }
}

impl<A, R, C, Ac, Cb, Fi> FnCollector<A, R, C, Ac, Cb, Fi> {
    #[must_use]
    pub fn with_characteristics(mut self, characteristics: Characteristics) -> Self {
        self.characteristics = characteristics;
        self
    }
}

impl<T, A, R, C, Ac, Cb, Fi> Collector<T> for FnCollector<A, R, C, Ac, Cb, Fi>
where
    A: Send,
    C: Fn() -> A + Send + Sync,
    Ac: Fn(&mut A, T) + Send + Sync,
    Cb: Fn(&mut A, A) + Send + Sync,
    Fi: Fn(A) -> R + Send + Sync,
{
    type Acc = A;
    type Output = R;

    fn create(&self) -> A {
        (self.create)()
    }

    fn accumulate(&self, acc: &mut A, item: T) -> Result<()> {
        (self.accumulate)(acc, item);
        Ok(())
    }

    fn combine(&self, acc: &mut A, other: A) -> Result<()> {
        (self.combine)(acc, other);
        Ok(())
    }

    fn finish(&self, acc: A) -> Result<R> {
        Ok((self.finish)(acc))
    }

    fn characteristics(&self) -> Characteristics {
        self.characteristics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<T, C: Collector<T>>(c: &C, parts: Vec<Vec<T>>) -> Result<C::Output> {
        let mut accs = Vec::new();
        for part in parts {
            let mut a = c.create();
            for x in part {
                c.accumulate(&mut a, x)?;
            }
            accs.push(a);
        }
        let mut it = accs.into_iter();
        let mut first = it.next().unwrap_or_else(|| c.create());
        for a in it {
            c.combine(&mut first, a)?;
        }
        c.finish(first)
    }

    #[test]
    fn joining_skips_delimiter_for_empty_partitions() -> Result<()> {
        let j = joining(",", "[", "]");
        let out = run(&j, vec![vec![], vec!["a", "b"], vec![], vec!["c"]])?;
        assert_eq!(out, "[a,b,c]");
        assert_eq!(run(&j, Vec::<Vec<&str>>::new())?, "[]");
        Ok(())
    }

    #[test]
    fn to_map_detects_cross_partition_duplicates() {
        let c = to_map(|x: &(u8, u8)| x.0, |x: (u8, u8)| x.1);
        let err = run(&c, vec![vec![(1, 1), (2, 2)], vec![(1, 3)]]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StreamError>(),
            Some(StreamError::DuplicateKey { key }) if key == "1"
        ));
    }

    #[test]
    fn to_list_combines_in_order() -> Result<()> {
        assert_eq!(run(&to_list(), vec![vec![1, 2], vec![3], vec![4, 5]])?, vec![1, 2, 3, 4, 5]);
        Ok(())
    }

    #[test]
    fn counting_sums_partitions() -> Result<()> {
        assert_eq!(run(&counting(), vec![vec!['a'; 3], vec!['b'; 4]])?, 7);
        Ok(())
    }
}
