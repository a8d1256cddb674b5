//! `collect` and `to_vec`.

use crate::collectors::{to_list, Characteristics, Collector};
use crate::runner::Step;
use crate::sequence::Elem;
use crate::Sequence;
use anyhow::Result;
use std::sync::{Mutex, PoisonError};

impl<T: Elem> Sequence<T> {
    /// Fold the sequence into a container with `collector`.
    ///
    /// In parallel, each partition gets its own accumulator and the partial results are
    /// merged in partition order with [`Collector::combine`], unless the collector is
    /// [`CONCURRENT`](Characteristics::CONCURRENT) and order does not matter (the
    /// collector is [`UNORDERED`](Characteristics::UNORDERED) or the sequence was made
    /// [`unordered`](Self::unordered)); then all workers feed one shared accumulator.
    ///
    /// ```
    /// use ironstream::*;
    /// use ironstream::collectors::joining;
    ///
    /// let s = from_vec(vec!["a", "b", "c"]).parallel_with(None, Some(3));
    /// assert_eq!(s.collect(joining("|", "<", ">")).unwrap(), "<a|b|c>");
    /// ```
    pub fn collect<C>(self, collector: C) -> Result<C::Output>
    where
        C: Collector<T>,
    {
        self.collect_as("collect", &collector)
    }

    /// Elements in encounter order.
    pub fn to_vec(self) -> Result<Vec<T>> {
        self.collect_as("to_vec", &to_list())
    }

    pub(crate) fn collect_as<C>(&self, op: &'static str, collector: &C) -> Result<C::Output>
    where
        C: Collector<T>,
    {
        let ch = collector.characteristics();
        let shared = self.is_parallel()
            && ch.contains(Characteristics::CONCURRENT)
            && (ch.contains(Characteristics::UNORDERED) || !self.is_ordered());

        if shared {
            let acc = Mutex::new(collector.create());
            self.drive(op, || (), |_, item| {
                let mut guard = acc.lock().unwrap_or_else(PoisonError::into_inner);
                collector.accumulate(&mut guard, item)?;
                Ok(Step::Continue)
            })?;
            return collector.finish(acc.into_inner().unwrap_or_else(PoisonError::into_inner));
        }

        let partials = self.drive(op, || collector.create(), |acc, item| {
            collector.accumulate(acc, item)?;
            Ok(Step::Continue)
        })?;
        let mut partials = partials.into_iter();
        let mut acc = partials.next().unwrap_or_else(|| collector.create());
        for later in partials {
            collector.combine(&mut acc, later)?;
        }
        collector.finish(acc)
    }
}

#[cfg(test)]
mod tests {
    use crate::collectors::{from_fns, grouping_by_concurrent, Characteristics};
    use crate::from_vec;
    use anyhow::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn parallel_to_vec_keeps_order() -> Result<()> {
        let v: Vec<u32> = (0..257).collect();
        let got = from_vec(v.clone()).parallel_with(Some(3), Some(7)).map(|x| x * 2).to_vec()?;
        assert_eq!(got, v.iter().map(|x| x * 2).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn concurrent_collector_never_combines() -> Result<()> {
        let combines = AtomicUsize::new(0);
        let total = from_vec((1..=100u64).collect::<Vec<_>>())
            .parallel_with(None, Some(5))
            .unordered()
            .collect(
                from_fns(
                    || 0u64,
                    |acc: &mut u64, x: u64| *acc += x,
                    |acc: &mut u64, other: u64| {
                        combines.fetch_add(1, Ordering::SeqCst);
                        *acc += other;
                    },
                    |acc| acc,
                )
                .with_characteristics(Characteristics::CONCURRENT),
            )?;
        assert_eq!(total, 5050);
        assert_eq!(combines.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[test]
    fn per_partition_collector_combines_in_parallel() -> Result<()> {
        let combines = AtomicUsize::new(0);
        let total = from_vec((1..=100u64).collect::<Vec<_>>())
            .parallel_with(None, Some(5))
            .collect(from_fns(
                || 0u64,
                |acc: &mut u64, x: u64| *acc += x,
                |acc: &mut u64, other: u64| {
                    combines.fetch_add(1, Ordering::SeqCst);
                    *acc += other;
                },
                |acc| acc,
            ))?;
        assert_eq!(total, 5050);
        assert_eq!(combines.load(Ordering::SeqCst), 4);
        Ok(())
    }

    #[test]
    fn concurrent_grouping_matches_sequential_groups() -> Result<()> {
        let data: Vec<u32> = (0..300).collect();
        let mut par = from_vec(data.clone())
            .parallel()
            .collect(grouping_by_concurrent(|x: &u32| x % 3))?;
        let mut seq = from_vec(data).collect(grouping_by_concurrent(|x: &u32| x % 3))?;
        for k in 0..3 {
            let (mut a, mut b) = (par.remove(&k).unwrap_or_default(), seq.remove(&k).unwrap_or_default());
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
        }
        Ok(())
    }
}
