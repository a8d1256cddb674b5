//! Execution modes and the partition driver shared by every terminal operation.

use crate::node::Puller;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecMode {
    Sequential,
    Parallel { threads: Option<usize>, partitions: Option<usize> },
}

/// How a terminal operation evaluates its chain.
///
/// `threads` builds a dedicated rayon pool for the evaluation; `None` uses the global
/// pool. `partitions` defaults to [`Runner::default_partitions`].
#[derive(Clone, Copy, Debug)]
pub struct Runner {
    pub mode: ExecMode,
    pub default_partitions: usize,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            mode: ExecMode::Sequential,
            default_partitions: 2 * num_cpus::get().max(2),
        }
    }
}

impl Runner {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn parallel(threads: Option<usize>, partitions: Option<usize>) -> Self {
        Self { mode: ExecMode::Parallel { threads, partitions }, ..Default::default() }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self.mode, ExecMode::Parallel { .. })
    }

    /// Number of partitions a parallel evaluation asks its source for.
    pub fn partitions(&self) -> usize {
        match self.mode {
            ExecMode::Sequential => 1,
            ExecMode::Parallel { partitions, .. } => {
                partitions.unwrap_or(self.default_partitions).max(1)
            }
        }
    }

    /// Run `f` on this runner's thread pool.
    pub(crate) fn install<R, F>(&self, f: F) -> Result<R>
    where
        R: Send,
        F: FnOnce() -> Result<R> + Send,
    {
        match self.mode {
            ExecMode::Parallel { threads: Some(t), .. } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(t.max(1))
                    .build()
                    .context("build evaluation thread pool")?;
                pool.install(f)
            }
            _ => f(),
        }
    }
}

/// Outcome of feeding one element to a terminal accumulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    /// The whole evaluation is decided; every worker should stop pulling.
    Cancel,
    /// This partition holds the answer for every later partition: those stop pulling,
    /// earlier ones keep going.
    Claim,
}

/// Drive every partition to completion (or cancellation), one accumulator per partition.
///
/// Results come back in partition order. On failure the first error in partition order
/// is returned, and the other workers are told to stop. A partition that returns
/// [`Step::Claim`] stops every partition with a higher index.
pub(crate) fn run_partitions<T, A, I, S>(
    parts: Vec<Puller<T>>,
    parallel: bool,
    init: I,
    step: S,
) -> Result<Vec<A>>
where
    T: Send,
    A: Send,
    I: Fn() -> A + Sync,
    S: Fn(&mut A, T) -> Result<Step> + Sync,
{
    let stop = AtomicBool::new(false);
    let claimed = AtomicUsize::new(usize::MAX);
    let work = |(index, mut up): (usize, Puller<T>)| -> Result<A> {
        let mut acc = init();
        while !stop.load(Ordering::Relaxed) && index <= claimed.load(Ordering::Relaxed) {
            let item = match up.next() {
                Ok(Some(item)) => item,
                Ok(None) => break,
                Err(e) => {
                    stop.store(true, Ordering::Relaxed);
                    return Err(e);
                }
            };
            match step(&mut acc, item) {
                Ok(Step::Continue) => {}
                Ok(Step::Cancel) => {
                    stop.store(true, Ordering::Relaxed);
                    break;
                }
                Ok(Step::Claim) => {
                    claimed.fetch_min(index, Ordering::Relaxed);
                    break;
                }
                Err(e) => {
                    stop.store(true, Ordering::Relaxed);
                    return Err(e);
                }
            }
        }
        Ok(acc)
    };

    let results: Vec<Result<A>> = if parallel && parts.len() > 1 {
        parts.into_par_iter().enumerate().map(&work).collect()
    } else {
        parts.into_iter().enumerate().map(&work).collect()
    };
    results.into_iter().collect()
}

/// Pull every partition to exhaustion concurrently, keeping partition order.
pub(crate) fn drain_all<T: Send>(parts: Vec<Puller<T>>) -> Result<Vec<Vec<T>>> {
    run_partitions(parts, true, Vec::new, |acc: &mut Vec<T>, item| {
        acc.push(item);
        Ok(Step::Continue)
    })
}

/// Split `v` into at most `n` contiguous, order-preserving chunks.
pub(crate) fn split_vec<T>(v: Vec<T>, n: usize) -> Vec<Vec<T>> {
    let len = v.len();
    if n <= 1 || len <= 1 {
        return vec![v];
    }
    let chunk = len.div_ceil(n);
    let mut out = Vec::with_capacity(n);
    let mut it = v.into_iter();
    loop {
        let c: Vec<T> = it.by_ref().take(chunk).collect();
        if c.is_empty() {
            break;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::vec_pullers;

    #[test]
    fn split_vec_keeps_order_and_sizes() {
        let parts = split_vec((1..=10).collect::<Vec<_>>(), 3);
        assert_eq!(parts, vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 10]]);
        assert_eq!(split_vec(vec![1], 8), vec![vec![1]]);
        assert_eq!(split_vec(Vec::<u8>::new(), 4), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn default_runner_is_sequential() {
        let r = Runner::default();
        assert_eq!(r.mode, ExecMode::Sequential);
        assert_eq!(r.partitions(), 1);
        assert!(r.default_partitions >= 4);
    }

    #[test]
    fn parallel_runner_partitions() {
        assert_eq!(Runner::parallel(None, Some(6)).partitions(), 6);
        assert_eq!(Runner::parallel(None, Some(0)).partitions(), 1);
    }

    #[test]
    fn cancel_stops_other_partitions_results_in_order() -> Result<()> {
        let parts = vec_pullers((0..100).collect::<Vec<u32>>(), 4);
        let sums = run_partitions(parts, false, || 0u32, |acc, x| {
            *acc += x;
            Ok(if x == 10 { Step::Cancel } else { Step::Continue })
        })?;
        // sequential driver: first partition stops at 10, the rest never start pulling
        assert_eq!(sums, vec![55, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn claim_stops_later_partitions_only() -> Result<()> {
        let parts = vec_pullers((0..40).collect::<Vec<u32>>(), 4);
        let pulled = run_partitions(parts, false, || 0u32, |n, x| {
            *n += 1;
            Ok(if x == 12 { Step::Claim } else { Step::Continue })
        })?;
        // partition 1 claims at its third element; 0 runs out, 2 and 3 never pull
        assert_eq!(pulled, vec![10, 3, 0, 0]);
        Ok(())
    }

    #[test]
    fn worker_error_is_propagated() {
        let parts = vec_pullers((0..8).collect::<Vec<u32>>(), 4);
        let err = run_partitions(parts, true, || (), |_, x| {
            if x == 5 { anyhow::bail!("bad element {x}") } else { Ok(Step::Continue) }
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "bad element 5");
    }
}
