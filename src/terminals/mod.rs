//! Terminal operations.
//!
//! A terminal operation marks its chain consumed, opens it (one puller sequentially, one
//! per partition in parallel), and drives every puller through
//! [`run_partitions`](crate::runner::run_partitions) on the runner's thread pool.
//! Partition results are always merged in partition order.

mod aggregate;
mod collect;
mod matching;

use crate::runner::{run_partitions, Step};
use crate::sequence::Elem;
use crate::Sequence;
use anyhow::Result;

impl<T: Elem> Sequence<T> {
    /// Evaluate the chain with one accumulator per partition.
    pub(crate) fn drive<A, I, S>(&self, op: &'static str, init: I, step: S) -> Result<Vec<A>>
    where
        A: Send,
        I: Fn() -> A + Sync,
        S: Fn(&mut A, T) -> Result<Step> + Sync,
    {
        self.runner.install(|| {
            let parts = self.start(op)?;
            run_partitions(parts, self.is_parallel(), &init, &step)
        })
    }
}
