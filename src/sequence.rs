//! The [`Sequence`] handle.

use crate::error::StreamError;
use crate::node::{Node, Puller, StageKind};
use crate::runner::{ExecMode, Runner};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Bound for sequence elements: they may cross worker threads under parallel evaluation.
pub trait Elem: Send + 'static {}
impl<T: Send + 'static> Elem for T {}

/// Shared "already consumed" flag for a chain and all its clones.
#[derive(Debug, Default)]
pub(crate) struct ConsumeGuard {
    consumed: AtomicBool,
}

impl ConsumeGuard {
    fn begin(&self, restartable: bool) -> Result<()> {
        if restartable {
            return Ok(());
        }
        if self.consumed.swap(true, Ordering::AcqRel) {
            return Err(StreamError::Exhausted.into());
        }
        Ok(())
    }

    fn is_consumed(&self) -> bool {
        self.consumed.load(Ordering::Acquire)
    }
}

/// A lazy, single-pass sequence of `T`.
///
/// Building a chain of stages is cheap and runs nothing; a terminal operation
/// (`count`, `collect`, `any_match`, ...) evaluates it exactly once. Clones share the
/// consumption state of the original: once any of them (or any chain derived from
/// them) has been evaluated, evaluating another fails with [`StreamError::Exhausted`].
/// Chains rooted in [`iterate`](crate::iterate) are the exception; they restart from
/// their seed on every evaluation.
pub struct Sequence<T> {
    pub(crate) node: Arc<dyn Node<T>>,
    pub(crate) guard: Arc<ConsumeGuard>,
    pub(crate) runner: Runner,
    pub(crate) ordered: bool,
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
            guard: Arc::clone(&self.guard),
            runner: self.runner,
            ordered: self.ordered,
        }
    }
}

impl<T: Elem> Sequence<T> {
    /// Wrap a source node in a fresh, sequential handle.
    pub fn from_node(node: Arc<dyn Node<T>>) -> Self {
        Self {
            node,
            guard: Arc::new(ConsumeGuard::default()),
            runner: Runner::default(),
            ordered: true,
        }
    }

    /// Hand a new downstream node the same consumption state and execution settings.
    pub(crate) fn chain<U, N>(self, node: N) -> Sequence<U>
    where
        N: Node<U> + 'static,
    {
        Sequence {
            node: Arc::new(node),
            guard: self.guard,
            runner: self.runner,
            ordered: self.ordered,
        }
    }

    /// Evaluate with the default parallel runner.
    #[must_use]
    pub fn parallel(self) -> Self {
        self.with_runner(Runner::parallel(None, None))
    }

    /// Evaluate in parallel with an explicit thread and/or partition count.
    #[must_use]
    pub fn parallel_with(self, threads: Option<usize>, partitions: Option<usize>) -> Self {
        self.with_runner(Runner::parallel(threads, partitions))
    }

    #[must_use]
    pub fn sequential(self) -> Self {
        self.with_runner(Runner::sequential())
    }

    #[must_use]
    pub fn with_runner(mut self, runner: Runner) -> Self {
        self.runner = runner;
        self
    }

    /// Declare that the caller does not depend on encounter order. Lets concurrent
    /// collectors share one accumulator.
    #[must_use]
    pub fn unordered(mut self) -> Self {
        self.ordered = false;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.runner.is_parallel()
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    pub fn mode(&self) -> ExecMode {
        self.runner.mode
    }

    /// Whether a terminal operation has already run on this chain.
    pub fn is_consumed(&self) -> bool {
        !self.node.restartable() && self.guard.is_consumed()
    }

    /// Stage names from the source down to this handle, e.g. `"vec -> filter -> map"`.
    pub fn explain(&self) -> String {
        self.stages()
            .into_iter()
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    pub fn stages(&self) -> Vec<(&'static str, StageKind)> {
        let mut out = Vec::new();
        self.node.lineage(&mut out);
        out
    }

    /// Open as a single sequential puller, consuming the chain. Used for nested sequences.
    pub(crate) fn open_sequential(&self) -> Result<Puller<T>> {
        self.guard.begin(self.node.restartable())?;
        self.node.open()
    }

    /// Mark the chain consumed and open it: one puller sequentially, several in parallel.
    pub(crate) fn start(&self, op: &'static str) -> Result<Vec<Puller<T>>> {
        self.guard.begin(self.node.restartable())?;
        let parts = self.runner.partitions();
        debug!(op, mode = ?self.runner.mode, parts, chain = %self.explain(), "evaluating sequence");
        if self.runner.is_parallel() {
            self.node.split(parts)
        } else {
            Ok(vec![self.node.open()?])
        }
    }
}

impl<T> std::fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stages = Vec::new();
        self.node.lineage(&mut stages);
        f.debug_struct("Sequence")
            .field("stages", &stages.iter().map(|(n, _)| *n).collect::<Vec<_>>())
            .field("mode", &self.runner.mode)
            .field("ordered", &self.ordered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_allows_one_consumption() {
        let g = ConsumeGuard::default();
        assert!(g.begin(false).is_ok());
        let err = g.begin(false).unwrap_err();
        assert!(matches!(err.downcast_ref::<StreamError>(), Some(StreamError::Exhausted)));
    }

    #[test]
    fn restartable_guard_never_trips() {
        let g = ConsumeGuard::default();
        for _ in 0..3 {
            assert!(g.begin(true).is_ok());
        }
        assert!(!g.is_consumed());
    }
}
