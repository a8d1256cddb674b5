//! Plan nodes and pullers.
//!
//! A [`Node`] is one link of a lazily built chain. Nothing runs when a node is created;
//! evaluation starts when a terminal operation either
//! - [`open`](Node::open)s the last node into a single [`Pull`] (sequential mode), or
//! - [`split`](Node::split)s it into several independent pullers (parallel mode), whose
//!   concatenation in index order is the encounter order of the whole sequence.
//!
//! Every node wraps its upstream node. Stages come in three shapes, mirrored by
//! [`StageKind`]:
//! - **stateless** stages (filter, map, peek, ...) wrap each upstream puller one-to-one,
//! - **barrier** stages (sorted, distinct) need every upstream element before emitting,
//! - **serial** stages (limit, skip) depend on global position, so under parallel
//!   evaluation they stitch upstream partitions back into one ordered puller.

use crate::runner::{drain_all, split_vec};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// A single-pass cursor over elements. `Ok(None)` means exhausted.
pub trait Pull<T>: Send {
    fn next(&mut self) -> Result<Option<T>>;
}

pub type Puller<T> = Box<dyn Pull<T>>;

/// Shape of a node, used by [`Sequence::explain`](crate::Sequence::explain).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageKind {
    Source,
    Stateless,
    Barrier,
    Serial,
}

pub trait Node<T>: Send + Sync {
    /// Open the whole node as one puller.
    fn open(&self) -> Result<Puller<T>>;

    /// Open the node as up to `parts` pullers covering disjoint, ordered partitions.
    fn split(&self, parts: usize) -> Result<Vec<Puller<T>>>;

    /// Whether opening the node again restarts it from scratch.
    fn restartable(&self) -> bool;

    fn name(&self) -> &'static str;

    fn kind(&self) -> StageKind;

    /// Push `(name, kind)` for every node from the source down to `self`.
    fn lineage(&self, out: &mut Vec<(&'static str, StageKind)>);
}

/* ===================== Vec-backed pullers ===================== */

pub(crate) struct VecPull<T>(pub(crate) std::vec::IntoIter<T>);

impl<T: Send> Pull<T> for VecPull<T> {
    fn next(&mut self) -> Result<Option<T>> {
        Ok(self.0.next())
    }
}

pub(crate) fn vec_pullers<T: Send + 'static>(data: Vec<T>, parts: usize) -> Vec<Puller<T>> {
    split_vec(data, parts)
        .into_iter()
        .map(|c| Box::new(VecPull(c.into_iter())) as Puller<T>)
        .collect()
}

/// Pulls each upstream partition to exhaustion, in order.
pub(crate) struct ChainPull<T> {
    parts: std::collections::VecDeque<Puller<T>>,
}

impl<T> ChainPull<T> {
    pub(crate) fn new(parts: Vec<Puller<T>>) -> Self {
        Self { parts: parts.into() }
    }
}

impl<T: Send> Pull<T> for ChainPull<T> {
    fn next(&mut self) -> Result<Option<T>> {
        while let Some(front) = self.parts.front_mut() {
            if let Some(item) = front.next()? {
                return Ok(Some(item));
            }
            // dropping the exhausted partition releases whatever it holds
            self.parts.pop_front();
        }
        Ok(None)
    }
}

/* ===================== Stateless ===================== */

type Wrap<I, O> = Arc<dyn Fn(Puller<I>) -> Puller<O> + Send + Sync>;

/// Stateless stage: every upstream puller is wrapped by `wrap`, in sequential and parallel
/// evaluation alike.
pub(crate) struct StatelessNode<I, O> {
    upstream: Arc<dyn Node<I>>,
    name: &'static str,
    wrap: Wrap<I, O>,
}

impl<I: 'static, O: 'static> StatelessNode<I, O> {
    pub(crate) fn new<W>(upstream: Arc<dyn Node<I>>, name: &'static str, wrap: W) -> Self
    where
        W: Fn(Puller<I>) -> Puller<O> + Send + Sync + 'static,
    {
        Self { upstream, name, wrap: Arc::new(wrap) }
    }
}

impl<I: Send + 'static, O: Send + 'static> Node<O> for StatelessNode<I, O> {
    fn open(&self) -> Result<Puller<O>> {
        Ok((self.wrap)(self.upstream.open()?))
    }

    fn split(&self, parts: usize) -> Result<Vec<Puller<O>>> {
        Ok(self
            .upstream
            .split(parts)?
            .into_iter()
            .map(|up| (self.wrap)(up))
            .collect())
    }

    fn restartable(&self) -> bool {
        self.upstream.restartable()
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Stateless
    }

    fn lineage(&self, out: &mut Vec<(&'static str, StageKind)>) {
        self.upstream.lineage(out);
        out.push((self.name, StageKind::Stateless));
    }
}

/* ===================== Barrier ===================== */

type Settle<T> = Arc<dyn Fn(Vec<T>) -> Result<Vec<T>> + Send + Sync>;

/// Barrier stage.
///
/// Sequentially the stage is just another wrapper (`stream`), which may itself buffer.
/// In parallel, all upstream partitions are drained concurrently, concatenated in
/// partition order, passed through `settle` once, and re-split.
pub(crate) struct BarrierNode<T> {
    upstream: Arc<dyn Node<T>>,
    name: &'static str,
    stream: Wrap<T, T>,
    settle: Settle<T>,
}

impl<T: 'static> BarrierNode<T> {
    pub(crate) fn new<W, S>(upstream: Arc<dyn Node<T>>, name: &'static str, stream: W, settle: S) -> Self
    where
        W: Fn(Puller<T>) -> Puller<T> + Send + Sync + 'static,
        S: Fn(Vec<T>) -> Result<Vec<T>> + Send + Sync + 'static,
    {
        Self { upstream, name, stream: Arc::new(stream), settle: Arc::new(settle) }
    }
}

impl<T: Send + 'static> Node<T> for BarrierNode<T> {
    fn open(&self) -> Result<Puller<T>> {
        Ok((self.stream)(self.upstream.open()?))
    }

    fn split(&self, parts: usize) -> Result<Vec<Puller<T>>> {
        let ups = self.upstream.split(parts)?;
        if ups.len() <= 1 {
            // one partition needs no concurrent drain; streaming keeps infinite sources lazy
            return Ok(ups.into_iter().map(|up| (self.stream)(up)).collect());
        }
        let buckets = drain_all(ups)?;
        let all: Vec<T> = buckets.into_iter().flatten().collect();
        let settled = (self.settle)(all)?;
        debug!(stage = self.name, elements = settled.len(), "barrier materialized");
        Ok(vec_pullers(settled, parts))
    }

    fn restartable(&self) -> bool {
        self.upstream.restartable()
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Barrier
    }

    fn lineage(&self, out: &mut Vec<(&'static str, StageKind)>) {
        self.upstream.lineage(out);
        out.push((self.name, StageKind::Barrier));
    }
}

/* ===================== Serial ===================== */

/// Position-dependent stage. In parallel the upstream partitions are chained back into
/// one ordered puller, so the stage still pulls lazily and infinite sources terminate.
pub(crate) struct SerialNode<T> {
    upstream: Arc<dyn Node<T>>,
    name: &'static str,
    wrap: Wrap<T, T>,
}

impl<T: 'static> SerialNode<T> {
    pub(crate) fn new<W>(upstream: Arc<dyn Node<T>>, name: &'static str, wrap: W) -> Self
    where
        W: Fn(Puller<T>) -> Puller<T> + Send + Sync + 'static,
    {
        Self { upstream, name, wrap: Arc::new(wrap) }
    }
}

impl<T: Send + 'static> Node<T> for SerialNode<T> {
    fn open(&self) -> Result<Puller<T>> {
        Ok((self.wrap)(self.upstream.open()?))
    }

    fn split(&self, parts: usize) -> Result<Vec<Puller<T>>> {
        let chained = ChainPull::new(self.upstream.split(parts)?);
        Ok(vec![(self.wrap)(Box::new(chained))])
    }

    fn restartable(&self) -> bool {
        self.upstream.restartable()
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Serial
    }

    fn lineage(&self, out: &mut Vec<(&'static str, StageKind)>) {
        self.upstream.lineage(out);
        out.push((self.name, StageKind::Serial));
    }
}
