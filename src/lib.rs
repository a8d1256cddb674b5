//! # Ironstream
//!
//! A **lazy, composable sequence-processing library**. Build a chain from a source,
//! layer lazy stages on it, and force it with one terminal operation, sequentially or
//! in parallel on a rayon pool.
//!
//! ## Key Features
//!
//! - **Lazy chains** - nothing runs until a terminal operation is called
//! - **Short-circuiting** - `limit`, `any_match`, `find_first`, ... stop pulling early, so
//!   infinite sources terminate
//! - **Collector protocol** - lists, sets, maps, joined strings, grouping, partitioning,
//!   statistics, and custom collectors from closures
//! - **Sequential and parallel evaluation** - partitioned evaluation with order-preserving
//!   merges
//! - **Resource-safe line sources** - readers and files are released exactly once
//!
//! ## Quick Start
//!
//! ```
//! use ironstream::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let v = from_vec(vec![2, 3, 4, 5, 6, 5, 5, 10, 12, 13])
//!     .filter(|a| *a > 4)
//!     .distinct()
//!     .skip(2)
//!     .limit(2)
//!     .to_vec()?;
//! assert_eq!(v, vec![10, 12]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Sequence
//!
//! A [`Sequence<T>`] is a single-pass handle on a lazily evaluated chain. It is cheap to
//! clone, but clones share one consumption flag: after any of them has been evaluated,
//! evaluating another fails with [`StreamError::Exhausted`]. Chains rooted in
//! [`iterate`] are restartable and never exhaust.
//!
//! ### Sources
//!
//! - [`from_vec`], [`from_iter`], [`from_slice`], [`empty`] - finite, partitionable
//! - [`split`] - pieces of a string around a regex
//! - [`iterate`], [`generate`] - infinite
//! - [`from_lines`], [`from_lines_with`], [`read_lines`], [`read_jsonl`] - line resources
//!
//! ### Stages
//!
//! - element-wise: [`filter`](Sequence::filter), [`map`](Sequence::map),
//!   [`try_map`](Sequence::try_map), [`flat_map`](Sequence::flat_map),
//!   [`flat_map_seq`](Sequence::flat_map_seq), [`peek`](Sequence::peek)
//! - barriers: [`distinct`](Sequence::distinct), [`sorted`](Sequence::sorted),
//!   [`sorted_by`](Sequence::sorted_by), [`sorted_by_key`](Sequence::sorted_by_key),
//!   [`sorted_partial`](Sequence::sorted_partial)
//! - position-dependent: [`limit`](Sequence::limit), [`skip`](Sequence::skip)
//!
//! ### Terminal operations
//!
//! - matching: [`any_match`](Sequence::any_match), [`all_match`](Sequence::all_match),
//!   [`none_match`](Sequence::none_match)
//! - finding: [`find_first`](Sequence::find_first), [`find_any`](Sequence::find_any)
//! - aggregates: [`count`](Sequence::count), [`min`](Sequence::min),
//!   [`max_by`](Sequence::max_by), [`sum`](Sequence::sum), ...
//! - reductions: [`reduce`](Sequence::reduce), [`fold`](Sequence::fold),
//!   [`reduce_with`](Sequence::reduce_with)
//! - collection: [`collect`](Sequence::collect) with any [`Collector`],
//!   [`to_vec`](Sequence::to_vec), [`for_each`](Sequence::for_each)
//!
//! Operations with nothing to report on empty input (`min`, `reduce`, `find_first`, ...)
//! return `Ok(None)`.
//!
//! ### Execution Modes
//!
//! - **Sequential** (default) - one puller, strict encounter order
//! - **Parallel** - [`parallel`](Sequence::parallel) or
//!   [`parallel_with`](Sequence::parallel_with) split the source into partitions that are
//!   evaluated on rayon workers; results are merged in partition order
//!
//! ```
//! use ironstream::*;
//! use ironstream::collectors::grouping_by_with;
//! use ironstream::collectors::counting;
//!
//! let words = vec!["apple", "bob", "cat", "dodo", "egg"];
//! let by_len = from_vec(words)
//!     .parallel_with(Some(2), Some(4))
//!     .collect(grouping_by_with(|w: &&str| w.len(), counting()))
//!     .unwrap();
//! assert_eq!(by_len[&3], 3);
//! ```
//!
//! ## Feature Flags
//!
//! - `io-jsonl` (default) - [`read_jsonl`]
//!
//! ## Module Overview
//!
//! - [`collectors`] - the [`Collector`] trait and standard collectors
//! - [`error`] - [`StreamError`]
//! - [`io`] - line-based sources
//! - [`node`] - plan nodes and pullers, for custom sources
//! - [`runner`] - execution modes
//! - [`testing`] - assertions, fixtures and mock readers for tests

pub mod collectors;
pub mod error;
pub mod io;
pub mod node;
pub mod runner;
pub mod testing;

mod sequence;
mod source;
mod stages;
mod terminals;

pub use collectors::{Characteristics, Collector};
pub use error::StreamError;
pub use io::{from_lines, from_lines_with, read_lines};
pub use node::StageKind;
pub use runner::{ExecMode, Runner};
pub use sequence::{Elem, Sequence};
pub use source::{empty, from_iter, from_slice, from_vec, generate, iterate, split};

#[cfg(feature = "io-jsonl")]
pub use io::read_jsonl;
