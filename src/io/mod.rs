//! Line-oriented sources backed by a readable resource.
//!
//! Every source here opens its resource eagerly, so an open failure is reported by the
//! constructor as [`StreamError::Resource`](crate::StreamError::Resource) rather than by
//! a later terminal operation. The resource is released exactly once: when the lines
//! run out, when a read fails, or when the sequence is dropped unfinished (for example
//! after `limit` or a short-circuiting match).

mod lines;

#[cfg_attr(docsrs, doc(cfg(feature = "io-jsonl")))]
#[cfg(feature = "io-jsonl")]
mod jsonl;

pub use lines::{from_lines, from_lines_with, read_lines};

#[cfg(feature = "io-jsonl")]
pub use jsonl::read_jsonl;
