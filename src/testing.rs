//! Testing utilities for code built on sequences.
//!
//! - **Assertions**: compare collected outputs with expected results, and check error kinds
//! - **Fixtures**: small fixed datasets such as [`people`]
//! - **Mock I/O**: [`TrackedReader`] counts resource releases and can inject read
//!   failures; [`temp_lines_file`] writes a throwaway input file
//!
//! # Quick Start
//!
//! ```
//! use ironstream::*;
//! use ironstream::collectors::partitioning_by;
//! use ironstream::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let split = from_vec(people()).collect(partitioning_by(|p: &Person| p.age > 18))?;
//! assert_all(&split[&true], |p| p.age > 18);
//! assert_none(&split[&false], |p| p.age > 18);
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod mock_io;

pub use assertions::*;
pub use fixtures::*;
pub use mock_io::*;
