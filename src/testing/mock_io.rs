//! Readers and temporary files for exercising line sources.

use std::io::{self, BufRead, Cursor, Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// In-memory `BufRead` that counts how many times it has been released (dropped), and
/// can be told to fail on a given line.
///
/// ```
/// use ironstream::*;
/// use ironstream::testing::TrackedReader;
///
/// let reader = TrackedReader::new("a\nb\nc\n");
/// let released = reader.releases();
/// let first = from_lines(reader).limit(1).to_vec().unwrap();
/// assert_eq!(first, vec!["a"]);
/// assert_eq!(released.get(), 1);
/// ```
pub struct TrackedReader {
    inner: Cursor<Vec<u8>>,
    releases: ReleaseCounter,
    fail_at_line: Option<usize>,
    lines_read: usize,
}

/// Shared view of a [`TrackedReader`]'s release count.
#[derive(Clone, Debug, Default)]
pub struct ReleaseCounter(Arc<AtomicUsize>);

impl ReleaseCounter {
    #[must_use]
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl TrackedReader {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            inner: Cursor::new(text.as_bytes().to_vec()),
            releases: ReleaseCounter::default(),
            fail_at_line: None,
            lines_read: 0,
        }
    }

    /// Make the `line`th (1-based) `read_line` call fail with an I/O error.
    #[must_use]
    pub fn failing_at(mut self, line: usize) -> Self {
        self.fail_at_line = Some(line);
        self
    }

    #[must_use]
    pub fn releases(&self) -> ReleaseCounter {
        self.releases.clone()
    }
}

impl Read for TrackedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for TrackedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt);
    }

    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        self.lines_read += 1;
        if self.fail_at_line == Some(self.lines_read) {
            return Err(io::Error::other(format!("injected failure on line {}", self.lines_read)));
        }
        self.inner.read_line(buf)
    }
}

impl Drop for TrackedReader {
    fn drop(&mut self) {
        self.releases.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Write `lines` to a fresh temporary file, one per line. The file is removed when the
/// returned handle is dropped.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written.
pub fn temp_lines_file<S: AsRef<str>>(lines: &[S]) -> io::Result<NamedTempFile> {
    let mut f = NamedTempFile::new()?;
    for line in lines {
        writeln!(f, "{}", line.as_ref())?;
    }
    f.flush()?;
    Ok(f)
}

/// Write `data` as JSON Lines to a fresh temporary file.
///
/// # Errors
///
/// Returns an error if the file cannot be written or a value fails to serialize.
#[cfg(feature = "io-jsonl")]
pub fn mock_jsonl_file<T: serde::Serialize>(data: &[T]) -> io::Result<NamedTempFile> {
    let mut f = tempfile::Builder::new().suffix(".jsonl").tempfile()?;
    for record in data {
        let json = serde_json::to_string(record)?;
        writeln!(f, "{json}")?;
    }
    f.flush()?;
    Ok(f)
}
