//! Line sources: `from_lines`, `from_lines_with` and `read_lines`.
//!
//! Lines are read lazily with their `\n` / `\r\n` terminator stripped. The reader is
//! released exactly once, whichever way the evaluation ends.

use crate::error::StreamError;
use crate::node::{Node, Pull, Puller, StageKind};
use crate::Sequence;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

/// Holds the reader until the single evaluation takes it.
struct LinesSource<R> {
    reader: Mutex<Option<R>>,
    what: Arc<str>,
}

impl<R: BufRead + Send + 'static> Node<String> for LinesSource<R> {
    fn open(&self) -> Result<Puller<String>> {
        let reader = self
            .reader
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(StreamError::Exhausted)?;
        Ok(Box::new(LinesPull { reader: Some(reader), what: Arc::clone(&self.what), line: 0 }))
    }

    fn split(&self, _parts: usize) -> Result<Vec<Puller<String>>> {
        Ok(vec![self.open()?])
    }

    fn restartable(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "lines"
    }

    fn kind(&self) -> StageKind {
        StageKind::Source
    }

    fn lineage(&self, out: &mut Vec<(&'static str, StageKind)>) {
        out.push(("lines", StageKind::Source));
    }
}

struct LinesPull<R> {
    // `None` once released
    reader: Option<R>,
    what: Arc<str>,
    line: usize,
}

impl<R> LinesPull<R> {
    fn release(&mut self) {
        if self.reader.take().is_some() {
            trace!(resource = %self.what, lines = self.line, "line resource released");
        }
    }
}

impl<R: BufRead + Send> Pull<String> for LinesPull<R> {
    fn next(&mut self) -> Result<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        let mut buf = String::new();
        match reader.read_line(&mut buf) {
            Ok(0) => {
                self.release();
                Ok(None)
            }
            Ok(_) => {
                self.line += 1;
                if buf.ends_with('\n') {
                    buf.pop();
                    if buf.ends_with('\r') {
                        buf.pop();
                    }
                }
                Ok(Some(buf))
            }
            Err(e) => {
                self.release();
                let line = self.line + 1;
                Err(anyhow::Error::new(StreamError::resource(self.what.as_ref(), e))
                    .context(format!("read line {line}")))
            }
        }
    }
}

impl<R> Drop for LinesPull<R> {
    fn drop(&mut self) {
        self.release();
    }
}

fn lines_sequence<R: BufRead + Send + 'static>(reader: R, what: &str) -> Sequence<String> {
    Sequence::from_node(Arc::new(LinesSource {
        reader: Mutex::new(Some(reader)),
        what: Arc::from(what),
    }))
}

/// Lines of an already opened reader, without their terminators.
///
/// ```
/// use ironstream::*;
/// let lines = from_lines(std::io::Cursor::new("a\nb\r\nc")).to_vec().unwrap();
/// assert_eq!(lines, vec!["a", "b", "c"]);
/// ```
pub fn from_lines<R: BufRead + Send + 'static>(reader: R) -> Sequence<String> {
    lines_sequence(reader, "reader")
}

/// Open a reader with `open` right away and stream its lines.
///
/// # Errors
/// [`StreamError::Resource`] if `open` fails.
pub fn from_lines_with<R, F>(open: F) -> Result<Sequence<String>>
where
    R: BufRead + Send + 'static,
    F: FnOnce() -> io::Result<R>,
{
    let reader = open().map_err(|e| StreamError::resource("reader", e))?;
    Ok(lines_sequence(reader, "reader"))
}

/// Lines of the file at `path`.
///
/// # Errors
/// [`StreamError::Resource`] if the file cannot be opened.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Sequence<String>> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let f = File::open(path)
        .map_err(|e| StreamError::resource(shown.clone(), e))
        .with_context(|| format!("open {shown}"))?;
    Ok(lines_sequence(BufReader::new(f), &shown))
}
