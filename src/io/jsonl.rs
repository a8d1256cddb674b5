//! JSON Lines source.
//!
//! Files are newline-delimited JSON; empty/whitespace-only lines are skipped. Each value
//! is parsed only when it is pulled, so a malformed line fails the terminal operation that
//! reaches it, with the line number in the error context.

use super::read_lines;
use crate::node::{Pull, Puller, StatelessNode};
use crate::sequence::Elem;
use crate::Sequence;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

struct JsonlPull<T> {
    up: Puller<String>,
    path: Arc<str>,
    line: usize,
    _t: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Pull<T> for JsonlPull<T> {
    fn next(&mut self) -> Result<Option<T>> {
        while let Some(text) = self.up.next()? {
            self.line += 1;
            if text.trim().is_empty() {
                continue;
            }
            let v = serde_json::from_str(&text).with_context(|| {
                format!("parse JSONL line {} in {}: {}", self.line, self.path, text)
            })?;
            return Ok(Some(v));
        }
        Ok(None)
    }
}

/// Typed values from a JSON Lines file.
///
/// # Errors
/// [`StreamError::Resource`](crate::StreamError::Resource) if the file cannot be opened.
///
/// ```no_run
/// use ironstream::*;
/// let ids: Vec<u64> = read_jsonl::<u64>("ids.jsonl").unwrap().limit(10).to_vec().unwrap();
/// ```
pub fn read_jsonl<T>(path: impl AsRef<Path>) -> Result<Sequence<T>>
where
    T: DeserializeOwned + Elem,
{
    let path = path.as_ref();
    let shown: Arc<str> = Arc::from(path.display().to_string());
    let lines = read_lines(path)?;
    let node = StatelessNode::new(Arc::clone(&lines.node), "jsonl", move |up| {
        Box::new(JsonlPull { up, path: Arc::clone(&shown), line: 0, _t: PhantomData }) as Puller<T>
    });
    Ok(lines.chain(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reports_bad_line_number() -> Result<()> {
        let mut f = tempfile::NamedTempFile::new()?;
        writeln!(f, "1\n\n2\n{{oops")?;
        f.flush()?;
        let err = read_jsonl::<u32>(f.path())?.to_vec().unwrap_err();
        assert!(format!("{err:#}").contains("parse JSONL line 4"));
        Ok(())
    }
}
