//! `limit` and `skip`.

use crate::node::{Pull, Puller, SerialNode};
use crate::sequence::Elem;
use crate::Sequence;
use anyhow::Result;
use std::sync::Arc;

struct LimitPull<T> {
    // dropped as soon as the quota is met, which also releases upstream resources
    up: Option<Puller<T>>,
    left: usize,
}

impl<T: Elem> Pull<T> for LimitPull<T> {
    fn next(&mut self) -> Result<Option<T>> {
        if self.left == 0 {
            self.up = None;
            return Ok(None);
        }
        let Some(up) = self.up.as_mut() else {
            return Ok(None);
        };
        match up.next()? {
            Some(item) => {
                self.left -= 1;
                if self.left == 0 {
                    self.up = None;
                }
                Ok(Some(item))
            }
            None => {
                self.up = None;
                Ok(None)
            }
        }
    }
}

struct SkipPull<T> {
    up: Puller<T>,
    to_skip: usize,
}

impl<T: Elem> Pull<T> for SkipPull<T> {
    fn next(&mut self) -> Result<Option<T>> {
        while self.to_skip > 0 {
            if self.up.next()?.is_none() {
                self.to_skip = 0;
                return Ok(None);
            }
            self.to_skip -= 1;
        }
        self.up.next()
    }
}

impl<T: Elem> Sequence<T> {
    /// Stop after `n` elements. Upstream is never pulled past the `n`th element, so this
    /// terminates on infinite sources.
    ///
    /// ```
    /// use ironstream::*;
    /// let v = iterate(0, |x| x + 2).limit(2).to_vec().unwrap();
    /// assert_eq!(v, vec![0, 2]);
    /// ```
    #[must_use]
    pub fn limit(self, n: usize) -> Self {
        let node = SerialNode::new(Arc::clone(&self.node), "limit", move |up| {
            Box::new(LimitPull { up: Some(up), left: n }) as Puller<T>
        });
        self.chain(node)
    }

    /// Discard the first `n` elements.
    #[must_use]
    pub fn skip(self, n: usize) -> Self {
        let node = SerialNode::new(Arc::clone(&self.node), "skip", move |up| {
            Box::new(SkipPull { up, to_skip: n }) as Puller<T>
        });
        self.chain(node)
    }
}
