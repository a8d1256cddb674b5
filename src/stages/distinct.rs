//! `distinct`: drop repeated elements, keeping the first occurrence.

use crate::node::{BarrierNode, Pull, Puller};
use crate::sequence::Elem;
use crate::Sequence;
use anyhow::Result;
use std::collections::HashSet;
use std::hash::Hash;

struct DistinctPull<T> {
    up: Puller<T>,
    seen: HashSet<T>,
}

impl<T> Pull<T> for DistinctPull<T>
where
    T: Elem + Eq + Hash + Clone,
{
    fn next(&mut self) -> Result<Option<T>> {
        while let Some(item) = self.up.next()? {
            if self.seen.insert(item.clone()) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

/// Order-preserving dedupe of an already materialized run.
fn dedupe<T: Eq + Hash + Clone>(all: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(all.len());
    all.into_iter().filter(|x| seen.insert(x.clone())).collect()
}

impl<T: Elem + Eq + Hash + Clone> Sequence<T> {
    /// Remove duplicates (by `Eq + Hash`), keeping each element's first occurrence.
    ///
    /// Sequential evaluation streams: an element is emitted as soon as it is pulled, if
    /// it has not been seen before. Parallel evaluation over several partitions treats
    /// `distinct` as a barrier; a single upstream partition still streams.
    ///
    /// ```
    /// use ironstream::*;
    /// let v = from_vec(vec![3, 1, 3, 2, 1]).distinct().to_vec().unwrap();
    /// assert_eq!(v, vec![3, 1, 2]);
    /// ```
    #[must_use]
    pub fn distinct(self) -> Self {
        let node = BarrierNode::new(
            std::sync::Arc::clone(&self.node),
            "distinct",
            |up| Box::new(DistinctPull { up, seen: HashSet::new() }) as Puller<T>,
            |all| Ok(dedupe(all)),
        );
        self.chain(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupe_keeps_first_occurrence_order() {
        assert_eq!(dedupe(vec!["b", "a", "b", "c", "a"]), vec!["b", "a", "c"]);
        assert!(dedupe(Vec::<u8>::new()).is_empty());
    }
}
