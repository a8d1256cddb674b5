//! Short-circuiting terminals: `*_match` and `find_*`.

use crate::runner::Step;
use crate::sequence::Elem;
use crate::Sequence;
use anyhow::Result;

impl<T: Elem> Sequence<T> {
    /// True if some element satisfies `pred`. Stops at the first match; `false` when
    /// empty.
    ///
    /// ```
    /// use ironstream::*;
    /// assert!(iterate(1u64, |x| x * 2).any_match(|x| *x > 1000).unwrap());
    /// assert!(!empty::<i32>().any_match(|_| true).unwrap());
    /// ```
    pub fn any_match<P>(self, pred: P) -> Result<bool>
    where
        P: Fn(&T) -> bool + Sync,
    {
        let hits = self.drive("any_match", || false, |hit, item| {
            if pred(&item) {
                *hit = true;
                return Ok(Step::Cancel);
            }
            Ok(Step::Continue)
        })?;
        Ok(hits.into_iter().any(|h| h))
    }

    /// True if every element satisfies `pred`. Stops at the first counterexample; `true`
    /// when empty.
    pub fn all_match<P>(self, pred: P) -> Result<bool>
    where
        P: Fn(&T) -> bool + Sync,
    {
        let oks = self.drive("all_match", || true, |ok, item| {
            if !pred(&item) {
                *ok = false;
                return Ok(Step::Cancel);
            }
            Ok(Step::Continue)
        })?;
        Ok(oks.into_iter().all(|ok| ok))
    }

    /// True if no element satisfies `pred`; `true` when empty.
    pub fn none_match<P>(self, pred: P) -> Result<bool>
    where
        P: Fn(&T) -> bool + Sync,
    {
        let hits = self.drive("none_match", || false, |hit, item| {
            if pred(&item) {
                *hit = true;
                return Ok(Step::Cancel);
            }
            Ok(Step::Continue)
        })?;
        Ok(!hits.into_iter().any(|h| h))
    }

    /// First element in encounter order, in either mode.
    ///
    /// ```
    /// use ironstream::*;
    /// let first = from_vec((1..=100).collect::<Vec<_>>())
    ///     .parallel_with(None, Some(8))
    ///     .filter(|x| x % 7 == 0)
    ///     .find_first()
    ///     .unwrap();
    /// assert_eq!(first, Some(7));
    /// ```
    pub fn find_first(self) -> Result<Option<T>> {
        // a partition's first element settles the answer for every later partition
        let firsts = self.drive("find_first", || None, |slot, item| {
            *slot = Some(item);
            Ok(Step::Claim)
        })?;
        Ok(firsts.into_iter().flatten().next())
    }

    /// Some element, if any. Sequentially this is [`find_first`](Self::find_first); in
    /// parallel, the first worker to find an element stops the others, and which
    /// element is returned is not specified.
    pub fn find_any(self) -> Result<Option<T>> {
        let found = self.drive("find_any", || None, |slot, item| {
            *slot = Some(item);
            Ok(Step::Cancel)
        })?;
        Ok(found.into_iter().flatten().next())
    }
}

#[cfg(test)]
mod tests {
    use crate::from_vec;
    use anyhow::Result;

    #[test]
    fn empty_match_identities() -> Result<()> {
        assert!(from_vec(Vec::<u8>::new()).all_match(|_| false)?);
        assert!(!from_vec(Vec::<u8>::new()).any_match(|_| true)?);
        assert!(from_vec(Vec::<u8>::new()).none_match(|_| true)?);
        Ok(())
    }

    #[test]
    fn find_first_in_parallel_respects_encounter_order() -> Result<()> {
        let v: Vec<u32> = (0..1000).collect();
        let got = from_vec(v).parallel_with(Some(4), Some(16)).filter(|x| x % 100 == 99).find_first()?;
        assert_eq!(got, Some(99));
        Ok(())
    }

    #[test]
    fn find_any_returns_a_matching_element() -> Result<()> {
        let got = from_vec((0..64).collect::<Vec<u32>>())
            .parallel()
            .filter(|x| x % 2 == 1)
            .find_any()?;
        assert!(got.is_some_and(|x| x % 2 == 1));
        Ok(())
    }
}
