//! A disjoint-set ("union-find") data structure over `{0, ..., n-1}`.
//!
//! Used pervasively by [`crate::hopcroft_karp`] and [`crate::stephen`] to
//! implement quotient operations on word-graph node sets.

use alloc::vec::Vec;

use error_stack::{Report, ResultExt};

use crate::error::{self, Error, Result};

/// Disjoint-set over `{0, ..., n-1}`.
///
/// Unlike a classic union-by-rank implementation, the tie-break here is
/// fixed: the *smaller* representative always wins, per spec. This trades a
/// little bit of amortised performance for a union-find whose
/// representatives are predictable, which [`UnionFind::blocks`] and
/// [`UnionFind::join`] both rely on.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<u32>,
    blocks: Option<Vec<Vec<u32>>>,
    next_rep_cursor: usize,
}

impl UnionFind {
    /// Creates a union-find of `n` singleton classes.
    #[must_use]
    pub fn new(n: usize) -> Self {
        UnionFind {
            parent: (0..n as u32).collect(),
            blocks: None,
            next_rep_cursor: 0,
        }
    }

    /// The size of the underlying universe.
    #[must_use]
    pub fn size(&self) -> usize {
        self.parent.len()
    }

    fn check_index(&self, i: u32) -> Result<()> {
        if (i as usize) < self.parent.len() {
            Ok(())
        } else {
            Err(Report::new(error::out_of_bounds(i, self.parent.len() as u64)))
        }
    }

    /// Returns the canonical representative of `i`'s class, compressing the
    /// path from `i` to its root as a side effect.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `i >= size()`.
    pub fn find(&mut self, i: u32) -> Result<u32> {
        self.check_index(i)?;
        Ok(self.find_no_checks(i))
    }

    pub(crate) fn find_no_checks(&mut self, mut i: u32) -> u32 {
        let mut root = i;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        while self.parent[i as usize] != root {
            let next = self.parent[i as usize];
            self.parent[i as usize] = root;
            i = next;
        }
        root
    }

    /// Merges the classes of `i` and `j`. The smaller representative
    /// becomes the root of the combined class.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if either index is out of range.
    pub fn union_(&mut self, i: u32, j: u32) -> Result<()> {
        self.check_index(i)?;
        self.check_index(j)?;
        let ri = self.find_no_checks(i);
        let rj = self.find_no_checks(j);
        if ri != rj {
            let (lo, hi) = if ri < rj { (ri, rj) } else { (rj, ri) };
            self.parent[hi as usize] = lo;
            self.blocks = None;
            log::trace!("union_find: merged class {hi} into {lo}");
        }
        Ok(())
    }

    /// Rewrites every entry to point directly to its representative.
    pub fn normalize(&mut self) {
        for i in 0..self.parent.len() as u32 {
            let root = self.find_no_checks(i);
            self.parent[i as usize] = root;
        }
    }

    /// The number of distinct classes.
    #[must_use]
    pub fn number_of_blocks(&mut self) -> usize {
        self.normalize();
        self.parent.iter().copied().collect::<alloc::collections::BTreeSet<_>>().len()
    }

    /// Appends a new singleton class, returning its index.
    pub fn add_entry(&mut self) -> u32 {
        let idx = self.parent.len() as u32;
        self.parent.push(idx);
        self.blocks = None;
        idx
    }

    /// The block decomposition: one `Vec` of members per class, ordered by
    /// ascending representative. Recomputed lazily and cached until the
    /// next mutating call.
    pub fn blocks(&mut self) -> &[Vec<u32>] {
        if self.blocks.is_none() {
            self.normalize();
            let mut by_rep: alloc::collections::BTreeMap<u32, Vec<u32>> =
                alloc::collections::BTreeMap::new();
            for i in 0..self.parent.len() as u32 {
                by_rep.entry(self.parent[i as usize]).or_default().push(i);
            }
            self.blocks = Some(by_rep.into_values().collect());
        }
        self.blocks.as_ref().expect("just populated")
    }

    /// Forms the finest common coarsening of `self` and `other`: for every
    /// `i`, unites `find_self(i)` with `find_other(i)`.
    ///
    /// # Errors
    /// Returns [`Error::Mismatch`] if the two universes differ in size.
    pub fn join(&mut self, other: &UnionFind) -> Result<()> {
        if self.size() != other.size() {
            return Err(Report::new(error::mismatch(
                self.size() as u64,
                other.size() as u64,
            )))
            .attach_printable("UnionFind::join requires equal-sized universes");
        }
        let mut other = other.clone();
        for i in 0..self.size() as u32 {
            let rj = other.find_no_checks(i);
            self.union_(i, rj)
                .change_context(Error::InvalidState {
                    message: "join encountered an internal inconsistency",
                })?;
        }
        Ok(())
    }

    /// Resets the cursor used by [`UnionFind::next_rep`].
    pub fn reset_next_rep(&mut self) {
        self.next_rep_cursor = 0;
    }

    /// Yields each representative in ascending order exactly once (after a
    /// call to [`UnionFind::reset_next_rep`]); returns `None` once
    /// exhausted.
    pub fn next_rep(&mut self) -> Option<u32> {
        self.normalize();
        while self.next_rep_cursor < self.parent.len() {
            let i = self.next_rep_cursor as u32;
            self.next_rep_cursor += 1;
            if self.parent[i as usize] == i {
                return Some(i);
            }
        }
        None
    }
}

impl Default for UnionFind {
    fn default() -> Self {
        UnionFind::new(0)
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexSet;
    use proptest::{collection::vec, prelude::*};

    use super::*;

    #[test]
    fn union_and_find() {
        let mut u = UnionFind::new(8);
        for i in 0..8 {
            assert_eq!(u.find(i).unwrap(), i);
        }

        u.union_(0, 1).unwrap();
        assert_eq!(u.find(0).unwrap(), u.find(1).unwrap());
        assert_eq!(u.find(1).unwrap(), 0);

        u.union_(1, 3).unwrap();
        assert_eq!(u.find(3).unwrap(), 0);

        u.union_(5, 6).unwrap();
        assert_ne!(u.find(5).unwrap(), u.find(0).unwrap());

        let set = (0..8).map(|i| u.find(i).unwrap()).collect::<IndexSet<_>>();
        assert_eq!(set.len(), u.number_of_blocks());
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut u = UnionFind::new(4);
        assert!(u.find(10).is_err());
        assert!(u.union_(0, 10).is_err());
    }

    #[test]
    fn find_is_idempotent() {
        let mut u = UnionFind::new(16);
        u.union_(3, 7).unwrap();
        u.union_(7, 9).unwrap();
        for i in 0..16 {
            let r = u.find(i).unwrap();
            assert_eq!(u.find(r).unwrap(), r);
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut u = UnionFind::new(10);
        u.union_(1, 2).unwrap();
        u.union_(2, 3).unwrap();
        u.union_(8, 9).unwrap();
        u.normalize();
        let once = u.parent.clone();
        u.normalize();
        assert_eq!(once, u.parent);
    }

    #[test]
    fn smaller_representative_always_wins() {
        let mut u = UnionFind::new(5);
        u.union_(4, 1).unwrap();
        assert_eq!(u.find(4).unwrap(), 1);
        u.union_(3, 1).unwrap();
        assert_eq!(u.find(3).unwrap(), 1);
        assert_eq!(u.find(4).unwrap(), 1);
    }

    #[test]
    fn add_entry_grows_universe() {
        let mut u = UnionFind::new(2);
        let idx = u.add_entry();
        assert_eq!(idx, 2);
        assert_eq!(u.size(), 3);
        assert_eq!(u.find(2).unwrap(), 2);
    }

    #[test]
    fn join_is_finest_common_coarsening() {
        let mut a = UnionFind::new(6);
        a.union_(0, 1).unwrap();
        a.union_(2, 3).unwrap();

        let mut b = UnionFind::new(6);
        b.union_(1, 2).unwrap();
        b.union_(4, 5).unwrap();

        a.join(&b).unwrap();
        // 0,1,2,3 are now one class; 4,5 another.
        assert_eq!(a.find(0).unwrap(), a.find(3).unwrap());
        assert_eq!(a.find(4).unwrap(), a.find(5).unwrap());
        assert_ne!(a.find(0).unwrap(), a.find(4).unwrap());
    }

    #[test]
    fn join_rejects_size_mismatch() {
        let mut a = UnionFind::new(3);
        let b = UnionFind::new(4);
        assert!(a.join(&b).is_err());
    }

    #[test]
    fn next_rep_visits_each_representative_once() {
        let mut u = UnionFind::new(6);
        u.union_(0, 1).unwrap();
        u.union_(4, 5).unwrap();
        u.reset_next_rep();
        let mut reps = Vec::new();
        while let Some(r) = u.next_rep() {
            reps.push(r);
        }
        assert_eq!(reps, alloc::vec![0, 2, 3, 4]);
        assert!(u.next_rep().is_none());
    }

    proptest! {
        #[test]
        fn integration(elements in vec((0u32..64, 0u32..64), 1..256)) {
            let mut u = UnionFind::new(64);
            for (a, b) in elements {
                let ar = u.find(a).unwrap();
                let br = u.find(b).unwrap();
                let would_merge = ar != br;
                u.union_(a, b).unwrap();
                if would_merge {
                    prop_assert_eq!(u.find(a).unwrap(), u.find(b).unwrap());
                }
            }
            // find(find(i)) == find(i) for every i.
            for i in 0..64 {
                let r = u.find(i).unwrap();
                prop_assert_eq!(u.find(r).unwrap(), r);
            }
        }
    }
}
