//! Partitioned binary relations (PBRs): the elements of the partition
//! monoid, represented as a directed graph on `2 * degree` points (points
//! `0..degree` are "left", `degree..2*degree` are "right").
//!
//! [`PBR::product_inplace`] is a port of the `x_dfs`/`y_dfs` mutual
//! recursion in `examples/original_source/src/pbr.cpp`: composing two PBRs
//! means finding, for every point reachable from a point of `self`, the set
//! of output points reachable by alternately crossing into the other
//! relation whenever a "right" or "left" edge lands in the shared middle.
//! The crossing is memoised per crossing point so a point is only explored
//! once per product, mirroring the original's `tmp` scratch table (there
//! indexed by thread, here simply a `Vec` local to one call since this
//! crate has no notion of a thread pool).

use alloc::vec::Vec;

use error_stack::Report;
use fixedbitset::FixedBitSet;

use crate::{
    error::{self, Error, Result},
    multiplicative::Multiplicative,
};

/// A partitioned binary relation of a given degree.
///
/// `adj[i]` lists, in ascending order, the points adjacent to point `i`
/// (points `0..degree` are the "left" points, `degree..2*degree` the
/// "right" points).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PBR {
    degree: usize,
    adj: Vec<Vec<u32>>,
}

impl PBR {
    /// The empty relation (no adjacencies) of the given degree.
    #[must_use]
    pub fn new(degree: usize) -> Self {
        PBR {
            degree,
            adj: alloc::vec![Vec::new(); 2 * degree],
        }
    }

    /// Builds a PBR directly from an adjacency list with `2 * degree`
    /// rows, validating it first.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the number of rows is odd, or
    /// [`Error::OutOfBounds`] if an entry names a point `>= 2 * degree`.
    pub fn from_adjacencies(adj: Vec<Vec<u32>>) -> Result<Self> {
        if adj.len() % 2 != 0 {
            return Err(Report::new(Error::InvalidArgument {
                message: "adjacency list must have an even number of rows",
            }));
        }
        let pbr = PBR {
            degree: adj.len() / 2,
            adj,
        };
        pbr.validate()?;
        Ok(pbr)
    }

    /// Checks every adjacency entry is a valid point index and that each
    /// row is sorted in ascending order.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] or [`Error::InvalidArgument`] on the
    /// first violation found.
    pub fn validate(&self) -> Result<()> {
        let n2 = 2 * self.degree;
        for row in &self.adj {
            if let Some(&bad) = row.iter().find(|&&v| v as usize >= n2) {
                return Err(Report::new(error::out_of_bounds(bad, n2 as u64)));
            }
            if !row.windows(2).all(|w| w[0] <= w[1]) {
                return Err(Report::new(Error::InvalidArgument {
                    message: "adjacency list for a point is not sorted",
                }));
            }
        }
        Ok(())
    }

    /// The degree of this PBR (half its number of points).
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The number of points, `2 * degree()`.
    #[must_use]
    pub fn number_of_points(&self) -> usize {
        2 * self.degree
    }

    /// The points adjacent to point `i`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `i >= number_of_points()`.
    pub fn at(&self, i: usize) -> Result<&[u32]> {
        self.adj
            .get(i)
            .map(Vec::as_slice)
            .ok_or_else(|| Report::new(error::out_of_bounds(i as u64, self.number_of_points() as u64)))
    }

    /// Overwrites `self` with the product `x * y`.
    ///
    /// # Errors
    /// Returns [`Error::Mismatch`] if `x` and `y` have different degrees.
    pub fn product_inplace(&mut self, x: &PBR, y: &PBR) -> Result<()> {
        if x.degree != y.degree {
            return Err(Report::new(error::mismatch(
                x.degree as u64,
                y.degree as u64,
            )));
        }
        self.product_inplace_no_checks(x, y);
        Ok(())
    }

    fn product_inplace_no_checks(&mut self, x: &PBR, y: &PBR) {
        let n = x.degree as u32;
        let two_n = 2 * x.degree;

        let mut out: Vec<FixedBitSet> = (0..two_n).map(|_| FixedBitSet::with_capacity(two_n)).collect();
        let mut tmp: Vec<Option<FixedBitSet>> = alloc::vec![None; two_n];
        let mut x_seen = FixedBitSet::with_capacity(two_n);
        let mut y_seen = FixedBitSet::with_capacity(two_n);

        for i in 0..n {
            for &j in &x.adj[i as usize] {
                if j < n {
                    out[i as usize].insert(j as usize);
                } else if let Some(row) = &tmp[j as usize] {
                    out[i as usize].union_with(row);
                } else {
                    let mut row = FixedBitSet::with_capacity(two_n);
                    x_seen.clear();
                    y_seen.clear();
                    x_seen.insert(i as usize);
                    y_dfs(&mut x_seen, &mut y_seen, &mut row, n, j - n, x, y);
                    out[i as usize].union_with(&row);
                    tmp[j as usize] = Some(row);
                }
                if out[i as usize].count_ones(..) == two_n {
                    break;
                }
            }
        }

        for i in n..two_n as u32 {
            for &j in &y.adj[i as usize] {
                if j >= n {
                    out[i as usize].insert(j as usize);
                } else if let Some(row) = &tmp[j as usize] {
                    out[i as usize].union_with(row);
                } else {
                    let mut row = FixedBitSet::with_capacity(two_n);
                    x_seen.clear();
                    y_seen.clear();
                    y_seen.insert(i as usize);
                    x_dfs(&mut x_seen, &mut y_seen, &mut row, n, j + n, x, y);
                    out[i as usize].union_with(&row);
                    tmp[j as usize] = Some(row);
                }
                if out[i as usize].count_ones(..) == two_n {
                    break;
                }
            }
        }

        self.degree = x.degree;
        self.adj = out.iter().map(|bs| bs.ones().map(|v| v as u32).collect()).collect();
        log::trace!("pbr: computed product of two degree-{} relations", x.degree);
    }
}

fn x_dfs(
    x_seen: &mut FixedBitSet,
    y_seen: &mut FixedBitSet,
    acc: &mut FixedBitSet,
    n: u32,
    i: u32,
    x: &PBR,
    y: &PBR,
) {
    if x_seen.contains(i as usize) {
        return;
    }
    x_seen.insert(i as usize);
    for &j in &x.adj[i as usize] {
        if j < n {
            acc.insert(j as usize);
        } else {
            y_dfs(x_seen, y_seen, acc, n, j - n, x, y);
        }
    }
}

fn y_dfs(
    x_seen: &mut FixedBitSet,
    y_seen: &mut FixedBitSet,
    acc: &mut FixedBitSet,
    n: u32,
    i: u32,
    x: &PBR,
    y: &PBR,
) {
    if y_seen.contains(i as usize) {
        return;
    }
    y_seen.insert(i as usize);
    for &j in &y.adj[i as usize] {
        if j >= n {
            acc.insert(j as usize);
        } else {
            x_dfs(x_seen, y_seen, acc, n, j + n, x, y);
        }
    }
}

/// The identity PBR of the given degree: point `i` is adjacent only to
/// point `i + degree`, and vice versa.
#[must_use]
pub fn one(degree: usize) -> PBR {
    let mut adj = alloc::vec![Vec::new(); 2 * degree];
    for i in 0..degree {
        adj[i].push((i + degree) as u32);
        adj[i + degree].push(i as u32);
    }
    PBR { degree, adj }
}

impl Multiplicative for PBR {
    fn one(degree: usize) -> Self {
        one(degree)
    }

    fn product_inplace(&mut self, a: &Self, b: &Self) -> Result<()> {
        PBR::product_inplace(self, a, b)
    }

    fn degree(&self) -> usize {
        self.degree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_its_own_square() {
        let e = one(3);
        let mut p = PBR::new(3);
        p.product_inplace(&e, &e).unwrap();
        assert_eq!(p, e);
    }

    #[test]
    fn identity_is_neutral_for_an_arbitrary_relation() {
        let e = one(2);
        let mut r = PBR::new(2);
        r.adj[0] = alloc::vec![2, 3];
        r.adj[1] = alloc::vec![3];
        r.adj[2] = alloc::vec![0];
        r.adj[3] = alloc::vec![1, 2];
        r.validate().unwrap();

        let mut left = PBR::new(2);
        left.product_inplace(&e, &r).unwrap();
        assert_eq!(left, r);

        let mut right = PBR::new(2);
        right.product_inplace(&r, &e).unwrap();
        assert_eq!(right, r);
    }

    #[test]
    fn rejects_mismatched_degree() {
        let a = PBR::new(2);
        let b = PBR::new(3);
        let mut out = PBR::new(2);
        assert!(out.product_inplace(&a, &b).is_err());
    }

    #[test]
    fn validate_rejects_out_of_bounds_entry() {
        let mut adj = alloc::vec![Vec::new(); 4];
        adj[0].push(10);
        let pbr = PBR { degree: 2, adj };
        assert!(pbr.validate().is_err());
    }

    #[test]
    fn validate_rejects_unsorted_row() {
        let mut adj = alloc::vec![Vec::new(); 4];
        adj[0] = alloc::vec![2, 1];
        let pbr = PBR { degree: 2, adj };
        assert!(pbr.validate().is_err());
    }

    #[test]
    fn product_is_associative_on_a_small_example() {
        let a = one(2);
        let mut b = PBR::new(2);
        b.adj[0] = alloc::vec![3];
        b.adj[1] = alloc::vec![2];
        b.adj[2] = alloc::vec![1];
        b.adj[3] = alloc::vec![0];
        let c = one(2);

        let mut ab = PBR::new(2);
        ab.product_inplace(&a, &b).unwrap();
        let mut ab_c = PBR::new(2);
        ab_c.product_inplace(&ab, &c).unwrap();

        let mut bc = PBR::new(2);
        bc.product_inplace(&b, &c).unwrap();
        let mut a_bc = PBR::new(2);
        a_bc.product_inplace(&a, &bc).unwrap();

        assert_eq!(ab_c, a_bc);
    }
}
