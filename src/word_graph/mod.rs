//! A dense, labelled, directed word graph: `n` nodes, fixed out-degree `d`,
//! and a flat `n * d` target table.
//!
//! Storage follows the flat row-major matrix used by the teacher's own
//! dense adjacency representation (`petgraph_matrix_graph::directed`):
//! `target[s * out_degree + a]` rather than a `Vec<Vec<_>>` per node, so
//! that growing the out-degree or the node count is a single `resize` and
//! edge lookups never chase more than one indirection.

pub mod algo;
pub mod sources;
pub mod view;

use alloc::vec::Vec;
use core::fmt;

use error_stack::Report;
#[cfg(feature = "rand")]
use rand::Rng;

use crate::{
    constants::UNDEFINED,
    error::{self, Error, Result},
};

pub use sources::WordGraphWithSources;
pub use view::WordGraphView;

#[inline]
fn position(source: u32, label: u32, out_degree: usize) -> usize {
    source as usize * out_degree + label as usize
}

/// A dense labelled directed graph with a fixed out-degree.
#[derive(Clone)]
pub struct WordGraph {
    number_of_nodes: usize,
    out_degree: usize,
    target: Vec<u32>,
}

impl fmt::Debug for WordGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordGraph")
            .field("number_of_nodes", &self.number_of_nodes)
            .field("out_degree", &self.out_degree)
            .finish()
    }
}

impl PartialEq for WordGraph {
    fn eq(&self, other: &Self) -> bool {
        self.number_of_nodes == other.number_of_nodes
            && self.out_degree == other.out_degree
            && self.target == other.target
    }
}
impl Eq for WordGraph {}

impl WordGraph {
    /// A graph on `n` nodes with out-degree `d`, every edge undefined.
    #[must_use]
    pub fn new(n: usize, d: usize) -> Self {
        WordGraph {
            number_of_nodes: n,
            out_degree: d,
            target: alloc::vec![UNDEFINED; n * d],
        }
    }

    #[must_use]
    pub fn number_of_nodes(&self) -> usize {
        self.number_of_nodes
    }

    #[must_use]
    pub fn out_degree(&self) -> usize {
        self.out_degree
    }

    fn check_node(&self, s: u32) -> Result<()> {
        if (s as usize) < self.number_of_nodes {
            Ok(())
        } else {
            Err(Report::new(error::out_of_bounds(s, self.number_of_nodes as u64)))
        }
    }

    fn check_label(&self, a: u32) -> Result<()> {
        if (a as usize) < self.out_degree {
            Ok(())
        } else {
            Err(Report::new(error::out_of_bounds(a, self.out_degree as u64)))
        }
    }

    /// The target of the `a`-labelled edge from `s`, or [`UNDEFINED`].
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `s >= number_of_nodes()` or
    /// `a >= out_degree()`.
    pub fn target(&self, s: u32, a: u32) -> Result<u32> {
        self.check_node(s)?;
        self.check_label(a)?;
        Ok(self.target_no_checks(s, a))
    }

    /// As [`WordGraph::target`] without bounds checks.
    #[must_use]
    pub fn target_no_checks(&self, s: u32, a: u32) -> u32 {
        self.target[position(s, a, self.out_degree)]
    }

    /// Sets the `a`-labelled target of `s` to `t`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `s`, `a`, or a non-[`UNDEFINED`]
    /// `t` is out of range.
    pub fn set_target(&mut self, s: u32, a: u32, t: u32) -> Result<()> {
        self.check_node(s)?;
        self.check_label(a)?;
        if t != UNDEFINED {
            self.check_node(t)?;
        }
        self.set_target_no_checks(s, a, t);
        Ok(())
    }

    /// As [`WordGraph::set_target`] without bounds checks.
    pub fn set_target_no_checks(&mut self, s: u32, a: u32, t: u32) {
        let pos = position(s, a, self.out_degree);
        self.target[pos] = t;
    }

    /// Sets the `a`-labelled target of `s` to [`UNDEFINED`].
    pub fn remove_target(&mut self, s: u32, a: u32) {
        let pos = position(s, a, self.out_degree);
        self.target[pos] = UNDEFINED;
    }

    /// Swaps the `a`-labelled targets of `s` and `t`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `s`, `t`, or `a` is out of range.
    pub fn swap_targets(&mut self, s: u32, t: u32, a: u32) -> Result<()> {
        self.check_node(s)?;
        self.check_node(t)?;
        self.check_label(a)?;
        let ps = position(s, a, self.out_degree);
        let pt = position(t, a, self.out_degree);
        self.target.swap(ps, pt);
        Ok(())
    }

    /// The least `(b, t)` with `b >= a` and `t` defined, or
    /// `(UNDEFINED, UNDEFINED)` if none exists.
    #[must_use]
    pub fn next_label_and_target(&self, s: u32, a: u32) -> (u32, u32) {
        for b in a..self.out_degree as u32 {
            let t = self.target_no_checks(s, b);
            if t != UNDEFINED {
                return (b, t);
            }
        }
        (UNDEFINED, UNDEFINED)
    }

    /// Appends `k` new nodes with every edge undefined.
    pub fn add_nodes(&mut self, k: usize) {
        self.number_of_nodes += k;
        self.target.resize(self.number_of_nodes * self.out_degree, UNDEFINED);
    }

    /// Grows the out-degree by `k` columns, every new cell undefined.
    pub fn add_to_out_degree(&mut self, k: usize) {
        let new_out_degree = self.out_degree + k;
        let mut new_target = alloc::vec![UNDEFINED; self.number_of_nodes * new_out_degree];
        for s in 0..self.number_of_nodes {
            for a in 0..self.out_degree {
                new_target[s * new_out_degree + a] = self.target[s * self.out_degree + a];
            }
        }
        self.out_degree = new_out_degree;
        self.target = new_target;
    }

    /// Outgoing edges of `s` in ascending label order, as `(label, target)`
    /// pairs with the target defined.
    pub fn labels_and_targets(&self, s: u32) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.out_degree as u32).filter_map(move |a| {
            let t = self.target_no_checks(s, a);
            (t != UNDEFINED).then_some((a, t))
        })
    }

    /// `true` iff no entry of the target table is [`UNDEFINED`].
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.target.iter().all(|&t| t != UNDEFINED)
    }

    /// Keeps only the nodes in `[lo, hi)`, remapping the survivors to
    /// `[0, hi - lo)`; any target that falls outside `[lo, hi)` becomes
    /// [`UNDEFINED`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `lo > hi` or `hi` exceeds
    /// `number_of_nodes()`.
    pub fn induced_subgraph(&self, lo: usize, hi: usize) -> Result<WordGraph> {
        if lo > hi || hi > self.number_of_nodes {
            return Err(Report::new(Error::InvalidArgument {
                message: "induced_subgraph window must satisfy lo <= hi <= number_of_nodes",
            }));
        }
        let mut g = WordGraph::new(hi - lo, self.out_degree);
        for s in lo..hi {
            for a in 0..self.out_degree {
                let t = self.target_no_checks(s as u32, a as u32);
                if t != UNDEFINED && (t as usize) >= lo && (t as usize) < hi {
                    g.set_target_no_checks((s - lo) as u32, a as u32, t - lo as u32);
                }
            }
        }
        Ok(g)
    }

    /// Disjoint union: appends every node and edge of `other`, offsetting
    /// its node indices by `self.number_of_nodes()`. Returns the offset
    /// that was applied, so callers can translate `other`'s node indices.
    ///
    /// # Errors
    /// Returns [`Error::Mismatch`] if the two graphs have different
    /// out-degrees.
    pub fn disjoint_union(&mut self, other: &WordGraph) -> Result<u32> {
        if self.out_degree != other.out_degree {
            return Err(Report::new(error::mismatch(
                self.out_degree as u64,
                other.out_degree as u64,
            )));
        }
        let offset = self.number_of_nodes as u32;
        self.add_nodes(other.number_of_nodes);
        for s in 0..other.number_of_nodes as u32 {
            for (a, t) in other.labels_and_targets(s) {
                self.set_target_no_checks(s + offset, a, t + offset);
            }
        }
        Ok(offset)
    }

    /// Generates a graph on `n` nodes, out-degree `d`, every edge chosen
    /// uniformly at random over `{0, ..., n-1}`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `n == 0`.
    #[cfg(feature = "rand")]
    pub fn random<R: Rng + ?Sized>(n: usize, d: usize, rng: &mut R) -> Result<WordGraph> {
        if n == 0 {
            return Err(Report::new(Error::InvalidArgument {
                message: "random word graphs must have at least one node",
            }));
        }
        let mut g = WordGraph::new(n, d);
        for s in 0..n as u32 {
            for a in 0..d as u32 {
                let t = rng.gen_range(0..n as u32);
                g.set_target_no_checks(s, a, t);
            }
        }
        Ok(g)
    }

    /// Generates an acyclic graph on `n` nodes, out-degree `d`: every edge
    /// from node `i` targets a node uniformly chosen from `(i, n)`,
    /// guaranteeing the topological order `0 < 1 < ... < n-1`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `n == 0`.
    #[cfg(feature = "rand")]
    pub fn random_acyclic<R: Rng + ?Sized>(n: usize, d: usize, rng: &mut R) -> Result<WordGraph> {
        if n == 0 {
            return Err(Report::new(Error::InvalidArgument {
                message: "random acyclic word graphs must have at least one node",
            }));
        }
        let mut g = WordGraph::new(n, d);
        for s in 0..(n as u32).saturating_sub(1) {
            for a in 0..d as u32 {
                let t = rng.gen_range((s + 1)..n as u32);
                g.set_target_no_checks(s, a, t);
            }
        }
        Ok(g)
    }
}
