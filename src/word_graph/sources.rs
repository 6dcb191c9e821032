//! [`WordGraph`] augmented with reverse adjacency: for every `(target,
//! label)` pair, a singly linked list (through `first_source`/
//! `next_source`) of every source node with that edge. This is the
//! primitive every congruence-building algorithm in this crate
//! ([`crate::hopcroft_karp`], [`crate::stephen`]) merges nodes through.

use alloc::vec::Vec;

use error_stack::Report;

use crate::{
    constants::UNDEFINED,
    error::{self, Error, Result},
    word_graph::WordGraph,
};

/// A [`WordGraph`] that also tracks, for every `(target, label)` pair, the
/// linked list of sources with that edge.
#[derive(Debug, Clone)]
pub struct WordGraphWithSources {
    graph: WordGraph,
    first_source: Vec<u32>,
    next_source: Vec<u32>,
    merging: Option<(u32, u32)>,
}

impl WordGraphWithSources {
    #[must_use]
    pub fn new(n: usize, d: usize) -> Self {
        WordGraphWithSources {
            graph: WordGraph::new(n, d),
            first_source: alloc::vec![UNDEFINED; n * d],
            next_source: alloc::vec![UNDEFINED; n * d],
            merging: None,
        }
    }

    /// Builds the reverse-adjacency index over an already-populated
    /// [`WordGraph`].
    #[must_use]
    pub fn from_word_graph(graph: WordGraph) -> Self {
        let n = graph.number_of_nodes();
        let d = graph.out_degree();
        let mut out = WordGraphWithSources {
            graph,
            first_source: alloc::vec![UNDEFINED; n * d],
            next_source: alloc::vec![UNDEFINED; n * d],
            merging: None,
        };
        for s in 0..n as u32 {
            for a in 0..d as u32 {
                let t = out.graph.target_no_checks(s, a);
                if t != UNDEFINED {
                    out.link(s, a, t);
                }
            }
        }
        out
    }

    #[must_use]
    pub fn graph(&self) -> &WordGraph {
        &self.graph
    }

    #[must_use]
    pub fn number_of_nodes(&self) -> usize {
        self.graph.number_of_nodes()
    }

    #[must_use]
    pub fn out_degree(&self) -> usize {
        self.graph.out_degree()
    }

    #[inline]
    fn index(&self, node: u32, label: u32) -> usize {
        node as usize * self.graph.out_degree() + label as usize
    }

    /// `first_source(t, a)`: some node `s` with an `a`-edge to `t`, or
    /// [`UNDEFINED`].
    #[must_use]
    pub fn first_source(&self, t: u32, a: u32) -> u32 {
        self.first_source[self.index(t, a)]
    }

    /// `next_source(s, a)`: another node `s'` in the linked list of
    /// in-neighbours sharing `s`'s target under label `a`, or
    /// [`UNDEFINED`].
    #[must_use]
    pub fn next_source(&self, s: u32, a: u32) -> u32 {
        self.next_source[self.index(s, a)]
    }

    /// All sources `s` with `target(s, a) == t`.
    pub fn sources(&self, t: u32, a: u32) -> impl Iterator<Item = u32> + '_ {
        let mut cur = self.first_source(t, a);
        core::iter::from_fn(move || {
            if cur == UNDEFINED {
                None
            } else {
                let s = cur;
                cur = self.next_source(s, a);
                Some(s)
            }
        })
    }

    fn link(&mut self, s: u32, a: u32, t: u32) {
        let idx = self.index(s, a);
        self.next_source[idx] = self.first_source(t, a);
        let tidx = self.index(t, a);
        self.first_source[tidx] = s;
    }

    fn unlink(&mut self, s: u32, a: u32, t: u32) {
        let tidx = self.index(t, a);
        if self.first_source[tidx] == s {
            self.first_source[tidx] = self.next_source(s, a);
            return;
        }
        let mut prev = self.first_source[tidx];
        while prev != UNDEFINED {
            let next = self.next_source(prev, a);
            if next == s {
                let sidx = self.index(s, a);
                let idx = self.index(prev, a);
                self.next_source[idx] = self.next_source[sidx];
                return;
            }
            prev = next;
        }
    }

    /// Sets the `a`-labelled target of `s` to `t`, maintaining both the
    /// forward table and the reverse linked lists.
    pub fn set_target(&mut self, s: u32, a: u32, t: u32) -> Result<()> {
        let old = self.graph.target(s, a)?;
        if old != UNDEFINED {
            self.unlink(s, a, old);
        }
        self.graph.set_target_no_checks(s, a, t);
        if t != UNDEFINED {
            self.link(s, a, t);
        }
        Ok(())
    }

    pub fn set_target_no_checks(&mut self, s: u32, a: u32, t: u32) {
        let old = self.graph.target_no_checks(s, a);
        if old != UNDEFINED {
            self.unlink(s, a, old);
        }
        self.graph.set_target_no_checks(s, a, t);
        if t != UNDEFINED {
            self.link(s, a, t);
        }
    }

    /// Unlinks the source before clearing the forward entry.
    pub fn remove_target(&mut self, s: u32, a: u32) {
        let old = self.graph.target_no_checks(s, a);
        if old != UNDEFINED {
            self.unlink(s, a, old);
        }
        self.graph.remove_target(s, a);
    }

    pub fn add_nodes(&mut self, k: usize) {
        self.graph.add_nodes(k);
        let d = self.graph.out_degree();
        self.first_source.resize(self.graph.number_of_nodes() * d, UNDEFINED);
        self.next_source.resize(self.graph.number_of_nodes() * d, UNDEFINED);
    }

    /// Exchanges two active nodes' identities completely: every edge
    /// incident to `c` behaves as if it had been incident to `d` and vice
    /// versa.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `c` or `d` is out of range, or
    /// [`Error::InvalidState`] if `c` or `d` is currently the `min` or
    /// `max` of an in-progress [`WordGraphWithSources::merge_nodes`] call.
    pub fn swap_nodes(&mut self, c: u32, d: u32) -> Result<()> {
        if let Some((min, max)) = self.merging {
            if c == min || c == max || d == min || d == max {
                return Err(Report::new(Error::InvalidState {
                    message: "cannot swap a node that is part of an in-progress merge",
                }));
            }
        }
        if c == d {
            return Ok(());
        }
        let out_degree = self.graph.out_degree();
        for a in 0..out_degree as u32 {
            let t_c = self.graph.target(c, a)?;
            let t_d = self.graph.target(d, a)?;
            let in_c: Vec<u32> = self.sources(c, a).filter(|&s| s != c && s != d).collect();
            let in_d: Vec<u32> = self.sources(d, a).filter(|&s| s != c && s != d).collect();

            self.set_target(c, a, t_d)?;
            self.set_target(d, a, t_c)?;
            for s in in_c {
                self.set_target(s, a, d)?;
            }
            for s in in_d {
                self.set_target(s, a, c)?;
            }
        }
        Ok(())
    }

    /// One-sided rename: `d` adopts every edge incident to `c` (both
    /// outgoing and incoming), and `c` is substituted by `d` everywhere.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `c` or `d` is out of range.
    pub fn rename_node(&mut self, c: u32, d: u32) -> Result<()> {
        if c == d {
            return Ok(());
        }
        let out_degree = self.graph.out_degree();
        for a in 0..out_degree as u32 {
            let t = self.graph.target(c, a)?;
            self.set_target(d, a, t)?;
            let in_c: Vec<u32> = self.sources(c, a).filter(|&s| s != d).collect();
            for s in in_c {
                self.set_target(s, a, d)?;
            }
        }
        Ok(())
    }

    /// Identifies `max` with `min` (`min < max`): every outgoing edge of
    /// `max` is transferred to `min`, and every in-edge of `max` is
    /// redirected to `min`.
    ///
    /// `on_new_edge(s, a, t)` fires whenever `min` gains an edge as a
    /// direct side effect of the merge (`min` had no `a`-edge, `max` did).
    /// `on_incompat(t1, t2)` fires whenever `min` already had an `a`-edge
    /// to a different target `t2` than `max`'s `t1` — those two targets
    /// must themselves be merged by the caller; this function does not
    /// recurse on the caller's behalf.
    ///
    /// Neither callback may mutate `self`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `min >= max`, or
    /// [`Error::OutOfBounds`] if either is out of range.
    pub fn merge_nodes(
        &mut self,
        min: u32,
        max: u32,
        mut on_new_edge: impl FnMut(u32, u32, u32),
        mut on_incompat: impl FnMut(u32, u32),
    ) -> Result<()> {
        if min >= max {
            return Err(Report::new(Error::InvalidArgument {
                message: "merge_nodes requires min < max",
            }));
        }
        if max as usize >= self.number_of_nodes() {
            return Err(Report::new(error::out_of_bounds(
                max,
                self.number_of_nodes() as u64,
            )));
        }
        self.merging = Some((min, max));
        let out_degree = self.graph.out_degree();

        for a in 0..out_degree as u32 {
            let t_max = self.graph.target_no_checks(max, a);
            if t_max == UNDEFINED {
                continue;
            }
            let t_min = self.graph.target_no_checks(min, a);
            if t_min == UNDEFINED {
                self.set_target_no_checks(min, a, t_max);
                log::trace!("word_graph_with_sources: merge introduced edge ({min}, {a}) -> {t_max}");
                on_new_edge(min, a, t_max);
            } else if t_min != t_max {
                on_incompat(t_min, t_max);
            }
        }

        for a in 0..out_degree as u32 {
            let in_max: Vec<u32> = self.sources(max, a).filter(|&s| s != max).collect();
            for s in in_max {
                self.set_target_no_checks(s, a, min);
            }
        }

        self.merging = None;
        log::debug!("word_graph_with_sources: merged node {max} into {min}");
        Ok(())
    }
}
