//! The Stephen procedure: given an inverse presentation and a word,
//! computes the deterministic word graph recognising the left factors of
//! that word modulo the presentation's rules.
//!
//! There is no upstream C++ source for this in the retrieved reference
//! material (the Stephen automaton is specified in spec section 6 purely
//! as an external collaborator's interface), so this module provides both
//! the [`Stephen`] trait any such collaborator must satisfy, and one
//! concrete implementation, [`StephenProcedure`], grounded on the same
//! coset-enumeration primitive the rest of this crate uses for quotienting
//! word graphs: [`crate::word_graph::WordGraphWithSources::merge_nodes`]
//! together with a [`crate::union_find::UnionFind`] tracking which nodes a
//! sequence of merges has identified. This is a minimal reference
//! procedure sufficient to drive [`crate::cirpons`] and [`crate::cutting`],
//! not a reimplementation of a production Todd-Coxeter-style solver.

use alloc::{collections::VecDeque, rc::Rc, vec::Vec};

use crate::{
    constants::{is_undefined, UNDEFINED},
    error::Result,
    presentation::{InversePresentation, Word},
    union_find::UnionFind,
    word_graph::{WordGraph, WordGraphWithSources},
};

/// The interface any Stephen-automaton provider exposes to
/// [`crate::cirpons`] and [`crate::cutting`].
pub trait Stephen {
    /// The word this instance was last run on.
    fn word(&self) -> &[u32];

    /// Sets the word to compute the automaton for; does not run.
    fn set_word(&mut self, w: Word) -> &mut Self;

    /// Computes the automaton for the current word.
    ///
    /// # Errors
    /// Returns an error if the underlying presentation or word is
    /// malformed (e.g. a letter outside the alphabet).
    fn run(&mut self) -> Result<()>;

    /// The deterministic, partial, standardised word graph recognising the
    /// left factors of [`Stephen::word`].
    fn word_graph(&self) -> &WordGraph;

    /// The node at which [`Stephen::word`] terminates, reading from node 0.
    fn accept_state(&self) -> u32;
}

/// A minimal reference Stephen procedure.
#[derive(Debug, Clone)]
pub struct StephenProcedure {
    presentation: Rc<InversePresentation>,
    word: Word,
    graph: WordGraph,
    accept_state: u32,
}

impl StephenProcedure {
    /// Creates a procedure over the given presentation, for the empty
    /// word. Call [`Stephen::set_word`] to target a different word.
    #[must_use]
    pub fn new(presentation: Rc<InversePresentation>) -> Self {
        let d = presentation.alphabet_size();
        StephenProcedure {
            presentation,
            word: Vec::new(),
            graph: WordGraph::new(1, d),
            accept_state: 0,
        }
    }

    fn trace_extend(
        &self,
        graph: &mut WordGraphWithSources,
        uf: &mut UnionFind,
        start: u32,
        word: &[u32],
    ) -> Result<u32> {
        let mut cur = uf.find(start)?;
        for &a in word {
            let t = graph.graph().target_no_checks(cur, a);
            cur = if is_undefined(t) {
                let new_node = graph.number_of_nodes() as u32;
                graph.add_nodes(1);
                uf.add_entry();
                graph.set_target(cur, a, new_node)?;
                let inv_a = self.presentation.inverse(a)?;
                if is_undefined(graph.graph().target_no_checks(new_node, inv_a)) {
                    graph.set_target(new_node, inv_a, cur)?;
                }
                new_node
            } else {
                uf.find(t)?
            };
        }
        uf.find(cur)
    }

    fn merge(&self, graph: &mut WordGraphWithSources, uf: &mut UnionFind, a: u32, b: u32) -> Result<()> {
        let mut pending = alloc::vec![(a, b)];
        while let Some((x, y)) = pending.pop() {
            let x = uf.find(x)?;
            let y = uf.find(y)?;
            if x == y {
                continue;
            }
            let (min, max) = if x < y { (x, y) } else { (y, x) };
            let mut incompats: Vec<(u32, u32)> = Vec::new();
            graph.merge_nodes(min, max, |_, _, _| {}, |t1, t2| incompats.push((t1, t2)))?;
            uf.union_(min, max)?;
            pending.extend(incompats);
        }
        Ok(())
    }

    fn compact_reachable(g: &WordGraph) -> (WordGraph, Vec<u32>) {
        let n = g.number_of_nodes();
        let d = g.out_degree();
        let mut mapping = alloc::vec![UNDEFINED; n];
        let mut order: Vec<u32> = Vec::new();
        if n > 0 {
            let mut queue = VecDeque::new();
            mapping[0] = 0;
            order.push(0);
            queue.push_back(0u32);
            while let Some(s) = queue.pop_front() {
                for (_, t) in g.labels_and_targets(s) {
                    if mapping[t as usize] == UNDEFINED {
                        mapping[t as usize] = order.len() as u32;
                        order.push(t);
                        queue.push_back(t);
                    }
                }
            }
        }
        let mut out = WordGraph::new(order.len(), d);
        for (new_s, &old_s) in order.iter().enumerate() {
            for (a, old_t) in g.labels_and_targets(old_s) {
                let new_t = mapping[old_t as usize];
                if !is_undefined(new_t) {
                    out.set_target_no_checks(new_s as u32, a, new_t);
                }
            }
        }
        (out, mapping)
    }
}

impl Stephen for StephenProcedure {
    fn word(&self) -> &[u32] {
        &self.word
    }

    fn set_word(&mut self, w: Word) -> &mut Self {
        self.word = w;
        self
    }

    fn run(&mut self) -> Result<()> {
        let d = self.presentation.alphabet_size();
        let mut graph = WordGraphWithSources::new(1, d);
        let mut uf = UnionFind::new(1);

        let mut accept = 0u32;
        for &a in &self.word {
            accept = self.trace_extend(&mut graph, &mut uf, accept, core::slice::from_ref(&a))?;
        }

        loop {
            let mut changed = false;
            let n = graph.number_of_nodes();
            for s in 0..n as u32 {
                let cs = uf.find(s)?;
                if cs != s {
                    continue;
                }
                for (u, v) in self.presentation.rules() {
                    let tu = self.trace_extend(&mut graph, &mut uf, cs, u)?;
                    let tv = self.trace_extend(&mut graph, &mut uf, cs, v)?;
                    if tu != tv {
                        self.merge(&mut graph, &mut uf, tu, tv)?;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        accept = uf.find(accept)?;
        let (compacted, mapping) = Self::compact_reachable(graph.graph());
        self.graph = compacted;
        self.accept_state = mapping[accept as usize];
        log::debug!(
            "stephen: ran on word of length {}, {} nodes, accept state {}",
            self.word.len(),
            self.graph.number_of_nodes(),
            self.accept_state
        );
        Ok(())
    }

    fn word_graph(&self) -> &WordGraph {
        &self.graph
    }

    fn accept_state(&self) -> u32 {
        self.accept_state
    }
}

/// `true` iff `u` is accepted as a left factor by `s` — equivalently, the
/// path labelled `u` from node 0 of `s.word_graph()` exists and lands on
/// `s.accept_state()`.
///
/// # Errors
/// Propagates any error from following the path in `s.word_graph()`.
pub fn is_left_factor(s: &impl Stephen, u: &[u32]) -> Result<bool> {
    let reached = crate::word_graph::algo::follow_path(s.word_graph(), 0, u)?;
    Ok(!is_undefined(reached) && reached == s.accept_state())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symmetric_inverse_monoid_degree_1() -> Rc<InversePresentation> {
        // A single generator `a` with inverse `b`, and the relations
        // a.b.a = a, b.a.b = b (standard inverse semigroup axioms for a
        // single mutually-inverse pair), plus a.b = b.a (commute, since
        // degree 1 gives a trivial symmetric inverse monoid).
        let mut p = InversePresentation::new(alloc::vec![1, 0]);
        p.add_rule(alloc::vec![0, 1, 0], alloc::vec![0]);
        p.add_rule(alloc::vec![1, 0, 1], alloc::vec![1]);
        p.add_rule(alloc::vec![0, 1], alloc::vec![1, 0]);
        p.set_contains_empty_word(true);
        Rc::new(p)
    }

    #[test]
    fn run_is_deterministic() {
        let p = symmetric_inverse_monoid_degree_1();
        let mut s1 = StephenProcedure::new(p.clone());
        s1.set_word(alloc::vec![0, 1]).run().unwrap();
        let mut s2 = StephenProcedure::new(p);
        s2.set_word(alloc::vec![0, 1]).run().unwrap();
        assert_eq!(s1.word_graph(), s2.word_graph());
        assert_eq!(s1.accept_state(), s2.accept_state());
    }

    #[test]
    fn accept_state_is_reachable_and_matches_follow_path() {
        let p = symmetric_inverse_monoid_degree_1();
        let mut s = StephenProcedure::new(p);
        s.set_word(alloc::vec![0, 1, 0]).run().unwrap();
        let reached = crate::word_graph::algo::follow_path(s.word_graph(), 0, s.word()).unwrap();
        assert_eq!(reached, s.accept_state());
        assert!(is_left_factor(&s, s.word()).unwrap());
    }

    #[test]
    fn node_zero_is_always_the_start_state() {
        let p = symmetric_inverse_monoid_degree_1();
        let mut s = StephenProcedure::new(p);
        s.set_word(Vec::new()).run().unwrap();
        assert_eq!(s.accept_state(), 0);
        assert_eq!(s.word_graph().number_of_nodes(), 1);
    }

    #[test]
    fn relations_identify_equivalent_words() {
        let p = symmetric_inverse_monoid_degree_1();
        let mut s = StephenProcedure::new(p);
        // a.b.a is identified with a by the first relation.
        s.set_word(alloc::vec![0, 1, 0]).run().unwrap();
        assert!(is_left_factor(&s, &[0]).unwrap());
    }
}
