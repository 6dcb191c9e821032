//! The Cutting engine: enumerates the R-classes of an inverse monoid
//! presented by an inverse presentation, then runs Gabow over the
//! resulting structure graph to obtain its D-classes.
//!
//! Grounded on the `cutting.hpp` reference read from the retrieved pack and
//! transcribed directly from its main-loop pseudocode: starting from the
//! Stephen automaton of the empty word, every existing R-class
//! representative is extended by prepending each alphabet letter in turn;
//! [`is_left_factor`] decides, in both directions, whether the prepended
//! word's automaton is R-equivalent to an already-known representative, so
//! that equal R-classes are coalesced rather than duplicated. The resulting
//! one-node-per-R-class graph is handed to [`crate::gabow::Gabow`] to read
//! off D-classes as its strongly connected components.

use alloc::{rc::Rc, vec::Vec};

use crate::{
    error::Result,
    gabow::Gabow,
    presentation::InversePresentation,
    stephen::{is_left_factor, Stephen, StephenProcedure},
    word_graph::WordGraph,
};

/// Computes and holds the R- and D-class structure of an inverse monoid.
#[derive(Debug, Clone)]
pub struct Cutting {
    presentation: Rc<InversePresentation>,
    stephens: Vec<StephenProcedure>,
    gabow: Option<Gabow>,
}

impl Cutting {
    /// Creates an engine for `presentation`. Call [`Cutting::run`] before
    /// reading any of the size/class-count accessors.
    #[must_use]
    pub fn new(presentation: Rc<InversePresentation>) -> Self {
        Cutting {
            presentation,
            stephens: Vec::new(),
            gabow: None,
        }
    }

    /// The Stephen automaton for each R-class representative found so far,
    /// in discovery order.
    #[must_use]
    pub fn stephens(&self) -> &[StephenProcedure] {
        &self.stephens
    }

    /// The structure graph: one node per R-class, `target(i, a) = j` means
    /// prepending `a` to R-class `i`'s word lands in R-class `j`. `None`
    /// until [`Cutting::run`] has completed.
    #[must_use]
    pub fn word_graph(&self) -> Option<&WordGraph> {
        self.gabow.as_ref().map(Gabow::graph)
    }

    /// Runs the main loop to completion, discovering every R-class and
    /// building the Gabow view of the structure graph over them.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::InvalidPresentation`] if the
    /// presentation is malformed, or propagates any error from running the
    /// Stephen procedure on a discovered word.
    pub fn run(&mut self) -> Result<()> {
        self.presentation.validate()?;
        let d = self.presentation.alphabet_size();
        let mut graph = WordGraph::new(0, d);

        let mut seed = StephenProcedure::new(Rc::clone(&self.presentation));
        seed.set_word(Vec::new()).run()?;
        self.stephens.push(seed);
        graph.add_nodes(1);

        let mut i = 0usize;
        while i < self.stephens.len() {
            let word = self.stephens[i].word().to_vec();
            for a in 0..d as u32 {
                let mut aw = alloc::vec![a];
                aw.extend_from_slice(&word);

                let mut tmp = StephenProcedure::new(Rc::clone(&self.presentation));
                tmp.set_word(aw.clone()).run()?;

                let mut matched = None;
                for (j, sj) in self.stephens.iter().enumerate() {
                    if is_left_factor(sj, &aw)? && is_left_factor(&tmp, sj.word())? {
                        matched = Some(j);
                        break;
                    }
                }

                match matched {
                    Some(j) => graph.set_target(i as u32, a, j as u32)?,
                    None => {
                        let new_idx = self.stephens.len() as u32;
                        graph.set_target(i as u32, a, new_idx)?;
                        self.stephens.push(tmp);
                        graph.add_nodes(1);
                    }
                }
            }
            i += 1;
        }

        log::debug!(
            "cutting: found {} r-classes over alphabet of size {}",
            self.stephens.len(),
            d
        );
        self.gabow = Some(Gabow::new(graph));
        Ok(())
    }

    /// The total number of elements: the sum, over every R-class, of the
    /// number of nodes in its Stephen automaton.
    #[must_use]
    pub fn size(&self) -> usize {
        self.stephens.iter().map(|s| s.word_graph().number_of_nodes()).sum()
    }

    /// The number of R-classes found.
    #[must_use]
    pub fn number_of_r_classes(&self) -> usize {
        self.stephens.len()
    }

    /// The number of D-classes, i.e. the number of strongly connected
    /// components of the R-class structure graph.
    ///
    /// # Errors
    /// Returns an error if [`Cutting::run`] has not been called yet.
    pub fn number_of_d_classes(&self) -> Result<usize> {
        self.gabow
            .as_ref()
            .ok_or_else(|| {
                error_stack::Report::new(crate::error::Error::InvalidState {
                    message: "Cutting::run must be called before reading class counts",
                })
            })?
            .number_of_components()
    }
}
