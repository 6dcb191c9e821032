//! A non-owning window `[start, end)` over an existing [`WordGraph`],
//! translating node indices so the view behaves like a graph on
//! `[0, end - start)`.

use error_stack::Report;

use crate::{
    constants::UNDEFINED,
    error::{self, Error, Result},
    word_graph::WordGraph,
};

/// A window `[start, end)` over a [`WordGraph`] that borrows it rather than
/// copying.
#[derive(Debug, Clone, Copy)]
pub struct WordGraphView<'a> {
    underlying: &'a WordGraph,
    start: usize,
    end: usize,
}

impl<'a> WordGraphView<'a> {
    /// A view onto `[start, end)` of `underlying`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `start > end` or `end` exceeds
    /// `underlying.number_of_nodes()`.
    pub fn new(underlying: &'a WordGraph, start: usize, end: usize) -> Result<Self> {
        if start > end || end > underlying.number_of_nodes() {
            return Err(Report::new(Error::InvalidArgument {
                message: "view window must satisfy start <= end <= number_of_nodes",
            }));
        }
        Ok(WordGraphView {
            underlying,
            start,
            end,
        })
    }

    #[must_use]
    pub fn number_of_nodes(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn out_degree(&self) -> usize {
        self.underlying.out_degree()
    }

    fn translate_in(&self, local: u32) -> u32 {
        self.start as u32 + local
    }

    /// The target of the `a`-labelled edge from the view-local node `s`, as
    /// a view-local index, or [`UNDEFINED`] if the edge is undefined *or*
    /// its target falls outside the window.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `s` is outside `[0, number_of_nodes())`.
    pub fn target(&self, s: u32, a: u32) -> Result<u32> {
        if s as usize >= self.number_of_nodes() {
            return Err(Report::new(error::out_of_bounds(
                s,
                self.number_of_nodes() as u64,
            )));
        }
        let global = self.underlying.target(self.translate_in(s), a)?;
        Ok(self.translate_out(global))
    }

    fn translate_out(&self, global: u32) -> u32 {
        if global == UNDEFINED {
            return UNDEFINED;
        }
        let g = global as usize;
        if g >= self.start && g < self.end {
            (g - self.start) as u32
        } else {
            UNDEFINED
        }
    }

    /// Materialises this view as an owning [`WordGraph`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidState`] if any edge inside the window
    /// targets a node outside it (such an edge cannot be represented once
    /// the view's nodes are renumbered from zero).
    pub fn to_owned_graph(&self) -> Result<WordGraph> {
        let mut g = WordGraph::new(self.number_of_nodes(), self.out_degree());
        for s in self.start..self.end {
            for a in 0..self.out_degree() as u32 {
                let t = self.underlying.target_no_checks(s as u32, a);
                if t == UNDEFINED {
                    continue;
                }
                if (t as usize) < self.start || (t as usize) >= self.end {
                    return Err(Report::new(Error::InvalidState {
                        message: "an edge inside the view targets a node outside the window",
                    }));
                }
                g.set_target_no_checks((s - self.start) as u32, a, t - self.start as u32);
            }
        }
        Ok(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_translates_indices() {
        let mut g = WordGraph::new(5, 1);
        g.set_target(2, 0, 3).unwrap();
        let view = WordGraphView::new(&g, 2, 4).unwrap();
        assert_eq!(view.number_of_nodes(), 2);
        assert_eq!(view.target(0, 0).unwrap(), 1);
    }

    #[test]
    fn view_hides_edges_leaving_the_window() {
        let mut g = WordGraph::new(5, 1);
        g.set_target(2, 0, 4).unwrap();
        let view = WordGraphView::new(&g, 2, 4).unwrap();
        assert_eq!(view.target(0, 0).unwrap(), crate::constants::UNDEFINED);
    }

    #[test]
    fn to_owned_fails_if_edge_leaves_window() {
        let mut g = WordGraph::new(5, 1);
        g.set_target(2, 0, 4).unwrap();
        let view = WordGraphView::new(&g, 2, 4).unwrap();
        assert!(view.to_owned_graph().is_err());
    }

    #[test]
    fn to_owned_succeeds_when_self_contained() {
        let mut g = WordGraph::new(5, 1);
        g.set_target(2, 0, 3).unwrap();
        let view = WordGraphView::new(&g, 2, 4).unwrap();
        let owned = view.to_owned_graph().unwrap();
        assert_eq!(owned.target(0, 0).unwrap(), 1);
    }

    #[test]
    fn rejects_invalid_window() {
        let g = WordGraph::new(3, 1);
        assert!(WordGraphView::new(&g, 2, 1).is_err());
        assert!(WordGraphView::new(&g, 0, 4).is_err());
    }
}
