//! One-pass strongly-connected-component computation via Gabow's
//! two-stack algorithm, with lazy evaluation in the style of the
//! teacher's `TarjanScc`: nothing is computed until the first accessor
//! is called, and the result is cached until [`Gabow::reset`].
//!
//! Requires every node of the underlying graph to have all `out_degree`
//! edges defined; partial graphs must be completed or restricted to a
//! defined sub-graph first.

use alloc::{collections::VecDeque, vec, vec::Vec};
use core::cell::RefCell;

use error_stack::Report;

use crate::{
    error::{self, Error, Result},
    forest::Forest,
    word_graph::WordGraph,
};

#[derive(Debug, Clone)]
struct State {
    id: Vec<u32>,
    components: Vec<Vec<u32>>,
}

/// Lazily-computed strongly connected components of a [`WordGraph`],
/// owning the graph it was built from.
#[derive(Debug, Clone)]
pub struct Gabow {
    graph: WordGraph,
    state: RefCell<Option<State>>,
}

impl Gabow {
    #[must_use]
    pub fn new(graph: WordGraph) -> Self {
        Gabow {
            graph,
            state: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn graph(&self) -> &WordGraph {
        &self.graph
    }

    /// Mutable access to the underlying graph. Invalidates the cached
    /// decomposition immediately, since the caller is about to change the
    /// graph the cache was computed from.
    pub fn graph_mut(&mut self) -> &mut WordGraph {
        self.reset();
        &mut self.graph
    }

    /// Replaces the underlying graph entirely.
    pub fn set_graph(&mut self, graph: WordGraph) {
        self.graph = graph;
        self.reset();
    }

    /// Drops the cached decomposition, forcing a recomputation on the next
    /// accessor call.
    pub fn reset(&self) {
        *self.state.borrow_mut() = None;
    }

    fn run(&self) -> Result<()> {
        if self.state.borrow().is_some() {
            return Ok(());
        }
        if !self.graph.is_complete() {
            return Err(Report::new(Error::InvalidState {
                message: "Gabow requires every node to have all out-degree edges defined",
            }));
        }
        *self.state.borrow_mut() = Some(self.compute());
        Ok(())
    }

    // Gabow's path-based two-stack SCC algorithm, run iteratively to avoid
    // recursion depth proportional to the graph.
    fn compute(&self) -> State {
        let n = self.graph.number_of_nodes();
        let d = self.graph.out_degree();
        const UNSET: u32 = u32::MAX;

        let mut preorder = vec![UNSET; n];
        let mut id = vec![UNSET; n];
        let mut components: Vec<Vec<u32>> = Vec::new();
        let mut scc_stack: Vec<u32> = Vec::new();
        let mut bound_stack: Vec<u32> = Vec::new();
        let mut next_index = 0u32;
        // (node, next out-label to examine)
        let mut call_stack: Vec<(u32, u32)> = Vec::new();

        for start in 0..n as u32 {
            if preorder[start as usize] != UNSET {
                continue;
            }
            preorder[start as usize] = next_index;
            next_index += 1;
            scc_stack.push(start);
            bound_stack.push(start);
            call_stack.push((start, 0));

            while let Some((v, a)) = call_stack.last().copied() {
                if (a as usize) < d {
                    call_stack.last_mut().unwrap().1 += 1;
                    let w = self.graph.target_no_checks(v, a);
                    if preorder[w as usize] == UNSET {
                        preorder[w as usize] = next_index;
                        next_index += 1;
                        scc_stack.push(w);
                        bound_stack.push(w);
                        call_stack.push((w, 0));
                    } else if id[w as usize] == UNSET {
                        while preorder[*bound_stack.last().unwrap() as usize] > preorder[w as usize]
                        {
                            bound_stack.pop();
                        }
                    }
                } else {
                    call_stack.pop();
                    if *bound_stack.last().unwrap() == v {
                        bound_stack.pop();
                        let comp_id = components.len() as u32;
                        let mut comp = Vec::new();
                        loop {
                            let w = scc_stack.pop().unwrap();
                            id[w as usize] = comp_id;
                            comp.push(w);
                            if w == v {
                                break;
                            }
                        }
                        // `comp` comes out of the LIFO pop in descending
                        // discovery order (most recently discovered first);
                        // left as-is, matching the order a caller observes
                        // nodes close off in.
                        components.push(comp);
                    }
                }
            }
        }

        State { id, components }
    }

    fn check_node(&self, v: u32) -> Result<()> {
        if (v as usize) < self.graph.number_of_nodes() {
            Ok(())
        } else {
            Err(Report::new(error::out_of_bounds(
                v,
                self.graph.number_of_nodes() as u64,
            )))
        }
    }

    /// The id of the component containing `v`, in `[0, number_of_components())`.
    pub fn id(&self, v: u32) -> Result<u32> {
        self.run()?;
        self.check_node(v)?;
        Ok(self.id_no_checks(v))
    }

    #[must_use]
    pub fn id_no_checks(&self, v: u32) -> u32 {
        self.run().expect("Gabow::run failed");
        self.state.borrow().as_ref().unwrap().id[v as usize]
    }

    /// The number of strongly connected components.
    pub fn number_of_components(&self) -> Result<usize> {
        self.run()?;
        Ok(self.state.borrow().as_ref().unwrap().components.len())
    }

    fn check_scc_index(&self, i: usize) -> Result<()> {
        let count = self.state.borrow().as_ref().unwrap().components.len();
        if i < count {
            Ok(())
        } else {
            Err(Report::new(error::out_of_bounds(i as u32, count as u64)))
        }
    }

    /// The nodes of the `i`-th component, root at index `0`.
    pub fn component(&self, i: usize) -> Result<Vec<u32>> {
        self.run()?;
        self.check_scc_index(i)?;
        Ok(self.component_no_checks(i))
    }

    #[must_use]
    pub fn component_no_checks(&self, i: usize) -> Vec<u32> {
        self.run().expect("Gabow::run failed");
        self.state.borrow().as_ref().unwrap().components[i].clone()
    }

    /// Every component, in discovery order.
    pub fn components(&self) -> Result<Vec<Vec<u32>>> {
        self.run()?;
        Ok(self.state.borrow().as_ref().unwrap().components.clone())
    }

    /// The component containing `v`.
    pub fn component_of(&self, v: u32) -> Result<Vec<u32>> {
        let id = self.id(v)?;
        self.component(id as usize)
    }

    #[must_use]
    pub fn component_of_no_checks(&self, v: u32) -> Vec<u32> {
        self.component_no_checks(self.id_no_checks(v) as usize)
    }

    /// The root (element `0`) of each component, in discovery order.
    pub fn roots(&self) -> Result<Vec<u32>> {
        self.run()?;
        Ok(self
            .state
            .borrow()
            .as_ref()
            .unwrap()
            .components
            .iter()
            .map(|c| c[0])
            .collect())
    }

    /// The root of the component containing `v`.
    pub fn root_of(&self, v: u32) -> Result<u32> {
        Ok(self.component_of(v)?[0])
    }

    #[must_use]
    pub fn root_of_no_checks(&self, v: u32) -> u32 {
        self.component_of_no_checks(v)[0]
    }

    /// A spanning forest with one tree per component, each rooted at its
    /// component's minimum node, edges oriented away from the root.
    pub fn spanning_forest(&self) -> Result<Forest> {
        self.run()?;
        let n = self.graph.number_of_nodes();
        let state = self.state.borrow();
        let st = state.as_ref().unwrap();
        let mut forest = Forest::new(n);
        let mut visited = vec![false; n];
        for comp in &st.components {
            let root = *comp.iter().min().unwrap();
            let mut queue = VecDeque::new();
            queue.push_back(root);
            visited[root as usize] = true;
            while let Some(v) = queue.pop_front() {
                for (a, t) in self.graph.labels_and_targets(v) {
                    if st.id[t as usize] == st.id[v as usize] && !visited[t as usize] {
                        visited[t as usize] = true;
                        forest.set_parent_and_label(t, v, a)?;
                        queue.push_back(t);
                    }
                }
            }
        }
        Ok(forest)
    }

    /// As [`Gabow::spanning_forest`], but built from the reverse graph: a
    /// tree per component rooted at its minimum node, following edges
    /// towards that root.
    pub fn reverse_spanning_forest(&self) -> Result<Forest> {
        self.run()?;
        let n = self.graph.number_of_nodes();
        let mut incoming: Vec<Vec<(u32, u32)>> = vec![Vec::new(); n];
        for s in 0..n as u32 {
            for (a, t) in self.graph.labels_and_targets(s) {
                incoming[t as usize].push((s, a));
            }
        }
        let state = self.state.borrow();
        let st = state.as_ref().unwrap();
        let mut forest = Forest::new(n);
        let mut visited = vec![false; n];
        for comp in &st.components {
            let root = *comp.iter().min().unwrap();
            let mut queue = VecDeque::new();
            queue.push_back(root);
            visited[root as usize] = true;
            while let Some(v) = queue.pop_front() {
                for &(s, a) in &incoming[v as usize] {
                    if st.id[s as usize] == st.id[v as usize] && !visited[s as usize] {
                        visited[s as usize] = true;
                        forest.set_parent_and_label(s, v, a)?;
                        queue.push_back(s);
                    }
                }
            }
        }
        Ok(forest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(n: u32) -> WordGraph {
        let mut g = WordGraph::new(n as usize, 1);
        for i in 0..n {
            g.set_target(i, 0, (i + 1) % n).unwrap();
        }
        g
    }

    #[test]
    fn single_cycle_is_one_component() {
        let gabow = Gabow::new(cycle(4));
        assert_eq!(gabow.number_of_components().unwrap(), 1);
        let comp = gabow.component(0).unwrap();
        assert_eq!(comp.len(), 4);
    }

    #[test]
    fn two_disjoint_cycles_are_two_components() {
        let mut a = cycle(3);
        let b = cycle(3);
        a.disjoint_union(&b).unwrap();
        let gabow = Gabow::new(a);
        assert_eq!(gabow.number_of_components().unwrap(), 2);
        assert_ne!(gabow.id(0).unwrap(), gabow.id(3).unwrap());
    }

    #[test]
    fn acyclic_chain_has_n_singleton_components() {
        // 0 -> 1 -> 2, plus a self-loop on 2 to keep the graph complete.
        let mut g = WordGraph::new(3, 1);
        g.set_target(0, 0, 1).unwrap();
        g.set_target(1, 0, 2).unwrap();
        g.set_target(2, 0, 2).unwrap();
        let gabow = Gabow::new(g);
        assert_eq!(gabow.number_of_components().unwrap(), 2);
        assert_eq!(gabow.component_of(2).unwrap(), alloc::vec![2]);
        assert_eq!(gabow.id(0).unwrap(), gabow.id(1).unwrap());
    }

    #[test]
    fn rejects_incomplete_graph() {
        let gabow = Gabow::new(WordGraph::new(2, 1));
        assert!(gabow.number_of_components().is_err());
    }

    #[test]
    fn root_of_component_is_element_zero() {
        let gabow = Gabow::new(cycle(3));
        let comp = gabow.component(0).unwrap();
        assert_eq!(gabow.root_of(comp[1]).unwrap(), comp[0]);
    }

    #[test]
    fn spanning_forest_covers_every_node() {
        let gabow = Gabow::new(cycle(4));
        let forest = gabow.spanning_forest().unwrap();
        let roots: Vec<u32> = (0..4)
            .filter(|&v| forest.parent(v) == crate::constants::UNDEFINED)
            .collect();
        assert_eq!(roots, alloc::vec![0]);
    }

    #[test]
    fn reverse_spanning_forest_also_covers_every_node() {
        let gabow = Gabow::new(cycle(4));
        let forest = gabow.reverse_spanning_forest().unwrap();
        let roots: Vec<u32> = (0..4)
            .filter(|&v| forest.parent(v) == crate::constants::UNDEFINED)
            .collect();
        assert_eq!(roots, alloc::vec![0]);
    }

    #[test]
    fn reset_forces_recomputation_after_mutation() {
        let mut gabow = Gabow::new(cycle(3));
        assert_eq!(gabow.number_of_components().unwrap(), 1);
        gabow.graph_mut().set_target(0, 0, 0).unwrap();
        assert_eq!(gabow.number_of_components().unwrap(), 2);
    }
}
