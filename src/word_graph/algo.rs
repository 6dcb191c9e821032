//! Free functions over an immutably-borrowed [`WordGraph`]: acyclicity,
//! connectivity, reachability, path following, and standardisation.
//!
//! Follows the three-colour DFS idiom the teacher uses throughout
//! `crates/algorithms/src/cycles/check.rs` and `dag/toposort.rs`, adapted
//! to walk a concrete dense [`WordGraph`] directly rather than through the
//! teacher's generic `IntoNeighbors` visitor traits — this crate only ever
//! has one graph representation to drive, so the extra abstraction layer
//! buys nothing.

use alloc::{collections::VecDeque, vec, vec::Vec};

use error_stack::Report;
use fixedbitset::FixedBitSet;

use crate::{
    constants::UNDEFINED,
    error::{self, Result},
    word_graph::WordGraph,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Colour {
    White,
    Grey,
    Black,
}

/// `true` iff no node reachable from `start` (or every node, if `start` is
/// `None`) lies on a directed cycle.
#[must_use]
pub fn is_acyclic(g: &WordGraph, start: Option<u32>) -> bool {
    let n = g.number_of_nodes();
    let mut colour = vec![Colour::White; n];
    let mut stack: Vec<(u32, usize)> = Vec::new();

    let roots: Vec<u32> = match start {
        Some(s) => alloc::vec![s],
        None => (0..n as u32).collect(),
    };

    for root in roots {
        if colour[root as usize] != Colour::White {
            continue;
        }
        stack.push((root, 0));
        colour[root as usize] = Colour::Grey;
        while let Some(&(node, label)) = stack.last() {
            let mut advanced = false;
            for a in label..g.out_degree() as u32 {
                let t = g.target_no_checks(node, a);
                if t == UNDEFINED {
                    continue;
                }
                match colour[t as usize] {
                    Colour::Grey => return false,
                    Colour::White => {
                        stack.last_mut().unwrap().1 = a as usize + 1;
                        colour[t as usize] = Colour::Grey;
                        stack.push((t, 0));
                        advanced = true;
                        break;
                    }
                    Colour::Black => {}
                }
            }
            if !advanced {
                let (node, _) = stack.pop().unwrap();
                colour[node as usize] = Colour::Black;
            }
        }
    }
    true
}

/// `true` iff every node reachable from `s` (not passing through a node
/// already fully explored past `t`) eventually reaches `t`, following the
/// directed edge labelled path; specifically, `true` iff `t` is reachable
/// from `s` via zero or more edges. `s == t` is always reachable.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if `s` or `t` is out of range.
pub fn is_reachable(g: &WordGraph, s: u32, t: u32) -> Result<bool> {
    if s as usize >= g.number_of_nodes() {
        return Err(Report::new(error::out_of_bounds(s, g.number_of_nodes() as u64)));
    }
    if t as usize >= g.number_of_nodes() {
        return Err(Report::new(error::out_of_bounds(t, g.number_of_nodes() as u64)));
    }
    if s == t {
        return Ok(true);
    }
    let mut visited = FixedBitSet::with_capacity(g.number_of_nodes());
    let mut queue = VecDeque::new();
    visited.insert(s as usize);
    queue.push_back(s);
    while let Some(node) = queue.pop_front() {
        for (_, next) in g.labels_and_targets(node) {
            if next == t {
                return Ok(true);
            }
            if !visited.contains(next as usize) {
                visited.insert(next as usize);
                queue.push_back(next);
            }
        }
    }
    Ok(false)
}

/// `true` iff, treating every edge as undirected, node 0 reaches every
/// other node.
#[must_use]
pub fn is_connected(g: &WordGraph) -> bool {
    let n = g.number_of_nodes();
    if n == 0 {
        return true;
    }
    // Build a reverse adjacency on the fly since WordGraph only stores
    // forward edges; an undirected BFS needs both directions.
    let mut undirected_adj: Vec<Vec<u32>> = vec![Vec::new(); n];
    for s in 0..n as u32 {
        for (_, t) in g.labels_and_targets(s) {
            undirected_adj[s as usize].push(t);
            undirected_adj[t as usize].push(s);
        }
    }
    let mut visited = FixedBitSet::with_capacity(n);
    let mut queue = VecDeque::new();
    visited.insert(0);
    queue.push_back(0u32);
    let mut count = 1;
    while let Some(node) = queue.pop_front() {
        for &next in &undirected_adj[node as usize] {
            if !visited.contains(next as usize) {
                visited.insert(next as usize);
                count += 1;
                queue.push_back(next);
            }
        }
    }
    count == n
}

/// `true` iff some single node reaches every node of `g`.
#[must_use]
pub fn is_strictly_cyclic(g: &WordGraph) -> bool {
    let n = g.number_of_nodes();
    if n == 0 {
        return true;
    }
    for start in 0..n as u32 {
        let mut visited = FixedBitSet::with_capacity(n);
        let mut queue = VecDeque::new();
        visited.insert(start as usize);
        queue.push_back(start);
        let mut count = 1;
        while let Some(node) = queue.pop_front() {
            for (_, next) in g.labels_and_targets(node) {
                if !visited.contains(next as usize) {
                    visited.insert(next as usize);
                    count += 1;
                    if count == n {
                        return true;
                    }
                    queue.push_back(next);
                }
            }
        }
        if count == n {
            return true;
        }
    }
    false
}

/// Walks from `s` consuming `w` label by label; returns the final node, or
/// [`UNDEFINED`] at the first missing edge.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if `s` is out of range.
pub fn follow_path(g: &WordGraph, s: u32, w: &[u32]) -> Result<u32> {
    if s as usize >= g.number_of_nodes() {
        return Err(Report::new(error::out_of_bounds(s, g.number_of_nodes() as u64)));
    }
    let mut cur = s;
    for &a in w {
        if a as usize >= g.out_degree() {
            return Ok(UNDEFINED);
        }
        let t = g.target_no_checks(cur, a);
        if t == UNDEFINED {
            return Ok(UNDEFINED);
        }
        cur = t;
    }
    Ok(cur)
}

/// If `g` is acyclic, the nodes in reverse-postorder (a topological sort,
/// ties broken by ascending node index); otherwise an empty sequence.
#[must_use]
pub fn topological_sort(g: &WordGraph) -> Vec<u32> {
    let n = g.number_of_nodes();
    if !is_acyclic(g, None) {
        return Vec::new();
    }
    let mut visited = vec![false; n];
    let mut postorder = Vec::with_capacity(n);
    let mut stack: Vec<(u32, usize)> = Vec::new();
    for root in 0..n as u32 {
        if visited[root as usize] {
            continue;
        }
        visited[root as usize] = true;
        stack.push((root, 0));
        while let Some(&(node, label)) = stack.last() {
            let mut advanced = false;
            for a in label..g.out_degree() as u32 {
                let t = g.target_no_checks(node, a);
                if t == UNDEFINED || visited[t as usize] {
                    continue;
                }
                stack.last_mut().unwrap().1 = a as usize + 1;
                visited[t as usize] = true;
                stack.push((t, 0));
                advanced = true;
                break;
            }
            if !advanced {
                let (node, _) = stack.pop().unwrap();
                postorder.push(node);
            }
        }
    }
    postorder.reverse();
    postorder
}

/// Renumbers the nodes of `g` into breadth-first-from-0 order under the
/// natural label ordering; unreachable nodes are appended afterwards in
/// their original relative order.
#[must_use]
pub fn standardize(g: &WordGraph) -> WordGraph {
    let n = g.number_of_nodes();
    let mut new_index = vec![UNDEFINED; n];
    let mut order = Vec::with_capacity(n);
    if n > 0 {
        let mut queue = VecDeque::new();
        new_index[0] = 0;
        order.push(0u32);
        queue.push_back(0u32);
        while let Some(node) = queue.pop_front() {
            for (_, t) in g.labels_and_targets(node) {
                if new_index[t as usize] == UNDEFINED {
                    new_index[t as usize] = order.len() as u32;
                    order.push(t);
                    queue.push_back(t);
                }
            }
        }
        for old in 0..n as u32 {
            if new_index[old as usize] == UNDEFINED {
                new_index[old as usize] = order.len() as u32;
                order.push(old);
            }
        }
    }

    let mut out = WordGraph::new(n, g.out_degree());
    for old_s in 0..n as u32 {
        let new_s = new_index[old_s as usize];
        for (a, old_t) in g.labels_and_targets(old_s) {
            out.set_target_no_checks(new_s, a, new_index[old_t as usize]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_chain(n: usize) -> WordGraph {
        let mut g = WordGraph::new(n, 1);
        for i in 0..n - 1 {
            g.set_target(i as u32, 0, i as u32 + 1).unwrap();
        }
        g
    }

    #[test]
    fn acyclic_chain_is_acyclic() {
        let g = linear_chain(5);
        assert!(is_acyclic(&g, None));
    }

    #[test]
    fn self_loop_is_not_acyclic() {
        let mut g = WordGraph::new(1, 1);
        g.set_target(0, 0, 0).unwrap();
        assert!(!is_acyclic(&g, None));
    }

    #[test]
    fn cycle_is_not_acyclic() {
        let mut g = WordGraph::new(3, 1);
        g.set_target(0, 0, 1).unwrap();
        g.set_target(1, 0, 2).unwrap();
        g.set_target(2, 0, 0).unwrap();
        assert!(!is_acyclic(&g, None));
    }

    #[test]
    fn reachability_basic() {
        let g = linear_chain(4);
        assert!(is_reachable(&g, 0, 3).unwrap());
        assert!(is_reachable(&g, 2, 2).unwrap());
        assert!(!is_reachable(&g, 3, 0).unwrap());
    }

    #[test]
    fn connected_star_is_connected() {
        let mut g = WordGraph::new(4, 1);
        g.set_target(0, 0, 1).unwrap();
        g.set_target(2, 0, 1).unwrap();
        g.set_target(3, 0, 1).unwrap();
        assert!(is_connected(&g));
    }

    #[test]
    fn disconnected_graph_is_not_connected() {
        let g = WordGraph::new(3, 1);
        assert!(!is_connected(&g));
    }

    #[test]
    fn strictly_cyclic_full_cycle() {
        let mut g = WordGraph::new(3, 1);
        g.set_target(0, 0, 1).unwrap();
        g.set_target(1, 0, 2).unwrap();
        g.set_target(2, 0, 0).unwrap();
        assert!(is_strictly_cyclic(&g));
    }

    #[test]
    fn strictly_cyclic_false_for_sink() {
        let mut g = WordGraph::new(2, 1);
        g.set_target(0, 0, 1).unwrap();
        assert!(!is_strictly_cyclic(&g));
    }

    #[test]
    fn follow_path_walks_labels() {
        let g = linear_chain(4);
        assert_eq!(follow_path(&g, 0, &[0, 0, 0]).unwrap(), 3);
        assert_eq!(follow_path(&g, 0, &[0, 0, 0, 0]).unwrap(), UNDEFINED);
    }

    #[test]
    fn topological_sort_orders_edges_forward() {
        let g = linear_chain(5);
        let order = topological_sort(&g);
        assert_eq!(order.len(), 5);
        let position: Vec<usize> = {
            let mut p = vec![0; 5];
            for (i, &v) in order.iter().enumerate() {
                p[v as usize] = i;
            }
            p
        };
        for i in 0..4 {
            assert!(position[i] < position[i + 1]);
        }
    }

    #[test]
    fn topological_sort_empty_when_cyclic() {
        let mut g = WordGraph::new(2, 1);
        g.set_target(0, 0, 1).unwrap();
        g.set_target(1, 0, 0).unwrap();
        assert!(topological_sort(&g).is_empty());
    }

    #[test]
    fn standardize_is_idempotent() {
        let mut g = WordGraph::new(4, 1);
        g.set_target(3, 0, 1).unwrap();
        g.set_target(1, 0, 2).unwrap();
        let once = standardize(&g);
        let twice = standardize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn standardize_is_breadth_first_from_zero() {
        let mut g = WordGraph::new(3, 2);
        g.set_target(0, 0, 2).unwrap();
        g.set_target(0, 1, 1).unwrap();
        let s = standardize(&g);
        // node reached via label 0 from the root should come before the
        // one reached via label 1, since labels are visited in order.
        assert_eq!(s.target(0, 0).unwrap(), 1);
        assert_eq!(s.target(0, 1).unwrap(), 2);
    }
}
