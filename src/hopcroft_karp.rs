//! Join (coarsest common refinement) and meet (product automaton) of two
//! word graphs with a common out-degree, computed via the same
//! union-find-driven merging [`crate::union_find::UnionFind`] provides
//! elsewhere in this crate.

use alloc::{
    collections::{BTreeMap, VecDeque},
    vec::Vec,
};

use error_stack::Report;

use crate::{
    constants::UNDEFINED,
    error::{self, Error, Result},
    union_find::UnionFind,
    word_graph::WordGraph,
};

fn check_roots(x: &WordGraph, xr: u32, y: &WordGraph, yr: u32) -> Result<()> {
    if x.out_degree() != y.out_degree() {
        return Err(Report::new(error::mismatch(
            x.out_degree() as u64,
            y.out_degree() as u64,
        )));
    }
    if xr as usize >= x.number_of_nodes() {
        return Err(Report::new(error::out_of_bounds(
            xr,
            x.number_of_nodes() as u64,
        )));
    }
    if yr as usize >= y.number_of_nodes() {
        return Err(Report::new(error::out_of_bounds(
            yr,
            y.number_of_nodes() as u64,
        )));
    }
    Ok(())
}

/// The coarsest common refinement of the relations accepted by `x` rooted
/// at `xr` and `y` rooted at `yr`: a union-find over `|x| + |y|` nodes,
/// seeded by identifying the two roots, propagated by unifying
/// label-matched targets until no further merge is possible.
///
/// # Errors
/// Returns [`Error::Mismatch`] if the out-degrees differ, or
/// [`Error::OutOfBounds`] if either root is invalid.
pub fn join(x: &WordGraph, xr: u32, y: &WordGraph, yr: u32) -> Result<WordGraph> {
    check_roots(x, xr, y, yr)?;
    let d = x.out_degree();
    let nx = x.number_of_nodes();
    let ny = y.number_of_nodes();
    let mut uf = UnionFind::new(nx + ny);
    uf.union_(xr, yr as u32 + nx as u32)?;

    let mut stack = alloc::vec![(xr, yr)];
    while let Some((p, q)) = stack.pop() {
        for a in 0..d as u32 {
            let tx = x.target_no_checks(p, a);
            let ty = y.target_no_checks(q, a);
            if tx == UNDEFINED || ty == UNDEFINED {
                continue;
            }
            let ty_global = ty + nx as u32;
            if uf.find(tx)? != uf.find(ty_global)? {
                uf.union_(tx, ty_global)?;
                stack.push((tx, ty));
            }
        }
    }

    uf.normalize();
    let mut rep_to_index: BTreeMap<u32, u32> = BTreeMap::new();
    for v in 0..(nx + ny) as u32 {
        let rep = uf.find_no_checks(v);
        let next = rep_to_index.len() as u32;
        rep_to_index.entry(rep).or_insert(next);
    }
    let classes = rep_to_index.len();

    let mut joined = WordGraph::new(classes, d);
    for v in 0..(nx + ny) as u32 {
        let source_index = rep_to_index[&uf.find_no_checks(v)];
        for a in 0..d as u32 {
            let target_global = if (v as usize) < nx {
                let t = x.target_no_checks(v, a);
                (t != UNDEFINED).then_some(t)
            } else {
                let t = y.target_no_checks(v - nx as u32, a);
                (t != UNDEFINED).then_some(t + nx as u32)
            };
            if let Some(t) = target_global {
                let target_index = rep_to_index[&uf.find_no_checks(t)];
                joined.set_target_no_checks(source_index, a, target_index);
            }
        }
    }
    Ok(joined)
}

/// The product automaton of `x` rooted at `xr` and `y` rooted at `yr`:
/// states are pairs `(nodeₓ, nodeᵧ)` reachable from `(xr, yr)`, with a
/// label-`a` transition from `(p, q)` to `(target_x(p, a), target_y(q, a))`
/// only when both targets are defined.
///
/// # Errors
/// Returns [`Error::Mismatch`] if the out-degrees differ, or
/// [`Error::OutOfBounds`] if either root is invalid.
pub fn meet(x: &WordGraph, xr: u32, y: &WordGraph, yr: u32) -> Result<WordGraph> {
    check_roots(x, xr, y, yr)?;
    let d = x.out_degree();
    let mut index_of: BTreeMap<(u32, u32), u32> = BTreeMap::new();
    let mut order: Vec<(u32, u32)> = Vec::new();
    index_of.insert((xr, yr), 0);
    order.push((xr, yr));
    let mut queue = VecDeque::new();
    queue.push_back((xr, yr));
    let mut edges: Vec<(u32, u32, u32)> = Vec::new();

    while let Some((p, q)) = queue.pop_front() {
        let from = index_of[&(p, q)];
        for a in 0..d as u32 {
            let tx = x.target_no_checks(p, a);
            let ty = y.target_no_checks(q, a);
            if tx == UNDEFINED || ty == UNDEFINED {
                continue;
            }
            let next = if let Some(&idx) = index_of.get(&(tx, ty)) {
                idx
            } else {
                let idx = order.len() as u32;
                index_of.insert((tx, ty), idx);
                order.push((tx, ty));
                queue.push_back((tx, ty));
                idx
            };
            edges.push((from, a, next));
        }
    }

    let mut product = WordGraph::new(order.len(), d);
    for (s, a, t) in edges {
        product.set_target_no_checks(s, a, t);
    }
    Ok(product)
}

/// `true` iff the relation accepted by `x` (rooted at `xr`) is a subset of
/// the one accepted by `y` (rooted at `yr`): equivalently, the join has
/// exactly as many classes as `y` has nodes.
///
/// # Errors
/// Returns [`Error::Mismatch`] if the out-degrees differ, or
/// [`Error::OutOfBounds`] if either root is invalid.
pub fn is_subrelation(x: &WordGraph, xr: u32, y: &WordGraph, yr: u32) -> Result<bool> {
    let joined = join(x, xr, y, yr)?;
    Ok(joined.number_of_nodes() == y.number_of_nodes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_acceptor(loop_label: u32, d: usize) -> WordGraph {
        let mut g = WordGraph::new(2, d);
        g.set_target(0, loop_label, 1).unwrap();
        g.set_target(1, loop_label, 1).unwrap();
        g
    }

    #[test]
    fn is_subrelation_is_reflexive() {
        let g = two_state_acceptor(0, 1);
        assert!(is_subrelation(&g, 0, &g, 0).unwrap());
    }

    #[test]
    fn join_of_isomorphic_graphs_has_matching_class_count() {
        let x = two_state_acceptor(0, 1);
        let y = two_state_acceptor(0, 1);
        let joined = join(&x, 0, &y, 0).unwrap();
        assert_eq!(joined.number_of_nodes(), 2);
    }

    #[test]
    fn join_merges_redundant_states() {
        // x has three states collapsing to the same behaviour as y's two.
        let mut x = WordGraph::new(3, 1);
        x.set_target(0, 0, 1).unwrap();
        x.set_target(1, 0, 2).unwrap();
        x.set_target(2, 0, 2).unwrap();
        let y = two_state_acceptor(0, 1);
        let joined = join(&x, 0, &y, 0).unwrap();
        assert_eq!(joined.number_of_nodes(), 2);
        assert!(is_subrelation(&x, 0, &y, 0).unwrap());
    }

    #[test]
    fn meet_builds_product_automaton() {
        let x = two_state_acceptor(0, 1);
        let y = two_state_acceptor(0, 1);
        let product = meet(&x, 0, &y, 0).unwrap();
        assert_eq!(product.number_of_nodes(), 2);
        assert_eq!(product.target(0, 0).unwrap(), 1);
        assert_eq!(product.target(1, 0).unwrap(), 1);
    }

    #[test]
    fn rejects_mismatched_out_degree() {
        let x = WordGraph::new(2, 1);
        let y = WordGraph::new(2, 2);
        assert!(join(&x, 0, &y, 0).is_err());
        assert!(meet(&x, 0, &y, 0).is_err());
    }

    #[test]
    fn rejects_invalid_root() {
        let x = WordGraph::new(2, 1);
        let y = WordGraph::new(2, 1);
        assert!(join(&x, 5, &y, 0).is_err());
    }
}
