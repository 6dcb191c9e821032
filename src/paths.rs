//! Lazy path enumerators over a [`WordGraph`] (lex and short-lex order,
//! with and without a fixed endpoint), plus a closed-form path counter.
//!
//! The lex enumerator ([`PiloIter`]) is an explicit DFS stack of
//! `(node, next label)` frames rather than recursion, and the short-lex
//! enumerator ([`PisloIter`]) a FIFO wavefront — both following the
//! `Iterator`-over-an-explicit-frame-stack idiom the teacher uses for its
//! own lazy path enumeration (`simple_paths::all_simple_paths`).

use alloc::{
    collections::{BTreeMap, VecDeque},
    vec::Vec,
};

use error_stack::Report;

use crate::{
    constants::{POSITIVE_INFINITY, UNDEFINED},
    error::{self, Error, Result},
    word_graph::WordGraph,
};

fn check_node(g: &WordGraph, v: u32) -> Result<()> {
    if (v as usize) < g.number_of_nodes() {
        Ok(())
    } else {
        Err(Report::new(error::out_of_bounds(v, g.number_of_nodes() as u64)))
    }
}

/// Lex-order enumeration of every path from a source node ("pilo").
pub struct PiloIter<'a> {
    g: &'a WordGraph,
    min: u64,
    max: u64,
    // (node, next out-label to try)
    stack: Vec<(u32, u32)>,
    word: Vec<u32>,
    emitted_root: bool,
}

impl<'a> PiloIter<'a> {
    fn new(g: &'a WordGraph, source: u32, min: u64, max: u64) -> Self {
        PiloIter {
            g,
            min,
            max,
            stack: alloc::vec![(source, 0)],
            word: Vec::new(),
            emitted_root: false,
        }
    }
}

impl<'a> Iterator for PiloIter<'a> {
    type Item = (Vec<u32>, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.emitted_root {
            self.emitted_root = true;
            if self.min == 0 && self.max > 0 {
                return Some((Vec::new(), self.stack[0].0));
            }
        }
        loop {
            if self.stack.is_empty() {
                return None;
            }
            let depth = self.word.len() as u64;
            if depth + 1 >= self.max {
                self.stack.pop();
                if !self.word.is_empty() {
                    self.word.pop();
                }
                continue;
            }
            let (node, label) = *self.stack.last().unwrap();
            let (b, t) = self.g.next_label_and_target(node, label);
            if b == UNDEFINED {
                self.stack.pop();
                if !self.word.is_empty() {
                    self.word.pop();
                }
                continue;
            }
            self.stack.last_mut().unwrap().1 = b + 1;
            self.word.push(b);
            self.stack.push((t, 0));
            if (self.word.len() as u64) >= self.min {
                return Some((self.word.clone(), t));
            }
        }
    }
}

/// Lex-order enumeration of paths from `source`, bounded in length by
/// `[min, max)`.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if `source` is out of range.
pub fn pilo(g: &WordGraph, source: u32, min: u64, max: u64) -> Result<PiloIter<'_>> {
    check_node(g, source)?;
    Ok(PiloIter::new(g, source, min, max))
}

/// Short-lex (length, then lex) enumeration of every path from a source
/// node ("pislo"): a FIFO wavefront of `(word, node)` pairs, expanded by
/// every defined outgoing edge in ascending label order.
pub struct PisloIter<'a> {
    g: &'a WordGraph,
    min: u64,
    max: u64,
    queue: VecDeque<(Vec<u32>, u32)>,
}

impl<'a> PisloIter<'a> {
    fn new(g: &'a WordGraph, source: u32, min: u64, max: u64) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back((Vec::new(), source));
        PisloIter { g, min, max, queue }
    }
}

impl<'a> Iterator for PisloIter<'a> {
    type Item = (Vec<u32>, u32);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (word, node) = self.queue.pop_front()?;
            let len = word.len() as u64;
            if len >= self.max {
                continue;
            }
            if len + 1 < self.max {
                for (a, t) in self.g.labels_and_targets(node) {
                    let mut w = word.clone();
                    w.push(a);
                    self.queue.push_back((w, t));
                }
            }
            if len >= self.min {
                return Some((word, node));
            }
        }
    }
}

/// Short-lex enumeration of paths from `source`, bounded in length by
/// `[min, max)`.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if `source` is out of range.
pub fn pislo(g: &WordGraph, source: u32, min: u64, max: u64) -> Result<PisloIter<'_>> {
    check_node(g, source)?;
    Ok(PisloIter::new(g, source, min, max))
}

/// Lex-order enumeration of paths from `source` to a fixed `target`
/// ("pstilo"): [`pilo`] filtered to the matching endpoint.
pub struct PstiloIter<'a> {
    inner: PiloIter<'a>,
    target: u32,
}

impl<'a> Iterator for PstiloIter<'a> {
    type Item = (Vec<u32>, u32);

    fn next(&mut self) -> Option<Self::Item> {
        for (word, t) in self.inner.by_ref() {
            if t == self.target {
                return Some((word, t));
            }
        }
        None
    }
}

/// # Errors
/// Returns [`Error::OutOfBounds`] if `source` or `target` is out of range.
pub fn pstilo(g: &WordGraph, source: u32, target: u32, min: u64, max: u64) -> Result<PstiloIter<'_>> {
    check_node(g, target)?;
    Ok(PstiloIter {
        inner: pilo(g, source, min, max)?,
        target,
    })
}

/// Short-lex enumeration of paths from `source` to a fixed `target`
/// ("pstislo"): [`pislo`] filtered to the matching endpoint.
pub struct PstisloIter<'a> {
    inner: PisloIter<'a>,
    target: u32,
}

impl<'a> Iterator for PstisloIter<'a> {
    type Item = (Vec<u32>, u32);

    fn next(&mut self) -> Option<Self::Item> {
        for (word, t) in self.inner.by_ref() {
            if t == self.target {
                return Some((word, t));
            }
        }
        None
    }
}

/// # Errors
/// Returns [`Error::OutOfBounds`] if `source` or `target` is out of range.
pub fn pstislo(g: &WordGraph, source: u32, target: u32, min: u64, max: u64) -> Result<PstisloIter<'_>> {
    check_node(g, target)?;
    Ok(PstisloIter {
        inner: pislo(g, source, min, max)?,
        target,
    })
}

/// Strategy for [`number_of_paths`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathsAlgorithm {
    /// Sum powers of the adjacency matrix.
    Matrix,
    /// Memoised depth-first count of paths of each exact length.
    Dfs,
    /// [`PathsAlgorithm::Matrix`] when `hi - lo` is large relative to the
    /// number of nodes, else [`PathsAlgorithm::Dfs`].
    Automatic,
}

/// Counts the paths from `s` (to `t`, if given, else to any node) of
/// length in `[lo, hi)`, without enumerating them.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if `s` or `t` is out of range, or
/// [`Error::InvalidArgument`] if `hi` is [`POSITIVE_INFINITY`] or
/// `lo > hi`.
pub fn number_of_paths(
    g: &WordGraph,
    s: u32,
    t: Option<u32>,
    lo: u64,
    hi: u64,
    algorithm: PathsAlgorithm,
) -> Result<u64> {
    check_node(g, s)?;
    if let Some(t) = t {
        check_node(g, t)?;
    }
    if hi == POSITIVE_INFINITY {
        return Err(Report::new(Error::InvalidArgument {
            message: "number_of_paths requires a finite upper bound",
        }));
    }
    if lo > hi {
        return Err(Report::new(Error::InvalidArgument {
            message: "number_of_paths requires lo <= hi",
        }));
    }

    let chosen = match algorithm {
        PathsAlgorithm::Automatic => {
            if (hi - lo) as usize > g.number_of_nodes() {
                PathsAlgorithm::Matrix
            } else {
                PathsAlgorithm::Dfs
            }
        }
        other => other,
    };

    Ok(match chosen {
        PathsAlgorithm::Matrix => count_paths_matrix(g, s, t, lo, hi),
        PathsAlgorithm::Dfs => count_paths_dfs(g, s, t, lo, hi),
        PathsAlgorithm::Automatic => unreachable!("resolved above"),
    })
}

fn count_paths_matrix(g: &WordGraph, s: u32, t: Option<u32>, lo: u64, hi: u64) -> u64 {
    let n = g.number_of_nodes();
    let mut adjacency = alloc::vec![alloc::vec![0u64; n]; n];
    for src in 0..n as u32 {
        for (_, tgt) in g.labels_and_targets(src) {
            adjacency[src as usize][tgt as usize] += 1;
        }
    }

    let mut current: Vec<Vec<u64>> = (0..n)
        .map(|i| {
            let mut row = alloc::vec![0u64; n];
            row[i] = 1;
            row
        })
        .collect();

    let mut total = 0u64;
    for k in 0..hi {
        if k >= lo {
            let row = &current[s as usize];
            let contribution = match t {
                Some(t) => row[t as usize],
                None => row.iter().copied().fold(0u64, |acc, x| acc.saturating_add(x)),
            };
            total = total.saturating_add(contribution);
        }
        current = multiply(&current, &adjacency);
    }
    total
}

fn multiply(a: &[Vec<u64>], b: &[Vec<u64>]) -> Vec<Vec<u64>> {
    let n = a.len();
    let mut out = alloc::vec![alloc::vec![0u64; n]; n];
    for i in 0..n {
        for (k, a_ik) in a[i].iter().enumerate() {
            if *a_ik == 0 {
                continue;
            }
            for j in 0..n {
                out[i][j] = out[i][j].saturating_add(a_ik.saturating_mul(b[k][j]));
            }
        }
    }
    out
}

fn count_paths_dfs(g: &WordGraph, s: u32, t: Option<u32>, lo: u64, hi: u64) -> u64 {
    let mut memo: BTreeMap<(u32, u64), u64> = BTreeMap::new();
    let mut total = 0u64;
    for len in lo..hi {
        total = total.saturating_add(count_from(g, s, len, t, &mut memo));
    }
    total
}

fn count_from(
    g: &WordGraph,
    v: u32,
    remaining: u64,
    t: Option<u32>,
    memo: &mut BTreeMap<(u32, u64), u64>,
) -> u64 {
    if remaining == 0 {
        return match t {
            Some(t) => u64::from(v == t),
            None => 1,
        };
    }
    if let Some(&cached) = memo.get(&(v, remaining)) {
        return cached;
    }
    let mut total = 0u64;
    for (_, w) in g.labels_and_targets(v) {
        total = total.saturating_add(count_from(g, w, remaining - 1, t, memo));
    }
    memo.insert((v, remaining), total);
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> WordGraph {
        // 0 -a-> 1 -a-> 2 -a-> 0, plus 0 -b-> 2
        let mut g = WordGraph::new(3, 2);
        g.set_target(0, 0, 1).unwrap();
        g.set_target(1, 0, 2).unwrap();
        g.set_target(2, 0, 0).unwrap();
        g.set_target(0, 1, 2).unwrap();
        g
    }

    #[test]
    fn pilo_includes_empty_word_when_min_is_zero() {
        let g = triangle();
        let first = pilo(&g, 0, 0, 2).unwrap().next().unwrap();
        assert_eq!(first, (Vec::new(), 0));
    }

    #[test]
    fn pilo_respects_length_bounds() {
        let g = triangle();
        let words: Vec<_> = pilo(&g, 0, 1, 2).unwrap().collect();
        assert!(words.iter().all(|(w, _)| w.len() == 1));
        assert_eq!(words.len(), 2); // labels 0 and 1 from node 0
    }

    #[test]
    fn pislo_orders_by_length_then_lex() {
        let g = triangle();
        let words: Vec<_> = pislo(&g, 0, 0, 3).unwrap().map(|(w, _)| w).collect();
        let lengths: Vec<usize> = words.iter().map(Vec::len).collect();
        assert!(lengths.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn pstilo_only_yields_matching_endpoint() {
        let g = triangle();
        let words: Vec<_> = pstilo(&g, 0, 2, 0, 3).unwrap().collect();
        assert!(words.iter().all(|(_, t)| *t == 2));
        assert!(!words.is_empty());
    }

    #[test]
    fn pstislo_only_yields_matching_endpoint() {
        let g = triangle();
        let words: Vec<_> = pstislo(&g, 0, 2, 0, 3).unwrap().collect();
        assert!(words.iter().all(|(_, t)| *t == 2));
        assert!(!words.is_empty());
    }

    #[test]
    fn number_of_paths_matches_manual_enumeration_count() {
        let g = triangle();
        let enumerated = pilo(&g, 0, 0, 3).unwrap().count() as u64;
        let counted = number_of_paths(&g, 0, None, 0, 3, PathsAlgorithm::Dfs).unwrap();
        assert_eq!(enumerated, counted);
        let counted_matrix = number_of_paths(&g, 0, None, 0, 3, PathsAlgorithm::Matrix).unwrap();
        assert_eq!(counted, counted_matrix);
    }

    #[test]
    fn number_of_paths_to_fixed_target_matches_filtered_enumeration() {
        let g = triangle();
        let enumerated = pstilo(&g, 0, 2, 0, 3).unwrap().count() as u64;
        let counted = number_of_paths(&g, 0, Some(2), 0, 3, PathsAlgorithm::Automatic).unwrap();
        assert_eq!(enumerated, counted);
    }

    #[test]
    fn number_of_paths_rejects_infinite_upper_bound() {
        let g = triangle();
        assert!(number_of_paths(&g, 0, None, 0, POSITIVE_INFINITY, PathsAlgorithm::Dfs).is_err());
    }
}
