//! A forest over `[0, n)`: every node has a parent and the label of the
//! edge leading to it from that parent, or both are [`UNDEFINED`] and the
//! node is a root.
//!
//! Produced by [`crate::gabow::Gabow::spanning_forest`] and consumed by
//! [`crate::cirpons`] to recover the word labelling the path from a root to
//! any node.

use alloc::{vec, vec::Vec};
use core::cell::RefCell;

use error_stack::Report;

use crate::{
    constants::UNDEFINED,
    error::{self, Error, Result},
};

/// A forest over `{0, ..., n-1}` with one parent/label pair per node.
#[derive(Debug, Clone)]
pub struct Forest {
    parent: Vec<u32>,
    label: Vec<u32>,
    // Lazily filled, invalidated on every edit. `UNDEFINED` means "not yet
    // computed for this node since the last edit".
    depth_cache: RefCell<Vec<u32>>,
}

impl Forest {
    /// Creates a forest of `n` roots.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Forest {
            parent: vec![UNDEFINED; n],
            label: vec![UNDEFINED; n],
            depth_cache: RefCell::new(vec![UNDEFINED; n]),
        }
    }

    /// The number of nodes.
    #[must_use]
    pub fn number_of_nodes(&self) -> usize {
        self.parent.len()
    }

    /// Appends `k` new roots.
    pub fn add_nodes(&mut self, k: usize) {
        self.parent.resize(self.parent.len() + k, UNDEFINED);
        self.label.resize(self.label.len() + k, UNDEFINED);
        self.depth_cache.get_mut().resize(self.parent.len(), UNDEFINED);
    }

    fn check_node(&self, v: u32) -> Result<()> {
        if (v as usize) < self.parent.len() {
            Ok(())
        } else {
            Err(Report::new(error::out_of_bounds(v, self.parent.len() as u64)))
        }
    }

    /// The parent of `v`, or [`UNDEFINED`] if `v` is a root.
    #[must_use]
    pub fn parent(&self, v: u32) -> u32 {
        self.parent[v as usize]
    }

    /// The label of the edge from `parent(v)` to `v`, or [`UNDEFINED`] if
    /// `v` is a root.
    #[must_use]
    pub fn label(&self, v: u32) -> u32 {
        self.label[v as usize]
    }

    fn would_close_cycle(&self, v: u32, p: u32) -> bool {
        let mut cur = p;
        loop {
            if cur == v {
                return true;
            }
            let next = self.parent[cur as usize];
            if next == UNDEFINED {
                return false;
            }
            cur = next;
        }
    }

    /// Defines the parent and inbound edge label of `v`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `v` or `p` is out of range,
    /// [`Error::InvalidArgument`] if `v == p`, and [`Error::NotAcyclic`] if
    /// the assignment would close a cycle.
    pub fn set_parent_and_label(&mut self, v: u32, p: u32, g: u32) -> Result<()> {
        self.check_node(v)?;
        self.check_node(p)?;
        if v == p {
            return Err(Report::new(Error::InvalidArgument {
                message: "a node cannot be its own parent",
            }));
        }
        if self.would_close_cycle(v, p) {
            return Err(Report::new(Error::NotAcyclic));
        }
        self.set_parent_and_label_no_checks(v, p, g);
        Ok(())
    }

    /// As [`Forest::set_parent_and_label`] but without bounds or cycle
    /// checks; the caller takes on that obligation.
    pub fn set_parent_and_label_no_checks(&mut self, v: u32, p: u32, g: u32) {
        self.parent[v as usize] = p;
        self.label[v as usize] = g;
        self.depth_cache.get_mut().iter_mut().for_each(|d| *d = UNDEFINED);
    }

    /// The sequence of edge labels from `v` up to its root, root-to-`v`
    /// order reversed (i.e. the word read going *up* the tree).
    #[must_use]
    pub fn path_to_root(&self, v: u32) -> Vec<u32> {
        let mut word = Vec::new();
        let mut cur = v;
        while self.parent[cur as usize] != UNDEFINED {
            word.push(self.label[cur as usize]);
            cur = self.parent[cur as usize];
        }
        word
    }

    /// The sequence of edge labels read from the root down to `v`: the
    /// word labelling the unique path from the root of `v`'s tree to `v`.
    #[must_use]
    pub fn path_from_root(&self, v: u32) -> Vec<u32> {
        let mut word = self.path_to_root(v);
        word.reverse();
        word
    }

    /// The depth of `v`, i.e. the length of [`Forest::path_to_root`]`(v)`.
    /// Cached per node until the next edit.
    #[must_use]
    pub fn depth(&self, v: u32) -> u32 {
        if let Some(cached) = self.depth_cache.borrow().get(v as usize).copied() {
            if cached != UNDEFINED {
                return cached;
            }
        }
        let mut cur = v;
        let mut d = 0u32;
        // Walk up, stopping early if we hit a node whose depth is already
        // cached (shares a prefix with a previously visited path).
        let mut chain = Vec::new();
        loop {
            if let Some(cached) = self.depth_cache.borrow().get(cur as usize).copied() {
                if cached != UNDEFINED {
                    // `cur` itself is not pushed into `chain` below, so the
                    // first node we do push (its child on the walked path)
                    // is one level deeper than `cur`, not at `cur`'s depth.
                    d = cached + 1;
                    break;
                }
            }
            chain.push(cur);
            let p = self.parent[cur as usize];
            if p == UNDEFINED {
                break;
            }
            cur = p;
        }
        for node in chain.into_iter().rev() {
            self.depth_cache.borrow_mut()[node as usize] = d;
            d += 1;
        }
        self.depth_cache.borrow()[v as usize]
    }

    /// `true` iff no walk via `parent` from any node forms a cycle. Since
    /// edits are cycle-checked, this only detects corruption introduced via
    /// `*_no_checks` entry points.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        let n = self.parent.len();
        let mut state = vec![0u8; n]; // 0 = unvisited, 1 = in progress, 2 = done
        for start in 0..n as u32 {
            if state[start as usize] != 0 {
                continue;
            }
            let mut cur = start;
            let mut path = Vec::new();
            loop {
                match state[cur as usize] {
                    1 => return false,
                    2 => break,
                    _ => {
                        state[cur as usize] = 1;
                        path.push(cur);
                    }
                }
                let p = self.parent[cur as usize];
                if p == UNDEFINED {
                    break;
                }
                cur = p;
            }
            for node in path {
                state[node as usize] = 2;
            }
        }
        true
    }
}

/// Iterates over [`Forest::path_to_root`] for every node, exploiting shared
/// prefixes between consecutively-visited nodes: after the first call, each
/// subsequent call only walks from the lowest common ancestor of the
/// previous target and the next one, rather than from scratch.
pub struct PathsToRoots<'a> {
    forest: &'a Forest,
    next: u32,
    last_chain: Vec<u32>,
}

impl<'a> PathsToRoots<'a> {
    #[must_use]
    pub fn new(forest: &'a Forest) -> Self {
        PathsToRoots {
            forest,
            next: 0,
            last_chain: Vec::new(),
        }
    }
}

impl<'a> Iterator for PathsToRoots<'a> {
    type Item = (u32, Vec<u32>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next as usize >= self.forest.number_of_nodes() {
            return None;
        }
        let v = self.next;
        self.next += 1;

        // Find how much of the new chain (v up to root) is already a
        // suffix of `last_chain`; reuse that shared suffix's labels.
        let mut chain = Vec::new();
        let mut cur = v;
        let shared = loop {
            if let Some(pos) = self.last_chain.iter().position(|&n| n == cur) {
                break pos;
            }
            chain.push(cur);
            let p = self.forest.parent(cur);
            if p == UNDEFINED {
                break self.last_chain.len();
            }
            cur = p;
        };
        let mut word: Vec<u32> = chain.iter().map(|&n| self.forest.label(n)).collect();
        if shared < self.last_chain.len() {
            word.extend(self.last_chain[shared..].iter().map(|&n| self.forest.label(n)));
        }
        chain.extend_from_slice(&self.last_chain[shared.min(self.last_chain.len())..]);
        self.last_chain = chain;
        Some((v, word))
    }
}

/// As [`PathsToRoots`] but yields the word read from the root down to each
/// node.
pub struct PathsFromRoots<'a> {
    inner: PathsToRoots<'a>,
}

impl<'a> PathsFromRoots<'a> {
    #[must_use]
    pub fn new(forest: &'a Forest) -> Self {
        PathsFromRoots {
            inner: PathsToRoots::new(forest),
        }
    }
}

impl<'a> Iterator for PathsFromRoots<'a> {
    type Item = (u32, Vec<u32>);

    fn next(&mut self) -> Option<Self::Item> {
        let (v, mut word) = self.inner.next()?;
        word.reverse();
        Some((v, word))
    }
}
