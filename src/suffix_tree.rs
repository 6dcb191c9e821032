//! A generalised (multi-word) suffix tree, built incrementally with
//! Ukkonen's algorithm, exposing the piece-decomposition queries relation
//! words are tested against elsewhere in this crate.
//!
//! The tree-building core (`go`, `split`, `get_link`, `tree_extend`) is a
//! direct port of the same routines in
//! `examples/original_source/src/suffix-tree.cpp`, themselves adapted from
//! <https://cp-algorithms.com/string/suffix-tree-ukkonen.html>. Each inserted
//! word is terminated with its own unique sentinel letter so that distinct
//! words never get confused for one another's suffixes, matching the
//! `_next_unique_letter` scheme of the original.

use alloc::{collections::BTreeMap, vec, vec::Vec};

use error_stack::Report;

use crate::{
    constants::{is_undefined, POSITIVE_INFINITY, UNDEFINED},
    error::{Error, Result},
};

/// The top `2^20` values of `u32` are reserved for per-word terminator
/// letters; real letters must stay below this.
const RESERVED_LETTERS: u32 = 1 << 20;

const fn unique_letter(word_index: usize) -> u32 {
    u32::MAX - word_index as u32
}

fn is_real_letter(x: u32) -> bool {
    x < u32::MAX - RESERVED_LETTERS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct State {
    v: u32,
    pos: usize,
}

impl State {
    fn valid(self) -> bool {
        !is_undefined(self.v)
    }
}

#[derive(Debug, Clone)]
struct Node {
    l: usize,
    r: usize,
    parent: u32,
    link: u32,
    children: BTreeMap<u32, u32>,
    is_real_suffix: bool,
}

impl Node {
    fn new(l: usize, r: usize, parent: u32) -> Self {
        Node {
            l,
            r,
            parent,
            link: UNDEFINED,
            children: BTreeMap::new(),
            is_real_suffix: false,
        }
    }

    fn length(&self) -> usize {
        self.r - self.l
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn child(&self, c: u32) -> u32 {
        self.children.get(&c).copied().unwrap_or(UNDEFINED)
    }
}

/// A generalised suffix tree over words of `u32` letters.
///
/// Every word given to [`SuffixTree::add_word`] is stored alongside all of
/// its suffixes, compressed into a single tree whose edges are labelled by
/// ranges `[l, r)` into a flat internal buffer. Distinct words are kept
/// apart by a unique terminator letter appended to each (never a valid
/// letter a caller can supply).
#[derive(Debug, Clone)]
pub struct SuffixTree {
    map: BTreeMap<Vec<u32>, usize>,
    multiplicity: Vec<u64>,
    max_word_length: usize,
    nodes: Vec<Node>,
    ptr: State,
    word_begin: Vec<usize>,
    word_index_lookup: Vec<usize>,
    word: Vec<u32>,
}

impl Default for SuffixTree {
    fn default() -> Self {
        SuffixTree {
            map: BTreeMap::new(),
            multiplicity: Vec::new(),
            max_word_length: 0,
            nodes: vec![Node::new(0, 0, UNDEFINED)],
            ptr: State { v: 0, pos: 0 },
            word_begin: alloc::vec![0],
            word_index_lookup: Vec::new(),
            word: Vec::new(),
        }
    }
}

impl SuffixTree {
    /// Creates an empty suffix tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of words inserted so far (duplicates counted once).
    #[must_use]
    pub fn number_of_words(&self) -> usize {
        self.word_begin.len() - 1
    }

    /// The number of nodes (internal and leaf) in the tree, including the
    /// root.
    #[must_use]
    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The length of the longest word inserted so far.
    #[must_use]
    pub fn max_word_length(&self) -> usize {
        self.max_word_length
    }

    fn validate_word(&self, w: &[u32]) -> Result<()> {
        if let Some(&bad) = w.iter().find(|&&x| !is_real_letter(x)) {
            return Err(Report::new(Error::InvalidArgument {
                message: "word contains a letter reserved for suffix-tree terminators",
            })
            .attach_printable(alloc::format!("letter {bad} is out of the real-letter range")));
        }
        Ok(())
    }

    /// Inserts `w` (and every suffix of `w`) into the tree. A second
    /// insertion of a word already present only increments its recorded
    /// multiplicity. The empty word is a no-op.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `w` contains a letter in the
    /// reserved terminator range.
    pub fn add_word(&mut self, w: &[u32]) -> Result<()> {
        if w.is_empty() {
            return Ok(());
        }
        if let Some(&index) = self.map.get(w) {
            self.multiplicity[index] += 1;
            return Ok(());
        }
        self.validate_word(w)?;

        let word_index = self.number_of_words();
        self.map.insert(w.to_vec(), word_index);
        self.multiplicity.push(1);
        self.max_word_length = self.max_word_length.max(w.len());

        let old_length = self.word.len();
        let old_nr_nodes = self.nodes.len();

        self.word.extend_from_slice(w);
        self.word.push(unique_letter(word_index));
        self.word_begin.push(self.word.len());
        self.word_index_lookup.resize(self.word.len(), word_index);

        for pos in old_length..self.word.len() {
            self.tree_extend(pos);
        }

        for i in old_nr_nodes..self.nodes.len() {
            if self.nodes[i]
                .children
                .keys()
                .any(|&c| !is_real_letter(c))
            {
                self.nodes[i].is_real_suffix = true;
            }
        }

        log::trace!(
            "suffix_tree: inserted word #{word_index} of length {}, now {} nodes",
            w.len(),
            self.nodes.len()
        );
        Ok(())
    }

    /// The number of distinct non-empty subwords (factors) across every
    /// inserted word, plus one for the empty word.
    #[must_use]
    pub fn number_of_subwords(&self) -> usize {
        let total: usize = self.nodes.iter().map(Node::length).sum();
        total - self.word.len() + 1
    }

    fn word_index(&self, w: &[u32]) -> Result<usize> {
        self.map
            .get(w)
            .copied()
            .ok_or_else(|| Report::new(Error::NotFound))
    }

    /// Follows the path labelled by `w` from the root, returning the state
    /// `(node, offset-into-node's-edge)` reached, or `None` if `w` is not a
    /// subword of anything inserted so far.
    fn traverse(&self, w: &[u32]) -> Option<State> {
        let mut st = State { v: 0, pos: 0 };
        let mut i = 0;
        while i < w.len() {
            if st.pos == self.nodes[st.v as usize].length() {
                let nv = self.nodes[st.v as usize].child(w[i]);
                if is_undefined(nv) {
                    return None;
                }
                st = State { v: nv, pos: 0 };
            }
            let node = &self.nodes[st.v as usize];
            if self.word[node.l + st.pos] != w[i] {
                return None;
            }
            st.pos += 1;
            i += 1;
        }
        Some(st)
    }

    /// `true` iff `w` occurs as a (possibly empty) contiguous factor of some
    /// word inserted so far.
    #[must_use]
    pub fn is_subword(&self, w: &[u32]) -> bool {
        w.is_empty() || self.traverse(w).is_some()
    }

    /// `true` iff `w` occurs as a suffix of some word inserted so far.
    #[must_use]
    pub fn is_suffix(&self, w: &[u32]) -> bool {
        if w.is_empty() {
            return self.number_of_words() > 0;
        }
        let Some(st) = self.traverse(w) else {
            return false;
        };
        let node = &self.nodes[st.v as usize];
        if st.pos == node.length() {
            node.is_real_suffix
        } else {
            node.is_leaf() && st.pos == node.length() - 1
        }
    }

    fn distance_from_root(&self, mut i: u32) -> usize {
        let mut result = 0;
        while !is_undefined(self.nodes[i as usize].parent) {
            result += self.nodes[i as usize].length();
            i = self.nodes[i as usize].parent;
        }
        result
    }

    fn maximal_piece_prefix_range(&self, mut l: usize, r: usize) -> usize {
        let mut m: u32 = 0;
        while l < r {
            m = self.nodes[m as usize].child(self.word[l]);
            debug_assert!(!is_undefined(m));
            l += self.nodes[m as usize].length();
        }
        self.distance_from_root(self.nodes[m as usize].parent)
    }

    /// The length of the longest prefix of `w` that also occurs elsewhere
    /// among the words inserted so far (a "piece", in small-overlap
    /// terminology).
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if `w` was never inserted via
    /// [`SuffixTree::add_word`].
    pub fn maximal_piece_prefix(&self, w: &[u32]) -> Result<usize> {
        let j = self.word_index(w)?;
        Ok(self.maximal_piece_prefix_range(self.word_begin[j], self.word_begin[j + 1]))
    }

    fn maximal_piece_suffix_of_index(&self, j: usize) -> usize {
        let target = unique_letter(j);
        let mut result = 0;
        for (n, node) in self.nodes.iter().enumerate() {
            if !is_undefined(node.child(target)) {
                result = result.max(self.distance_from_root(n as u32));
            }
        }
        result
    }

    /// The length of the longest suffix of `w` that also occurs elsewhere
    /// among the words inserted so far.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if `w` was never inserted via
    /// [`SuffixTree::add_word`].
    pub fn maximal_piece_suffix(&self, w: &[u32]) -> Result<usize> {
        let j = self.word_index(w)?;
        Ok(self.maximal_piece_suffix_of_index(j))
    }

    /// The minimum number of maximal pieces `w` decomposes into, or
    /// [`POSITIVE_INFINITY`] if `w` cannot be tiled by pieces at all.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if `w` was never inserted via
    /// [`SuffixTree::add_word`].
    pub fn number_of_pieces(&self, w: &[u32]) -> Result<u64> {
        let j = self.word_index(w)?;
        let (mut l, r) = (self.word_begin[j], self.word_begin[j + 1]);
        let mut result: u64 = 0;
        let mut n = 1;
        while l < r - 1 && n != 0 {
            n = self.maximal_piece_prefix_range(l, r);
            l += n;
            result += 1;
        }
        Ok(if l == r - 1 { result } else { POSITIVE_INFINITY })
    }

    // -- Ukkonen construction, ported from suffix-tree.cpp --------------

    fn go(&self, st: &mut State, mut l: usize, r: usize) {
        while l < r {
            if st.pos == self.nodes[st.v as usize].length() {
                let nv = self.nodes[st.v as usize].child(self.word[l]);
                *st = State { v: nv, pos: 0 };
                if is_undefined(st.v) {
                    return;
                }
            } else {
                let node = &self.nodes[st.v as usize];
                if self.word[node.l + st.pos] != self.word[l] {
                    st.v = UNDEFINED;
                    st.pos = 0;
                    return;
                }
                let remaining = node.length() - st.pos;
                if r - l < remaining {
                    st.pos += r - l;
                    return;
                }
                l += remaining;
                st.pos = node.length();
            }
        }
    }

    fn go2(&self, st: State, l: usize, r: usize) -> State {
        let mut s = st;
        self.go(&mut s, l, r);
        s
    }

    fn split(&mut self, st: State) -> u32 {
        let node_len = self.nodes[st.v as usize].length();
        if st.pos == node_len {
            return st.v;
        }
        if st.pos == 0 {
            return self.nodes[st.v as usize].parent;
        }
        let id = self.nodes.len() as u32;
        let (l, r, parent) = {
            let n = &self.nodes[st.v as usize];
            (n.l, n.r, n.parent)
        };
        self.nodes.push(Node::new(l, l + st.pos, parent));
        let first_char = self.word[l];
        self.nodes[parent as usize].children.insert(first_char, id);
        let split_char = self.word[l + st.pos];
        self.nodes[id as usize].children.insert(split_char, st.v);
        self.nodes[st.v as usize].parent = id;
        self.nodes[st.v as usize].l += st.pos;
        let _ = r;
        id
    }

    fn get_link(&mut self, v: u32) -> u32 {
        if !is_undefined(self.nodes[v as usize].link) {
            return self.nodes[v as usize].link;
        }
        let parent = self.nodes[v as usize].parent;
        if is_undefined(parent) {
            return 0;
        }
        let to = self.get_link(parent);
        let (nl, nr) = (self.nodes[v as usize].l, self.nodes[v as usize].r);
        let l = if parent == 0 { nl + 1 } else { nl };
        let mut st = State {
            v: to,
            pos: self.nodes[to as usize].length(),
        };
        self.go(&mut st, l, nr);
        let link = self.split(st);
        self.nodes[v as usize].link = link;
        link
    }

    fn tree_extend(&mut self, pos: usize) {
        loop {
            let nptr = self.go2(self.ptr, pos, pos + 1);
            if !is_undefined(nptr.v) {
                self.ptr = nptr;
                return;
            }

            let mid = self.split(self.ptr);
            let leaf = self.nodes.len() as u32;
            self.nodes.push(Node::new(pos, self.word.len(), mid));
            let c = self.word[pos];
            self.nodes[mid as usize].children.insert(c, leaf);

            self.ptr.v = self.get_link(mid);
            self.ptr.pos = self.nodes[self.ptr.v as usize].length();
            if mid == 0 {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_word_and_is_subword() {
        let mut t = SuffixTree::new();
        t.add_word(&[0, 1, 0, 1]).unwrap(); // "abab"
        assert!(t.is_subword(&[0, 1]));
        assert!(t.is_subword(&[1, 0]));
        assert!(t.is_subword(&[]));
        assert!(!t.is_subword(&[0, 0]));
    }

    #[test]
    fn is_suffix_recognises_true_suffixes() {
        let mut t = SuffixTree::new();
        t.add_word(&[0, 1, 0, 1]).unwrap(); // "abab"
        assert!(t.is_suffix(&[0, 1]));
        assert!(t.is_suffix(&[1]));
        assert!(t.is_suffix(&[0, 1, 0, 1]));
        assert!(!t.is_suffix(&[0, 0]));
        assert!(!t.is_suffix(&[0]));
    }

    #[test]
    fn duplicate_word_increments_multiplicity_not_node_count() {
        let mut t = SuffixTree::new();
        t.add_word(&[0, 1]).unwrap();
        let n = t.number_of_nodes();
        t.add_word(&[0, 1]).unwrap();
        assert_eq!(t.number_of_nodes(), n);
        assert_eq!(t.number_of_words(), 1);
    }

    #[test]
    fn rejects_reserved_letters() {
        let mut t = SuffixTree::new();
        assert!(t.add_word(&[u32::MAX]).is_err());
    }

    #[test]
    fn scenario_abab_baba_piece_decomposition() {
        // Matches the documented scenario: inserting "abab" then "baba",
        // "abab" splits into exactly two maximal pieces of lengths 3 and 1.
        let mut t = SuffixTree::new();
        let abab = [0u32, 1, 0, 1];
        let baba = [1u32, 0, 1, 0];
        t.add_word(&abab).unwrap();
        t.add_word(&baba).unwrap();

        assert_eq!(t.maximal_piece_prefix(&abab).unwrap(), 3);
        assert_eq!(t.number_of_pieces(&abab).unwrap(), 2);
    }

    #[test]
    fn unknown_word_queries_are_not_found() {
        let t = SuffixTree::new();
        assert!(t.maximal_piece_prefix(&[0, 1]).is_err());
        assert!(t.number_of_pieces(&[0, 1]).is_err());
    }

    #[test]
    fn number_of_subwords_counts_distinct_factors() {
        let mut t = SuffixTree::new();
        // "ab" has subwords: "", "a", "b", "ab" => 4.
        t.add_word(&[0, 1]).unwrap();
        assert_eq!(t.number_of_subwords(), 4);
    }
}
