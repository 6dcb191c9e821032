//! Inverse presentations: the input to the Stephen procedure and, through
//! it, to [`crate::cirpons`] and [`crate::cutting`].
//!
//! There is no upstream C++ source for this module in the retrieved
//! reference material (unlike [`crate::pbr`] or [`crate::suffix_tree`]) so
//! it is built directly from the external-interface description: an
//! alphabet, an involution pairing each letter with its inverse, a set of
//! rewrite rules, and a flag admitting the empty word.

use alloc::vec::Vec;

use error_stack::Report;

use crate::error::{Error, Result};

/// A word over an [`InversePresentation`]'s alphabet.
pub type Word = Vec<u32>;

/// A finite inverse presentation: an alphabet, an involutive inverse
/// operation on it, a set of rewrite rules, and whether the empty word is
/// admitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InversePresentation {
    alphabet_size: usize,
    inverses: Vec<u32>,
    rules: Vec<(Word, Word)>,
    contains_empty_word: bool,
}

impl InversePresentation {
    /// Creates a presentation over `{0, ..., alphabet_size - 1}` with the
    /// given involution, no rules, and the empty word excluded.
    #[must_use]
    pub fn new(inverses: Vec<u32>) -> Self {
        InversePresentation {
            alphabet_size: inverses.len(),
            inverses,
            rules: Vec::new(),
            contains_empty_word: false,
        }
    }

    /// The alphabet, as the sequence of labels `0, 1, ..., k - 1`.
    #[must_use]
    pub fn alphabet(&self) -> Vec<u32> {
        (0..self.alphabet_size as u32).collect()
    }

    /// The size of the alphabet.
    #[must_use]
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// For each letter, the label of its inverse.
    #[must_use]
    pub fn inverses(&self) -> &[u32] {
        &self.inverses
    }

    /// The rewrite rules, as `(u, v)` pairs of words.
    #[must_use]
    pub fn rules(&self) -> &[(Word, Word)] {
        &self.rules
    }

    /// Whether the empty word is accepted as a valid presented word.
    #[must_use]
    pub fn contains_empty_word(&self) -> bool {
        self.contains_empty_word
    }

    /// Sets whether the empty word is accepted.
    pub fn set_contains_empty_word(&mut self, value: bool) {
        self.contains_empty_word = value;
    }

    /// Appends a rewrite rule `u = v`. Does not validate; call
    /// [`InversePresentation::validate`] once all rules are added.
    pub fn add_rule(&mut self, u: Word, v: Word) {
        self.rules.push((u, v));
    }

    /// Checks that `inverses` is a well-defined involution on the alphabet
    /// and that every letter appearing in a rule lies within the alphabet.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPresentation`] on the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.inverses.len() != self.alphabet_size {
            return Err(Report::new(Error::InvalidPresentation {
                message: "inverses must have one entry per letter of the alphabet",
            }));
        }
        for (a, &inv_a) in self.inverses.iter().enumerate() {
            if inv_a as usize >= self.alphabet_size {
                return Err(Report::new(Error::InvalidPresentation {
                    message: "inverse of a letter lies outside the alphabet",
                }));
            }
            let inv_inv_a = self.inverses[inv_a as usize];
            if inv_inv_a as usize != a {
                return Err(Report::new(Error::InvalidPresentation {
                    message: "inverses is not an involution",
                }));
            }
        }
        for (u, v) in &self.rules {
            if u.iter().chain(v.iter()).any(|&a| a as usize >= self.alphabet_size) {
                return Err(Report::new(Error::InvalidPresentation {
                    message: "a rule contains a letter outside the alphabet",
                }));
            }
        }
        Ok(())
    }

    /// The inverse of a single letter.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `a` is outside the alphabet.
    pub fn inverse(&self, a: u32) -> Result<u32> {
        self.inverses
            .get(a as usize)
            .copied()
            .ok_or_else(|| Report::new(crate::error::out_of_bounds(a, self.alphabet_size as u64)))
    }

    /// The inverse of a word: `(a₁...aₙ)⁻¹ = aₙ⁻¹...a₁⁻¹`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if any letter is outside the alphabet.
    pub fn inverse_word(&self, w: &[u32]) -> Result<Word> {
        w.iter().rev().map(|&a| self.inverse(a)).collect()
    }
}
