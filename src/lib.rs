//! A computational core for finitely presented inverse semigroups and
//! monoids: word graphs and the coset-enumeration primitives built on them
//! (union-find, spanning forests, Gabow's SCC algorithm, path enumeration),
//! a generalised suffix tree for factor and piece queries, partitioned
//! binary relations under composition, and the Stephen/Cirpons/Cutting
//! engines that turn an inverse presentation into its R- and D-class
//! structure.
//!
//! `no_std` by default (the `std` feature re-enables it, and with it
//! `error-stack`'s and `fixedbitset`'s own `std` integrations); every
//! collection type used is re-exported through `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod cirpons;
pub mod constants;
pub mod cutting;
pub mod error;
pub mod forest;
pub mod gabow;
pub mod hopcroft_karp;
pub mod multiplicative;
pub mod paths;
pub mod pbr;
pub mod presentation;
pub mod stephen;
pub mod suffix_tree;
pub mod union_find;
pub mod word_graph;

pub use crate::{
    cirpons::Cirpons,
    cutting::Cutting,
    error::{Error, Result},
    forest::Forest,
    gabow::Gabow,
    multiplicative::Multiplicative,
    pbr::PBR,
    presentation::{InversePresentation, Word},
    stephen::{is_left_factor, Stephen, StephenProcedure},
    suffix_tree::SuffixTree,
    union_find::UnionFind,
    word_graph::{WordGraph, WordGraphWithSources},
};
