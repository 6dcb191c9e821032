//! End-to-end scenario: lexicographic path enumeration on the degree-2,
//! six-node benchmark digraph bounded to length 20.

use semigroup_core::{word_graph::WordGraph, Word};

fn test_digraph() -> WordGraph {
    let mut g = WordGraph::new(6, 2);
    g.set_target(0, 0, 1).unwrap();
    g.set_target(0, 1, 2).unwrap();
    g.set_target(1, 0, 3).unwrap();
    g.set_target(1, 1, 4).unwrap();
    g.set_target(2, 0, 4).unwrap();
    g.set_target(2, 1, 2).unwrap();
    g.set_target(3, 0, 1).unwrap();
    g.set_target(3, 1, 5).unwrap();
    g.set_target(4, 0, 5).unwrap();
    g.set_target(4, 1, 4).unwrap();
    g.set_target(5, 0, 4).unwrap();
    g.set_target(5, 1, 5).unwrap();
    g
}

#[test]
fn lex_enumeration_from_node_zero_up_to_length_twenty() {
    let g = test_digraph();
    let count = semigroup_core::paths::pilo(&g, 0, 0, 20).unwrap().count();
    assert_eq!(count, 1_048_575);
}

#[test]
fn lex_enumeration_constrained_to_endpoint_four() {
    let g = test_digraph();
    let count = semigroup_core::paths::pstilo(&g, 0, 4, 0, 20).unwrap().count();
    assert_eq!(count, 524_277);
}

#[test]
fn number_of_paths_agrees_with_enumeration() {
    let g = test_digraph();
    let enumerated: Vec<Word> = semigroup_core::paths::pilo(&g, 0, 0, 20)
        .unwrap()
        .map(|(w, _)| w)
        .collect();
    assert_eq!(enumerated.len(), 1_048_575);

    let counted = semigroup_core::paths::number_of_paths(
        &g,
        0,
        None,
        0,
        20,
        semigroup_core::paths::PathsAlgorithm::Dfs,
    )
    .unwrap();
    assert_eq!(counted, 1_048_575);

    let counted_matrix = semigroup_core::paths::number_of_paths(
        &g,
        0,
        None,
        0,
        20,
        semigroup_core::paths::PathsAlgorithm::Matrix,
    )
    .unwrap();
    assert_eq!(counted_matrix, 1_048_575);
}
