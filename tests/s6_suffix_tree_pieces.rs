//! End-to-end scenario: "abab" decomposes into two maximal pieces once
//! "baba" has also been inserted.

use semigroup_core::SuffixTree;

#[test]
fn abab_baba_piece_decomposition() {
    let mut t = SuffixTree::new();
    let abab = [0u32, 1, 0, 1];
    let baba = [1u32, 0, 1, 0];
    t.add_word(&abab).unwrap();
    t.add_word(&baba).unwrap();

    assert_eq!(t.maximal_piece_prefix(&abab).unwrap(), 3);
    assert_eq!(t.number_of_pieces(&abab).unwrap(), 2);
}
