//! End-to-end scenario: multiplying two specific degree-3 PBRs yields the
//! universal relation (every point adjacent to every point on the other
//! side).

use semigroup_core::PBR;

fn rows(rows: &[&[u32]]) -> Vec<Vec<u32>> {
    rows.iter().map(|r| r.to_vec()).collect()
}

#[test]
fn product_of_two_pbrs_is_the_universal_relation() {
    let x = PBR::from_adjacencies(rows(&[
        &[3, 5],
        &[0, 1, 2, 3, 4, 5],
        &[0, 2, 3, 4, 5],
        &[0, 1, 2, 3, 5],
        &[0, 2, 5],
        &[1, 2, 3, 4, 5],
    ]))
    .unwrap();

    let y = PBR::from_adjacencies(rows(&[
        &[0, 3, 4, 5],
        &[2, 4, 5],
        &[1, 2, 5],
        &[2, 3, 4, 5],
        &[2, 3, 4, 5],
        &[1, 2, 4],
    ]))
    .unwrap();

    let mut product = PBR::new(x.degree());
    product.product_inplace(&x, &y).unwrap();

    let universal = PBR::from_adjacencies(rows(&[
        &[0, 1, 2, 3, 4, 5],
        &[0, 1, 2, 3, 4, 5],
        &[0, 1, 2, 3, 4, 5],
        &[0, 1, 2, 3, 4, 5],
        &[0, 1, 2, 3, 4, 5],
        &[0, 1, 2, 3, 4, 5],
    ]))
    .unwrap();

    assert_eq!(product, universal);
}
