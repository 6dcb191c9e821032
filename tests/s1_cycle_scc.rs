//! End-to-end scenario: a single 33-node directed cycle has exactly one
//! strongly connected component containing every node.

use semigroup_core::{Gabow, WordGraph};

fn cycle(n: u32) -> WordGraph {
    let mut g = WordGraph::new(n as usize, 1);
    for i in 0..n {
        g.set_target(i, 0, (i + 1) % n).unwrap();
    }
    g
}

#[test]
fn thirty_three_node_cycle_is_one_component_in_descending_discovery_order() {
    let gabow = Gabow::new(cycle(33));

    assert_eq!(gabow.number_of_components().unwrap(), 1);

    let expected: Vec<u32> = (0..33).rev().collect();
    assert_eq!(gabow.component(0).unwrap(), expected);

    for v in 0..33 {
        assert_eq!(gabow.id(v).unwrap(), 0);
    }
}
