//! End-to-end scenario: 48 disjoint cycles of sizes 2..49 concatenated
//! into one 1,224-node graph, one strongly connected component per cycle.

use semigroup_core::{Gabow, WordGraph};

fn cycle(n: u32) -> WordGraph {
    let mut g = WordGraph::new(n as usize, 1);
    for i in 0..n {
        g.set_target(i, 0, (i + 1) % n).unwrap();
    }
    g
}

#[test]
fn forty_eight_disjoint_cycles_give_forty_eight_components() {
    let mut g = cycle(2);
    for size in 3..=49u32 {
        g.disjoint_union(&cycle(size)).unwrap();
    }
    assert_eq!(g.number_of_nodes(), 1224);
    assert!(g.is_complete());

    let gabow = Gabow::new(g);
    assert_eq!(gabow.number_of_components().unwrap(), 48);

    let mut offset = 0u32;
    for k in 0..48u32 {
        let size = k + 2;
        for v in offset..offset + size {
            assert_eq!(gabow.id(v).unwrap(), k, "node {v} expected in component {k}");
        }
        offset += size;
    }
    assert_eq!(offset, 1224);
}
