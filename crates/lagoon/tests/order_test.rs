use lagoon::graph::Graph;
use lagoon::{EdgeLabel, LayoutGraph, NodeLabel, order, rank};

fn ranked(edges: &[(&str, &str)]) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new();
    for (v, w) in edges {
        if !g.has_node(v) {
            g.set_node(*v, NodeLabel::default());
        }
        if !g.has_node(w) {
            g.set_node(*w, NodeLabel::default());
        }
        g.set_edge_with_label(*v, *w, EdgeLabel::default());
    }
    rank::rank(&mut g);
    rank::normalize(&mut g);
    g
}

fn layering(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut max_rank = 0;
    for id in g.node_ids() {
        max_rank = max_rank.max(g.node(&id).unwrap().rank.unwrap());
    }
    let mut layers: Vec<Vec<(usize, String)>> = vec![Vec::new(); (max_rank + 1) as usize];
    for id in g.node_ids() {
        let n = g.node(&id).unwrap();
        layers[n.rank.unwrap() as usize].push((n.order.unwrap(), id));
    }
    layers
        .into_iter()
        .map(|mut l| {
            l.sort_by_key(|(o, _)| *o);
            l.into_iter().map(|(_, id)| id).collect()
        })
        .collect()
}

#[test]
fn assigns_a_dense_order_per_rank() {
    let mut g = ranked(&[("a", "b"), ("a", "c"), ("a", "d")]);
    order::order(&mut g);

    let layers = layering(&g);
    assert_eq!(layers[0], vec!["a"]);
    let mut second = layers[1].clone();
    second.sort();
    assert_eq!(second, vec!["b", "c", "d"]);
}

#[test]
fn untangles_a_two_layer_crossing() {
    // a -> y and b -> x cross when both layers sit in insertion order.
    let mut g: LayoutGraph = Graph::new();
    for (id, rank) in [("a", 0), ("b", 0), ("x", 1), ("y", 1)] {
        g.set_node(
            id,
            NodeLabel {
                rank: Some(rank),
                ..Default::default()
            },
        );
    }
    g.set_edge_with_label("a", "y", EdgeLabel::default());
    g.set_edge_with_label("b", "x", EdgeLabel::default());

    order::order(&mut g);
    let layers = layering(&g);
    assert_eq!(order::cross_count(&g, &layers), 0);
}

#[test]
fn keeps_an_already_planar_layering() {
    let mut g = ranked(&[("a", "x"), ("b", "y")]);
    order::order(&mut g);
    let layers = layering(&g);
    assert_eq!(order::cross_count(&g, &layers), 0);
    assert_eq!(layers[0], vec!["a", "b"]);
    assert_eq!(layers[1], vec!["x", "y"]);
}

#[test]
fn cross_count_sees_the_classic_crossing() {
    let mut g: LayoutGraph = Graph::new();
    for (id, rank, ord) in [("a", 0, 0), ("b", 0, 1), ("x", 1, 0), ("y", 1, 1)] {
        g.set_node(
            id,
            NodeLabel {
                rank: Some(rank),
                order: Some(ord),
                ..Default::default()
            },
        );
    }
    g.set_edge_with_label("a", "y", EdgeLabel::default());
    g.set_edge_with_label("b", "x", EdgeLabel::default());

    let layers = vec![
        vec!["a".to_string(), "b".to_string()],
        vec!["x".to_string(), "y".to_string()],
    ];
    assert_eq!(order::cross_count(&g, &layers), 1);
}
