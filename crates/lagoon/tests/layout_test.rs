use lagoon::{EdgeLabel, GraphLabel, LayoutGraph, NodeLabel, RankDir, layout};

fn simple_graph(rankdir: RankDir) -> LayoutGraph {
    let mut g = LayoutGraph::with_graph(GraphLabel {
        rankdir,
        ..Default::default()
    });
    g.set_node("a", NodeLabel::sized(100.0, 50.0));
    g.set_node("b", NodeLabel::sized(100.0, 50.0));
    g.set_edge_with_label("a", "b", EdgeLabel::default());
    g
}

fn center(g: &LayoutGraph, id: &str) -> (f64, f64) {
    let n = g.node(id).unwrap();
    (n.x.unwrap(), n.y.unwrap())
}

#[test]
fn tb_ranks_advance_down() {
    let mut g = simple_graph(RankDir::TB);
    layout(&mut g);
    let (ax, ay) = center(&g, "a");
    let (bx, by) = center(&g, "b");
    assert!(ay < by, "a.y={ay} b.y={by}");
    assert_eq!(ax, bx);
}

#[test]
fn bt_ranks_advance_up() {
    let mut g = simple_graph(RankDir::BT);
    layout(&mut g);
    let (_, ay) = center(&g, "a");
    let (_, by) = center(&g, "b");
    assert!(ay > by, "a.y={ay} b.y={by}");
}

#[test]
fn lr_ranks_advance_right() {
    let mut g = simple_graph(RankDir::LR);
    layout(&mut g);
    let (ax, ay) = center(&g, "a");
    let (bx, by) = center(&g, "b");
    assert!(ax < bx, "a.x={ax} b.x={bx}");
    assert_eq!(ay, by);
}

#[test]
fn rl_ranks_advance_left() {
    let mut g = simple_graph(RankDir::RL);
    layout(&mut g);
    let (ax, _) = center(&g, "a");
    let (bx, _) = center(&g, "b");
    assert!(ax > bx, "a.x={ax} b.x={bx}");
}

#[test]
fn rank_gap_respects_ranksep() {
    let mut g = LayoutGraph::with_graph(GraphLabel {
        rankdir: RankDir::TB,
        ranksep: 100.0,
        ..Default::default()
    });
    g.set_node("a", NodeLabel::sized(80.0, 40.0));
    g.set_node("b", NodeLabel::sized(80.0, 40.0));
    g.set_edge_with_label("a", "b", EdgeLabel::default());
    layout(&mut g);

    let (_, ay) = center(&g, "a");
    let (_, by) = center(&g, "b");
    // Centers are one rank height plus the rank gap apart.
    assert_eq!(by - ay, 40.0 + 100.0);
}

#[test]
fn nodes_in_same_rank_respect_nodesep() {
    let mut g = LayoutGraph::with_graph(GraphLabel {
        rankdir: RankDir::TB,
        nodesep: 30.0,
        ..Default::default()
    });
    g.set_node("root", NodeLabel::sized(60.0, 30.0));
    g.set_node("left", NodeLabel::sized(60.0, 30.0));
    g.set_node("right", NodeLabel::sized(60.0, 30.0));
    g.set_edge_with_label("root", "left", EdgeLabel::default());
    g.set_edge_with_label("root", "right", EdgeLabel::default());
    layout(&mut g);

    let (lx, ly) = center(&g, "left");
    let (rx, ry) = center(&g, "right");
    assert_eq!(ly, ry);
    assert_eq!((rx - lx).abs(), 60.0 + 30.0);
}

#[test]
fn drawing_starts_at_origin() {
    for rankdir in [RankDir::TB, RankDir::BT, RankDir::LR, RankDir::RL] {
        let mut g = simple_graph(rankdir);
        g.set_node("c", NodeLabel::sized(40.0, 40.0));
        g.set_edge_with_label("b", "c", EdgeLabel::default());
        layout(&mut g);

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        for id in g.node_ids() {
            let n = g.node(&id).unwrap();
            min_x = min_x.min(n.x.unwrap() - n.width / 2.0);
            min_y = min_y.min(n.y.unwrap() - n.height / 2.0);
        }
        assert_eq!(min_x, 0.0, "{rankdir:?}");
        assert_eq!(min_y, 0.0, "{rankdir:?}");
    }
}

#[test]
fn layout_is_deterministic() {
    let run = || {
        let mut g = LayoutGraph::with_graph(GraphLabel::default());
        for id in ["a", "b", "c", "d", "e"] {
            g.set_node(id, NodeLabel::sized(100.0, 60.0));
        }
        for (v, w) in [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("d", "e")] {
            g.set_edge_with_label(v, w, EdgeLabel::default());
        }
        layout(&mut g);
        g.node_ids()
            .into_iter()
            .map(|id| {
                let n = g.node(&id).unwrap();
                (id, n.x.unwrap(), n.y.unwrap())
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn cycles_are_tolerated_and_edges_restored() {
    let mut g = LayoutGraph::with_graph(GraphLabel::default());
    g.set_node("a", NodeLabel::sized(50.0, 50.0));
    g.set_node("b", NodeLabel::sized(50.0, 50.0));
    g.set_edge_with_label("a", "b", EdgeLabel::default());
    g.set_edge_with_label("b", "a", EdgeLabel::default());
    layout(&mut g);

    for id in ["a", "b"] {
        let n = g.node(id).unwrap();
        assert!(n.x.is_some() && n.y.is_some());
    }
    // Both original directions survive the acyclic round-trip.
    assert!(g.edge("a", "b", None).is_some());
    assert!(g.edge("b", "a", None).is_some());
    assert!(!g.edge("a", "b", None).unwrap().reversed);
    assert!(!g.edge("b", "a", None).unwrap().reversed);
}

#[test]
fn empty_graph_is_a_noop() {
    let mut g = LayoutGraph::with_graph(GraphLabel::default());
    layout(&mut g);
    assert_eq!(g.node_count(), 0);
}

#[test]
fn single_node_sits_at_its_own_center() {
    let mut g = LayoutGraph::with_graph(GraphLabel::default());
    g.set_node("only", NodeLabel::sized(120.0, 80.0));
    layout(&mut g);
    let n = g.node("only").unwrap();
    assert_eq!(n.x, Some(60.0));
    assert_eq!(n.y, Some(40.0));
}

#[test]
fn minlen_stretches_the_span() {
    let mut g = LayoutGraph::with_graph(GraphLabel::default());
    g.set_node("a", NodeLabel::sized(10.0, 10.0));
    g.set_node("b", NodeLabel::sized(10.0, 10.0));
    g.set_edge_with_label(
        "a",
        "b",
        EdgeLabel {
            minlen: 3,
            ..Default::default()
        },
    );
    layout(&mut g);
    let a = g.node("a").unwrap();
    let b = g.node("b").unwrap();
    assert_eq!(a.rank, Some(0));
    assert_eq!(b.rank, Some(3));
}
