use super::*;
use irmatch_core::{Graph, Node};

fn outer(input: &str, temp: &str) -> Graph {
    Graph::new()
        .input(input)
        .node(Node::new("Neg").inputs([input]).outputs([temp]))
        .output(temp)
}

fn inner(captured: &str, result: &str) -> Graph {
    Graph::new()
        .node(Node::new("Abs").inputs([captured]).outputs([result]))
        .output(result)
}

#[test]
fn test_local_resolution() {
    let (g1, g2) = (outer("A", "T"), outer("X", "U"));
    let chain = ScopeChain::new(g1.body(), g2.body());

    assert_eq!(
        chain.resolve(0, "A", "X"),
        Resolution::Local(DefinitionSite::Input(0), DefinitionSite::Input(0))
    );
    assert_eq!(
        chain.resolve(0, "T", "U"),
        Resolution::Local(
            DefinitionSite::Node { node: 0, slot: 0 },
            DefinitionSite::Node { node: 0, slot: 0 }
        )
    );
}

#[test]
fn test_root_scope_has_no_enclosing() {
    let (g1, g2) = (outer("A", "T"), outer("X", "U"));
    let chain = ScopeChain::new(g1.body(), g2.body());

    assert_eq!(chain.resolve(0, "Q", "R"), Resolution::Unbound);
    assert_eq!(chain.resolve(0, "A", "R"), Resolution::Asymmetric);
    assert_eq!(chain.resolve(0, "Q", "X"), Resolution::Asymmetric);
}

#[test]
fn test_free_variables_defer_to_enclosing() {
    let (g1, g2) = (outer("A", "T"), outer("X", "U"));
    let (s1, s2) = (inner("T", "R"), inner("U", "S"));
    let mut chain = ScopeChain::new(g1.body(), g2.body());
    let level = chain.push(0, s1.body(), s2.body());

    assert_eq!(level, 1);
    assert_eq!(chain.depth(), 2);
    assert_eq!(chain.resolve(1, "T", "U"), Resolution::Enclosing(0));
    assert!(matches!(chain.resolve(1, "R", "S"), Resolution::Local(..)));
    assert_eq!(chain.resolve(1, "R", "U"), Resolution::Asymmetric);
}

#[test]
fn test_pop_keeps_root() {
    let (g1, g2) = (outer("A", "T"), outer("X", "U"));
    let (s1, s2) = (inner("T", "R"), inner("U", "S"));
    let mut chain = ScopeChain::new(g1.body(), g2.body());
    chain.push(0, s1.body(), s2.body());

    assert!(chain.pop().is_some());
    assert!(chain.pop().is_none());
    assert_eq!(chain.depth(), 1);
}

#[test]
fn test_root_mapping_survives() {
    let (g1, g2) = (outer("A", "T"), outer("X", "U"));
    let mut chain = ScopeChain::new(g1.body(), g2.body());
    chain.frame_mut(0).mapping.commit(0, 0);

    let mapping = chain.into_root_mapping();
    assert_eq!(mapping.pairs(), vec![(0, 0)]);
}

#[test]
fn test_frame_resolves_through_its_own_parent() {
    let (g1, g2) = (outer("A", "T"), outer("X", "U"));
    let (s1, s2) = (inner("T", "R"), inner("U", "S"));
    let (t1, t2) = (inner("T", "P"), inner("U", "Q"));
    let mut chain = ScopeChain::new(g1.body(), g2.body());
    let first = chain.push(0, s1.body(), s2.body());
    // A sibling of `first`, stacked above it but enclosed by the root
    let second = chain.push(0, t1.body(), t2.body());

    assert_eq!(second, first + 1);
    assert_eq!(chain.frame(second).parent, Some(0));
    assert_eq!(chain.resolve(second, "R", "S"), Resolution::Enclosing(0));
    assert_eq!(chain.resolve(0, "R", "S"), Resolution::Unbound);
}
