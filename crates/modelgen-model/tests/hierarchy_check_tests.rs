use super::*;

fn chain(names: &[&str]) -> (TypeGraph, Vec<TypeId>) {
    let mut graph = TypeGraph::new();
    let ids: Vec<TypeId> = names.iter().map(|n| graph.add_type(*n).unwrap()).collect();
    for pair in ids.windows(2) {
        // names[i + 1] extends names[i]
        graph.set_supertype(pair[1], Some(pair[0])).unwrap();
    }
    (graph, ids)
}

#[test]
fn test_acyclic_chain_passes() {
    let (graph, ids) = chain(&["A", "B", "C"]);
    assert!(graph.check_hierarchy().is_ok());
    assert!(graph.is_same_or_subtype_of(ids[2], ids[0]));
    assert!(graph.is_same_or_subtype_of(ids[1], ids[1]));
    assert!(!graph.is_same_or_subtype_of(ids[0], ids[2]));
}

#[test]
fn test_two_type_cycle_is_reported() {
    let (mut graph, ids) = chain(&["A", "B"]);
    graph.set_supertype(ids[0], Some(ids[1])).unwrap();

    let cycle = graph.check_hierarchy().unwrap_err();
    assert_eq!(cycle.types.len(), 2);
    assert!(cycle.names.contains(&"A".to_string()));
    assert!(cycle.names.contains(&"B".to_string()));
    assert!(cycle.to_string().starts_with("cyclic supertype chain: "));
}

#[test]
fn test_self_supertype_is_a_cycle() {
    let (mut graph, ids) = chain(&["Solo"]);
    graph.set_supertype(ids[0], Some(ids[0])).unwrap();
    let cycle = graph.check_hierarchy().unwrap_err();
    assert_eq!(cycle.types, vec![ids[0]]);
}

#[test]
fn test_cycle_reached_from_outside_lists_only_cycle_members() {
    let mut graph = TypeGraph::new();
    let leaf = graph.add_type("Leaf").unwrap();
    let a = graph.add_type("A").unwrap();
    let b = graph.add_type("B").unwrap();
    graph.set_supertype(leaf, Some(a)).unwrap();
    graph.set_supertype(a, Some(b)).unwrap();
    graph.set_supertype(b, Some(a)).unwrap();

    let cycle = graph.check_hierarchy().unwrap_err();
    assert_eq!(cycle.types, vec![a, b]);
    assert!(!graph.is_same_or_subtype_of(leaf, TypeId(99)));
}
