use super::*;

fn policy_graph() -> (TypeGraph, TypeId, TypeId) {
    let mut graph = TypeGraph::new();
    let policy = graph.add_type("Policy").unwrap();
    let coverage = graph.add_type("Coverage").unwrap();
    (graph, policy, coverage)
}

#[test]
fn test_add_type_rejects_duplicate_names() {
    let (mut graph, policy, _) = policy_graph();
    assert_eq!(graph.type_by_name("Policy"), Some(policy));
    assert_eq!(
        graph.add_type("Policy"),
        Err(GraphError::DuplicateType("Policy".to_string()))
    );
}

#[test]
fn test_members_are_kept_in_declaration_order() {
    let (mut graph, policy, _) = policy_graph();
    let premium = graph.add_attribute(policy, "premium", "Money").unwrap();
    let start = graph.add_attribute(policy, "start", "LocalDate").unwrap();

    assert_eq!(graph.type_data(policy).attributes, vec![premium, start]);
    assert_eq!(graph.attribute_by_name(policy, "start"), Some(start));
    assert_eq!(graph.qualified_attribute_name(premium), "Policy.premium");
    assert!(matches!(
        graph.add_attribute(policy, "premium", "Decimal"),
        Err(GraphError::DuplicateMember { .. })
    ));
}

#[test]
fn test_override_requires_same_name() {
    let (mut graph, policy, coverage) = policy_graph();
    let premium = graph.add_attribute(policy, "premium", "Money").unwrap();
    let sum = graph.add_attribute(coverage, "sumInsured", "Money").unwrap();
    let err = graph.set_overrides(sum, premium).unwrap_err();
    assert!(matches!(err, GraphError::OverrideNameMismatch { .. }));

    let redeclared = graph.add_attribute(coverage, "premium", "Money").unwrap();
    graph.set_overrides(redeclared, premium).unwrap();
    assert_eq!(graph.attribute(redeclared).overrides, Some(premium));
}

#[test]
fn test_link_composition_sets_both_directions() {
    let (mut graph, policy, coverage) = policy_graph();
    let coverages = graph
        .add_association(policy, "coverages", coverage, AssociationKind::master_to_detail())
        .unwrap();
    let parent = graph
        .add_association(coverage, "policy", policy, AssociationKind::detail_to_master())
        .unwrap();
    graph.link_composition(coverages, parent).unwrap();

    assert_eq!(graph.association(coverages).inverse(), Some(parent));
    assert_eq!(graph.association(parent).inverse(), Some(coverages));
    assert!(graph.association(parent).is_composition_detail_to_master());
    assert!(graph.association(coverages).is_composition_master_to_detail());
    assert!(!graph.association(parent).is_shared());
}

#[test]
fn test_plain_association_cannot_have_inverse_or_be_shared() {
    let (mut graph, policy, coverage) = policy_graph();
    let plain = graph
        .add_association(policy, "broker", coverage, AssociationKind::Plain)
        .unwrap();
    let other = graph
        .add_association(coverage, "policy", policy, AssociationKind::Plain)
        .unwrap();

    assert_eq!(
        graph.set_inverse(plain, other),
        Err(GraphError::NotAComposition("Policy.broker".to_string()))
    );
    assert_eq!(
        graph.set_shared_host(plain, None),
        Err(GraphError::NotDetailToMaster("Policy.broker".to_string()))
    );
    assert_eq!(graph.association(plain).inverse(), None);
}

#[test]
fn test_shared_host_is_exposed_through_kind() {
    let (mut graph, policy, coverage) = policy_graph();
    let host = graph
        .add_association(coverage, "policy", policy, AssociationKind::detail_to_master())
        .unwrap();
    let extra = graph.add_type("ExtraCoverage").unwrap();
    let shared = graph
        .add_association(extra, "policy", policy, AssociationKind::detail_to_master())
        .unwrap();
    graph.set_shared_host(shared, Some(host)).unwrap();

    let assoc = graph.association(shared);
    assert!(assoc.is_shared());
    assert_eq!(assoc.shared_host(), Some(host));
    assert_eq!(
        assoc.kind,
        AssociationKind::CompositionDetailToMaster {
            inverse: None,
            sharing: Sharing::Shared { host: Some(host) },
        }
    );
}

#[test]
fn test_unknown_ids_are_rejected() {
    let (mut graph, policy, _) = policy_graph();
    assert_eq!(
        graph.set_supertype(policy, Some(TypeId(42))),
        Err(GraphError::UnknownType(TypeId(42)))
    );
    assert_eq!(
        graph.set_subset_of(AssociationId(7), AssociationId(8)),
        Err(GraphError::UnknownAssociation(AssociationId(7)))
    );
    assert!(graph.get_type(TypeId(42)).is_none());
    assert_eq!(graph.type_name(TypeId(42)), "<unknown>");
}

#[test]
fn test_cardinality_defaults_to_to_one() {
    let (mut graph, policy, coverage) = policy_graph();
    let coverages = graph
        .add_association(policy, "coverages", coverage, AssociationKind::master_to_detail())
        .unwrap();
    assert!(!graph.association(coverages).is_to_many());

    graph.set_cardinality(coverages, 1, None).unwrap();
    let assoc = graph.association(coverages);
    assert_eq!(assoc.min_cardinality, 1);
    assert!(assoc.is_to_many());
}
