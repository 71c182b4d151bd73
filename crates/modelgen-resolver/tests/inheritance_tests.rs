use super::*;
use crate::error::ResolveError;
use crate::fixtures::policy_model;
use modelgen_model::AssociationKind;

#[test]
fn test_root_type_inherits_nothing() {
    let model = policy_model();
    assert!(super_attributes(&model.graph, model.coverage).unwrap().is_empty());
    assert!(
        super_associations_by_name(&model.graph, model.coverage)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_override_excludes_ancestor_attribute() {
    let model = policy_model();
    let inherited = super_attributes(&model.graph, model.building_coverage).unwrap();

    assert!(!inherited.contains(&model.premium));
    assert!(inherited.contains(&model.sum_insured));
    assert_eq!(inherited.len(), 1);
}

#[test]
fn test_three_level_chain_sees_the_override_not_the_original() {
    let model = policy_model();
    let inherited = super_attributes(&model.graph, model.fire_coverage).unwrap();

    assert!(inherited.contains(&model.building_premium));
    assert!(!inherited.contains(&model.premium));
    assert!(!inherited.contains(&model.deductible));
    assert_eq!(
        inherited.iter().copied().collect::<Vec<_>>(),
        vec![model.building_premium, model.sum_insured]
    );
}

#[test]
fn test_super_associations_overlay_each_level() {
    let model = policy_model();
    let by_name = super_associations_by_name(&model.graph, model.fire_coverage).unwrap();

    assert_eq!(by_name.get("policy"), Some(&model.coverage_policy));
    assert_eq!(by_name.get("homePolicy"), Some(&model.building_home_policy));
    assert_eq!(by_name.len(), 2);

    let building = super_associations_by_name(&model.graph, model.building_coverage).unwrap();
    assert_eq!(building.keys().collect::<Vec<_>>(), vec!["policy"]);
}

#[test]
fn test_redeclared_association_is_not_inherited() {
    let mut model = policy_model();
    let redeclared = model
        .graph
        .add_association(
            model.fire_coverage,
            "policy",
            model.policy,
            AssociationKind::detail_to_master(),
        )
        .unwrap();

    let by_name = super_associations_by_name(&model.graph, model.fire_coverage).unwrap();
    assert!(!by_name.contains_key("policy"));
    assert!(!by_name.values().any(|&a| a == redeclared));
    assert!(by_name.contains_key("homePolicy"));
}

#[test]
fn test_results_are_stable_across_calls() {
    let model = policy_model();
    let first = super_attributes(&model.graph, model.fire_coverage).unwrap();
    let second = super_attributes(&model.graph, model.fire_coverage).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cyclic_supertypes_are_reported() {
    let mut graph = TypeGraph::new();
    let a = graph.add_type("A").unwrap();
    let b = graph.add_type("B").unwrap();
    graph.add_attribute(a, "x", "Integer").unwrap();
    graph.set_supertype(a, Some(b)).unwrap();
    graph.set_supertype(b, Some(a)).unwrap();

    assert!(matches!(
        super_attributes(&graph, a),
        Err(ResolveError::CyclicHierarchy { .. })
    ));
    assert!(matches!(
        super_associations_by_name(&graph, b),
        Err(ResolveError::CyclicHierarchy { .. })
    ));
}

#[test]
fn test_unknown_type_is_an_error() {
    let model = policy_model();
    assert_eq!(
        super_attributes(&model.graph, TypeId(404)),
        Err(ResolveError::UnknownType(TypeId(404)))
    );
}

#[test]
fn test_long_chain_inherits_every_ancestor_attribute() {
    let (graph, types) = crate::fixtures::linear_chain(600);
    let leaf = types[599];

    let inherited = super_attributes(&graph, leaf).unwrap();
    assert_eq!(inherited.len(), 599);
    let first = graph.attribute_by_name(types[598], "a598").unwrap();
    let last = graph.attribute_by_name(types[0], "a0").unwrap();
    assert_eq!(inherited.first(), Some(&first));
    assert_eq!(inherited.last(), Some(&last));

    assert!(super_associations_by_name(&graph, leaf).unwrap().is_empty());
}
