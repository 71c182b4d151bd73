use super::*;
use crate::derived_union::DerivedUnionSubsets;
use crate::fixtures::policy_model;
use crate::settings::GeneratorSettings;
use modelgen_model::AssociationKind;

fn cache_for(graph: modelgen_model::TypeGraph, settings: GeneratorSettings) -> ModelNodeCache {
    ModelNodeCache::new(Arc::new(graph), settings)
}

#[test]
fn test_nearest_ancestor_skips_builders_without_associations() {
    let model = policy_model();
    let (fire, building, coverage) = (
        model.fire_coverage,
        model.building_coverage,
        model.coverage,
    );
    let cache = cache_for(model.graph, GeneratorSettings::default());

    let fire_builder = cache.builder_for(fire).unwrap();
    let nearest = fire_builder
        .nearest_ancestor_builder_with_associations()
        .unwrap();
    assert_eq!(nearest.source_type(), building);

    let building_builder = cache.builder_for(building).unwrap();
    assert!(Arc::ptr_eq(nearest, &building_builder));
    let nearest = building_builder
        .nearest_ancestor_builder_with_associations()
        .unwrap();
    assert_eq!(nearest.source_type(), coverage);

    let coverage_builder = cache.builder_for(coverage).unwrap();
    assert!(coverage_builder.nearest_ancestor_builder_with_associations().is_none());
    assert!(!coverage_builder.has_ancestor_association_builder());
    assert!(fire_builder.has_ancestor_association_builder());
}

#[test]
fn test_nearest_ancestor_skips_several_empty_levels() {
    let mut model = policy_model();
    let middle = model.graph.add_type("MiddleCoverage").unwrap();
    model
        .graph
        .set_supertype(middle, Some(model.fire_coverage))
        .unwrap();
    let leaf = model.graph.add_type("LeafCoverage").unwrap();
    model.graph.set_supertype(leaf, Some(middle)).unwrap();
    let building = model.building_coverage;
    let cache = cache_for(model.graph, GeneratorSettings::default());

    let leaf_builder = cache.builder_for(leaf).unwrap();
    let nearest = leaf_builder
        .nearest_ancestor_builder_with_associations()
        .unwrap();
    assert_eq!(nearest.source_type(), building);
    assert_eq!(nearest.name(), "BuildingCoverage");
}

#[test]
fn test_builder_exposes_own_and_inherited_members() {
    let model = policy_model();
    let building = model.building_coverage;
    let (premium, building_premium, sum_insured) =
        (model.premium, model.building_premium, model.sum_insured);
    let link = model.building_home_policy;
    let cache = cache_for(model.graph, GeneratorSettings::default());

    let builder = cache.builder_for(building).unwrap();
    assert_eq!(builder.own_attributes(), &[building_premium]);
    assert_eq!(builder.own_associations(), &[link]);
    assert!(builder.super_attributes().contains(&sum_insured));
    assert!(!builder.super_attributes().contains(&premium));
    assert_eq!(
        builder
            .super_associations_by_name()
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>(),
        vec!["policy"]
    );
}

#[test]
fn test_generated_names_follow_settings() {
    let model = policy_model();
    let home_policy = model.home_policy;
    let settings = GeneratorSettings {
        implementation_suffix: "Impl".to_string(),
        ..GeneratorSettings::default()
    }
    .with_published_interfaces(true);
    let cache = cache_for(model.graph, settings);

    let builder = cache.builder_for(home_policy).unwrap();
    assert!(builder.is_published_interface());
    assert_eq!(
        builder.names(),
        &GeneratedNames {
            class_name: "HomePolicyImpl".to_string(),
            interface_name: Some("IHomePolicy".to_string()),
            builder_class_name: "HomePolicyBuilder".to_string(),
            variable_name: "homePolicy".to_string(),
        }
    );
}

#[test]
fn test_unpublished_builder_has_no_interface_name() {
    let model = policy_model();
    let policy = model.policy;
    let cache = cache_for(model.graph, GeneratorSettings::default());

    let builder = cache.builder_for(policy).unwrap();
    assert!(!builder.is_published_interface());
    assert_eq!(builder.names().interface_name, None);
    assert_eq!(builder.names().class_name, "Policy");
}

#[test]
fn test_builder_precomputes_derived_union_subsets() {
    let model = policy_model();
    let (building, fire) = (model.building_coverage, model.fire_coverage);
    let expected = DerivedUnionSubsets {
        union: model.coverages,
        union_inverse: model.coverage_policy,
        subsets: vec![model.building_home_policy],
    };
    let cache = cache_for(model.graph, GeneratorSettings::default());

    let building_builder = cache.builder_for(building).unwrap();
    assert_eq!(building_builder.derived_union_subsets(), &[expected]);
    assert!(cache.builder_for(fire).unwrap().derived_union_subsets().is_empty());
}

#[test]
fn test_supertype_builder_is_the_cached_instance() {
    let model = policy_model();
    let (fire, building) = (model.fire_coverage, model.building_coverage);
    let cache = cache_for(model.graph, GeneratorSettings::default());

    let fire_builder = cache.builder_for(fire).unwrap();
    // Building the leaf builds the whole chain.
    assert_eq!(cache.len(), 3);
    let supertype = fire_builder.supertype_builder().unwrap();
    assert!(Arc::ptr_eq(supertype, &cache.builder_for(building).unwrap()));
}

#[test]
fn test_master_to_detail_without_inverse_is_reported() {
    let mut model = policy_model();
    let riders = model
        .graph
        .add_association(
            model.policy,
            "riders",
            model.coverage,
            AssociationKind::master_to_detail(),
        )
        .unwrap();
    let (policy, home_policy) = (model.policy, model.home_policy);
    let cache = cache_for(model.graph, GeneratorSettings::default());

    let builder = cache.builder_for(policy).unwrap();
    assert!(builder.own_associations().contains(&riders));

    // Reported once, on the declaring type only.
    cache.builder_for(home_policy).unwrap();
    let diagnostics = cache.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].code,
        modelgen_common::diagnostic_codes::MISSING_INVERSE_ASSOCIATION
    );
    assert_eq!(diagnostics[0].element, "Policy.riders");
}
