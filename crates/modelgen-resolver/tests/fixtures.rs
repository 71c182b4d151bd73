//! Shared model fixtures for resolver tests.
//!
//! The standard model is a small insurance product:
//!
//! ```text
//! master side                     child side
//! Policy      --coverages-->>     Coverage          (coverages is a derived union)
//!   ^                               ^    <--policy--
//! HomePolicy  --buildingCoverages-->> BuildingCoverage  (subsets Policy.coverages)
//!                                   ^    <--homePolicy--
//!                                 FireCoverage      (declares no associations)
//! ```

use modelgen_model::{AssociationId, AssociationKind, AttributeId, TypeGraph, TypeId};

pub(crate) struct PolicyModel {
    pub graph: TypeGraph,
    pub policy: TypeId,
    pub home_policy: TypeId,
    pub coverage: TypeId,
    pub building_coverage: TypeId,
    pub fire_coverage: TypeId,
    /// `Policy.coverages`, master-to-detail derived union.
    pub coverages: AssociationId,
    /// `Coverage.policy`, inverse of the union.
    pub coverage_policy: AssociationId,
    /// `HomePolicy.buildingCoverages`, subset of the union.
    pub building_coverages: AssociationId,
    /// `BuildingCoverage.homePolicy`, inverse of the subset.
    pub building_home_policy: AssociationId,
    pub premium: AttributeId,
    pub sum_insured: AttributeId,
    pub building_premium: AttributeId,
    pub deductible: AttributeId,
}

pub(crate) fn policy_model() -> PolicyModel {
    let mut graph = TypeGraph::new();
    let policy = graph.add_type("Policy").unwrap();
    let home_policy = graph.add_type("HomePolicy").unwrap();
    let coverage = graph.add_type("Coverage").unwrap();
    let building_coverage = graph.add_type("BuildingCoverage").unwrap();
    let fire_coverage = graph.add_type("FireCoverage").unwrap();

    graph.set_supertype(home_policy, Some(policy)).unwrap();
    graph.set_supertype(building_coverage, Some(coverage)).unwrap();
    graph.set_supertype(fire_coverage, Some(building_coverage)).unwrap();

    let coverages = graph
        .add_association(policy, "coverages", coverage, AssociationKind::master_to_detail())
        .unwrap();
    graph.set_derived_union(coverages, true).unwrap();
    graph.set_cardinality(coverages, 0, None).unwrap();
    let coverage_policy = graph
        .add_association(coverage, "policy", policy, AssociationKind::detail_to_master())
        .unwrap();
    graph.link_composition(coverages, coverage_policy).unwrap();

    let building_coverages = graph
        .add_association(
            home_policy,
            "buildingCoverages",
            building_coverage,
            AssociationKind::master_to_detail(),
        )
        .unwrap();
    graph.set_subset_of(building_coverages, coverages).unwrap();
    let building_home_policy = graph
        .add_association(
            building_coverage,
            "homePolicy",
            home_policy,
            AssociationKind::detail_to_master(),
        )
        .unwrap();
    graph
        .link_composition(building_coverages, building_home_policy)
        .unwrap();

    let premium = graph.add_attribute(coverage, "premium", "Money").unwrap();
    let sum_insured = graph.add_attribute(coverage, "sumInsured", "Money").unwrap();
    let building_premium = graph
        .add_attribute(building_coverage, "premium", "Money")
        .unwrap();
    graph.set_overrides(building_premium, premium).unwrap();
    let deductible = graph
        .add_attribute(fire_coverage, "deductible", "Money")
        .unwrap();

    PolicyModel {
        graph,
        policy,
        home_policy,
        coverage,
        building_coverage,
        fire_coverage,
        coverages,
        coverage_policy,
        building_coverages,
        building_home_policy,
        premium,
        sum_insured,
        building_premium,
        deductible,
    }
}

/// `T0 <- T1 <- ... <- T{len-1}`, each type with one attribute `a{i}`.
/// Returned types are root first.
pub(crate) fn linear_chain(len: usize) -> (TypeGraph, Vec<TypeId>) {
    let mut graph = TypeGraph::new();
    let mut types: Vec<TypeId> = Vec::with_capacity(len);
    for i in 0..len {
        let ty = graph.add_type(format!("T{i}")).unwrap();
        graph.add_attribute(ty, format!("a{i}"), "Integer").unwrap();
        if let Some(&parent) = types.last() {
            graph.set_supertype(ty, Some(parent)).unwrap();
        }
        types.push(ty);
    }
    (graph, types)
}

/// Install a test subscriber so `tracing` output shows up with `--nocapture`.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
