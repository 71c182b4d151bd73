//! JSON model snapshots.
//!
//! A snapshot lists the model's types with their members. Types are
//! referenced by name, attributes and associations by `"Type.member"`.
//!
//! ```json
//! { "types": [
//!   { "name": "Policy",
//!     "associations": [
//!       { "name": "coverages", "target": "Coverage", "kind": "masterToDetail",
//!         "inverse": "Coverage.policy", "derivedUnion": true, "max": null } ] },
//!   { "name": "Coverage",
//!     "associations": [
//!       { "name": "policy", "target": "Policy", "kind": "detailToMaster",
//!         "inverse": "Policy.coverages" } ] } ] }
//! ```
//!
//! `max` defaults to 1; an explicit `null` means unbounded.

use anyhow::{Context, Result, anyhow, bail};
use modelgen_model::{AssociationId, AssociationKind, AttributeId, TypeGraph, TypeId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSnapshot {
    #[serde(default)]
    pub types: Vec<TypeSnapshot>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSnapshot {
    pub name: String,
    #[serde(default)]
    pub supertype: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeSnapshot>,
    #[serde(default)]
    pub associations: Vec<AssociationSnapshot>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSnapshot {
    pub name: String,
    #[serde(default)]
    pub datatype: String,
    /// `"Type.attribute"` of the overridden ancestor attribute.
    #[serde(default)]
    pub overrides: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapshotKind {
    #[default]
    Plain,
    MasterToDetail,
    DetailToMaster,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationSnapshot {
    pub name: String,
    pub target: String,
    #[serde(default)]
    pub kind: SnapshotKind,
    #[serde(default)]
    pub inverse: Option<String>,
    #[serde(default)]
    pub derived_union: bool,
    #[serde(default)]
    pub subset_of: Option<String>,
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub shared_host: Option<String>,
    #[serde(default)]
    pub min: u32,
    #[serde(default = "default_max")]
    pub max: Option<u32>,
}

fn default_max() -> Option<u32> {
    Some(1)
}

pub fn parse_snapshot(source: &str) -> Result<ModelSnapshot> {
    serde_json::from_str(source).context("invalid model snapshot")
}

pub fn load_snapshot(path: &Path) -> Result<ModelSnapshot> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model snapshot: {}", path.display()))?;
    parse_snapshot(&source)
        .with_context(|| format!("failed to parse model snapshot: {}", path.display()))
}

impl ModelSnapshot {
    /// Build the type graph.
    ///
    /// Types are declared first so members can reference types in any order.
    /// Member references are resolved once every member exists. An unknown
    /// shared host is kept as an unresolved host so resolution can report it;
    /// every other unknown reference is an error.
    pub fn to_graph(&self) -> Result<TypeGraph> {
        let mut graph = TypeGraph::new();
        for ty in &self.types {
            graph.add_type(ty.name.as_str())?;
        }

        for ty in &self.types {
            let id = type_id(&graph, &ty.name)?;
            if let Some(supertype) = &ty.supertype {
                let supertype = type_id(&graph, supertype)
                    .with_context(|| format!("supertype of '{}'", ty.name))?;
                graph.set_supertype(id, Some(supertype))?;
            }
            graph.set_abstract(id, ty.is_abstract)?;

            for attr in &ty.attributes {
                graph.add_attribute(id, attr.name.as_str(), attr.datatype.as_str())?;
            }
            for assoc in &ty.associations {
                let target = type_id(&graph, &assoc.target)
                    .with_context(|| format!("target of '{}.{}'", ty.name, assoc.name))?;
                let kind = match assoc.kind {
                    SnapshotKind::Plain => AssociationKind::Plain,
                    SnapshotKind::MasterToDetail => AssociationKind::master_to_detail(),
                    SnapshotKind::DetailToMaster => AssociationKind::detail_to_master(),
                };
                graph.add_association(id, assoc.name.as_str(), target, kind)?;
            }
        }

        for ty in &self.types {
            for attr in &ty.attributes {
                if let Some(overridden) = &attr.overrides {
                    let own = attribute_ref(&graph, &format!("{}.{}", ty.name, attr.name))?;
                    let overridden = attribute_ref(&graph, overridden)?;
                    graph.set_overrides(own, overridden)?;
                }
            }
            for assoc in &ty.associations {
                link_association(&mut graph, &ty.name, assoc)?;
            }
        }

        debug!(types = graph.type_count(), "snapshot loaded");
        Ok(graph)
    }
}

fn link_association(
    graph: &mut TypeGraph,
    owner: &str,
    snapshot: &AssociationSnapshot,
) -> Result<()> {
    let id = association_ref(graph, &format!("{owner}.{}", snapshot.name))?;

    if let Some(inverse) = &snapshot.inverse {
        let inverse = association_ref(graph, inverse)?;
        graph.set_inverse(id, inverse)?;
    }
    if snapshot.derived_union {
        graph.set_derived_union(id, true)?;
    }
    if let Some(union) = &snapshot.subset_of {
        let union = association_ref(graph, union)?;
        graph.set_subset_of(id, union)?;
    }
    if snapshot.shared {
        let host = match &snapshot.shared_host {
            Some(reference) => {
                let host = association_ref(graph, reference).ok();
                if host.is_none() {
                    warn!(
                        association = %format!("{owner}.{}", snapshot.name),
                        host = %reference,
                        "shared host does not resolve"
                    );
                }
                host
            }
            None => None,
        };
        graph.set_shared_host(id, host)?;
    } else if snapshot.shared_host.is_some() {
        bail!("'{owner}.{}' names a shared host but is not shared", snapshot.name);
    }
    graph.set_cardinality(id, snapshot.min, snapshot.max)?;
    Ok(())
}

fn type_id(graph: &TypeGraph, name: &str) -> Result<TypeId> {
    graph
        .type_by_name(name)
        .ok_or_else(|| anyhow!("unknown type '{name}'"))
}

fn split_member(reference: &str) -> Result<(&str, &str)> {
    reference
        .split_once('.')
        .ok_or_else(|| anyhow!("reference '{reference}' is not of the form 'Type.member'"))
}

fn attribute_ref(graph: &TypeGraph, reference: &str) -> Result<AttributeId> {
    let (owner, name) = split_member(reference)?;
    let owner = type_id(graph, owner)?;
    graph
        .attribute_by_name(owner, name)
        .ok_or_else(|| anyhow!("unknown attribute '{reference}'"))
}

fn association_ref(graph: &TypeGraph, reference: &str) -> Result<AssociationId> {
    let (owner, name) = split_member(reference)?;
    let owner = type_id(graph, owner)?;
    graph
        .association_by_name(owner, name)
        .ok_or_else(|| anyhow!("unknown association '{reference}'"))
}

#[cfg(test)]
#[path = "../tests/snapshot_tests.rs"]
mod snapshot_tests;
