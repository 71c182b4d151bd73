use modelgen_common::{Diagnostic, diagnostic_codes};
use modelgen_model::{AssociationId, TypeGraph, TypeId};
use thiserror::Error;

/// Errors raised by hierarchy and association resolution.
///
/// `CyclicHierarchy` and `HierarchyTooDeep` are structural and abort
/// resolution of the affected type. The association-level variants are reported for a single
/// association/type pair; resolvers that work over a whole type turn them
/// into diagnostics and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("cyclic supertype chain through type '{type_name}'")]
    CyclicHierarchy { type_name: String },

    #[error("supertype chain of type '{type_name}' is longer than the {limit} types of the model")]
    HierarchyTooDeep { type_name: String, limit: u32 },

    #[error("composition '{association}' has no inverse association")]
    MissingInverseAssociation { association: String },

    #[error("association '{association}' subsets '{subset_of}', which is not a derived union")]
    DanglingSubsetReference {
        association: String,
        subset_of: String,
    },

    #[error("unknown {0}")]
    UnknownType(TypeId),

    #[error("unknown {0}")]
    UnknownAssociation(AssociationId),
}

impl ResolveError {
    pub(crate) fn cyclic(graph: &TypeGraph, ty: TypeId) -> Self {
        Self::CyclicHierarchy {
            type_name: graph.type_name(ty).to_string(),
        }
    }

    pub(crate) fn too_deep(graph: &TypeGraph, ty: TypeId, limit: u32) -> Self {
        Self::HierarchyTooDeep {
            type_name: graph.type_name(ty).to_string(),
            limit,
        }
    }

    pub(crate) fn missing_inverse(graph: &TypeGraph, association: AssociationId) -> Self {
        Self::MissingInverseAssociation {
            association: graph.qualified_association_name(association),
        }
    }

    pub(crate) fn dangling_subset(
        graph: &TypeGraph,
        association: AssociationId,
        subset_of: AssociationId,
    ) -> Self {
        Self::DanglingSubsetReference {
            association: graph.qualified_association_name(association),
            subset_of: graph.qualified_association_name(subset_of),
        }
    }

    /// Structural errors make the whole model ungeneratable.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::CyclicHierarchy { .. } | Self::HierarchyTooDeep { .. }
        )
    }

    /// Diagnostic record for the offending model element.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::CyclicHierarchy { type_name } => Diagnostic::from_code(
                type_name.as_str(),
                diagnostic_codes::CYCLIC_HIERARCHY,
                &[type_name.as_str()],
            ),
            Self::HierarchyTooDeep { type_name, limit } => Diagnostic::from_code(
                type_name.as_str(),
                diagnostic_codes::HIERARCHY_TOO_DEEP,
                &[type_name.as_str(), limit.to_string().as_str()],
            ),
            Self::MissingInverseAssociation { association } => Diagnostic::from_code(
                association.as_str(),
                diagnostic_codes::MISSING_INVERSE_ASSOCIATION,
                &[association.as_str()],
            ),
            Self::DanglingSubsetReference {
                association,
                subset_of,
            } => Diagnostic::from_code(
                association.as_str(),
                diagnostic_codes::DANGLING_SUBSET_REFERENCE,
                &[association.as_str(), subset_of.as_str()],
            )
            .with_related(subset_of.as_str(), "referenced as derived union here"),
            Self::UnknownType(_) | Self::UnknownAssociation(_) => {
                Diagnostic::error("<model>", self.to_string(), 0)
            }
        }
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;
