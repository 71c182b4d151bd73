//! The type graph: an arena of model types, attributes and associations.
//!
//! A `TypeGraph` is filled by a model loader through the `add_*` and `set_*`
//! methods, then frozen (typically behind an `Arc`) for one generation run.
//! All links are validated when they are set, so any id stored inside the
//! graph always points at a node of the same graph.

use crate::ids::{AssociationId, AttributeId, TypeId};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::trace;

/// Errors raised while building a [`TypeGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("type '{0}' is declared twice")]
    DuplicateType(String),
    #[error("'{owner}' already declares a member named '{name}'")]
    DuplicateMember { owner: String, name: String },
    #[error("unknown {0}")]
    UnknownType(TypeId),
    #[error("unknown {0}")]
    UnknownAttribute(AttributeId),
    #[error("unknown {0}")]
    UnknownAssociation(AssociationId),
    #[error("attribute '{attribute}' cannot override '{overridden}': names differ")]
    OverrideNameMismatch {
        attribute: String,
        overridden: String,
    },
    #[error("association '{0}' is not a composition and cannot have an inverse")]
    NotAComposition(String),
    #[error("association '{0}' is not a detail-to-master composition and cannot be shared")]
    NotDetailToMaster(String),
}

/// A node of the single-inheritance hierarchy.
#[derive(Clone, Debug)]
pub struct TypeData {
    pub name: String,
    /// Non-owning reference to the direct supertype; `None` for a root.
    pub supertype: Option<TypeId>,
    pub is_abstract: bool,
    /// Attributes in declaration order.
    pub attributes: Vec<AttributeId>,
    /// Associations in declaration order.
    pub associations: Vec<AssociationId>,
}

#[derive(Clone, Debug)]
pub struct Attribute {
    pub name: String,
    pub owner: TypeId,
    pub datatype: String,
    /// Same-named attribute of an ancestor that this one replaces.
    pub overrides: Option<AttributeId>,
}

/// Whether a detail-to-master composition is backed by a host association.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Sharing {
    #[default]
    NotShared,
    /// `host` is `None` when the loader could not resolve the host.
    Shared { host: Option<AssociationId> },
}

/// Association kind with the fields that are only valid for that kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssociationKind {
    Plain,
    CompositionMasterToDetail {
        inverse: Option<AssociationId>,
    },
    CompositionDetailToMaster {
        inverse: Option<AssociationId>,
        sharing: Sharing,
    },
}

impl AssociationKind {
    pub const fn master_to_detail() -> Self {
        Self::CompositionMasterToDetail { inverse: None }
    }

    pub const fn detail_to_master() -> Self {
        Self::CompositionDetailToMaster {
            inverse: None,
            sharing: Sharing::NotShared,
        }
    }

    pub const fn is_composition(&self) -> bool {
        !matches!(self, Self::Plain)
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Plain => "association",
            Self::CompositionMasterToDetail { .. } => "master-to-detail",
            Self::CompositionDetailToMaster { .. } => "detail-to-master",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Association {
    pub name: String,
    pub owner: TypeId,
    pub target: TypeId,
    pub kind: AssociationKind,
    /// Abstract union that subtype associations may narrow.
    pub is_derived_union: bool,
    /// Derived union this association narrows.
    pub subset_of: Option<AssociationId>,
    pub min_cardinality: u32,
    /// `None` means unbounded (`*`).
    pub max_cardinality: Option<u32>,
}

impl Association {
    pub const fn inverse(&self) -> Option<AssociationId> {
        match self.kind {
            AssociationKind::Plain => None,
            AssociationKind::CompositionMasterToDetail { inverse }
            | AssociationKind::CompositionDetailToMaster { inverse, .. } => inverse,
        }
    }

    pub const fn is_composition_master_to_detail(&self) -> bool {
        matches!(self.kind, AssociationKind::CompositionMasterToDetail { .. })
    }

    pub const fn is_composition_detail_to_master(&self) -> bool {
        matches!(self.kind, AssociationKind::CompositionDetailToMaster { .. })
    }

    pub const fn is_shared(&self) -> bool {
        matches!(
            self.kind,
            AssociationKind::CompositionDetailToMaster {
                sharing: Sharing::Shared { .. },
                ..
            }
        )
    }

    /// Host association backing a shared detail-to-master composition.
    pub const fn shared_host(&self) -> Option<AssociationId> {
        match self.kind {
            AssociationKind::CompositionDetailToMaster {
                sharing: Sharing::Shared { host },
                ..
            } => host,
            _ => None,
        }
    }

    pub const fn is_to_many(&self) -> bool {
        match self.max_cardinality {
            Some(max) => max > 1,
            None => true,
        }
    }
}

/// Arena holding every node of one model snapshot.
#[derive(Clone, Debug, Default)]
pub struct TypeGraph {
    types: Vec<TypeData>,
    attributes: Vec<Attribute>,
    associations: Vec<Association>,
    types_by_name: FxHashMap<String, TypeId>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    pub fn add_type(&mut self, name: impl Into<String>) -> Result<TypeId, GraphError> {
        let name = name.into();
        if self.types_by_name.contains_key(&name) {
            return Err(GraphError::DuplicateType(name));
        }
        let id = TypeId::from_index(self.types.len());
        trace!(%id, name = %name, "TypeGraph::add_type");
        self.types_by_name.insert(name.clone(), id);
        self.types.push(TypeData {
            name,
            supertype: None,
            is_abstract: false,
            attributes: Vec::new(),
            associations: Vec::new(),
        });
        Ok(id)
    }

    pub fn add_attribute(
        &mut self,
        owner: TypeId,
        name: impl Into<String>,
        datatype: impl Into<String>,
    ) -> Result<AttributeId, GraphError> {
        let name = name.into();
        self.check_type(owner)?;
        if self.attribute_by_name(owner, &name).is_some() {
            return Err(GraphError::DuplicateMember {
                owner: self.types[owner.index()].name.clone(),
                name,
            });
        }
        let id = AttributeId::from_index(self.attributes.len());
        self.attributes.push(Attribute {
            name,
            owner,
            datatype: datatype.into(),
            overrides: None,
        });
        self.types[owner.index()].attributes.push(id);
        Ok(id)
    }

    pub fn add_association(
        &mut self,
        owner: TypeId,
        name: impl Into<String>,
        target: TypeId,
        kind: AssociationKind,
    ) -> Result<AssociationId, GraphError> {
        let name = name.into();
        self.check_type(owner)?;
        self.check_type(target)?;
        if self.association_by_name(owner, &name).is_some() {
            return Err(GraphError::DuplicateMember {
                owner: self.types[owner.index()].name.clone(),
                name,
            });
        }
        let id = AssociationId::from_index(self.associations.len());
        self.associations.push(Association {
            name,
            owner,
            target,
            kind,
            is_derived_union: false,
            subset_of: None,
            min_cardinality: 0,
            max_cardinality: Some(1),
        });
        self.types[owner.index()].associations.push(id);
        Ok(id)
    }

    /// Link `ty` to its supertype. Cycles are not rejected here; see
    /// [`TypeGraph::check_hierarchy`].
    pub fn set_supertype(
        &mut self,
        ty: TypeId,
        supertype: Option<TypeId>,
    ) -> Result<(), GraphError> {
        self.check_type(ty)?;
        if let Some(supertype) = supertype {
            self.check_type(supertype)?;
        }
        self.types[ty.index()].supertype = supertype;
        Ok(())
    }

    pub fn set_abstract(&mut self, ty: TypeId, is_abstract: bool) -> Result<(), GraphError> {
        self.check_type(ty)?;
        self.types[ty.index()].is_abstract = is_abstract;
        Ok(())
    }

    pub fn set_overrides(
        &mut self,
        attribute: AttributeId,
        overridden: AttributeId,
    ) -> Result<(), GraphError> {
        self.check_attribute(attribute)?;
        self.check_attribute(overridden)?;
        let own = &self.attributes[attribute.index()];
        let other = &self.attributes[overridden.index()];
        if own.name != other.name {
            return Err(GraphError::OverrideNameMismatch {
                attribute: self.qualified_attribute_name(attribute),
                overridden: self.qualified_attribute_name(overridden),
            });
        }
        self.attributes[attribute.index()].overrides = Some(overridden);
        Ok(())
    }

    /// Set the inverse of a composition. Only `association` is updated; loaders
    /// link both directions explicitly.
    pub fn set_inverse(
        &mut self,
        association: AssociationId,
        inverse: AssociationId,
    ) -> Result<(), GraphError> {
        self.check_association(association)?;
        self.check_association(inverse)?;
        let name = self.qualified_association_name(association);
        match &mut self.associations[association.index()].kind {
            AssociationKind::Plain => return Err(GraphError::NotAComposition(name)),
            AssociationKind::CompositionMasterToDetail { inverse: slot }
            | AssociationKind::CompositionDetailToMaster { inverse: slot, .. } => {
                *slot = Some(inverse);
            }
        }
        Ok(())
    }

    /// Link a master-to-detail / detail-to-master pair in both directions.
    pub fn link_composition(
        &mut self,
        master_to_detail: AssociationId,
        detail_to_master: AssociationId,
    ) -> Result<(), GraphError> {
        self.set_inverse(master_to_detail, detail_to_master)?;
        self.set_inverse(detail_to_master, master_to_detail)
    }

    pub fn set_derived_union(
        &mut self,
        association: AssociationId,
        is_derived_union: bool,
    ) -> Result<(), GraphError> {
        self.check_association(association)?;
        self.associations[association.index()].is_derived_union = is_derived_union;
        Ok(())
    }

    /// Record that `association` narrows `union`. Whether `union` really is a
    /// derived union is checked during resolution, not here.
    pub fn set_subset_of(
        &mut self,
        association: AssociationId,
        union: AssociationId,
    ) -> Result<(), GraphError> {
        self.check_association(association)?;
        self.check_association(union)?;
        self.associations[association.index()].subset_of = Some(union);
        Ok(())
    }

    /// Mark a detail-to-master composition as shared, backed by `host`.
    pub fn set_shared_host(
        &mut self,
        association: AssociationId,
        host: Option<AssociationId>,
    ) -> Result<(), GraphError> {
        self.check_association(association)?;
        if let Some(host) = host {
            self.check_association(host)?;
        }
        let name = self.qualified_association_name(association);
        match &mut self.associations[association.index()].kind {
            AssociationKind::CompositionDetailToMaster { sharing, .. } => {
                *sharing = Sharing::Shared { host };
                Ok(())
            }
            _ => Err(GraphError::NotDetailToMaster(name)),
        }
    }

    pub fn set_cardinality(
        &mut self,
        association: AssociationId,
        min: u32,
        max: Option<u32>,
    ) -> Result<(), GraphError> {
        self.check_association(association)?;
        let assoc = &mut self.associations[association.index()];
        assoc.min_cardinality = min;
        assoc.max_cardinality = max;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn contains_type(&self, ty: TypeId) -> bool {
        ty.index() < self.types.len()
    }

    pub fn get_type(&self, ty: TypeId) -> Option<&TypeData> {
        self.types.get(ty.index())
    }

    pub fn get_attribute(&self, attribute: AttributeId) -> Option<&Attribute> {
        self.attributes.get(attribute.index())
    }

    pub fn get_association(&self, association: AssociationId) -> Option<&Association> {
        self.associations.get(association.index())
    }

    /// # Panics
    /// If `ty` was not allocated by this graph.
    pub fn type_data(&self, ty: TypeId) -> &TypeData {
        &self.types[ty.index()]
    }

    /// # Panics
    /// If `attribute` was not allocated by this graph.
    pub fn attribute(&self, attribute: AttributeId) -> &Attribute {
        &self.attributes[attribute.index()]
    }

    /// # Panics
    /// If `association` was not allocated by this graph.
    pub fn association(&self, association: AssociationId) -> &Association {
        &self.associations[association.index()]
    }

    pub fn supertype(&self, ty: TypeId) -> Option<TypeId> {
        self.get_type(ty).and_then(|data| data.supertype)
    }

    pub fn type_by_name(&self, name: &str) -> Option<TypeId> {
        self.types_by_name.get(name).copied()
    }

    pub fn attribute_by_name(&self, owner: TypeId, name: &str) -> Option<AttributeId> {
        self.get_type(owner)?
            .attributes
            .iter()
            .copied()
            .find(|&id| self.attributes[id.index()].name == name)
    }

    pub fn association_by_name(&self, owner: TypeId, name: &str) -> Option<AssociationId> {
        self.get_type(owner)?
            .associations
            .iter()
            .copied()
            .find(|&id| self.associations[id.index()].name == name)
    }

    /// All types in insertion order.
    pub fn types(&self) -> impl Iterator<Item = (TypeId, &TypeData)> + '_ {
        self.types
            .iter()
            .enumerate()
            .map(|(index, data)| (TypeId::from_index(index), data))
    }

    pub fn type_name(&self, ty: TypeId) -> &str {
        self.get_type(ty).map_or("<unknown>", |data| data.name.as_str())
    }

    /// `Owner.attribute`, used to address diagnostics.
    pub fn qualified_attribute_name(&self, attribute: AttributeId) -> String {
        match self.get_attribute(attribute) {
            Some(attr) => format!("{}.{}", self.type_name(attr.owner), attr.name),
            None => attribute.to_string(),
        }
    }

    /// `Owner.association`, used to address diagnostics.
    pub fn qualified_association_name(&self, association: AssociationId) -> String {
        match self.get_association(association) {
            Some(assoc) => format!("{}.{}", self.type_name(assoc.owner), assoc.name),
            None => association.to_string(),
        }
    }

    fn check_type(&self, ty: TypeId) -> Result<(), GraphError> {
        if self.contains_type(ty) {
            Ok(())
        } else {
            Err(GraphError::UnknownType(ty))
        }
    }

    fn check_attribute(&self, attribute: AttributeId) -> Result<(), GraphError> {
        if attribute.index() < self.attributes.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownAttribute(attribute))
        }
    }

    fn check_association(&self, association: AssociationId) -> Result<(), GraphError> {
        if association.index() < self.associations.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownAssociation(association))
        }
    }
}

#[cfg(test)]
#[path = "../tests/graph_tests.rs"]
mod graph_tests;
