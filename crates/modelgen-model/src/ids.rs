//! Index identifiers into a [`TypeGraph`](crate::TypeGraph) arena.
//!
//! Every reference between model nodes (`supertype`, `overrides`, `inverse`,
//! `subset_of`, shared host) is one of these ids rather than a pointer, so a
//! supertype is a lookup key and never owns its subtypes.

use serde::Serialize;
use std::fmt;

/// Identifier of a [`TypeData`](crate::TypeData) node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

/// Identifier of an [`Attribute`](crate::Attribute) node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AttributeId(pub u32);

/// Identifier of an [`Association`](crate::Association) node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AssociationId(pub u32);

macro_rules! impl_index_id {
    ($($id:ident => $prefix:literal),* $(,)?) => {$(
        impl $id {
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }

        impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    )*};
}

impl_index_id! {
    TypeId => "type",
    AttributeId => "attribute",
    AssociationId => "association",
}
