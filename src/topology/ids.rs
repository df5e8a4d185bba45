//! Strong, zero-cost index handles for mesh entities.
//!
//! Every tier of the mesh (vertices, edges, polygons, faces, cells) lives in a
//! dense array and is addressed by its position. Each tier gets its own
//! newtype so a polygon id can never be passed where a vertex id is expected.
//!
//! Ids are positions, not names: removal compacts the arrays by moving the
//! last element into the freed slot, so an id held across a structural
//! mutation may point at a different entity afterwards. Re-fetch ids after
//! every mutation.
//!
//! All handles are `repr(transparent)` over `usize`, order and hash like the
//! raw index, and serialise as a bare integer.

use std::fmt;

/// Common operations over all entity handles, used by the generic table code.
pub trait EntityId: Copy + Eq + Ord + std::hash::Hash + fmt::Debug {
    /// Wraps a raw array position.
    fn from_idx(idx: usize) -> Self;
    /// Returns the raw array position.
    fn idx(self) -> usize;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Wraps a raw array position.
            #[inline]
            pub const fn new(idx: usize) -> Self {
                $name(idx)
            }

            /// Returns the raw array position.
            #[inline]
            pub const fn idx(self) -> usize {
                self.0
            }
        }

        impl EntityId for $name {
            #[inline]
            fn from_idx(idx: usize) -> Self {
                $name(idx)
            }
            #[inline]
            fn idx(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(idx: usize) -> Self {
                $name(idx)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(id: $name) -> usize {
                id.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        /// Prints only the raw index.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Vertex handle.
    VertId
);
entity_id!(
    /// Edge handle; an edge is an unordered vertex pair.
    EdgeId
);
entity_id!(
    /// Polygon handle in a surface mesh.
    PolyId
);
entity_id!(
    /// Triangular face handle in a tetrahedral mesh.
    FaceId
);
entity_id!(
    /// Tetrahedral cell handle.
    CellId
);

/// Shorthand for a list of raw indices converted to typed handles.
pub fn ids<I: EntityId>(raw: &[usize]) -> Vec<I> {
    raw.iter().copied().map(I::from_idx).collect()
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::{assert_eq_align, assert_eq_size};

    assert_eq_size!(VertId, usize);
    assert_eq_size!(EdgeId, usize);
    assert_eq_size!(PolyId, usize);
    assert_eq_align!(CellId, usize);
}
