//! Index types for mesh elements.
//!
//! Vertices, half-edges and faces live in arenas owned by the mesh and are
//! addressed by these type-safe wrappers. Links between elements (twin, next,
//! prev, incident face) are stored as indices, so splitting or contracting
//! edges only rewrites index fields and never invalidates other entries.

use std::fmt::{self, Debug};

/// Raw value used as the null index.
const INVALID: u32 = u32::MAX;

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe half-edge index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId(u32);

/// A type-safe face index.
///
/// The index doubles as the face's identity counter: the unbounded exterior
/// is always `F(0)` and the polygon's initial interior is `F(1)`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.0)
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(HalfEdgeId, "HE");
impl_index_type!(FaceId, "F");

impl FaceId {
    /// The unbounded face surrounding the polygon.
    pub const EXTERIOR: FaceId = FaceId(0);

    /// Whether this is the unbounded exterior face.
    #[inline]
    pub fn is_exterior(self) -> bool {
        self == Self::EXTERIOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let v = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert!(v.is_valid());
        assert!(!VertexId::invalid().is_valid());
    }

    #[test]
    fn test_exterior_face() {
        assert!(FaceId::new(0).is_exterior());
        assert!(!FaceId::new(1).is_exterior());
        assert!(!FaceId::invalid().is_exterior());
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", HalfEdgeId::new(7)), "HE(7)");
        assert_eq!(format!("{:?}", FaceId::invalid()), "F(INVALID)");
    }
}
