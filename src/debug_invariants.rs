//! Consistency checking for the incidence tables.
//!
//! Both mesh types implement [`DebugInvariants`]. Mutations call
//! [`DebugInvariants::check_after_edit`], which validates in debug builds,
//! with the `check-invariants` feature, or when the mesh was built with
//! [`MeshOptions::check_invariants`](crate::mesh::options::MeshOptions) set.

use crate::mesh_error::MeshError;

/// Validation of every adjacency table against its transpose, the simplex
/// lookups and the per-entity array lengths.
pub trait DebugInvariants {
    /// Panics on the first violation when invariant checking is compiled in.
    fn debug_assert_invariants(&self);

    /// Full scan. Returns the first violation found.
    fn validate_invariants(&self) -> Result<(), MeshError>;

    /// Post-mutation hook. `forced` makes the scan unconditional.
    fn check_after_edit(&self, forced: bool, mesh: &str) {
        if forced {
            if let Err(e) = self.validate_invariants() {
                panic!("[invariants] {mesh}: {e}");
            }
        } else {
            crate::debug_invariants!(self.validate_invariants(), "after edit");
        }
    }
}

/// Runs a fallible check and panics with context on error, but only when
/// invariant checking is compiled in.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
