//! Lazily computed mesh aggregates and their invalidation.

use once_cell::sync::OnceCell;

/// Implemented by meshes that memoise whole-mesh quantities (bounding box,
/// total area or volume). Every mutation calls it once before returning.
pub trait InvalidateCache {
    /// Drop every memoised aggregate so the next query recomputes it.
    fn invalidate_cache(&mut self);
}

/// Drops a memoised value, returning whether one was present.
#[inline]
pub fn reset<T>(cell: &mut OnceCell<T>) -> bool {
    cell.take().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_forces_recompute() {
        let mut cell = OnceCell::new();
        let mut calls = 0;
        let mut get = |c: &OnceCell<f64>| {
            *c.get_or_init(|| {
                calls += 1;
                1.5
            })
        };
        assert_eq!(get(&cell), 1.5);
        assert_eq!(get(&cell), 1.5);
        assert!(reset(&mut cell));
        assert!(!reset(&mut cell));
        assert_eq!(get(&cell), 1.5);
        assert_eq!(calls, 2);
    }
}
