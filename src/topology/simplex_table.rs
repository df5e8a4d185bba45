//! Deduplicating storage for derived simplices (edges, triangular faces).
//!
//! Edges and faces are never authored directly: they are discovered from the
//! boundaries of polygons or cells. A [`SimplexTable`] stores each discovered
//! simplex once, in a dense array, together with a reverse lookup keyed by the
//! *sorted* vertex tuple. The stored tuple keeps the orientation in which the
//! simplex was first seen.
//!
//! The table only knows about ids and vertex tuples; incidence rows that point
//! at a simplex are maintained by the mesh that owns the table.

use hashbrown::HashMap;

use crate::topology::ids::{EntityId, VertId};

/// Dense simplex array plus sorted-tuple → id lookup.
#[derive(Clone, Debug)]
pub struct SimplexTable<I: EntityId, const K: usize> {
    verts: Vec<[VertId; K]>,
    lookup: HashMap<[VertId; K], I>,
}

impl<I: EntityId, const K: usize> Default for SimplexTable<I, K> {
    fn default() -> Self {
        Self {
            verts: Vec::new(),
            lookup: HashMap::new(),
        }
    }
}

/// Canonical (sorted) key for a vertex tuple.
#[inline]
pub fn canonical<const K: usize>(mut tuple: [VertId; K]) -> [VertId; K] {
    tuple.sort_unstable();
    tuple
}

impl<I: EntityId, const K: usize> SimplexTable<I, K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            verts: Vec::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.verts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    /// Vertex tuple of `id`, in first-seen orientation.
    ///
    /// # Panics
    /// Panics if `id` is out of range.
    #[inline]
    pub fn get(&self, id: I) -> [VertId; K] {
        self.verts[id.idx()]
    }

    #[inline]
    pub fn try_get(&self, id: I) -> Option<[VertId; K]> {
        self.verts.get(id.idx()).copied()
    }

    /// All stored tuples, indexed by id.
    #[inline]
    pub fn as_slice(&self) -> &[[VertId; K]] {
        &self.verts
    }

    /// Looks up the simplex spanned by `tuple`, in any vertex order.
    #[inline]
    pub fn find(&self, tuple: [VertId; K]) -> Option<I> {
        self.lookup.get(&canonical(tuple)).copied()
    }

    /// Returns the id of `tuple`, appending it if it was never seen.
    ///
    /// The boolean is `true` when a new simplex was created.
    pub fn insert(&mut self, tuple: [VertId; K]) -> (I, bool) {
        let key = canonical(tuple);
        if let Some(&id) = self.lookup.get(&key) {
            return (id, false);
        }
        let id = I::from_idx(self.verts.len());
        self.verts.push(tuple);
        self.lookup.insert(key, id);
        (id, true)
    }

    /// Exchanges the slots of `a` and `b`, keeping the lookup in sync.
    pub fn swap(&mut self, a: I, b: I) {
        if a == b {
            return;
        }
        self.verts.swap(a.idx(), b.idx());
        self.lookup.insert(canonical(self.verts[a.idx()]), a);
        self.lookup.insert(canonical(self.verts[b.idx()]), b);
    }

    /// Removes the last simplex and returns its tuple.
    pub fn pop(&mut self) -> Option<[VertId; K]> {
        let tuple = self.verts.pop()?;
        self.lookup.remove(&canonical(tuple));
        Some(tuple)
    }

    /// Rewrites the vertices of `id` through `f` and re-keys the lookup.
    ///
    /// Callers must apply this to every affected simplex before querying, as
    /// intermediate states may transiently share keys (e.g. while two vertex
    /// ids are being swapped).
    pub fn remap(&mut self, id: I, f: impl Fn(VertId) -> VertId) {
        let old = self.verts[id.idx()];
        if self.lookup.get(&canonical(old)) == Some(&id) {
            self.lookup.remove(&canonical(old));
        }
        let new = old.map(f);
        self.verts[id.idx()] = new;
        self.lookup.insert(canonical(new), id);
    }

    /// Replaces the stored orientation of `id` without changing its vertex set.
    pub fn reorient(&mut self, id: I, tuple: [VertId; K]) {
        debug_assert_eq!(canonical(tuple), canonical(self.verts[id.idx()]));
        self.verts[id.idx()] = tuple;
    }

    pub fn clear(&mut self) {
        self.verts.clear();
        self.lookup.clear();
    }

    /// Iterates `(id, tuple)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (I, [VertId; K])> + '_ {
        self.verts
            .iter()
            .enumerate()
            .map(|(i, t)| (I::from_idx(i), *t))
    }

    /// Checks that the lookup is the exact inverse of the dense array.
    pub fn is_consistent(&self) -> bool {
        self.lookup.len() == self.verts.len()
            && self
                .verts
                .iter()
                .enumerate()
                .all(|(i, t)| self.lookup.get(&canonical(*t)).map(|id| id.idx()) == Some(i))
    }
}
