//! Small helpers for adjacency rows (`Vec<Vec<Id>>` tables).
//!
//! Rows behave as ordered sets: insertion skips duplicates and removal drops
//! every occurrence. Relabelling goes through an id map applied exactly once
//! per affected row.

use std::collections::BTreeSet;

use crate::topology::ids::EntityId;

/// Appends `value` unless the row already contains it.
#[inline]
pub fn insert_unique<T: PartialEq>(row: &mut Vec<T>, value: T) -> bool {
    if row.contains(&value) {
        return false;
    }
    row.push(value);
    true
}

/// Removes every occurrence of `value`; returns whether anything was removed.
#[inline]
pub fn remove_value<T: PartialEq>(row: &mut Vec<T>, value: &T) -> bool {
    let before = row.len();
    row.retain(|x| x != value);
    row.len() != before
}

/// Rewrites every entry of `row` through `f`.
#[inline]
pub fn map_row<I: Copy>(row: &mut [I], f: impl Fn(I) -> I) {
    for x in row.iter_mut() {
        *x = f(*x);
    }
}

/// Involution exchanging `a` and `b`, identity elsewhere.
#[inline]
pub fn swap_map<I: EntityId>(a: I, b: I) -> impl Fn(I) -> I + Copy {
    move |x| {
        if x == a {
            b
        } else if x == b {
            a
        } else {
            x
        }
    }
}

/// Union of the rows `a` and `b` of `table`, plus the `extra` ids.
///
/// Used to gather the rows that must be relabelled exactly once when two ids
/// are exchanged.
pub fn affected<R: EntityId, I: EntityId>(
    table: &[Vec<I>],
    rows: [R; 2],
    extra: impl IntoIterator<Item = I>,
) -> BTreeSet<I> {
    let mut out: BTreeSet<I> = extra.into_iter().collect();
    for r in rows {
        if let Some(row) = table.get(r.idx()) {
            out.extend(row.iter().copied());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::ids::VertId;

    fn v(i: usize) -> VertId {
        VertId::new(i)
    }

    #[test]
    fn insert_and_remove() {
        let mut row = vec![v(1), v(2)];
        assert!(!insert_unique(&mut row, v(1)));
        assert!(insert_unique(&mut row, v(3)));
        assert!(remove_value(&mut row, &v(2)));
        assert!(!remove_value(&mut row, &v(9)));
        assert_eq!(row, vec![v(1), v(3)]);
    }

    #[test]
    fn swap_map_is_an_involution() {
        let f = swap_map(v(0), v(4));
        let mut row = vec![v(0), v(2), v(4)];
        map_row(&mut row, f);
        assert_eq!(row, vec![v(4), v(2), v(0)]);
        map_row(&mut row, f);
        assert_eq!(row, vec![v(0), v(2), v(4)]);
    }

    #[test]
    fn affected_collects_both_rows() {
        let table = vec![vec![v(1), v(2)], vec![v(2), v(3)], vec![v(4)]];
        let set = affected(&table, [v(0), v(2)], [v(0)]);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![v(0), v(1), v(2), v(4)]);
    }
}
