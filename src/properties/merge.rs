//! Field merge rules shared by run and lift properties.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{OptionExt, Result};

/// Merge preference for tri-state flags (`lit`, `gladed`, `bubble`, ...).
pub(crate) const BOOLEAN_PRIORITY: [Option<bool>; 3] = [Some(true), Some(false), None];

/// Pick the value that appears earliest in `table` among `values`.
///
/// Every value must have an entry in `table`; an unlisted value means a
/// variant was added without updating the table and is reported as
/// [`MissingPriority`](crate::ConsolidationError::MissingPriority).
pub(crate) fn pick_by_priority<T, I>(values: I, table: &[T], field: &'static str) -> Result<T>
where
    T: Copy + PartialEq + Debug,
    I: IntoIterator<Item = T>,
{
    let mut best: Option<usize> = None;
    for value in values {
        let rank = table
            .iter()
            .position(|candidate| *candidate == value)
            .ok_or_missing_priority(field, &value)?;
        best = Some(best.map_or(rank, |current| current.min(rank)));
    }
    let best = best.ok_or_empty_chain()?;
    Ok(table[best])
}

/// Join distinct, trimmed, non-empty strings with `", "` in first-seen order.
pub(crate) fn join_text<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut seen = HashSet::new();
    let parts: Vec<&str> = values
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|value| !value.is_empty() && seen.insert(*value))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// AND-fold of direction flags where `None` is the identity.
pub(crate) fn fold_oneway<I>(values: I) -> Option<bool>
where
    I: IntoIterator<Item = Option<bool>>,
{
    values
        .into_iter()
        .fold(None, |accumulator, current| match (accumulator, current) {
            (None, current) => current,
            (accumulator, None) => accumulator,
            (Some(a), Some(b)) => Some(a && b),
        })
}

/// Concatenate lists, keeping the first item seen for each key.
pub(crate) fn union_by_key<'a, T, K, I, F>(lists: I, key: F) -> Vec<T>
where
    T: Clone + 'a,
    K: Eq + Hash,
    I: IntoIterator<Item = &'a [T]>,
    F: Fn(&'a T) -> K,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for item in lists.into_iter().flatten() {
        if seen.insert(key(item)) {
            merged.push(item.clone());
        }
    }
    merged
}

/// First `Some` value, cloned.
pub(crate) fn first_non_null<'a, T, I>(values: I) -> Option<T>
where
    T: Clone + 'a,
    I: IntoIterator<Item = &'a Option<T>>,
{
    values.into_iter().find_map(|value| value.clone())
}
