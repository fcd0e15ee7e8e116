//! Display order of selected names, kept apart from tree position.
//!
//! The order only ever changes in three ways: new selections are appended
//! (ancestors before descendants), deselected names are filtered out, and a
//! manual reorder replaces the sequence wholesale.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::domain::arena::TaxonomyTree;
use crate::domain::entities::NodePath;
use crate::domain::error::DomainError;
use crate::domain::selection::SelectionSet;

/// User-facing order of selected names. Each name appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSequence(Vec<String>);

impl OrderSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from names, keeping the first occurrence of duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::<String>::into).unique().collect())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|n| n == name)
    }

    /// The full list after dragging the item at `from` onto position `to`.
    ///
    /// Out-of-range indices leave the list as it is.
    pub fn moved(&self, from: usize, to: usize) -> Vec<String> {
        let mut names = self.0.clone();
        if from < names.len() && to < names.len() && from != to {
            let item = names.remove(from);
            names.insert(to, item);
        }
        names
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

/// Append newly selected names behind the existing order.
///
/// `added = new - prior` is sorted by depth (ancestors first), ties broken by
/// first appearance along `triggering_paths`, then by preorder position in
/// the tree. Names already present in `existing` keep their place.
#[instrument(level = "debug", skip_all)]
pub fn reconcile_insertion(
    prior: &SelectionSet,
    new: &SelectionSet,
    tree: &TaxonomyTree,
    triggering_paths: &[NodePath],
    existing: &OrderSequence,
) -> OrderSequence {
    let first_seen: HashMap<&str, usize> = triggering_paths
        .iter()
        .flat_map(|path| path.iter())
        .map(String::as_str)
        .unique()
        .enumerate()
        .map(|(pos, name)| (name, pos))
        .collect();

    let added: Vec<&str> = new
        .difference(prior)
        .filter(|name| !existing.contains(name))
        .sorted_by_key(|name| {
            (
                tree.depth_of(name).unwrap_or(usize::MAX),
                first_seen.get(name).copied().unwrap_or(usize::MAX),
                tree.preorder_position(name).unwrap_or(usize::MAX),
            )
        })
        .collect();
    debug!("appending {:?}", added);

    let mut names = existing.0.clone();
    names.extend(added.into_iter().map(str::to_string));
    OrderSequence(names)
}

/// Keep only names that are still selected, survivors in their relative order.
#[instrument(level = "debug", skip_all)]
pub fn reconcile_removal(selection: &SelectionSet, existing: &OrderSequence) -> OrderSequence {
    let names = existing
        .iter()
        .filter(|name| {
            let keep = selection.contains(name);
            if !keep {
                debug!("dropping {} from order", name);
            }
            keep
        })
        .map(str::to_string)
        .collect();
    OrderSequence(names)
}

/// Replace the order with a reordered list coming from the UI.
///
/// Stale names (no longer selected) are dropped and logged, duplicates
/// collapse to their first occurrence, and selected names missing from the
/// payload are appended in their `existing` order, then in selection order.
/// The result contains every selected name exactly once.
#[instrument(level = "debug", skip_all, fields(payload = reordered.len()))]
pub fn apply_manual_reorder(
    reordered: &[String],
    selection: &SelectionSet,
    existing: &OrderSequence,
) -> OrderSequence {
    let mut placed: HashSet<&str> = HashSet::new();
    let mut names: Vec<String> = Vec::with_capacity(selection.len());

    for name in reordered {
        if !selection.contains(name) {
            let healed = DomainError::InconsistentOrder { name: name.clone() };
            warn!("{}", healed);
            continue;
        }
        if placed.insert(name.as_str()) {
            names.push(name.clone());
        }
    }

    let missing: Vec<&str> = existing
        .iter()
        .chain(selection.iter())
        .filter(|name| selection.contains(name))
        .filter(|name| placed.insert(*name))
        .collect();
    if !missing.is_empty() {
        warn!("reorder payload omitted {:?}, appending", missing);
    }
    names.extend(missing.into_iter().map(str::to_string));

    OrderSequence(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_valid_indices_when_moving_then_item_lands_at_target() {
        let order = OrderSequence::from_names(["a", "b", "c", "d"]);
        assert_eq!(order.moved(0, 2), ["b", "c", "a", "d"]);
        assert_eq!(order.moved(3, 0), ["d", "a", "b", "c"]);
    }

    #[test]
    fn given_out_of_range_index_when_moving_then_unchanged() {
        let order = OrderSequence::from_names(["a", "b"]);
        assert_eq!(order.moved(5, 0), ["a", "b"]);
        assert_eq!(order.moved(1, 1), ["a", "b"]);
    }

    #[test]
    fn given_duplicate_names_when_building_order_then_deduplicated() {
        let order = OrderSequence::from_names(["a", "b", "a"]);
        assert_eq!(order.names(), ["a", "b"]);
    }
}
