//! Per-widget tagging state: one selection, one optional order.

use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::domain::arena::TaxonomyTree;
use crate::domain::badges::BadgeProjector;
use crate::domain::cascade::{CascadeEngine, CascadeOutcome};
use crate::domain::entities::{Badge, NodePath};
use crate::domain::error::DomainError;
use crate::domain::order::{self, OrderSequence};
use crate::domain::selection::SelectionSet;

/// Coarse selector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    Empty,
    Populated,
}

/// Tagging state of one widget (flavors, body, adjectives, ...).
///
/// Owns its selection and, when ordering is enabled, the badge order. The
/// taxonomy is shared read-only. Every operation either applies completely
/// or returns an error with the state unchanged.
#[derive(Debug, Clone)]
pub struct TagSelector {
    tree: Arc<TaxonomyTree>,
    selection: SelectionSet,
    order: Option<OrderSequence>,
}

impl TagSelector {
    /// Empty selector; `ordered` enables a user-adjustable badge order.
    pub fn new(tree: Arc<TaxonomyTree>, ordered: bool) -> Self {
        Self {
            tree,
            selection: SelectionSet::new(),
            order: ordered.then(OrderSequence::new),
        }
    }

    /// Restore from a stored name list. The list becomes the order and its
    /// set the selection; names are not validated against the taxonomy.
    pub fn from_stored(tree: Arc<TaxonomyTree>, names: &[String], ordered: bool) -> Self {
        let selection = SelectionSet::from_names(names.iter().cloned());
        let order = ordered.then(|| OrderSequence::from_names(names.iter().cloned()));
        Self {
            tree,
            selection,
            order,
        }
    }

    pub fn tree(&self) -> &TaxonomyTree {
        &self.tree
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn order(&self) -> Option<&OrderSequence> {
        self.order.as_ref()
    }

    pub fn is_ordered(&self) -> bool {
        self.order.is_some()
    }

    pub fn state(&self) -> SelectorState {
        if self.selection.is_empty() {
            SelectorState::Empty
        } else {
            SelectorState::Populated
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selection.contains(name)
    }

    /// Selected nodes in the subtree of `name`, including itself.
    pub fn selected_count(&self, name: &str) -> usize {
        self.selection.selected_descendant_count(&self.tree, name)
    }

    /// Toggle the node at the end of `path` with cascade semantics.
    #[instrument(level = "debug", skip(self, path), fields(path = %path))]
    pub fn toggle(&mut self, path: &NodePath) -> Result<CascadeOutcome, DomainError> {
        let prior = self.selection.clone();
        let outcome = CascadeEngine::new(&self.tree).toggle(&mut self.selection, path)?;
        self.reconcile(&prior, &outcome, std::slice::from_ref(path));
        Ok(outcome)
    }

    /// Toggle several nodes as one unit.
    #[instrument(level = "debug", skip(self, paths))]
    pub fn toggle_group(&mut self, paths: &[NodePath]) -> Result<CascadeOutcome, DomainError> {
        let prior = self.selection.clone();
        let outcome = CascadeEngine::new(&self.tree).toggle_group(&mut self.selection, paths)?;
        self.reconcile(&prior, &outcome, paths);
        Ok(outcome)
    }

    fn reconcile(&mut self, prior: &SelectionSet, outcome: &CascadeOutcome, paths: &[NodePath]) {
        let Some(existing) = self.order.as_ref() else {
            return;
        };
        let next = match outcome {
            CascadeOutcome::Selected { .. } => {
                order::reconcile_insertion(prior, &self.selection, &self.tree, paths, existing)
            }
            CascadeOutcome::Deselected { .. } => order::reconcile_removal(&self.selection, existing),
        };
        debug!("order now {:?}", next.names());
        self.order = Some(next);
    }

    /// Replace the badge order with a reordered list from the UI.
    ///
    /// Without ordering the payload is ignored.
    #[instrument(level = "debug", skip(self, reordered))]
    pub fn reorder(&mut self, reordered: &[String]) {
        if let Some(existing) = self.order.as_ref() {
            self.order = Some(order::apply_manual_reorder(
                reordered,
                &self.selection,
                existing,
            ));
        } else {
            debug!("ordering disabled, ignoring reorder");
        }
    }

    /// Drag the badge at display position `from` to position `to`.
    ///
    /// Positions count displayed badges only; stored names the taxonomy no
    /// longer knows keep their slots in the order.
    pub fn move_badge(&mut self, from: usize, to: usize) {
        let mut stored = self.to_stored();
        let slots: Vec<usize> = stored
            .iter()
            .positions(|name| self.tree.contains(name))
            .collect();
        let displayed = OrderSequence::from_names(slots.iter().map(|&i| stored[i].clone()));
        for (slot, name) in slots.into_iter().zip(displayed.moved(from, to)) {
            stored[slot] = name;
        }
        self.reorder(&stored);
    }

    /// Remove every selected name for which `keep` returns false, e.g. names
    /// that a newer taxonomy no longer contains.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.selection.retain(keep);
        if let Some(existing) = self.order.as_ref() {
            self.order = Some(order::reconcile_removal(&self.selection, existing));
        }
    }

    /// Drop selected names the taxonomy does not know.
    pub fn retain_known(&mut self) {
        let tree = Arc::clone(&self.tree);
        self.retain(|name| tree.contains(name));
    }

    pub fn clear(&mut self) {
        let (selection, order) = BadgeProjector::clear();
        self.selection = selection;
        if self.order.is_some() {
            self.order = Some(order);
        }
        info!("selection cleared");
    }

    pub fn badges(&self) -> Vec<Badge> {
        BadgeProjector::new(&self.tree).project(&self.selection, self.order.as_ref())
    }

    /// The durable artifact: selected names in display order.
    pub fn to_stored(&self) -> Vec<String> {
        match &self.order {
            Some(order) => order.names().to_vec(),
            None => self.selection.names().to_vec(),
        }
    }
}
