//! Cascading select/deselect over a [`SelectionSet`].
//!
//! Selecting a node tags every ancestor on its path; deselecting a node
//! untags its whole subtree but leaves the ancestors alone.

use tracing::{debug, instrument};

use crate::domain::arena::TaxonomyTree;
use crate::domain::entities::NodePath;
use crate::domain::error::DomainError;
use crate::domain::selection::SelectionSet;

/// What a toggle did to the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeOutcome {
    /// Names that were newly added, in path order
    Selected { added: Vec<String> },
    /// Names that were removed: the target first, then its subtree in preorder
    Deselected { removed: Vec<String> },
}

impl CascadeOutcome {
    pub fn is_selection(&self) -> bool {
        matches!(self, CascadeOutcome::Selected { .. })
    }

    /// Names touched by the cascade, regardless of direction.
    pub fn names(&self) -> &[String] {
        match self {
            CascadeOutcome::Selected { added } => added,
            CascadeOutcome::Deselected { removed } => removed,
        }
    }
}

/// Applies cascade semantics against a read-only taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct CascadeEngine<'t> {
    tree: &'t TaxonomyTree,
}

impl<'t> CascadeEngine<'t> {
    pub fn new(tree: &'t TaxonomyTree) -> Self {
        Self { tree }
    }

    /// Toggle the node at the end of `path`.
    ///
    /// Rejected calls leave `selection` untouched.
    #[instrument(level = "debug", skip(self, selection, path), fields(path = %path))]
    pub fn toggle(
        &self,
        selection: &mut SelectionSet,
        path: &NodePath,
    ) -> Result<CascadeOutcome, DomainError> {
        let target = self.validate(path)?;
        if selection.contains(target) {
            Ok(CascadeOutcome::Deselected {
                removed: self.deselect(selection, target),
            })
        } else {
            Ok(CascadeOutcome::Selected {
                added: Self::select(selection, path),
            })
        }
    }

    /// Toggle a group of nodes as one unit.
    ///
    /// When every target is already selected the whole group is deselected,
    /// otherwise every path is selected. All paths are validated before any
    /// change is made.
    #[instrument(level = "debug", skip(self, selection, paths), fields(group = paths.len()))]
    pub fn toggle_group(
        &self,
        selection: &mut SelectionSet,
        paths: &[NodePath],
    ) -> Result<CascadeOutcome, DomainError> {
        let targets = paths
            .iter()
            .map(|path| self.validate(path))
            .collect::<Result<Vec<_>, _>>()?;

        let all_selected = !targets.is_empty() && targets.iter().all(|t| selection.contains(t));
        if all_selected {
            let removed = targets
                .iter()
                .flat_map(|target| self.deselect(selection, target))
                .collect();
            Ok(CascadeOutcome::Deselected { removed })
        } else {
            let added = paths
                .iter()
                .flat_map(|path| Self::select(selection, path))
                .collect();
            Ok(CascadeOutcome::Selected { added })
        }
    }

    /// Check that `path` is the taxonomy's own root-to-node path for its
    /// target and return the target.
    fn validate<'p>(&self, path: &'p NodePath) -> Result<&'p str, DomainError> {
        let target = path.target().ok_or(DomainError::EmptyPath)?;
        let expected = self
            .tree
            .path_of(target)
            .ok_or_else(|| DomainError::UnknownNode(target.to_string()))?;
        if &expected != path {
            return Err(DomainError::InvalidPath {
                given: path.clone(),
                expected,
            });
        }
        Ok(target)
    }

    fn select(selection: &mut SelectionSet, path: &NodePath) -> Vec<String> {
        let added: Vec<String> = path
            .iter()
            .filter(|name| selection.insert(name.as_str()))
            .cloned()
            .collect();
        debug!("selected {:?}", added);
        added
    }

    fn deselect(&self, selection: &mut SelectionSet, target: &str) -> Vec<String> {
        if !selection.contains(target) {
            return Vec::new();
        }
        let subtree = self.tree.descendant_names(target).unwrap_or_default();
        let removed: Vec<String> = std::iter::once(target.to_string())
            .chain(subtree)
            .filter(|name| selection.remove(name))
            .collect();
        debug!("deselected {:?}", removed);
        removed
    }
}
