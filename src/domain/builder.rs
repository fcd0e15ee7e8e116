//! Tree builder turning taxonomy documents into validated arena trees.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, TaxonomyTree};
use crate::domain::entities::{NodePath, NodeSpec, TaxonomyDocument};
use crate::domain::error::DomainError;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs taxonomy trees and enforces global name uniqueness.
pub struct TaxonomyBuilder {
    prune_self_named_children: bool,
    seen_names: HashMap<String, NodePath>,
}

impl Default for TaxonomyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxonomyBuilder {
    pub fn new() -> Self {
        Self {
            prune_self_named_children: true,
            seen_names: HashMap::new(),
        }
    }

    /// Drop children that repeat their parent's name (and their subtrees)
    /// before validating uniqueness. Generated wheels contain such nodes.
    pub fn prune_self_named_children(mut self, enabled: bool) -> Self {
        self.prune_self_named_children = enabled;
        self
    }

    /// Build a tree from a document; the document's own name becomes the
    /// label, its children the root categories.
    #[instrument(level = "debug", skip(self, document), fields(label = %document.name))]
    pub fn build(&mut self, document: &TaxonomyDocument) -> TreeResult<TaxonomyTree> {
        self.seen_names.clear();

        let mut tree = TaxonomyTree::new(document.name.clone());
        let mut stack: Vec<(&NodeSpec, Option<generational_arena::Index>, NodePath)> = document
            .children
            .iter()
            .rev()
            .map(|spec| (spec, None, NodePath::default()))
            .collect();

        while let Some((spec, parent_idx, parent_path)) = stack.pop() {
            let name = spec.name.trim();
            if name.is_empty() {
                let parent = parent_path
                    .target()
                    .unwrap_or(document.name.as_str())
                    .to_string();
                return Err(DomainError::EmptyName { parent });
            }

            let path = parent_path.child(name);
            if let Some(first) = self.seen_names.get(name) {
                return Err(DomainError::DuplicateName {
                    name: name.to_string(),
                    first: first.clone(),
                    second: path,
                });
            }
            self.seen_names.insert(name.to_string(), path.clone());

            let current_idx = tree.insert_node(
                NodeData {
                    name: name.to_string(),
                },
                parent_idx,
            );

            // Reverse push keeps document order when popping
            for child in spec.children.iter().rev() {
                if self.prune_self_named_children && child.name.trim() == name {
                    debug!("pruning self-named child below {}", path);
                    continue;
                }
                stack.push((child, Some(current_idx), path.clone()));
            }
        }

        debug!("built taxonomy with {} nodes", tree.len());
        Ok(tree)
    }
}
