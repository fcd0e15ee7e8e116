use std::collections::{HashMap, VecDeque};
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::NodePath;

/// Data payload for taxonomy nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Tag name, unique across the whole tree
    pub name: String,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Tree node in the arena-based taxonomy.
#[derive(Debug)]
pub struct TaxonomyNode {
    /// Tag data for this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for root categories
    pub parent: Option<Index>,
    /// Indices of child nodes in tree order
    pub children: Vec<Index>,
}

/// Arena-based, read-only taxonomy of taggable names.
///
/// Built once by [`TaxonomyBuilder`](crate::domain::TaxonomyBuilder) and then
/// shared (usually behind an `Arc`) by every selector that tags against it.
/// A taxonomy may have several root categories.
#[derive(Debug)]
pub struct TaxonomyTree {
    /// Label of the whole taxonomy, e.g. "Coffee"
    label: String,
    /// Arena storage for all tree nodes
    arena: Arena<TaxonomyNode>,
    /// Root categories in document order
    roots: Vec<Index>,
    /// Name lookup; names are unique once the builder has validated them
    by_name: HashMap<String, Index>,
    /// Preorder rank per name, assigned as the builder inserts nodes
    preorder: HashMap<String, usize>,
}

impl Default for TaxonomyTree {
    fn default() -> Self {
        Self::new("")
    }
}

impl TaxonomyTree {
    pub(crate) fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            arena: Arena::new(),
            roots: Vec::new(),
            by_name: HashMap::new(),
            preorder: HashMap::new(),
        }
    }

    /// Nodes must be inserted in preorder; ranks follow insertion.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let name = data.name.clone();
        let node = TaxonomyNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }
        let rank = self.preorder.len();
        self.preorder.entry(name.clone()).or_insert(rank);
        self.by_name.entry(name).or_insert(node_idx);

        node_idx
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn get_node(&self, idx: Index) -> Option<&TaxonomyNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Arena index of the node named `name`.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, name: &str) -> Option<Index> {
        self.by_name.get(name).copied()
    }

    /// Root-to-node path of an arena index.
    pub fn path_to(&self, idx: Index) -> NodePath {
        let mut segments = Vec::new();
        let mut current = Some(idx);
        while let Some(current_idx) = current {
            match self.get_node(current_idx) {
                Some(node) => {
                    segments.push(node.data.name.clone());
                    current = node.parent;
                }
                None => break,
            }
        }
        segments.reverse();
        NodePath::from(segments)
    }

    /// Root-to-node path of the first node named `name`.
    #[instrument(level = "trace", skip(self))]
    pub fn path_of(&self, name: &str) -> Option<NodePath> {
        self.find(name).map(|idx| self.path_to(idx))
    }

    /// Depth of `name` (root category = 0).
    pub fn depth_of(&self, name: &str) -> Option<usize> {
        let mut idx = *self.by_name.get(name)?;
        let mut depth = 0;
        while let Some(parent) = self.get_node(idx).and_then(|node| node.parent) {
            depth += 1;
            idx = parent;
        }
        Some(depth)
    }

    /// Every node below `idx` in preorder, excluding `idx` itself.
    pub fn descendants(&self, idx: Index) -> Vec<Index> {
        let mut result = Vec::new();
        let mut stack: Vec<Index> = match self.get_node(idx) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return result,
        };
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get_node(current) {
                result.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        result
    }

    /// Names of every node in the subtree below `name`, excluding `name`.
    #[instrument(level = "trace", skip(self))]
    pub fn descendant_names(&self, name: &str) -> Option<Vec<String>> {
        let idx = self.find(name)?;
        Some(
            self.descendants(idx)
                .into_iter()
                .filter_map(|d| self.get_node(d).map(|node| node.data.name.clone()))
                .collect(),
        )
    }

    /// Position of `name` in a preorder walk, used as a stable tie-break.
    pub fn preorder_position(&self, name: &str) -> Option<usize> {
        self.preorder.get(name).copied()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_breadth_first(&self) -> BreadthFirstIterator<'_> {
        BreadthFirstIterator::new(self)
    }

    /// Number of levels in the deepest branch; 0 for an empty taxonomy.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects the names of all nodes without children, in preorder.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.name.clone())
            .collect()
    }

    /// Paths of every node that has children, i.e. everything an
    /// "expand all" control has to open.
    #[instrument(level = "debug", skip(self))]
    pub fn expandable_paths(&self) -> Vec<NodePath> {
        self.iter()
            .filter(|(_, node)| !node.children.is_empty())
            .map(|(idx, _)| self.path_to(idx))
            .collect()
    }
}

/// Preorder (depth-first, left-to-right) traversal over all roots.
pub struct TreeIterator<'a> {
    tree: &'a TaxonomyTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a TaxonomyTree) -> Self {
        let stack = tree.roots().iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TaxonomyNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Level-by-level traversal over all roots.
pub struct BreadthFirstIterator<'a> {
    tree: &'a TaxonomyTree,
    queue: VecDeque<Index>,
}

impl<'a> BreadthFirstIterator<'a> {
    fn new(tree: &'a TaxonomyTree) -> Self {
        let queue = tree.roots().iter().copied().collect();
        Self { tree, queue }
    }
}

impl<'a> Iterator for BreadthFirstIterator<'a> {
    type Item = (Index, &'a TaxonomyNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.queue.pop_front() {
            if let Some(node) = self.tree.get_node(current_idx) {
                self.queue.extend(node.children.iter().copied());
                return Some((current_idx, node));
            }
        }
        None
    }
}
