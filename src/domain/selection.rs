//! Set of tagged names that remembers insertion order.

use std::collections::HashSet;

use crate::domain::arena::TaxonomyTree;

/// Currently tagged names of one selector.
///
/// Membership is what matters; the insertion order is kept only so that a
/// selector without an explicit order still displays deterministically.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from names, keeping the first occurrence of duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for name in names {
            set.insert(name);
        }
        set
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    /// Returns true if the name was not yet selected.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.members.insert(name.clone()) {
            self.order.push(name);
            true
        } else {
            false
        }
    }

    /// Returns true if the name was selected.
    pub fn remove(&mut self, name: &str) -> bool {
        if self.members.remove(name) {
            self.order.retain(|n| n != name);
            true
        } else {
            false
        }
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.order.retain(|name| keep(name));
        self.members = self.order.iter().cloned().collect();
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Names in `self` but not in `other`, in `self`'s insertion order.
    pub fn difference<'a>(&'a self, other: &'a SelectionSet) -> impl Iterator<Item = &'a str> {
        self.iter().filter(move |name| !other.contains(name))
    }

    /// Number of selected nodes in the subtree rooted at `name`, counting
    /// `name` itself. Unknown names count as zero.
    pub fn selected_descendant_count(&self, tree: &TaxonomyTree, name: &str) -> usize {
        let Some(idx) = tree.find(name) else {
            return 0;
        };
        let own = usize::from(self.contains(name));
        own + tree
            .descendants(idx)
            .into_iter()
            .filter_map(|d| tree.get_node(d))
            .filter(|node| self.contains(&node.data.name))
            .count()
    }
}

impl PartialEq for SelectionSet {
    /// Set equality; insertion order is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for SelectionSet {}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::from_names(iter)
    }
}
