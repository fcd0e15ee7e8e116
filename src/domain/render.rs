/*
Rendering lives in a trait so the termtree dependency stays out of the arena
and a selection can be overlaid without the tree knowing about it.
 */
use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::TaxonomyTree;
use crate::domain::selection::SelectionSet;

pub trait TaxonomyRender {
    fn to_tree_string(&self) -> Tree<String>;

    /// Same tree with `[x]` marks and per-node selected counts.
    fn to_marked_tree_string(&self, selection: &SelectionSet) -> Tree<String>;
}

impl TaxonomyRender for TaxonomyTree {
    fn to_tree_string(&self) -> Tree<String> {
        render(self, &|_, name| name.to_string())
    }

    fn to_marked_tree_string(&self, selection: &SelectionSet) -> Tree<String> {
        render(self, &|tree, name| {
            let mark = if selection.contains(name) { "[x]" } else { "[ ]" };
            match selection.selected_descendant_count(tree, name) {
                0 => format!("{} {}", mark, name),
                count => format!("{} {} ({})", mark, name, count),
            }
        })
    }
}

fn render(tree: &TaxonomyTree, label: &dyn Fn(&TaxonomyTree, &str) -> String) -> Tree<String> {
    fn build_tree(
        tree: &TaxonomyTree,
        node_idx: Index,
        label: &dyn Fn(&TaxonomyTree, &str) -> String,
    ) -> Tree<String> {
        match tree.get_node(node_idx) {
            Some(node) => {
                let leaves: Vec<_> = node
                    .children
                    .iter()
                    .map(|&child| build_tree(tree, child, label))
                    .collect();
                Tree::new(label(tree, &node.data.name)).with_leaves(leaves)
            }
            None => Tree::new(String::new()),
        }
    }

    let root_label = if tree.is_empty() {
        "Empty taxonomy".to_string()
    } else {
        tree.label().to_string()
    };
    let leaves: Vec<_> = tree
        .roots()
        .iter()
        .map(|&root| build_tree(tree, root, label))
        .collect();
    Tree::new(root_label).with_leaves(leaves)
}
