//! Projection of selection + order into the displayed badge list.

use tracing::{debug, instrument};

use crate::domain::arena::TaxonomyTree;
use crate::domain::entities::Badge;
use crate::domain::order::OrderSequence;
use crate::domain::selection::SelectionSet;

/// Resolves selected names to `{name, path}` badges for display and
/// path-keyed color lookup. Never fails: names missing from the tree are
/// left out.
#[derive(Debug, Clone, Copy)]
pub struct BadgeProjector<'t> {
    tree: &'t TaxonomyTree,
}

impl<'t> BadgeProjector<'t> {
    pub fn new(tree: &'t TaxonomyTree) -> Self {
        Self { tree }
    }

    /// Badges in `order`, or in selection insertion order without one.
    #[instrument(level = "debug", skip_all)]
    pub fn project(&self, selection: &SelectionSet, order: Option<&OrderSequence>) -> Vec<Badge> {
        let names: Vec<&str> = match order {
            Some(order) => order.iter().collect(),
            None => selection.iter().collect(),
        };

        names
            .into_iter()
            .filter_map(|name| match self.tree.path_of(name) {
                Some(path) => Some(Badge {
                    name: name.to_string(),
                    path,
                }),
                None => {
                    debug!("no taxonomy node for {}, skipping badge", name);
                    None
                }
            })
            .collect()
    }

    /// Cleared state: empty selection and empty order.
    pub fn clear() -> (SelectionSet, OrderSequence) {
        (SelectionSet::new(), OrderSequence::new())
    }
}
