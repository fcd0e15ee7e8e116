//! Domain layer: taxonomy, selection and ordering logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod badges;
pub mod builder;
pub mod cascade;
pub mod entities;
pub mod error;
pub mod order;
pub mod render;
pub mod selection;
pub mod selector;

pub use arena::{NodeData, TaxonomyNode, TaxonomyTree};
pub use badges::BadgeProjector;
pub use builder::{TaxonomyBuilder, TreeResult};
pub use cascade::{CascadeEngine, CascadeOutcome};
pub use entities::*;
pub use error::DomainError;
pub use order::{apply_manual_reorder, reconcile_insertion, reconcile_removal, OrderSequence};
pub use render::TaxonomyRender;
pub use selection::SelectionSet;
pub use selector::{SelectorState, TagSelector};
