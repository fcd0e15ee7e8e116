//! Application services

pub mod selection;
pub mod taxonomy;

pub use selection::SelectionService;
pub use taxonomy::TaxonomyService;
