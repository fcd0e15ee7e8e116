//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{SelectionService, TaxonomyService};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub taxonomy: TaxonomyService,
    pub selection: SelectionService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let taxonomy = TaxonomyService::new(Arc::clone(&fs), settings.prune_self_named_children);
        let selection = SelectionService::new(Arc::clone(&fs), Arc::clone(&settings));

        Self {
            settings,
            fs,
            taxonomy,
            selection,
        }
    }
}
