//! Taxonomy loading service
//!
//! Reads taxonomy documents (JSON or TOML, chosen by extension) and builds
//! validated, shareable trees.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{TaxonomyBuilder, TaxonomyDocument, TaxonomyTree};
use crate::infrastructure::traits::FileSystem;

/// Service for loading taxonomies supplied by the taxonomy collaborator.
pub struct TaxonomyService {
    fs: Arc<dyn FileSystem>,
    prune_self_named_children: bool,
}

impl TaxonomyService {
    pub fn new(fs: Arc<dyn FileSystem>, prune_self_named_children: bool) -> Self {
        Self {
            fs,
            prune_self_named_children,
        }
    }

    /// Parse a taxonomy document without building the tree.
    pub fn load_document(&self, path: &Path) -> ApplicationResult<TaxonomyDocument> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::InvalidTaxonomy {
                path: path.to_path_buf(),
                message: "no such file".to_string(),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read taxonomy", path)?;

        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        let parsed = if is_toml {
            toml::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| ApplicationError::InvalidTaxonomy {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Load and build a taxonomy tree.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Arc<TaxonomyTree>> {
        let document = self.load_document(path)?;
        let tree = TaxonomyBuilder::new()
            .prune_self_named_children(self.prune_self_named_children)
            .build(&document)
            .map_err(|e| ApplicationError::InvalidTaxonomy {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        debug!("loaded taxonomy '{}' ({} nodes)", tree.label(), tree.len());
        Ok(Arc::new(tree))
    }
}
