//! Selection persistence service
//!
//! Loads a widget's stored name list, applies one selector operation and
//! writes the result back. Failed operations never touch the stored file.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::TaxonomyService;
use crate::application::{decode_stored, encode_stored, ApplicationError, ApplicationResult, IoResultExt};
use crate::config::{Settings, WidgetConfig};
use crate::domain::{Badge, CascadeOutcome, DomainError, NodePath, TagSelector};
use crate::infrastructure::traits::FileSystem;

/// Service that owns the load → mutate → save cycle for every widget.
pub struct SelectionService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
    taxonomy: TaxonomyService,
}

impl SelectionService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        let taxonomy = TaxonomyService::new(Arc::clone(&fs), settings.prune_self_named_children);
        Self {
            fs,
            settings,
            taxonomy,
        }
    }

    /// Configured widget names, sorted.
    pub fn widgets(&self) -> Vec<String> {
        self.settings.widgets.keys().cloned().collect()
    }

    fn widget(&self, widget: &str) -> ApplicationResult<&WidgetConfig> {
        self.settings
            .widgets
            .get(widget)
            .ok_or_else(|| ApplicationError::UnknownWidget(widget.to_string()))
    }

    /// Where a widget's selection is stored.
    pub fn state_path(&self, widget: &str) -> PathBuf {
        self.settings.data_dir.join(format!("{}.json", widget))
    }

    /// Load the selector of `widget` from its taxonomy and stored names.
    #[instrument(level = "debug", skip(self))]
    pub fn open(&self, widget: &str) -> ApplicationResult<TagSelector> {
        let config = self.widget(widget)?;
        let tree = self.taxonomy.load(&config.taxonomy)?;

        let path = self.state_path(widget);
        let names = if self.fs.exists(&path) {
            let raw = self
                .fs
                .read_to_string(&path)
                .with_path_context("read selection", &path)?;
            decode_stored(&raw)
        } else {
            debug!("no stored selection at {}", path.display());
            Vec::new()
        };

        Ok(TagSelector::from_stored(tree, &names, config.ordered))
    }

    /// Persist the selector's name list for `widget`.
    #[instrument(level = "debug", skip(self, selector))]
    pub fn save(&self, widget: &str, selector: &TagSelector) -> ApplicationResult<()> {
        let path = self.state_path(widget);
        let encoded = encode_stored(&selector.to_stored())?;
        self.fs
            .write_atomic(&path, &encoded)
            .with_path_context("write selection", &path)?;
        debug!("saved {} names to {}", selector.selection().len(), path.display());
        Ok(())
    }

    /// Open, apply `op`, and save only if `op` succeeded.
    pub fn update<T, F>(&self, widget: &str, op: F) -> ApplicationResult<(TagSelector, T)>
    where
        F: FnOnce(&mut TagSelector) -> Result<T, DomainError>,
    {
        let mut selector = self.open(widget)?;
        let result = op(&mut selector)?;
        self.save(widget, &selector)?;
        Ok((selector, result))
    }

    pub fn toggle(
        &self,
        widget: &str,
        path: &NodePath,
    ) -> ApplicationResult<(TagSelector, CascadeOutcome)> {
        self.update(widget, |selector| selector.toggle(path))
    }

    pub fn toggle_group(
        &self,
        widget: &str,
        paths: &[NodePath],
    ) -> ApplicationResult<(TagSelector, CascadeOutcome)> {
        self.update(widget, |selector| selector.toggle_group(paths))
    }

    pub fn reorder(&self, widget: &str, names: &[String]) -> ApplicationResult<TagSelector> {
        self.update(widget, |selector| {
            selector.reorder(names);
            Ok(())
        })
        .map(|(selector, _)| selector)
    }

    pub fn move_badge(&self, widget: &str, from: usize, to: usize) -> ApplicationResult<TagSelector> {
        self.update(widget, |selector| {
            selector.move_badge(from, to);
            Ok(())
        })
        .map(|(selector, _)| selector)
    }

    /// Drop stored names the taxonomy no longer contains; returns how many went.
    pub fn prune(&self, widget: &str) -> ApplicationResult<usize> {
        self.update(widget, |selector| {
            let before = selector.selection().len();
            selector.retain_known();
            Ok(before - selector.selection().len())
        })
        .map(|(_, removed)| removed)
    }

    pub fn clear(&self, widget: &str) -> ApplicationResult<()> {
        self.update(widget, |selector| {
            selector.clear();
            Ok(())
        })
        .map(|_| ())
    }

    pub fn badges(&self, widget: &str) -> ApplicationResult<Vec<Badge>> {
        Ok(self.open(widget)?.badges())
    }
}
