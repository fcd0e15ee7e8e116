//! Command dispatch: one function per subcommand

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{CascadeOutcome, NodePath, TaxonomyRender};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;

    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config { command }) => _config(command, &project_dir),
        Some(command) => {
            let settings = Settings::load(Some(&project_dir))?;
            let container = ServiceContainer::new(settings);
            dispatch(&container, command)
        }
        None => Ok(()),
    }
}

/// Run a widget command against an assembled container.
pub fn dispatch(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Tree { widget, plain } => _tree(container, widget, *plain),
        Commands::Toggle { widget, path } => _toggle(container, widget, path),
        Commands::Group { widget, paths } => _group(container, widget, paths),
        Commands::Reorder { widget, names } => _reorder(container, widget, names),
        Commands::Move { widget, from, to } => _move(container, widget, *from, *to),
        Commands::Prune { widget } => _prune(container, widget),
        Commands::Clear { widget } => _clear(container, widget),
        Commands::Badges { widget, json } => _badges(container, widget, *json),
        Commands::Widgets => _widgets(container),
        Commands::Config { .. } | Commands::Completion { .. } => Err(CliError::Usage(
            "command does not operate on a widget".to_string(),
        )),
    }
}

fn resolve_project_dir(project_dir: Option<&Path>) -> CliResult<PathBuf> {
    match project_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("current directory", e))),
    }
}

fn parse_path(raw: &str) -> CliResult<NodePath> {
    raw.parse::<NodePath>()
        .map_err(|e| CliError::InvalidArgs(format!("'{}': {}", raw, e)))
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, widget: &str, plain: bool) -> CliResult<()> {
    let rendered = if plain {
        let config = container
            .settings
            .widgets
            .get(widget)
            .ok_or_else(|| ApplicationError::UnknownWidget(widget.to_string()))?;
        container.taxonomy.load(&config.taxonomy)?.to_tree_string()
    } else {
        let selector = container.selection.open(widget)?;
        selector.tree().to_marked_tree_string(selector.selection())
    };
    output::info(&rendered);
    Ok(())
}

fn print_outcome(outcome: &CascadeOutcome) {
    match outcome {
        CascadeOutcome::Selected { added } => added.iter().for_each(|name| output::diff_add(name)),
        CascadeOutcome::Deselected { removed } => removed.iter().for_each(|name| output::diff_remove(name)),
    }
    if outcome.names().is_empty() {
        output::detail("no change");
    }
}

#[instrument(skip(container))]
fn _toggle(container: &ServiceContainer, widget: &str, path: &str) -> CliResult<()> {
    let path = parse_path(path)?;
    let (_, outcome) = container.selection.toggle(widget, &path)?;
    print_outcome(&outcome);
    Ok(())
}

#[instrument(skip(container))]
fn _group(container: &ServiceContainer, widget: &str, paths: &[String]) -> CliResult<()> {
    let paths = paths
        .iter()
        .map(|raw| parse_path(raw))
        .collect::<CliResult<Vec<_>>>()?;
    let (_, outcome) = container.selection.toggle_group(widget, &paths)?;
    print_outcome(&outcome);
    Ok(())
}

#[instrument(skip(container))]
fn _reorder(container: &ServiceContainer, widget: &str, names: &[String]) -> CliResult<()> {
    let selector = container.selection.reorder(widget, names)?;
    if !selector.is_ordered() {
        output::warning(&format!("widget '{}' has ordering disabled", widget));
    }
    print_badges(&selector.badges());
    Ok(())
}

#[instrument(skip(container))]
fn _move(container: &ServiceContainer, widget: &str, from: usize, to: usize) -> CliResult<()> {
    let selector = container.selection.move_badge(widget, from, to)?;
    print_badges(&selector.badges());
    Ok(())
}

#[instrument(skip(container))]
fn _prune(container: &ServiceContainer, widget: &str) -> CliResult<()> {
    let removed = container.selection.prune(widget)?;
    output::action("Pruned", &format!("{} stale names from '{}'", removed, widget));
    Ok(())
}

#[instrument(skip(container))]
fn _clear(container: &ServiceContainer, widget: &str) -> CliResult<()> {
    container.selection.clear(widget)?;
    output::action("Cleared", &widget);
    Ok(())
}

fn print_badges(badges: &[crate::domain::Badge]) {
    if badges.is_empty() {
        output::detail("(nothing selected)");
    }
    for (position, badge) in badges.iter().enumerate() {
        output::badge(position, &badge.name, &badge.path);
    }
}

#[instrument(skip(container))]
fn _badges(container: &ServiceContainer, widget: &str, json: bool) -> CliResult<()> {
    let badges = container.selection.badges(widget)?;
    if json {
        let rendered = serde_json::to_string_pretty(&badges)
            .map_err(|e| CliError::Usage(format!("serialize badges: {}", e)))?;
        output::info(&rendered);
    } else {
        output::header(&widget);
        print_badges(&badges);
    }
    Ok(())
}

fn _widgets(container: &ServiceContainer) -> CliResult<()> {
    let widgets = container.selection.widgets();
    if widgets.is_empty() {
        output::warning("no widgets configured, see `flavortree config init`");
    }
    for name in widgets {
        if let Some(widget) = container.settings.widgets.get(&name) {
            let ordering = if widget.ordered { "ordered" } else { "unordered" };
            output::info(&format!("{}\t{}\t{}", name, ordering, widget.taxonomy.display()));
        }
    }
    Ok(())
}

fn _config(command: &ConfigCommands, project_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            output::action("Local", &local_config_path(project_dir).display());
        }
        ConfigCommands::Init { global } => {
            let target = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("no global config directory on this platform".to_string())
                })?
            } else {
                local_config_path(project_dir)
            };
            let fs = RealFileSystem;
            if fs.exists(&target) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    target.display()
                )));
            }
            debug!("writing config template to {}", target.display());
            fs.ensure_parent(&target)
                .and_then(|_| fs.write(&target, &Settings::template()))
                .map_err(|e| InfraError::io(format!("write {}", target.display()), e))?;
            output::action("Created", &target.display());
        }
    }
    Ok(())
}
