//! Command dispatch: one function per subcommand

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::FeatureSelection;
use crate::cli::args::{Cli, Commands, ConfigCommands, ListArgs};
use crate::cli::output;
use crate::cli::render::{label, render_flattened, render_groups, TreeNodeConvert};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, OutputFormat, Settings};
use crate::domain::{
    ancestors, Characteristic, DomainError, Node, NodeId, StatusFilter,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `cattree --help`".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            completion(*shell);
            return Ok(());
        }
        Commands::Config { command } => return config(cli, command),
        _ => {}
    }

    let container = ServiceContainer::new(load_settings(cli)?);

    match command {
        Commands::Groups(args) => groups(&container, args),
        Commands::Flatten(args) => flatten(&container, args),
        Commands::Tree { all } => tree(&container, *all),
        Commands::Show { id } => show(&container, *id),
        Commands::Add {
            name,
            technical_name,
            kind,
            parent,
            limits,
        } => {
            let payload = Characteristic::new(name.as_str(), technical_name.as_str())
                .with_kind(*kind)
                .with_limits(*limits);
            add(&container, Node::new(0, *parent, payload))
        }
        Commands::Edit {
            id,
            name,
            technical_name,
            kind,
            parent,
            no_parent,
            limits,
        } => {
            let mut node = container.catalog.get(&container.actor(), *id)?;
            if let Some(name) = name {
                node.payload.name = name.clone();
            }
            if let Some(technical_name) = technical_name {
                node.payload.technical_name = technical_name.clone();
            }
            if let Some(kind) = kind {
                node.payload.kind = *kind;
            }
            if let Some(limits) = limits {
                node.payload.manages_limits = *limits;
            }
            if *no_parent {
                node.parent_id = None;
            } else if parent.is_some() {
                node.parent_id = *parent;
            }
            edit(&container, node)
        }
        Commands::Toggle { id } => toggle(&container, *id),
        Commands::Parents { id } => parents(&container, *id),
        Commands::Subscription { selected } => subscription(&container, selected),
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}

/// Settings from config files and env, then command line overrides.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = config_dir(cli)?;
    let mut settings = Settings::load(Some(&dir))?;
    if let Some(data) = &cli.data {
        settings.data_file = data.clone();
    }
    if let Some(user) = cli.user {
        settings.user_id = user;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn config_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

fn list_filter(container: &ServiceContainer, all: bool) -> StatusFilter {
    if all {
        StatusFilter::All
    } else {
        container.settings.status_filter()
    }
}

fn list_format(container: &ServiceContainer, args: &ListArgs) -> OutputFormat {
    args.format.unwrap_or(container.settings.format)
}

fn to_json(value: &impl serde::Serialize) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| InfraError::io("serialize output", io::Error::from(e)).into())
}

#[instrument(skip(container))]
fn groups(container: &ServiceContainer, args: &ListArgs) -> CliResult<()> {
    let snapshot = container
        .catalog
        .snapshot(&container.actor(), list_filter(container, args.all))?;
    let view = snapshot.groups();

    match list_format(container, args) {
        OutputFormat::Json => output::info(&to_json(&view)?),
        OutputFormat::Text if view.is_empty() => output::warning("catalog is empty"),
        OutputFormat::Text => {
            output::info(render_groups(&view, container.settings.indent).trim_end())
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn flatten(container: &ServiceContainer, args: &ListArgs) -> CliResult<()> {
    let snapshot = container
        .catalog
        .snapshot(&container.actor(), list_filter(container, args.all))?;
    let flat = snapshot.flattened();

    match list_format(container, args) {
        OutputFormat::Json => output::info(&to_json(&flat)?),
        OutputFormat::Text if flat.is_empty() => output::warning("catalog is empty"),
        OutputFormat::Text => {
            output::info(render_flattened(&flat, container.settings.indent).trim_end())
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn tree(container: &ServiceContainer, all: bool) -> CliResult<()> {
    let snapshot = container
        .catalog
        .snapshot(&container.actor(), list_filter(container, all))?;
    let forest = snapshot.forest();
    if forest.is_empty() {
        output::warning("catalog is empty");
        return Ok(());
    }
    output::info(forest.to_tree_string().to_string().trim_end());
    Ok(())
}

#[instrument(skip(container))]
fn show(container: &ServiceContainer, id: NodeId) -> CliResult<()> {
    let actor = container.actor();
    let node = container.catalog.get(&actor, id)?;
    let snapshot = container.catalog.snapshot(&actor, StatusFilter::All)?;

    let path = ancestors(snapshot.nodes(), id)
        .into_iter()
        .rev()
        .chain([id])
        .map(|a| format!("#{a}"))
        .join(" > ");

    output::header(&label(&node));
    output::detail(&format!("status: {}", node.payload.status));
    output::detail(&format!("kind: {}", node.payload.kind));
    output::detail(&format!("manages limits: {}", node.payload.manages_limits));
    match node.parent() {
        Some(parent) if snapshot.get(parent).is_none() => {
            output::detail(&format!("parent: #{parent} (missing)"))
        }
        Some(parent) => output::detail(&format!("parent: #{parent}")),
        None => output::detail("parent: none"),
    }
    output::detail(&format!("path: {path}"));
    Ok(())
}

#[instrument(skip(container))]
fn add(container: &ServiceContainer, draft: Node<Characteristic>) -> CliResult<()> {
    let id = container.catalog.save(&container.actor(), draft)?;
    output::success(&format!("created #{id}"));
    Ok(())
}

#[instrument(skip(container))]
fn edit(container: &ServiceContainer, node: Node<Characteristic>) -> CliResult<()> {
    let id = container.catalog.save(&container.actor(), node)?;
    output::success(&format!("updated #{id}"));
    Ok(())
}

#[instrument(skip(container))]
fn toggle(container: &ServiceContainer, id: NodeId) -> CliResult<()> {
    let status = container.catalog.toggle_status(&container.actor(), id)?;
    output::action("toggled", &format!("#{id} is now {status}"));
    Ok(())
}

#[instrument(skip(container))]
fn parents(container: &ServiceContainer, id: Option<NodeId>) -> CliResult<()> {
    let candidates = container.catalog.parent_candidates(&container.actor(), id)?;
    if candidates.is_empty() {
        output::warning("no parent candidates");
        return Ok(());
    }
    for candidate in &candidates {
        output::info(&label(candidate));
    }
    Ok(())
}

/// Parse `ID` or `ID=LIMIT`.
pub fn parse_selection(raw: &str) -> CliResult<(NodeId, Option<i64>)> {
    let invalid = || CliError::InvalidArgs(format!("expected ID or ID=LIMIT, got '{raw}'"));
    let (id, limit) = match raw.split_once('=') {
        Some((id, limit)) => (id, Some(limit)),
        None => (raw, None),
    };
    let id: NodeId = id.trim().parse().map_err(|_| invalid())?;
    let limit: Option<i64> = limit
        .map(|l| l.trim().parse())
        .transpose()
        .map_err(|_| invalid())?;
    Ok((id, limit))
}

#[instrument(skip(container))]
fn subscription(container: &ServiceContainer, selected: &[String]) -> CliResult<()> {
    let snapshot = container
        .catalog
        .snapshot(&container.actor(), StatusFilter::ActiveOnly)?;
    let mut selection = FeatureSelection::new();

    for raw in selected {
        let (id, limit) = parse_selection(raw)?;
        let node = snapshot.get(id).ok_or(DomainError::NodeNotFound(id))?;
        selection.toggle(node, true);
        if limit.is_some() {
            selection.set_limit(node, limit)?;
        }
    }

    output::info(&to_json(&selection.details(snapshot.nodes()))?);
    Ok(())
}

fn config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(settings.to_toml()?.trim_end());
        }
        ConfigCommands::Template => output::info(Settings::template().trim_end()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            let local = local_config_path(&config_dir(cli)?);
            output::action("local", &local.display());
        }
    }
    Ok(())
}

fn completion(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
}
