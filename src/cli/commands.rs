//! Command dispatch

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{Metric, MetricReport};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, CatalogView, Settings};
use crate::domain::{preorder_indent, Catalog, TreeDisplay};
use crate::infrastructure::{InfraError, ServiceContainer};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `coursecat --help`".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let container = ServiceContainer::new(load_settings(cli)?);

    match command {
        Commands::Show { catalog, view } => show(&container, catalog, *view),
        Commands::Common { a, b, view } => common(&container, a, b, *view),
        Commands::Added {
            a,
            b,
            name_a,
            name_b,
            view,
        } => added(
            &container,
            a,
            b,
            name_a.as_deref(),
            name_b.as_deref(),
            *view,
        ),
        Commands::Stats { catalogs, metric } => stats(&container, catalogs, *metric),
        Commands::Config { command } => config(cli, &container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Settings from config files and environment, with `-C` applied last.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.data_dir.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

#[instrument(level = "debug", skip(container))]
fn show(container: &ServiceContainer, catalog: &str, view: Option<CatalogView>) -> CliResult<()> {
    let tree = container.catalogs.load(catalog)?;
    print_catalog(&tree, view.unwrap_or(container.settings.view))
}

#[instrument(level = "debug", skip(container))]
fn common(
    container: &ServiceContainer,
    a: &str,
    b: &str,
    view: Option<CatalogView>,
) -> CliResult<()> {
    let left = container.catalogs.load(a)?;
    let right = container.catalogs.load(b)?;
    let merged = container.offers.common(&left, &right)?;
    print_catalog(&merged, view.unwrap_or(container.settings.view))
}

#[instrument(level = "debug", skip(container))]
fn added(
    container: &ServiceContainer,
    a: &str,
    b: &str,
    name_a: Option<&str>,
    name_b: Option<&str>,
    view: Option<CatalogView>,
) -> CliResult<()> {
    let left = container.catalogs.load(a)?;
    let right = container.catalogs.load(b)?;
    let merged = container.offers.added(&left, &right, name_a, name_b)?;
    print_catalog(&merged, view.unwrap_or(container.settings.view))
}

#[instrument(level = "debug", skip(container))]
fn stats(container: &ServiceContainer, catalogs: &[String], metric: Metric) -> CliResult<()> {
    for name in catalogs {
        let catalog = container.catalogs.load(name)?;
        output::header(&format!("{} ({} courses)", name, catalog.len()));

        match container.offers.statistics(&catalog, metric) {
            MetricReport::Averages { dimension, groups } => {
                if groups.is_empty() {
                    output::warning(&format!("{name}: no courses"));
                }
                for (group, mean) in groups {
                    output::detail(&format!("{dimension} {group}: {mean:.2} students"));
                }
            }
            MetricReport::Income(total) => {
                output::detail(&format!("total income: {total:.2}"));
            }
        }
    }
    Ok(())
}

fn config(cli: &Cli, container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    let marker = |path: &Path| {
        if container.fs.exists(path) {
            ""
        } else {
            " (not found)"
        }
    };

    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}{}", path.display(), marker(&path))),
                None => output::warning("no home directory, global config disabled"),
            }
            if let Some(dir) = &cli.data_dir {
                let path = local_config_path(dir);
                output::info(&format!("local:  {}{}", path.display(), marker(&path)));
            }
        }
    }
    Ok(())
}

/// Write `catalog` to stdout in the requested view.
fn print_catalog(catalog: &Catalog, view: CatalogView) -> CliResult<()> {
    if catalog.is_empty() {
        output::warning("catalog is empty");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = match view {
        CatalogView::List => catalog
            .values()
            .try_for_each(|course| writeln!(out, "{course}")),
        CatalogView::Indent => write!(out, "{}", preorder_indent(catalog)),
        CatalogView::Tree => writeln!(out, "{}", catalog.to_tree_string()),
    };
    written.map_err(|e| InfraError::io("write catalog", e))?;
    Ok(())
}
