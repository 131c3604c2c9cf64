//! Command dispatch: maps parsed arguments onto the hierarchy service.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{CandidateCheck, HierarchyService};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{DomainError, Record};
use crate::infrastructure::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see --help".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");
    let container = ServiceContainer::new(settings);
    let svc = &container.hierarchy;

    match command {
        Commands::Tree { file } => tree(svc, file),
        Commands::Flatten { file } => flatten(svc, file),
        Commands::Ancestors { file, code } => ancestors(svc, file, code),
        Commands::Descendants { file, code } => descendants(svc, file, code),
        Commands::Depth { file, code } => depth(svc, file, code),
        Commands::Check {
            file,
            candidate,
            parent,
        } => check(svc, file, candidate.as_deref(), parent.as_deref()),
        Commands::Config => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(level = "debug", skip(svc))]
fn tree(svc: &HierarchyService, file: &Path) -> CliResult<()> {
    output::info(&svc.tree(file)?);
    Ok(())
}

#[instrument(level = "debug", skip(svc))]
fn flatten(svc: &HierarchyService, file: &Path) -> CliResult<()> {
    for info in svc.flatten(file)? {
        output::breadcrumb(&info.item.code, &info.breadcrumb);
    }
    Ok(())
}

#[instrument(level = "debug", skip(svc))]
fn ancestors(svc: &HierarchyService, file: &Path, code: &str) -> CliResult<()> {
    for ancestor in svc.ancestors(file, code)? {
        output::info(&ancestor);
    }
    Ok(())
}

#[instrument(level = "debug", skip(svc))]
fn descendants(svc: &HierarchyService, file: &Path, code: &str) -> CliResult<()> {
    for descendant in svc.descendants(file, code)? {
        output::info(&descendant);
    }
    Ok(())
}

#[instrument(level = "debug", skip(svc))]
fn depth(svc: &HierarchyService, file: &Path, code: &str) -> CliResult<()> {
    match svc.depth(file, code)? {
        Some(depth) => output::info(&depth),
        None => output::info("-1"),
    }
    Ok(())
}

#[instrument(level = "debug", skip(svc))]
fn check(
    svc: &HierarchyService,
    file: &Path,
    candidate: Option<&str>,
    parent: Option<&str>,
) -> CliResult<()> {
    let cycle_at = match candidate {
        Some(code) => {
            let record = Record {
                code: code.to_string(),
                parent: parent.map(str::to_string),
            };
            match svc.check_candidate(file, &record)? {
                CandidateCheck::Accepted => None,
                CandidateCheck::Cycle => Some(record.code),
            }
        }
        None => svc.find_cycle(file)?,
    };

    match cycle_at {
        None => {
            output::success("no cycles");
            Ok(())
        }
        Some(code) => {
            output::failure(&format!("cycle through {}", code));
            Err(ApplicationError::from(DomainError::CycleDetected { code }).into())
        }
    }
}
