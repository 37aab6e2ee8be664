//! Command implementations. Every command prints JSON to `out`.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use gogshelf_core::config::ShelfConfig;
use gogshelf_core::errors::{FlowError, StorageError};
use gogshelf_remote::{GogClient, GogClientConfig};
use gogshelf_scanner::archive::ArchiveLister;
use gogshelf_scanner::{Discoverer, DiscoveryOptions};
use gogshelf_storage::{Catalog, MetadataLayout};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::args::{CliArgs, Command};
use crate::flow::{refresh_metadata, set_override, ScanFlow};
use crate::scheduler::{Schedule, Scheduler};

/// Load the layered config for `project_dir` and run the command.
pub fn execute(cli: &CliArgs, project_dir: &Path, out: &mut dyn Write) -> Result<(), FlowError> {
    let config = ShelfConfig::load(project_dir, Some(&cli.overrides))?;
    run_command(&cli.command, &config, out)
}

pub fn run_command(
    command: &Command,
    config: &ShelfConfig,
    out: &mut dyn Write,
) -> Result<(), FlowError> {
    match command {
        Command::Scan => {
            let summary = ScanFlow::from_config(config)?.run();
            print_json(out, &summary)
        }
        Command::List => {
            let root = config.require_installer_root()?;
            let layout = metadata_layout(config)?;
            let discoverer = Discoverer::new(
                DiscoveryOptions::from_config(&config.scan),
                ArchiveLister::detect(),
            );
            let artifacts = discoverer.discover(&root);
            print_json(out, &Catalog::new(layout).list(&artifacts))
        }
        Command::Show { key } => {
            let record = Catalog::new(metadata_layout(config)?)
                .record_for_key(key)
                .ok_or_else(|| FlowError::NotFound(key.clone()))?;
            print_json(out, &record)
        }
        Command::Override {
            key,
            search_name,
            product_id,
        } => {
            let record = set_override(
                &metadata_layout(config)?,
                key,
                search_name.clone(),
                *product_id,
            )?;
            print_json(out, &json!({ "key": key, "override": record }))
        }
        Command::Refresh { key } => {
            let layout = metadata_layout(config)?;
            let client = GogClient::new(GogClientConfig::from_remote(&config.remote))?;
            let fetched = refresh_metadata(&layout, &client, key)?;
            print_json(
                out,
                &json!({
                    "key": key,
                    "product_id": fetched.product_id,
                    "title": fetched.title,
                }),
            )
        }
        Command::Daemon => run_daemon(config),
    }
}

fn metadata_layout(config: &ShelfConfig) -> Result<MetadataLayout, FlowError> {
    Ok(MetadataLayout::new(config.require_metadata_root()?))
}

/// Block forever, scanning on the configured schedule.
fn run_daemon(config: &ShelfConfig) -> Result<(), FlowError> {
    let schedule = Schedule::from_config(&config.schedule)?.ok_or_else(|| {
        FlowError::InvalidArgument(
            "no scan schedule configured (set GOG_SCAN_SCHEDULE or [schedule].expression)"
                .to_string(),
        )
    })?;
    let flow = Arc::new(ScanFlow::from_config(config)?);
    info!(
        schedule = %schedule,
        installer_root = %flow.installer_root().display(),
        "daemon started"
    );

    let job_flow = Arc::clone(&flow);
    let handle = Scheduler::start(schedule, move || {
        job_flow.run();
    })?;
    handle.wait();
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<(), FlowError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| StorageError::Serialize {
        path: "<stdout>".into(),
        message: e.to_string(),
    })?;
    writeln!(out, "{text}")?;
    Ok(())
}
