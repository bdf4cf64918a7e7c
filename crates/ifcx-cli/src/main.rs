// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `ifcx` command-line entry point.
//!
//! Loads IFCX files in federation order, composes them and prints the tree,
//! the layer list, or one node's flattened attributes. An empty composition
//! is not an error: the neutral status line is printed instead and the exit
//! code stays `0`.

// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod load;
mod render;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use ifcx_app_core::config::ConfigService;
use ifcx_app_core::prefs::WorkspacePrefs;
use ifcx_app_core::status::{StatusBoard, StatusKind};
use ifcx_config_fs::FsConfigStore;
use ifcx_core::Federation;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, ConfigArgs, Format};
use crate::render::Outline;

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn open_config(cli: &Cli) -> Result<ConfigService<FsConfigStore>> {
    let store = match &cli.config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    }
    .context("failed to open config store")?;
    tracing::debug!(dir = %store.base_dir().display(), "config store");
    Ok(ConfigService::new(store))
}

fn print_status(federation: &Federation) -> StatusBoard {
    let mut board = StatusBoard::default();
    board.record_report(federation.report());
    for line in board.lines() {
        let tag = match line.kind {
            StatusKind::Info => "info",
            StatusKind::Warn => "warn",
            StatusKind::Error => "error",
        };
        match &line.body {
            Some(body) => eprintln!("[{tag}] {}: {body}", line.title),
            None => eprintln!("[{tag}] {}", line.title),
        }
    }
    board
}

fn apply_config_flags(prefs: &mut WorkspacePrefs, args: &ConfigArgs) {
    if args.reset {
        *prefs = WorkspacePrefs::default();
    }
    if let Some(depth) = args.max_depth {
        prefs.composition.max_depth = depth;
    }
    if let Some(policy) = args.on_error {
        prefs.composition.on_error = policy.into();
    }
    if let Some(name) = &args.root_name {
        prefs.composition.synthetic_root_name.clone_from(name);
    }
    if let Some(validate) = args.validate_schemas {
        prefs.composition.validate_schemas = validate;
    }
    if let Some(show) = args.show_paths {
        prefs.tree.show_paths = show;
    }
    if let Some(show) = args.show_sources {
        prefs.tree.show_sources = show;
    }
}

fn run_config(
    service: &ConfigService<FsConfigStore>,
    prefs: WorkspacePrefs,
    args: &ConfigArgs,
) -> Result<()> {
    let prefs = if args.changes_anything() {
        let updated = service
            .update_prefs(|prefs| apply_config_flags(prefs, args))
            .context("failed to save preferences")?;
        let dir = service.store().base_dir();
        tracing::info!(dir = %dir.display(), "preferences updated");
        updated
    } else {
        prefs
    };
    println!("{}", serde_json::to_string_pretty(&prefs)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let service = open_config(&cli)?;
    let prefs = service.load_prefs().context("failed to load preferences")?;

    match &cli.command {
        Commands::Compose {
            layers,
            format,
            paths,
            sources,
        } => {
            let federation = load::federation_from_args(layers, prefs.composition.clone())?;
            let board = print_status(&federation);
            match (federation.composed_root(), format) {
                (Some(root), Format::Tree) => {
                    let mut tree = prefs.tree.clone();
                    tree.show_paths |= *paths;
                    tree.show_sources |= *sources;
                    print!("{}", Outline::new(root, &tree));
                }
                (Some(root), Format::Json) => println!("{}", serde_json::to_string_pretty(root)?),
                (None, Format::Tree) => {
                    let headline = board
                        .lines()
                        .next()
                        .map_or("no composition", |l| l.title.as_str());
                    println!("{headline}");
                }
                (None, Format::Json) => println!("null"),
            }
        }
        Commands::Layers { layers } => {
            let federation = load::federation_from_args(layers, prefs.composition.clone())?;
            println!("{}", render::layers_table(&federation.files()));
        }
        Commands::Inspect { layers, node } => {
            let federation = load::federation_from_args(layers, prefs.composition.clone())?;
            print_status(&federation);
            let root = federation
                .composed_root()
                .ok_or_else(|| anyhow!("nothing composed; cannot inspect `{node}`"))?;
            let target = root
                .find(node)
                .ok_or_else(|| anyhow!("no composed node at `{node}`"))?;
            let attributes = federation.flattened_attributes(target);
            println!("{}", render::attributes_table(&attributes));
        }
        Commands::Config(args) => run_config(&service, prefs, args)?,
    }
    Ok(())
}
