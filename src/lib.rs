// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod resource;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::Manifest;
use crate::engine::{Plan, instantiate};
use crate::resource::FactoryRegistry;

pub use crate::engine::{Engine, EngineConfig, ErrorMap, SyncContext, SyncReport};
pub use crate::errors::{SyncError, ValidationError};
pub use crate::resource::{Dependency, Resource};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - manifest loading
/// - resource construction through the built-in factory registry
/// - one engine sync (or a dry-run plan)
/// - Ctrl-C handling, which cancels the sync context
pub async fn run(args: CliArgs) -> Result<()> {
    let manifest = load_and_validate(&args.manifest)
        .with_context(|| format!("loading manifest {}", args.manifest))?;

    let registry = FactoryRegistry::with_builtins();
    let resources = instantiate(&manifest.resource, &registry)?;
    let engine = Engine::new(EngineConfig::from(&manifest.engine));

    if args.dry_run {
        let plan = engine.plan(&resources)?;
        print_dry_run(&manifest, &plan);
        return Ok(());
    }

    let ctx = SyncContext::new();
    {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; cancelling sync context");
            ctx.cancel();
        });
    }

    let report = engine.sync(&ctx, &resources, args.delete).await?;
    print_report(&resources, &report, args.delete);
    Ok(())
}

fn print_dry_run(manifest: &Manifest, plan: &Plan) {
    println!("syncgraph dry-run");
    println!("  engine.wave_scan = {:?}", manifest.engine.wave_scan);
    match manifest.engine.max_attempts {
        Some(n) => println!("  engine.max_attempts = {n}"),
        None => println!("  engine.max_attempts = <resource count>"),
    }
    println!();

    println!("resources ({}):", manifest.resource.len());
    for res in &manifest.resource {
        println!("  - {} ({})", res.name, res.kind);
        for dep in res.dependencies() {
            if dep.carries_value() {
                println!(
                    "      after: {} ({} -> {})",
                    dep.from_resource, dep.from_field, dep.to_field
                );
            } else {
                println!("      after: {}", dep.from_resource);
            }
        }
    }
    println!();

    println!("construction order: {:?}", plan.construction);
    println!("deletion order:     {:?}", plan.deletion);
    if !plan.unordered.is_empty() {
        println!("unordered (cycle):  {:?}", plan.unordered);
    }

    debug!("dry-run complete (no execution)");
}

fn print_report(resources: &[Arc<dyn Resource>], report: &SyncReport, deleted: bool) {
    if deleted {
        println!("deleted {} resources", resources.len());
        return;
    }

    println!(
        "built {} resources in {} wave(s)",
        resources.len(),
        report.waves
    );
    for (name, status) in &report.statuses {
        println!("  {name}: {status}");
    }
}
