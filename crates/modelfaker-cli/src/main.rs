mod registry;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use modelfaker_core::{MemoryStore, StoreError};
use modelfaker_engine::{
    FakerError, FakerSettings, ManifestSource, NoopObserver, RunOptions, Scope, fake_scope,
};
use registry::{RunContext, init_run_logging, start_run, write_json};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error(transparent)]
    Faker(#[from] FakerError),
    #[error("dataset error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Parser, Debug)]
#[command(name = "modelfaker", version, about = "Fake and anonymize model data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run faker declarations against a dataset.
    FakeDb(FakeDbArgs),
}

#[derive(Args, Debug)]
struct FakeDbArgs {
    /// Only run the fakers of this app.
    app: Option<String>,
    /// Only run this faker of the app.
    model: Option<String>,
    /// TOML manifest declaring the fakers.
    #[arg(long)]
    manifest: PathBuf,
    /// JSON dataset to fake.
    #[arg(long)]
    data: PathBuf,
    /// Where to write the faked dataset; defaults to rewriting `--data`.
    #[arg(long)]
    out: Option<PathBuf>,
    /// TOML settings file with a `[faker]` table.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Do not run the dependencies of the selected fakers.
    #[arg(long, default_value_t = false)]
    no_deps: bool,
    /// Do not delete records matched by deletion filters.
    #[arg(long, default_value_t = false)]
    no_dels: bool,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::FakeDb(args) => run_fake_db(args),
    }
}

fn run_fake_db(args: FakeDbArgs) -> Result<(), CliError> {
    let FakeDbArgs {
        app,
        model,
        manifest,
        data,
        out,
        settings,
        no_deps,
        no_dels,
        run_dir,
    } = args;

    let scope = Scope::new(app.as_deref(), model.as_deref()).map_err(FakerError::from)?;
    let settings = FakerSettings::load(settings.as_deref())?;
    let options = RunOptions {
        skip_dependencies: no_deps,
        skip_deletion: no_dels,
    };
    let out = out.unwrap_or_else(|| data.clone());

    let run_id = Uuid::new_v4().to_string();
    let ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir,
        manifest,
        data,
        out,
        scope: scope_label(&scope),
        options,
        settings,
    };
    let paths = start_run(&ctx)?;
    init_run_logging(&paths.logs_path)?;
    tracing::info!(event = "run_started", run_id = %run_id, scope = %ctx.scope);

    let timer = Instant::now();
    match fake_db(&ctx, &scope) {
        Ok(report) => {
            write_json(&paths.report_path, &report)?;
            tracing::info!(
                event = "run_finished",
                status = "success",
                fakers = report.declarations.len(),
                deleted = report.deleted_total,
                updated = report.updated_total,
                retries = report.retries_total,
                duration_ms = timer.elapsed().as_millis() as u64
            );
            Ok(())
        }
        Err(err) => {
            tracing::error!(event = "run_finished", status = "failed", error = %err);
            Err(err)
        }
    }
}

fn fake_db(ctx: &RunContext, scope: &Scope) -> Result<modelfaker_engine::RunReport, CliError> {
    let source = ManifestSource::load(&ctx.manifest)?;
    tracing::info!(
        event = "manifest_loaded",
        path = %ctx.manifest.display(),
        fakers = source.specs().len()
    );

    let mut store = MemoryStore::load_json(&ctx.data)?;
    let report = fake_scope(
        &source,
        scope,
        &mut store,
        &ctx.settings,
        &NoopObserver,
        ctx.options,
    )?;

    store.write_json(&ctx.out)?;
    tracing::info!(event = "dataset_written", path = %ctx.out.display());
    Ok(report)
}

fn scope_label(scope: &Scope) -> String {
    match scope {
        Scope::All => "all".to_string(),
        Scope::App(app) => app.clone(),
        Scope::Declaration(id) => id.to_string(),
    }
}
