mod logging;
mod run;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;

use specimen_core::{TypeCatalog, TypeDefKind, TypeParseError, TypeRef};
use specimen_generate::{ConstructorPolicy, GenerateError, GenerationEngine};
use specimen_manifest::{
    ManifestError, ValidationReport, load_catalog_from_path, manifest_json_schema,
    validate_manifest_value,
};

use logging::init_logging;
use run::{RunContext, RunEnvelope};
use settings::{Overrides, Settings, SettingsError};

#[derive(Debug, Error)]
enum CliError {
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("{0}: {}", .0.cause())]
    Generate(#[from] GenerateError),
    #[error("invalid root type: {0}")]
    RootType(#[from] TypeParseError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("manifest has {0} error(s)")]
    InvalidManifest(usize),
}

#[derive(Parser, Debug)]
#[command(name = "specimen", version, about = "Random instance generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate values for a type expression.
    Generate(GenerateArgs),
    /// List the types declared in a manifest.
    Types(ManifestArgs),
    /// Validate a manifest and print its issues.
    Validate(ManifestArgs),
    /// Print the manifest JSON Schema.
    Schema,
}

#[derive(Args, Debug)]
struct ManifestArgs {
    /// Path to the type manifest (JSON).
    #[arg(long)]
    manifest: PathBuf,
    /// Optional TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    source: ManifestArgs,
    /// Type expression to generate, e.g. `CartStorage` or `List<Shape>`.
    #[arg(long)]
    root: String,
    /// Number of values to generate.
    #[arg(long, default_value_t = 1)]
    count: usize,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    max_collection_size: Option<usize>,
    #[arg(long)]
    max_recursion_depth: Option<usize>,
    /// Exclusive upper bound of generated string lengths.
    #[arg(long)]
    max_string_length: Option<usize>,
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
    /// Wrap values in a run envelope with per-value reports.
    #[arg(long, default_value_t = false)]
    report: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Uniform,
    WidestArity,
}

impl From<PolicyArg> for ConstructorPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Uniform => ConstructorPolicy::Uniform,
            PolicyArg::WidestArity => ConstructorPolicy::WidestArity,
        }
    }
}

/// One line of `specimen types`.
#[derive(Debug, Serialize)]
struct TypeSummary<'a> {
    name: &'a str,
    kind: TypeDefKind,
    eligible: bool,
    constructors: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    implementations: Vec<&'a str>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Types(args) => run_types(args),
        Command::Validate(args) => run_validate(args),
        Command::Schema => print_json(&manifest_json_schema()?),
    }
}

fn load_settings(config: Option<&PathBuf>) -> Result<Settings, CliError> {
    let settings = match config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    init_logging(&settings.logging).map_err(CliError::Logging)?;
    Ok(settings)
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        source,
        root,
        count,
        seed,
        max_collection_size,
        max_recursion_depth,
        max_string_length,
        policy,
        report,
    } = args;

    let settings = load_settings(source.config.as_ref())?;
    let options = settings.generate_options(Overrides {
        seed,
        max_collection_size,
        max_recursion_depth,
        max_string_length,
        constructor_policy: policy.map(ConstructorPolicy::from),
    });

    let root_type = TypeRef::parse(&root)?;
    let catalog = Arc::new(load_catalog_from_path(&source.manifest)?);
    tracing::info!(
        event = "catalog_loaded",
        manifest = %source.manifest.display(),
        types = catalog.len()
    );

    let ctx = RunContext::start(&root, &options);
    let mut engine = GenerationEngine::new(catalog, options);
    tracing::info!(
        event = "run_started",
        run_id = %ctx.run_id,
        root = %root_type,
        count,
        seed = engine.options().seed,
        max_recursion_depth = engine.options().max_recursion_depth
    );
    let timer = Instant::now();

    let mut values = Vec::with_capacity(count);
    let mut reports = Vec::with_capacity(count);
    for _ in 0..count {
        let (value, run_report) = engine.generate_with_report(&root_type)?;
        values.push(value);
        reports.push(run_report);
    }

    tracing::info!(
        event = "run_finished",
        run_id = %ctx.run_id,
        duration_ms = timer.elapsed().as_millis() as u64
    );

    if report {
        print_json(&RunEnvelope::new(ctx, values, reports))
    } else {
        print_json(&values)
    }
}

fn run_types(args: ManifestArgs) -> Result<(), CliError> {
    load_settings(args.config.as_ref())?;
    let catalog = load_catalog_from_path(&args.manifest)?;
    print_json(&summarize(&catalog))
}

fn summarize(catalog: &TypeCatalog) -> Vec<TypeSummary<'_>> {
    catalog
        .types()
        .map(|def| TypeSummary {
            name: &def.name,
            kind: def.kind,
            eligible: catalog.is_eligible(&def.name),
            constructors: def.constructors.len(),
            implementations: if def.is_polymorphic() {
                catalog
                    .list_eligible_implementations(&def.name)
                    .into_iter()
                    .map(|imp| imp.name.as_str())
                    .collect()
            } else {
                Vec::new()
            },
        })
        .collect()
}

fn run_validate(args: ManifestArgs) -> Result<(), CliError> {
    load_settings(args.config.as_ref())?;
    let raw = std::fs::read_to_string(&args.manifest)?;
    let manifest_json: serde_json::Value = serde_json::from_str(&raw)?;

    let report = match validate_manifest_value(&manifest_json) {
        Ok(validated) => ValidationReport {
            errors: Vec::new(),
            warnings: validated.warnings,
        },
        Err(report) => report,
    };

    for issue in &report.warnings {
        tracing::warn!(code = %issue.code, path = %issue.path, "{}", issue.message);
    }
    print_json(&report)?;

    if report.is_ok() {
        Ok(())
    } else {
        Err(CliError::InvalidManifest(report.errors.len()))
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
