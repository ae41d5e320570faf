use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use ignore::WalkBuilder;

use classdoc::{Config, ConfigFile, Diagnostics, FatalError, MembersIndex, Registry, SourceFile};

/// Extract class documentation from JavaScript and SCSS sources.
#[derive(Debug, Parser)]
#[command(name = "classdoc", version, about)]
struct Cli {
    /// Input files or directories to scan (.js, .css, .scss).
    inputs: Vec<PathBuf>,

    /// Configuration file (default: ./classdoc.json when present).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Namespace alias recognized in framework calls; repeatable.
    #[arg(long = "namespace", value_name = "NAME")]
    namespaces: Vec<String>,

    /// External class pattern whose lookups never warn; repeatable,
    /// `*` wildcards allowed.
    #[arg(long = "external", value_name = "PATTERN")]
    external: Vec<String>,

    /// Write the JSON export to a file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = Config::new();
    if let Some(path) = &cli.config {
        config = config.with_file(ConfigFile::load(path)?);
    } else if Path::new("classdoc.json").is_file() {
        config = config.with_file(ConfigFile::load(Path::new("classdoc.json"))?);
    }
    if !cli.namespaces.is_empty() {
        config.namespaces = cli.namespaces.clone();
    }
    config.external.extend(cli.external.iter().cloned());

    let mut inputs = cli.inputs.clone();
    if inputs.is_empty() {
        inputs = config.inputs.clone();
    }
    anyhow::ensure!(!inputs.is_empty(), "no input files or directories given");

    let files = collect_files(&inputs)?;
    tracing::info!(files = files.len(), "parsing");

    let diags = Diagnostics::new();
    let registry = classdoc::process_files(&files, &config, &diags)?;
    export(&registry, &diags, cli.output.as_deref())?;

    let warnings = diags.all().len();
    tracing::info!(classes = registry.len(), warnings, "done");
    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn wanted(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("js" | "css" | "scss")
    )
}

/// Gather source files from the inputs, honoring ignore files in walked
/// directories. Sorted so results are deterministic across runs.
fn collect_files(inputs: &[PathBuf]) -> anyhow::Result<Vec<SourceFile>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for input in inputs {
        if input.is_file() {
            paths.push(input.clone());
            continue;
        }
        for entry in WalkBuilder::new(input).build() {
            let entry = entry?;
            if entry.file_type().is_some_and(|t| t.is_file()) && wanted(entry.path()) {
                paths.push(entry.into_path());
            }
        }
    }
    paths.sort();
    paths.dedup();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(&path).map_err(|source| FatalError::Io {
            path: path.display().to_string(),
            source,
        })?;
        files.push(SourceFile::new(path.display().to_string(), content));
    }
    Ok(files)
}

/// Serialize every class with its flattened member view.
fn export(registry: &Registry, diags: &Diagnostics, output: Option<&Path>) -> anyhow::Result<()> {
    let index = MembersIndex::new(registry, diags);
    let mut classes = Vec::new();
    for cls in registry.classes() {
        let mut value = serde_json::to_value(cls)?;
        value["members"] = serde_json::to_value(index.global_by_id(&cls.name).to_vec())?;
        classes.push(value);
    }
    classes.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));

    let doc = serde_json::json!({ "classes": classes });
    let text = serde_json::to_string_pretty(&doc)?;
    match output {
        Some(path) => fs::write(path, &text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{text}"),
    }
    Ok(())
}
