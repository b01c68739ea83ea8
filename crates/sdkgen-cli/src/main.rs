//! The `sdkgen generate` command-line tool.
//!
//! Reads every `<service>.json` model file (and, if present,
//! `sdk-partitions.json`) from a source directory, runs them through
//! [`sdkgen_pipeline::Pipeline`], and writes the generated files under an
//! output directory — one subdirectory per service plus a top-level
//! `partitions.zz`. Grounded in `codegen/src/main.rs`'s
//! read-model→resolve→generate→write shape, generalized from one
//! hardcoded model path to a directory of them and from two positional
//! `std::env::args()` lookups to a `clap` derive parser, since this binary
//! takes a variable number of trailing service-name filters.

mod partitions;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sdkgen_pipeline::{GeneratorConfig, HookRegistry, ModelSource, Pipeline};

/// Generate Rust SDK source from a directory of Smithy JSON AST models.
#[derive(Debug, Parser)]
#[command(name = "sdkgen", version, about)]
struct Cli {
    /// Directory holding `<service>.json` model files and, optionally,
    /// `sdk-partitions.json`.
    src_dir: PathBuf,
    /// Directory generated files are written under.
    out_dir: PathBuf,
    /// Restrict generation to services whose shape name (the part after
    /// `#`) matches one of these. With none given, every service in
    /// `src_dir` is generated.
    service: Vec<String>,
    /// Abort the whole run on the first parse-time issue instead of
    /// recording it and continuing.
    #[arg(long)]
    strict: bool,
}

/// File I/O or directory-walk failure.
const EXIT_IO_ERROR: u8 = 1;
/// A model failed to parse under an abort policy.
const EXIT_PARSE_FAILURE: u8 = 2;
/// Code emission failed for an otherwise-valid model.
const EXIT_EMIT_FAILURE: u8 = 3;

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "generation failed");
            eprintln!("error: {err:#}");
            ExitCode::from(classify_exit_code(&err))
        }
    }
}

fn classify_exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<sdkgen_pipeline::PipelineError>().is_some_and(|e| matches!(e, sdkgen_pipeline::PipelineError::Model(_))) {
        EXIT_PARSE_FAILURE
    } else if err.downcast_ref::<sdkgen_pipeline::PipelineError>().is_some_and(|e| matches!(e, sdkgen_pipeline::PipelineError::Emit(_))) {
        EXIT_EMIT_FAILURE
    } else {
        EXIT_IO_ERROR
    }
}

fn run(cli: &Cli) -> Result<()> {
    let sources = load_model_sources(&cli.src_dir)?;
    tracing::info!(count = sources.len(), dir = %cli.src_dir.display(), "loaded model sources");

    let config = GeneratorConfig::new().with_output_dir(cli.out_dir.to_string_lossy().into_owned()).with_unknown_policy(if cli.strict {
        sdkgen_pipeline::PolicyConfig::Abort
    } else {
        sdkgen_pipeline::PolicyConfig::Skip
    });
    let hooks = if cli.service.is_empty() {
        HookRegistry::new()
    } else {
        let wanted = cli.service.clone();
        HookRegistry::new().with_service_filter(move |absolute_id| wanted.iter().any(|name| absolute_id.ends_with(&format!("#{name}"))))
    };

    let pipeline = Pipeline::new(config, hooks);
    let (outputs, issues) = pipeline.run(sources)?;

    for issue in issues.snapshot() {
        tracing::warn!(shape = ?issue.shape, message = %issue.message, "deferred issue");
    }

    fs::create_dir_all(&cli.out_dir).with_context(|| format!("failed to create output directory {}", cli.out_dir.display()))?;

    let mut written = 0usize;
    for model in &outputs {
        for service in &model.services {
            let short_name = service.service_absolute_id.rsplit('#').next().unwrap_or(&service.service_absolute_id);
            let service_dir = cli.out_dir.join(short_name);
            fs::create_dir_all(&service_dir).with_context(|| format!("failed to create {}", service_dir.display()))?;
            for (name, content) in &service.files {
                let path = service_dir.join(name);
                fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
                written += 1;
            }
        }
    }

    if let Some(partitions_path) = find_partitions_file(&cli.src_dir) {
        let text = fs::read_to_string(&partitions_path).with_context(|| format!("failed to read {}", partitions_path.display()))?;
        let doc = partitions::parse_partitions(&text)?;
        let module = partitions::generate_partitions_module(&doc);
        let path = cli.out_dir.join("partitions.zz");
        fs::write(&path, module).with_context(|| format!("failed to write {}", path.display()))?;
        written += 1;
    }

    eprintln!("wrote {written} files to {}", cli.out_dir.display());
    Ok(())
}

fn find_partitions_file(src_dir: &Path) -> Option<PathBuf> {
    let path = src_dir.join("sdk-partitions.json");
    path.is_file().then_some(path)
}

fn load_model_sources(src_dir: &Path) -> Result<Vec<ModelSource>> {
    let entries = fs::read_dir(src_dir).with_context(|| format!("failed to read source directory {}", src_dir.display()))?;
    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry.context("failed to read directory entry")?;
        let path = entry.path();
        let is_model = path.extension().is_some_and(|ext| ext == "json") && path.file_name().is_some_and(|name| name != "sdk-partitions.json");
        if !is_model {
            continue;
        }
        let text = fs::read_to_string(&path).with_context(|| format!("failed to read model {}", path.display()))?;
        let label = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        sources.push(ModelSource { label, text });
    }
    if sources.is_empty() {
        anyhow::bail!("no <service>.json model files found under {}", src_dir.display());
    }
    Ok(sources)
}
