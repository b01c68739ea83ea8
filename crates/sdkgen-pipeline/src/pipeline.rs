//! The per-model task graph (`Load → Parse → BuildSymbols → {EmitClient ∥
//! EmitShapes ∥ EmitErrors ∥ EmitEndpoint ∥ EmitReadme}`) and the fork-join
//! pool that runs one graph per model.
//!
//! Each model is processed single-threaded end to end — the brace in the
//! stage list above is a dependency graph, not a thread boundary. The
//! actual parallelism is across models: a bounded pool of worker threads
//! pulls model sources off a shared queue via `std::thread::scope`,
//! mirroring `codegen/src/main.rs`'s single linear run generalized to many
//! models at once. This is a plain scoped-thread pool rather than `tokio`:
//! the workload is CPU-bound batch work with no suspension points, so
//! async has nothing to buy here.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use sdkgen_model::{IssuesBag, TraitRegistry, parse_model};
use sdkgen_symbols::SymbolTable;

use crate::config::GeneratorConfig;
use crate::error::PipelineResult;
use crate::hooks::HookRegistry;

/// One model source to process: a label for diagnostics (e.g. its file
/// name) and the raw Smithy JSON AST text.
#[derive(Debug, Clone)]
pub struct ModelSource {
    /// Diagnostic label, typically the source file's path.
    pub label: String,
    /// Raw Smithy JSON AST document text.
    pub text: String,
}

/// The generated files for one service, keyed by relative output path
/// (`shapes.zz`, `errors.zz`, `client.zz`, `endpoint.zz`, `README.md`).
#[derive(Debug, Clone)]
pub struct ServiceOutput {
    /// The service's absolute shape id, e.g. `"com.example#Widgets"`.
    pub service_absolute_id: String,
    /// Generated file contents.
    pub files: BTreeMap<String, String>,
}

/// Everything produced from one model source.
#[derive(Debug, Clone, Default)]
pub struct ModelOutput {
    /// The model source's diagnostic label.
    pub label: String,
    /// One entry per service the model declared and the hooks accepted.
    pub services: Vec<ServiceOutput>,
}

/// Orchestrates a generator run over one or more model sources.
#[derive(Debug, Default)]
pub struct Pipeline {
    config: GeneratorConfig,
    hooks: HookRegistry,
}

impl Pipeline {
    /// Build a pipeline with the given configuration and hooks.
    #[must_use]
    pub fn new(config: GeneratorConfig, hooks: HookRegistry) -> Self {
        Self { config, hooks }
    }

    /// Run every model source through the task graph, fanning out across
    /// `self.config.effective_worker_count()` threads.
    ///
    /// Returns the per-model outputs in no particular order (model
    /// processing order isn't guaranteed under concurrent execution) plus
    /// the merged issues bag recorded along the way.
    ///
    /// # Errors
    /// Returns the first [`crate::error::PipelineError`] encountered under `Policy::Abort`;
    /// under `Policy::Skip` every recoverable problem is recorded in the
    /// returned [`IssuesBag`] instead and the run completes.
    pub fn run(&self, sources: Vec<ModelSource>) -> PipelineResult<(Vec<ModelOutput>, IssuesBag)> {
        let traits = TraitRegistry::with_builtins();
        let issues = IssuesBag::new();
        let queue: Mutex<VecDeque<ModelSource>> = Mutex::new(sources.into_iter().collect());
        let results: Mutex<Vec<PipelineResult<ModelOutput>>> = Mutex::new(Vec::new());
        let worker_count = self.config.effective_worker_count().max(1);

        std::thread::scope(|scope| {
            for _ in 0..worker_count {
                scope.spawn(|| {
                    loop {
                        let next = {
                            let mut guard = queue.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                            guard.pop_front()
                        };
                        let Some(source) = next else { break };
                        tracing::info!(model = %source.label, "processing model");
                        let outcome = self.process_model(&traits, &issues, source);
                        results.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push(outcome);
                    }
                });
            }
        });

        let outcomes = results.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut outputs = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            outputs.push(outcome?);
        }
        Ok((outputs, issues))
    }

    /// `Load → Parse → BuildSymbols → emit` for one model, single-threaded.
    fn process_model(&self, traits: &TraitRegistry, issues: &IssuesBag, source: ModelSource) -> PipelineResult<ModelOutput> {
        let policy = self.config.unknown_property_policy.0.into();
        let model = parse_model(&source.text, traits, issues, policy)?;
        let symbols = SymbolTable::new(&model);

        let mut services = Vec::new();
        if let Some(id) = model.service_id() {
            let absolute = model.absolute_of(id).unwrap_or_default().to_owned();
            if self.hooks.accepts_service(&absolute) {
                let files = self.emit_service(&symbols, id, &source.text)?;
                services.push(ServiceOutput { service_absolute_id: absolute, files });
            } else {
                tracing::debug!(service = %absolute, "service filtered out by hook");
            }
        }

        if services.is_empty() {
            issues.record(None, format!("model {} declares no emittable service", source.label));
        }

        Ok(ModelOutput { label: source.label, services })
    }

    /// `{EmitClient ∥ EmitShapes ∥ EmitErrors ∥ EmitEndpoint ∥ EmitReadme}`
    /// for one service. `sdkgen-emit::generate_service` already produces
    /// all five files from one symbols pass; this wraps its output with
    /// the script-head and README hooks.
    fn emit_service(&self, symbols: &SymbolTable<'_>, service: sdkgen_model::ShapeId, model_src: &str) -> PipelineResult<BTreeMap<String, String>> {
        let mut files = sdkgen_emit::generate_service(symbols, service, model_src)?;
        if let Some(readme) = files.get("README.md") {
            let rewritten = self.hooks.apply_readme_writer(readme);
            files.insert("README.md".to_owned(), rewritten);
        }
        for content in files.values_mut() {
            *content = self.hooks.apply_script_head(std::mem::take(content));
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_MODEL: &str = r#"{
        "smithy": "2.0",
        "shapes": {
            "com.example#Widgets": {
                "type": "service",
                "version": "2020-01-01",
                "operations": [{ "target": "com.example#GetWidget" }]
            },
            "com.example#GetWidget": {
                "type": "operation",
                "input": { "target": "com.example#GetWidgetInput" },
                "output": { "target": "com.example#GetWidgetOutput" },
                "traits": { "smithy.api#http": { "method": "GET", "uri": "/widgets/{id}", "code": 200 } }
            },
            "com.example#GetWidgetInput": {
                "type": "structure",
                "members": { "id": { "target": "smithy.api#String", "traits": { "smithy.api#required": {}, "smithy.api#httpLabel": {} } } }
            },
            "com.example#GetWidgetOutput": {
                "type": "structure",
                "members": { "name": { "target": "smithy.api#String" } }
            }
        }
    }"#;

    #[test]
    fn runs_a_single_model_and_emits_one_service() {
        let pipeline = Pipeline::new(GeneratorConfig::new().with_worker_count(1), HookRegistry::new());
        let (outputs, issues) =
            pipeline.run(vec![ModelSource { label: "widgets.json".to_owned(), text: MINIMAL_MODEL.to_owned() }]).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].services.len(), 1);
        assert!(issues.is_empty());
        let files = &outputs[0].services[0].files;
        assert!(files.contains_key("client.zz"));
        assert!(files.contains_key("README.md"));
    }

    #[test]
    fn service_filter_hook_skips_everything() {
        let hooks = HookRegistry::new().with_service_filter(|_| false);
        let pipeline = Pipeline::new(GeneratorConfig::new().with_worker_count(1), hooks);
        let (outputs, issues) =
            pipeline.run(vec![ModelSource { label: "widgets.json".to_owned(), text: MINIMAL_MODEL.to_owned() }]).unwrap();
        assert!(outputs[0].services.is_empty());
        assert!(!issues.is_empty());
    }

    #[test]
    fn script_head_hook_prepends_to_every_file() {
        let hooks = HookRegistry::new().with_script_head("// DO NOT EDIT");
        let pipeline = Pipeline::new(GeneratorConfig::new().with_worker_count(1), hooks);
        let (outputs, _) =
            pipeline.run(vec![ModelSource { label: "widgets.json".to_owned(), text: MINIMAL_MODEL.to_owned() }]).unwrap();
        for content in outputs[0].services[0].files.values() {
            assert!(content.starts_with("// DO NOT EDIT\n"));
        }
    }
}
