//! Generator-wide configuration, following the teacher's plain-struct
//! config style (`ruststack-core::config::RustStackConfig`) but adding
//! builder methods the teacher's own struct doesn't have — `sdkgen.toml`
//! still round-trips via `serde`, the builders are purely for callers that
//! prefer to construct a config in code.

use sdkgen_model::Policy;
use serde::Deserialize;

/// How the parser/symbol builder should react to unrecognized input, as
/// written in `sdkgen.toml` (`"abort"` or `"skip"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyConfig {
    /// Stop the pipeline with a hard error.
    Abort,
    /// Record the problem in the issues bag and continue.
    Skip,
}

impl From<PolicyConfig> for Policy {
    fn from(value: PolicyConfig) -> Self {
        match value {
            PolicyConfig::Abort => Policy::Abort,
            PolicyConfig::Skip => Policy::Skip,
        }
    }
}

/// Generator configuration, loadable from an optional `sdkgen.toml` at the
/// model source directory's root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Policy for unknown model-level JSON properties.
    pub unknown_property_policy: PolicyConfigOrDefault,
    /// Policy for trait ids absent from the trait registry.
    pub unknown_trait_policy: PolicyConfigOrDefault,
    /// Number of models to emit concurrently; `None` uses the available
    /// parallelism.
    pub worker_count: Option<usize>,
    /// Output directory root, relative to the invocation's working
    /// directory unless absolute.
    pub output_dir: String,
}

/// A `PolicyConfig` with a `Skip` default, since `#[serde(default)]` needs
/// a `Default` impl and `Policy`'s own default is the conservative choice
/// for a best-effort generator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PolicyConfigOrDefault(pub PolicyConfig);

impl Default for PolicyConfigOrDefault {
    fn default() -> Self {
        Self(PolicyConfig::Skip)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            unknown_property_policy: PolicyConfigOrDefault::default(),
            unknown_trait_policy: PolicyConfigOrDefault::default(),
            worker_count: None,
            output_dir: "out".to_owned(),
        }
    }
}

impl GeneratorConfig {
    /// An all-default configuration: skip unknown input, auto-detect
    /// worker count, write to `./out`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `sdkgen.toml` document's contents.
    ///
    /// # Errors
    /// Propagates `toml::de::Error` if `text` isn't valid TOML or doesn't
    /// match this struct's shape.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Set both unknown-property and unknown-trait policy at once.
    #[must_use]
    pub fn with_unknown_policy(mut self, policy: PolicyConfig) -> Self {
        self.unknown_property_policy = PolicyConfigOrDefault(policy);
        self.unknown_trait_policy = PolicyConfigOrDefault(policy);
        self
    }

    /// Set the worker concurrency.
    #[must_use]
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = Some(worker_count);
        self
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<String>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Resolve the configured worker count against the host's available
    /// parallelism.
    #[must_use]
    pub fn effective_worker_count(&self) -> usize {
        self.worker_count.unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_conservative() {
        let config = GeneratorConfig::new();
        assert_eq!(config.unknown_property_policy.0, PolicyConfig::Skip);
        assert_eq!(config.output_dir, "out");
    }

    #[test]
    fn parses_from_toml() {
        let config = GeneratorConfig::from_toml_str("output_dir = \"dist\"\nworker_count = 2\n").unwrap();
        assert_eq!(config.output_dir, "dist");
        assert_eq!(config.worker_count, Some(2));
    }

    #[test]
    fn builder_methods_set_fields() {
        let config = GeneratorConfig::new().with_worker_count(4).with_output_dir("build").with_unknown_policy(PolicyConfig::Abort);
        assert_eq!(config.worker_count, Some(4));
        assert_eq!(config.output_dir, "build");
        assert_eq!(Policy::from(config.unknown_trait_policy.0), Policy::Abort);
    }
}
