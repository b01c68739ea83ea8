//! Reads `sdk-partitions.json` and emits the `partitions.zz` module: a
//! static table generated code's endpoint resolver consults for partitions
//! beyond the three `sdkgen-rules` hardcodes as its minimal interpreter
//! fallback.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One partition's region membership and default endpoint shape, as
/// declared in `sdk-partitions.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionEntry {
    /// Partition identifier, e.g. `"aws"`, `"aws-cn"`, `"aws-iso"`.
    pub id: String,
    /// Per-region overrides, keyed by region name.
    #[serde(default)]
    pub regions: BTreeMap<String, serde_json::Value>,
    /// Partition-wide default output fields.
    pub outputs: PartitionOutputs,
    /// Regex a region name must match to belong to this partition absent
    /// an explicit `regions` entry.
    pub region_regex: String,
}

/// The default endpoint shape for every region in a partition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionOutputs {
    /// DNS suffix for standard endpoints, e.g. `"amazonaws.com"`.
    pub dns_suffix: String,
    /// DNS suffix for dual-stack endpoints.
    pub dual_stack_dns_suffix: String,
    /// Whether the partition has any FIPS endpoints.
    #[serde(rename = "supportsFIPS")]
    pub supports_fips: bool,
    /// Whether the partition has any dual-stack endpoints.
    pub supports_dual_stack: bool,
    /// The region used when no region is supplied, if the partition
    /// defines one (e.g. `aws-global`).
    #[serde(default)]
    pub implicit_global_region: Option<String>,
}

/// The full `sdk-partitions.json` document.
#[derive(Debug, Clone, Deserialize)]
pub struct PartitionsDocument {
    /// Every declared partition.
    pub partitions: Vec<PartitionEntry>,
}

/// Parse a `sdk-partitions.json` document's text.
///
/// # Errors
/// Propagates `serde_json`'s parse error, wrapped with file-context.
pub fn parse_partitions(text: &str) -> Result<PartitionsDocument> {
    serde_json::from_str(text).context("failed to parse sdk-partitions.json")
}

/// Render the partitions module source, a static table every generated
/// endpoint resolver can consult for the partitions this run's model
/// source directory declared.
#[must_use]
pub fn generate_partitions_module(doc: &PartitionsDocument) -> String {
    let mut out = String::new();
    out.push_str("//! Partition table generated from `sdk-partitions.json`.\n\n");
    out.push_str("pub struct Partition {\n");
    out.push_str("    pub id: &'static str,\n");
    out.push_str("    pub region_regex: &'static str,\n");
    out.push_str("    pub dns_suffix: &'static str,\n");
    out.push_str("    pub dual_stack_dns_suffix: &'static str,\n");
    out.push_str("    pub supports_fips: bool,\n");
    out.push_str("    pub supports_dual_stack: bool,\n");
    out.push_str("    pub implicit_global_region: Option<&'static str>,\n");
    out.push_str("}\n\n");
    let _ = writeln!(out, "pub static PARTITIONS: &[Partition] = &[");
    for partition in &doc.partitions {
        let implicit = partition.outputs.implicit_global_region.as_deref().map_or_else(|| "None".to_owned(), |r| format!("Some({r:?})"));
        let _ = writeln!(
            out,
            "    Partition {{ id: {:?}, region_regex: {:?}, dns_suffix: {:?}, dual_stack_dns_suffix: {:?}, supports_fips: {}, supports_dual_stack: {}, implicit_global_region: {implicit} }},",
            partition.id,
            partition.region_regex,
            partition.outputs.dns_suffix,
            partition.outputs.dual_stack_dns_suffix,
            partition.outputs.supports_fips,
            partition.outputs.supports_dual_stack,
        );
    }
    out.push_str("];\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "partitions": [
            {
                "id": "aws",
                "regions": { "us-east-1": {} },
                "outputs": {
                    "dnsSuffix": "amazonaws.com",
                    "dualStackDnsSuffix": "api.aws",
                    "supportsFIPS": true,
                    "supportsDualStack": true,
                    "implicitGlobalRegion": "us-east-1"
                },
                "regionRegex": "^(us|eu|ap)-\\w+-\\d+$"
            }
        ]
    }"#;

    #[test]
    fn parses_and_renders_a_partition_table() {
        let doc = parse_partitions(SAMPLE).unwrap();
        let module = generate_partitions_module(&doc);
        assert!(module.contains("id: \"aws\""));
        assert!(module.contains("implicit_global_region: Some(\"us-east-1\")"));
    }
}
