//! Built-in rules-language functions: ARN parsing, partition lookup, S3
//! bucket validation, and the smaller string/URL helpers the rules
//! language specifies.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::{RulesError, RulesResult};
use crate::value::Value;

const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// A parsed Amazon Resource Name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    /// The partition, e.g. `"aws"`.
    pub partition: String,
    /// The service code, e.g. `"ec2"`.
    pub service: String,
    /// The region, empty for global services.
    pub region: String,
    /// The account id, empty for some resources.
    pub account_id: String,
    /// The resource portion, split on `:` if present, else `/`, else kept whole.
    pub resource_id: Vec<String>,
}

impl Arn {
    /// Convert to the record shape `aws.parseArn` returns.
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut record = BTreeMap::new();
        record.insert("partition".to_owned(), Value::String(self.partition));
        record.insert("service".to_owned(), Value::String(self.service));
        record.insert("region".to_owned(), Value::String(self.region));
        record.insert("accountId".to_owned(), Value::String(self.account_id));
        record.insert(
            "resourceId".to_owned(),
            Value::List(self.resource_id.into_iter().map(Value::String).collect()),
        );
        Value::Record(record)
    }
}

/// Parse an ARN string (spec §8 scenario 2).
///
/// # Errors
/// [`RulesError::InvalidArn`] if `input` doesn't have the `arn:partition:
/// service:region:account:resource` shape.
pub fn parse_arn(input: &str) -> RulesResult<Arn> {
    let parts: Vec<&str> = input.splitn(6, ':').collect();
    if parts.len() != 6 || parts[0] != "arn" {
        return Err(RulesError::InvalidArn(input.to_owned()));
    }
    let resource = parts[5];
    let resource_id = if resource.contains(':') {
        resource.split(':').map(str::to_owned).collect()
    } else if resource.contains('/') {
        resource.split('/').map(str::to_owned).collect()
    } else {
        vec![resource.to_owned()]
    };
    Ok(Arn {
        partition: parts[1].to_owned(),
        service: parts[2].to_owned(),
        region: parts[3].to_owned(),
        account_id: parts[4].to_owned(),
        resource_id,
    })
}

/// A minimal AWS partition table: enough to resolve the three public
/// partitions by region prefix, not the full `partitions.json` dataset
/// (that's supplied at generation time from the partitions file and
/// doesn't belong hardcoded in this crate).
#[must_use]
pub fn partition_for_region(region: &str) -> Value {
    let (name, dns_suffix, dual_suffix, implicit_global) = if let Some(rest) = region.strip_prefix("cn-") {
        let _ = rest;
        ("aws-cn", "amazonaws.com.cn", "api.amazonwebservices.com.cn", "cn-north-1")
    } else if region.starts_with("us-gov-") {
        ("aws-us-gov", "amazonaws.com", "api.aws", "us-gov-west-1")
    } else {
        ("aws", "amazonaws.com", "api.aws", "us-east-1")
    };
    let mut record = BTreeMap::new();
    record.insert("name".to_owned(), Value::String(name.to_owned()));
    record.insert("dnsSuffix".to_owned(), Value::String(dns_suffix.to_owned()));
    record.insert("dualStackDnsSuffix".to_owned(), Value::String(dual_suffix.to_owned()));
    record.insert("supportsFIPS".to_owned(), Value::Bool(true));
    record.insert("supportsDualStack".to_owned(), Value::Bool(true));
    record.insert("implicitGlobalRegion".to_owned(), Value::String(implicit_global.to_owned()));
    Value::Record(record)
}

fn valid_dns_label(label: &str) -> bool {
    if label.is_empty() || label.len() > 63 {
        return false;
    }
    let first = label.chars().next().unwrap();
    let last = label.chars().last().unwrap();
    first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric()
}

/// `isValidHostLabel(value, allowSubDomains)`.
#[must_use]
pub fn is_valid_host_label(value: &str, allow_subdomains: bool) -> bool {
    if value.is_empty() {
        return false;
    }
    if allow_subdomains {
        value.split('.').all(valid_dns_label)
    } else {
        !value.contains('.') && valid_dns_label(value)
    }
}

/// `aws.isVirtualHostableS3Bucket(bucket, allowSubDomains)` (spec §8
/// scenario 3).
#[must_use]
pub fn is_virtual_hostable_s3_bucket(bucket: &str, allow_subdomains: bool) -> bool {
    if bucket.len() < 3 || bucket.len() > 63 {
        return false;
    }
    if !bucket
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return false;
    }
    is_valid_host_label(bucket, allow_subdomains)
}

/// `uriEncode(value)`: percent-encode everything outside `A-Za-z0-9-._~`.
#[must_use]
pub fn uri_encode(value: &str) -> String {
    utf8_percent_encode(value, URI_ENCODE_SET).to_string()
}

/// `substring(input, start, stop, reverse)`. Returns `None` for
/// out-of-range bounds or non-ASCII input, per the rules language spec.
#[must_use]
pub fn substring(input: &str, start: usize, stop: usize, reverse: bool) -> Option<String> {
    if !input.is_ascii() || start >= stop || stop > input.len() {
        return None;
    }
    let (s, e) = if reverse {
        (input.len() - stop, input.len() - start)
    } else {
        (start, stop)
    };
    input.get(s..e).map(str::to_owned)
}

/// `parseURL(value)`. A pragmatic subset of URL parsing — enough for
/// endpoint rule sets, not a general-purpose URL parser.
#[must_use]
pub fn parse_url(value: &str) -> Option<Value> {
    let (scheme, rest) = value.split_once("://")?;
    if scheme != "http" && scheme != "https" {
        return None;
    }
    let (authority, path_and_query) = rest.split_once('/').map_or((rest, ""), |(a, p)| (a, p));
    let (path, _query) = path_and_query.split_once('?').unwrap_or((path_and_query, ""));
    let full_path = format!("/{path}");
    let normalized_path = if full_path.ends_with('/') {
        full_path.clone()
    } else {
        format!("{full_path}/")
    };
    let is_ip = authority.split('.').all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_digit()));
    let mut record = BTreeMap::new();
    record.insert("scheme".to_owned(), Value::String(scheme.to_owned()));
    record.insert("authority".to_owned(), Value::String(authority.to_owned()));
    record.insert("path".to_owned(), Value::String(full_path));
    record.insert("normalizedPath".to_owned(), Value::String(normalized_path));
    record.insert("isIp".to_owned(), Value::Bool(is_ip));
    Some(Value::Record(record))
}

/// `getAttr(value, path)`: dotted-path, `[index]`-subscript record/list
/// navigation, e.g. `"resourceId[0]"`.
///
/// # Errors
/// [`RulesError::InvalidArguments`] if a path segment doesn't resolve.
pub fn get_attr(value: &Value, path: &str) -> RulesResult<Value> {
    let mut current = value.clone();
    for segment in path.split('.') {
        let (name, index) = match segment.split_once('[') {
            Some((name, rest)) => {
                let idx_str = rest.trim_end_matches(']');
                let idx: usize = idx_str.parse().map_err(|_| RulesError::InvalidArguments {
                    name: "getAttr".to_owned(),
                    reason: format!("invalid index in {segment:?}"),
                })?;
                (name, Some(idx))
            }
            None => (segment, None),
        };
        current = if name.is_empty() {
            current
        } else {
            match &current {
                Value::Record(r) => r.get(name).cloned().ok_or_else(|| RulesError::InvalidArguments {
                    name: "getAttr".to_owned(),
                    reason: format!("no field {name:?}"),
                })?,
                _ => {
                    return Err(RulesError::InvalidArguments {
                        name: "getAttr".to_owned(),
                        reason: format!("{name:?} is not a record"),
                    });
                }
            }
        };
        if let Some(idx) = index {
            current = match &current {
                Value::List(items) => items.get(idx).cloned().ok_or_else(|| RulesError::InvalidArguments {
                    name: "getAttr".to_owned(),
                    reason: format!("index {idx} out of bounds"),
                })?,
                _ => {
                    return Err(RulesError::InvalidArguments {
                        name: "getAttr".to_owned(),
                        reason: "not a list".to_owned(),
                    });
                }
            };
        }
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_arn() {
        let arn = parse_arn("arn:aws:ec2:us-east-1:012345678910:vpc/vpc-0e9801d129EXAMPLE").unwrap();
        assert_eq!(arn.partition, "aws");
        assert_eq!(arn.service, "ec2");
        assert_eq!(arn.region, "us-east-1");
        assert_eq!(arn.account_id, "012345678910");
        assert_eq!(arn.resource_id, vec!["vpc".to_owned(), "vpc-0e9801d129EXAMPLE".to_owned()]);
    }

    #[test]
    fn rejects_a_truncated_arn() {
        assert!(matches!(parse_arn("arn:aws:sns"), Err(RulesError::InvalidArn(_))));
    }

    #[test]
    fn virtual_hostable_bucket_vectors() {
        assert!(is_virtual_hostable_s3_bucket("a--b--x-s3", false));
        assert!(!is_virtual_hostable_s3_bucket("a-.b-.c", true));
    }

    #[test]
    fn get_attr_navigates_list_index() {
        let arn = parse_arn("arn:aws:ec2:us-east-1:012345678910:vpc/vpc-1").unwrap().into_value();
        let got = get_attr(&arn, "resourceId[1]").unwrap();
        assert_eq!(got, Value::String("vpc-1".to_owned()));
    }
}
