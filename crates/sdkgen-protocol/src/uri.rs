//! URI template parsing for the `@http` trait's `uri` field.

/// One segment of a parsed URI template, e.g. `/{Bucket}/{Key+}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriSegment {
    /// A literal path segment, including the leading `/`.
    Literal(String),
    /// `{name}` — substituted from a `@httpLabel` member.
    Label {
        /// The label's name, matched against a member's `@httpLabel` name.
        name: String,
        /// `{name+}` — a greedy label that may itself contain `/`.
        greedy: bool,
    },
}

/// A parsed `@http` URI template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UriTemplate {
    /// The template's segments in order.
    pub segments: Vec<UriSegment>,
}

impl UriTemplate {
    /// Parse a template string like `"/{Bucket}/{Key+}"`.
    #[must_use]
    pub fn parse(uri: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = uri.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '{' {
                let mut name = String::new();
                for c2 in chars.by_ref() {
                    if c2 == '}' {
                        break;
                    }
                    name.push(c2);
                }
                if !literal.is_empty() {
                    segments.push(UriSegment::Literal(std::mem::take(&mut literal)));
                }
                let greedy = name.ends_with('+');
                let name = name.trim_end_matches('+').to_owned();
                segments.push(UriSegment::Label { name, greedy });
            } else {
                literal.push(c);
            }
        }
        if !literal.is_empty() {
            segments.push(UriSegment::Literal(literal));
        }
        Self { segments }
    }

    /// Every label name this template declares, in order.
    #[must_use]
    pub fn label_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                UriSegment::Label { name, .. } => Some(name.as_str()),
                UriSegment::Literal(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal_and_label_segments() {
        let t = UriTemplate::parse("/{Bucket}/{Key+}");
        assert_eq!(
            t.segments,
            vec![
                UriSegment::Literal("/".to_owned()),
                UriSegment::Label { name: "Bucket".to_owned(), greedy: false },
                UriSegment::Literal("/".to_owned()),
                UriSegment::Label { name: "Key".to_owned(), greedy: true },
            ]
        );
        assert_eq!(t.label_names(), vec!["Bucket", "Key"]);
    }

    #[test]
    fn parses_a_bare_path() {
        let t = UriTemplate::parse("/widgets");
        assert_eq!(t.segments, vec![UriSegment::Literal("/widgets".to_owned())]);
    }
}
