//! Naive HTML-to-Markdown conversion for Smithy `documentation` traits.
//!
//! Smithy doc strings are HTML fragments, not full documents. This walks
//! the fragment once, tag by tag, translating the handful of tags AWS
//! models actually use and dropping everything else while keeping its
//! text — there's no DOM, no nesting validation, just enough structure to
//! read as Markdown.

#[derive(Debug, Clone)]
enum Token<'a> {
    Text(&'a str),
    Open { name: String, href: Option<String> },
    Close { name: String },
}

fn tokenize(html: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let bytes = html.as_bytes();
    let mut i = 0;
    let mut text_start = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            if text_start < i {
                tokens.push(Token::Text(&html[text_start..i]));
            }
            let Some(end) = html[i..].find('>') else {
                tokens.push(Token::Text(&html[i..]));
                text_start = html.len();
                break;
            };
            let tag_body = &html[i + 1..i + end];
            i += end + 1;
            text_start = i;
            if let Some(name) = tag_body.strip_prefix('/') {
                tokens.push(Token::Close { name: name.trim().to_lowercase() });
                continue;
            }
            let tag_body = tag_body.trim_end_matches('/');
            let mut parts = tag_body.splitn(2, char::is_whitespace);
            let name = parts.next().unwrap_or_default().trim().to_lowercase();
            let attrs = parts.next().unwrap_or_default();
            let href = extract_href(attrs);
            tokens.push(Token::Open { name, href });
        } else {
            i += 1;
        }
    }
    if text_start < html.len() {
        tokens.push(Token::Text(&html[text_start..]));
    }
    tokens
}

fn extract_href(attrs: &str) -> Option<String> {
    let idx = attrs.find("href")?;
    let rest = &attrs[idx + 4..];
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let rest = &rest[1..];
    let end = rest.find(quote)?;
    Some(rest[..end].to_owned())
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

#[derive(Default)]
struct ListState {
    ordered: bool,
    index: u32,
}

/// Convert an HTML documentation fragment to Markdown.
///
/// Understands `<p>`, `<ul>`, `<ol>`, `<li>`, `<a href>`, `<b>`/`<strong>`,
/// `<i>`/`<em>`, `<code>`. Any other tag is stripped but its text content
/// is preserved in place.
#[must_use]
pub fn html_to_markdown(html: &str) -> String {
    let mut out = String::new();
    let mut list_stack: Vec<ListState> = Vec::new();
    let mut link_stack: Vec<String> = Vec::new();
    let mut paragraph_open = false;

    for token in tokenize(html) {
        match token {
            Token::Text(text) => out.push_str(&collapse_whitespace(text)),
            Token::Open { name, href } => match name.as_str() {
                "p" => {
                    if paragraph_open && !out.is_empty() {
                        out.push_str("\n\n");
                    }
                    paragraph_open = true;
                }
                "ul" => list_stack.push(ListState { ordered: false, index: 0 }),
                "ol" => list_stack.push(ListState { ordered: true, index: 0 }),
                "li" => {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    if let Some(state) = list_stack.last_mut() {
                        state.index += 1;
                        if state.ordered {
                            out.push_str(&format!("{}. ", state.index));
                        } else {
                            out.push_str("- ");
                        }
                    }
                }
                "b" | "strong" => out.push_str("**"),
                "i" | "em" => out.push('_'),
                "code" => out.push('`'),
                "a" => {
                    link_stack.push(href.unwrap_or_default());
                    out.push('[');
                }
                _ => {}
            },
            Token::Close { name } => match name.as_str() {
                "p" => {}
                "ul" | "ol" => {
                    list_stack.pop();
                }
                "li" => out.push('\n'),
                "b" | "strong" => out.push_str("**"),
                "i" | "em" => out.push('_'),
                "code" => out.push('`'),
                "a" => {
                    let href = link_stack.pop().unwrap_or_default();
                    out.push_str(&format!("]({href})"));
                }
                _ => {}
            },
        }
    }

    out.trim().to_owned()
}

/// Write `raw`'s Markdown rendering as `///` doc-comment lines, each
/// prefixed with `indent`.
pub fn write_doc_comment(out: &mut String, indent: &str, raw: &str) -> std::fmt::Result {
    use std::fmt::Write as _;
    for line in html_to_markdown(raw).lines() {
        writeln!(out, "{indent}/// {line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_inline_link_and_bold() {
        let input = r##"<p>Inline: <a href="#">foo</a>, <b>baz</b>.</p>"##;
        assert_eq!(html_to_markdown(input), "Inline: [foo](#), **baz**.");
    }

    #[test]
    fn strips_unknown_tags_keeping_text() {
        let input = "<p>See <kbd>Ctrl</kbd>+<kbd>C</kbd>.</p>";
        assert_eq!(html_to_markdown(input), "See Ctrl+C.");
    }

    #[test]
    fn renders_an_unordered_list() {
        let input = "<ul><li>one</li><li>two</li></ul>";
        assert_eq!(html_to_markdown(input), "- one\n- two");
    }

    #[test]
    fn renders_an_ordered_list() {
        let input = "<ol><li>first</li><li>second</li></ol>";
        assert_eq!(html_to_markdown(input), "1. first\n2. second");
    }

    #[test]
    fn joins_multiple_paragraphs_with_a_blank_line() {
        let input = "<p>First.</p><p>Second.</p>";
        assert_eq!(html_to_markdown(input), "First.\n\nSecond.");
    }
}
