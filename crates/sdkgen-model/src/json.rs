//! Pull-style JSON token reader.
//!
//! Hand-written, byte-oriented recursive descent over the JSON documents
//! Smithy models are written in. There is no `serde`/reflection step here:
//! callers drive the reader shape by shape, the way [`crate::parser`] does.
//! Tokens borrow from the source buffer and are invalidated by the next
//! call to [`JsonReader::next`].

use crate::error::{ModelError, ModelResult};

/// A single JSON token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    /// `{`
    ObjectBegin,
    /// `}`
    ObjectEnd,
    /// `[`
    ArrayBegin,
    /// `]`
    ArrayEnd,
    /// A decoded string value (quotes removed, escapes resolved).
    String(&'a str),
    /// A decoded number.
    Number(f64),
    /// `true` / `false`.
    Bool(bool),
    /// `null`.
    Null,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// End of input.
    Eof,
}

impl Token<'_> {
    fn describe(&self) -> String {
        match self {
            Token::ObjectBegin => "'{'".to_owned(),
            Token::ObjectEnd => "'}'".to_owned(),
            Token::ArrayBegin => "'['".to_owned(),
            Token::ArrayEnd => "']'".to_owned(),
            Token::String(s) => format!("string {s:?}"),
            Token::Number(n) => format!("number {n}"),
            Token::Bool(b) => format!("bool {b}"),
            Token::Null => "null".to_owned(),
            Token::Colon => "':'".to_owned(),
            Token::Comma => "','".to_owned(),
            Token::Eof => "end of input".to_owned(),
        }
    }
}

/// A pull-style reader over a JSON document's byte stream.
///
/// String tokens only borrow directly from `src` when the string contains no
/// escape sequences; escaped strings fall back to an internal scratch buffer
/// swapped in for the duration of that token (still valid only until the
/// next `next()` call, per the reader's general contract).
pub struct JsonReader<'a> {
    src: &'a str,
    pos: usize,
    scratch: String,
}

impl<'a> JsonReader<'a> {
    /// Create a reader over the given source text.
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            scratch: String::new(),
        }
    }

    /// Current byte offset, used in error messages.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pos
    }

    fn skip_ws(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && matches!(bytes[self.pos], b' ' | b'\t' | b'\n' | b'\r') {
            self.pos += 1;
        }
    }

    /// Look at the next token without consuming it.
    ///
    /// # Errors
    /// Returns an error under the same conditions as [`JsonReader::next`].
    pub fn peek(&mut self) -> ModelResult<Token<'_>> {
        let saved_pos = self.pos;
        self.next_owned()?;
        self.pos = saved_pos;
        // Re-decode into borrowed form at the (restored) position; this
        // recomputation is cheap (strings are short identifiers/literals).
        self.next_borrowed()
    }

    /// Consume and return the next token.
    ///
    /// # Errors
    /// Returns [`ModelError::UnexpectedToken`], [`ModelError::UnterminatedString`],
    /// or [`ModelError::NumberOverflow`] on malformed input.
    pub fn next(&mut self) -> ModelResult<Token<'_>> {
        self.next_borrowed()
    }

    fn next_borrowed(&mut self) -> ModelResult<Token<'_>> {
        self.skip_ws();
        let bytes = self.src.as_bytes();
        if self.pos >= bytes.len() {
            return Ok(Token::Eof);
        }
        match bytes[self.pos] {
            b'{' => {
                self.pos += 1;
                Ok(Token::ObjectBegin)
            }
            b'}' => {
                self.pos += 1;
                Ok(Token::ObjectEnd)
            }
            b'[' => {
                self.pos += 1;
                Ok(Token::ArrayBegin)
            }
            b']' => {
                self.pos += 1;
                Ok(Token::ArrayEnd)
            }
            b':' => {
                self.pos += 1;
                Ok(Token::Colon)
            }
            b',' => {
                self.pos += 1;
                Ok(Token::Comma)
            }
            b'"' => self.read_string_token(),
            b't' => self.read_literal("true", Token::Bool(true)),
            b'f' => self.read_literal("false", Token::Bool(false)),
            b'n' => self.read_literal("null", Token::Null),
            b'-' | b'0'..=b'9' => self.read_number_token(),
            other => Err(ModelError::UnexpectedToken {
                expected: "a value".to_owned(),
                got: format!("byte {:#04x} at offset {}", other, self.pos),
            }),
        }
    }

    /// Same as `next_borrowed` but without keeping a borrow alive, used
    /// internally by `peek` to advance the scan without double-borrowing
    /// `self`.
    fn next_owned(&mut self) -> ModelResult<()> {
        self.next_borrowed().map(|_| ())
    }

    fn read_literal(&mut self, literal: &str, tok: Token<'static>) -> ModelResult<Token<'_>> {
        let end = self.pos + literal.len();
        if self.src.as_bytes().len() >= end && &self.src[self.pos..end] == literal {
            self.pos = end;
            Ok(tok)
        } else {
            Err(ModelError::UnexpectedToken {
                expected: format!("literal {literal:?}"),
                got: format!("offset {}", self.pos),
            })
        }
    }

    fn read_number_token(&mut self) -> ModelResult<Token<'_>> {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        if bytes.get(self.pos) == Some(&b'-') {
            self.pos += 1;
        }
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if bytes.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }
        if matches!(bytes.get(self.pos), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(bytes.get(self.pos), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }
        let text = &self.src[start..self.pos];
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| ModelError::NumberOverflow(text.to_owned()))
    }

    fn read_string_token(&mut self) -> ModelResult<Token<'_>> {
        debug_assert_eq!(self.src.as_bytes()[self.pos], b'"');
        let start = self.pos + 1;
        let bytes = self.src.as_bytes();
        let mut i = start;
        let mut has_escape = false;
        loop {
            if i >= bytes.len() {
                return Err(ModelError::UnterminatedString(start));
            }
            match bytes[i] {
                b'"' => break,
                b'\\' => {
                    has_escape = true;
                    i += 2;
                }
                _ => i += 1,
            }
        }
        let raw = &self.src[start..i];
        self.pos = i + 1;
        if !has_escape {
            return Ok(Token::String(raw));
        }
        self.scratch.clear();
        decode_escapes(raw, &mut self.scratch)?;
        // Safety of lifetime: `scratch` lives as long as `self`, and the
        // reader's contract already says tokens are invalidated by the
        // next call, so handing back a reference tied to `self`'s borrow
        // is sound.
        Ok(Token::String(&self.scratch))
    }

    /// Expect and consume `{`.
    ///
    /// # Errors
    /// Returns [`ModelError::UnexpectedToken`] if the next token isn't `{`.
    pub fn expect_object_begin(&mut self) -> ModelResult<()> {
        self.expect(Token::ObjectBegin)
    }

    /// Expect and consume `}`.
    ///
    /// # Errors
    /// Returns [`ModelError::UnexpectedToken`] if the next token isn't `}`.
    pub fn expect_object_end(&mut self) -> ModelResult<()> {
        self.expect(Token::ObjectEnd)
    }

    /// Expect and consume `[`.
    ///
    /// # Errors
    /// Returns [`ModelError::UnexpectedToken`] if the next token isn't `[`.
    pub fn expect_array_begin(&mut self) -> ModelResult<()> {
        self.expect(Token::ArrayBegin)
    }

    /// Expect and consume `]`.
    ///
    /// # Errors
    /// Returns [`ModelError::UnexpectedToken`] if the next token isn't `]`.
    pub fn expect_array_end(&mut self) -> ModelResult<()> {
        self.expect(Token::ArrayEnd)
    }

    fn expect(&mut self, want: Token<'static>) -> ModelResult<()> {
        let tok = self.next()?;
        if std::mem::discriminant(&tok) == std::mem::discriminant(&want) {
            Ok(())
        } else {
            Err(ModelError::UnexpectedToken {
                expected: want.describe(),
                got: tok.describe(),
            })
        }
    }

    /// Read a string value.
    ///
    /// # Errors
    /// Returns [`ModelError::UnexpectedToken`] if the next token isn't a string.
    pub fn read_string(&mut self) -> ModelResult<String> {
        match self.next()? {
            Token::String(s) => Ok(s.to_owned()),
            other => Err(ModelError::UnexpectedToken {
                expected: "string".to_owned(),
                got: other.describe(),
            }),
        }
    }

    /// Read a number value.
    ///
    /// # Errors
    /// Returns [`ModelError::UnexpectedToken`] if the next token isn't a number.
    pub fn read_number(&mut self) -> ModelResult<f64> {
        match self.next()? {
            Token::Number(n) => Ok(n),
            other => Err(ModelError::UnexpectedToken {
                expected: "number".to_owned(),
                got: other.describe(),
            }),
        }
    }

    /// Read a boolean value.
    ///
    /// # Errors
    /// Returns [`ModelError::UnexpectedToken`] if the next token isn't a bool.
    pub fn read_bool(&mut self) -> ModelResult<bool> {
        match self.next()? {
            Token::Bool(b) => Ok(b),
            other => Err(ModelError::UnexpectedToken {
                expected: "bool".to_owned(),
                got: other.describe(),
            }),
        }
    }

    /// Read a null value.
    ///
    /// # Errors
    /// Returns [`ModelError::UnexpectedToken`] if the next token isn't `null`.
    pub fn read_null(&mut self) -> ModelResult<()> {
        match self.next()? {
            Token::Null => Ok(()),
            other => Err(ModelError::UnexpectedToken {
                expected: "null".to_owned(),
                got: other.describe(),
            }),
        }
    }

    /// Skip an entire value (object, array, or scalar), discarding it.
    ///
    /// # Errors
    /// Propagates any parse error encountered while scanning the skipped value.
    pub fn skip_value(&mut self) -> ModelResult<()> {
        match self.next()? {
            Token::ObjectBegin => self.skip_object_body(),
            Token::ArrayBegin => self.skip_array_body(),
            Token::String(_) | Token::Number(_) | Token::Bool(_) | Token::Null => Ok(()),
            other => Err(ModelError::UnexpectedToken {
                expected: "a value".to_owned(),
                got: other.describe(),
            }),
        }
    }

    fn skip_object_body(&mut self) -> ModelResult<()> {
        if matches!(self.peek()?, Token::ObjectEnd) {
            self.next()?;
            return Ok(());
        }
        loop {
            self.read_string()?;
            self.expect(Token::Colon)?;
            self.skip_value()?;
            match self.next()? {
                Token::Comma => continue,
                Token::ObjectEnd => return Ok(()),
                other => {
                    return Err(ModelError::UnexpectedToken {
                        expected: "',' or '}'".to_owned(),
                        got: other.describe(),
                    });
                }
            }
        }
    }

    fn skip_array_body(&mut self) -> ModelResult<()> {
        if matches!(self.peek()?, Token::ArrayEnd) {
            self.next()?;
            return Ok(());
        }
        loop {
            self.skip_value()?;
            match self.next()? {
                Token::Comma => continue,
                Token::ArrayEnd => return Ok(()),
                other => {
                    return Err(ModelError::UnexpectedToken {
                        expected: "',' or ']'".to_owned(),
                        got: other.describe(),
                    });
                }
            }
        }
    }
}

fn decode_escapes(raw: &str, out: &mut String) -> ModelResult<()> {
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| ModelError::UnterminatedString(0))?;
                if let Some(ch) = char::from_u32(code) {
                    out.push(ch);
                }
            }
            _ => return Err(ModelError::UnterminatedString(0)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_object_of_scalars() {
        let mut r = JsonReader::new(r#"{"a": 1, "b": true, "c": null, "d": "hi"}"#);
        r.expect_object_begin().unwrap();
        assert_eq!(r.read_string().unwrap(), "a");
        r.expect(Token::Colon).unwrap();
        assert_eq!(r.read_number().unwrap(), 1.0);
        r.expect(Token::Comma).unwrap();
        assert_eq!(r.read_string().unwrap(), "b");
        r.expect(Token::Colon).unwrap();
        assert!(r.read_bool().unwrap());
        r.expect(Token::Comma).unwrap();
        assert_eq!(r.read_string().unwrap(), "c");
        r.expect(Token::Colon).unwrap();
        r.read_null().unwrap();
        r.expect(Token::Comma).unwrap();
        assert_eq!(r.read_string().unwrap(), "d");
        r.expect(Token::Colon).unwrap();
        assert_eq!(r.read_string().unwrap(), "hi");
        r.expect_object_end().unwrap();
    }

    #[test]
    fn decodes_escaped_strings() {
        let mut r = JsonReader::new(r#""line\nbreak \"quoted\"""#);
        assert_eq!(r.read_string().unwrap(), "line\nbreak \"quoted\"");
    }

    #[test]
    fn skips_nested_values() {
        let mut r = JsonReader::new(r#"{"x": {"y": [1, 2, {"z": true}]}, "w": 1}"#);
        r.expect_object_begin().unwrap();
        assert_eq!(r.read_string().unwrap(), "x");
        r.expect(Token::Colon).unwrap();
        r.skip_value().unwrap();
        r.expect(Token::Comma).unwrap();
        assert_eq!(r.read_string().unwrap(), "w");
    }

    #[test]
    fn reports_unterminated_string() {
        let mut r = JsonReader::new(r#""abc"#);
        assert!(matches!(r.next(), Err(ModelError::UnterminatedString(_))));
    }

    #[test]
    fn reports_unexpected_token() {
        let mut r = JsonReader::new("nope");
        assert!(matches!(r.next(), Err(ModelError::UnexpectedToken { .. })));
    }

    #[test]
    fn peek_does_not_advance() {
        let mut r = JsonReader::new(r#"{"a":1}"#);
        assert_eq!(r.peek().unwrap(), Token::ObjectBegin);
        assert_eq!(r.next().unwrap(), Token::ObjectBegin);
    }
}
