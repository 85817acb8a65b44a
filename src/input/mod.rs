//! Tokenizer for free-text numeric input.
//!
//! Text is split on runs of commas and whitespace. Delimiter runs are kept as
//! tokens (including the possibly empty segments at either end) so that the
//! original text can be rebuilt from the token stream, which lets an editor
//! highlight valid and invalid entries in place.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TokenKind {
    Delimiter,
    Valid(f64),
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact text covered by this token
    pub content: String,
}

impl Token {
    /// Parsed value for valid tokens
    pub fn value(&self) -> Option<f64> {
        match self.kind {
            TokenKind::Valid(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParsedInput {
    pub tokens: Vec<Token>,
    /// Values of the valid tokens, in input order
    pub numbers: Vec<f64>,
    /// Number of error tokens
    pub errors: usize,
}

impl ParsedInput {
    /// Concatenate all token contents, reproducing the parsed text.
    pub fn reconstruct(&self) -> String {
        self.tokens.iter().map(|t| t.content.as_str()).collect()
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Comma or whitespace, using the ECMAScript `\s` class.
fn is_delimiter(c: char) -> bool {
    c == ',' || c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

/// Tokenize `text` into delimiter, valid-number and error tokens.
///
/// Never fails: malformed entries become error tokens and are counted.
pub fn parse(text: &str) -> ParsedInput {
    let mut parsed = ParsedInput::default();

    // Segments alternate value / delimiter and always start and end with a
    // (possibly empty) value segment.
    let mut start = 0;
    let mut in_delimiter = false;
    for (idx, c) in text.char_indices() {
        let delim = is_delimiter(c);
        if delim != in_delimiter {
            push_segment(&mut parsed, &text[start..idx], in_delimiter);
            start = idx;
            in_delimiter = delim;
        }
    }
    push_segment(&mut parsed, &text[start..], in_delimiter);
    if in_delimiter {
        push_segment(&mut parsed, "", false);
    }

    parsed
}

fn push_segment(parsed: &mut ParsedInput, segment: &str, is_delimiter_run: bool) {
    let kind = if is_delimiter_run || segment.is_empty() {
        TokenKind::Delimiter
    } else {
        match parse_literal(segment) {
            Some(value) if value.is_finite() => {
                parsed.numbers.push(value);
                TokenKind::Valid(value)
            }
            _ => {
                parsed.errors += 1;
                TokenKind::Error
            }
        }
    };

    parsed.tokens.push(Token {
        kind,
        content: segment.to_string(),
    });
}

/// Convert a single form field to a number.
///
/// Surrounding whitespace is ignored and an empty field reads as `0`. Returns
/// `None` for anything that is not a finite number.
pub fn parse_number(field: &str) -> Option<f64> {
    let trimmed = field.trim_matches(is_delimiter_whitespace);
    if trimmed.is_empty() {
        return Some(0.0);
    }
    parse_literal(trimmed).filter(|v| v.is_finite())
}

fn is_delimiter_whitespace(c: char) -> bool {
    c != ',' && is_delimiter(c)
}

/// Numeric literal grammar: optional sign, decimal digits with an optional
/// fraction and exponent, or an unsigned `0x` / `0o` / `0b` integer.
fn parse_literal(s: &str) -> Option<f64> {
    if let Some(value) = parse_radix_literal(s) {
        return Some(value);
    }

    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }

    if int_digits == 0 && frac_digits == 0 {
        // "Infinity" is a literal but never finite, so it is an error token
        return None;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }

    if i != bytes.len() {
        return None;
    }

    s.parse::<f64>().ok()
}

fn parse_radix_literal(s: &str) -> Option<f64> {
    let (radix, digits) = match s.get(..2)? {
        "0x" | "0X" => (16, &s[2..]),
        "0o" | "0O" => (8, &s[2..]),
        "0b" | "0B" => (2, &s[2..]),
        _ => return None,
    };
    if digits.is_empty() {
        return None;
    }

    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    })
}
