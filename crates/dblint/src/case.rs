//! Identifier tokenizer and case converter.
//!
//! Identifiers are split into tokens on non-alphanumeric separators and on camel-case
//! boundaries, then re-joined in the requested [`CaseStyle`]. Tokens made only of
//! uppercase letters and digits that are longer than one character are acronyms and keep
//! their spelling in PascalCase and camelCase output; snake_case lowercases everything.

use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStyle {
    #[serde(alias = "pascal", alias = "PASCAL_CASE")]
    PascalCase,
    #[serde(alias = "camel", alias = "CAMEL_CASE")]
    CamelCase,
    #[default]
    #[serde(alias = "snake", alias = "SNAKE_CASE")]
    SnakeCase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub tokens: Vec<String>,
    pub new_identifier: String,
}

/// Convert `identifier` to `style`.
///
/// An identifier that is already PascalCase (`^[A-Z][A-Za-z0-9]*$`) is returned unchanged
/// when PascalCase is requested.
pub fn convert(identifier: &str, style: CaseStyle) -> Conversion {
    let tokens = tokenize(identifier);

    if style == CaseStyle::PascalCase && is_pascal_case(identifier) {
        return Conversion {
            tokens,
            new_identifier: identifier.to_string(),
        };
    }

    let new_identifier = match style {
        CaseStyle::SnakeCase => tokens
            .iter()
            .map(|t| t.to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join("_"),
        CaseStyle::PascalCase | CaseStyle::CamelCase => {
            let mut out = String::with_capacity(identifier.len());
            for (i, word) in join_digit_runs(&tokens).iter().enumerate() {
                if is_acronym(word) {
                    out.push_str(word);
                } else if i == 0 && style == CaseStyle::CamelCase {
                    push_uncapitalized(&mut out, word);
                } else {
                    push_capitalized(&mut out, word);
                }
            }
            out
        }
    };

    Conversion {
        tokens,
        new_identifier,
    }
}

/// Split an identifier into its semantic tokens.
///
/// Boundaries are any character outside `[A-Za-z0-9]`, a lowercase letter or digit
/// followed by an uppercase letter, an uppercase letter that starts a capitalized word
/// after other uppercase letters (`HTTPServer` -> `HTTP`, `Server`), and a digit run that
/// starts a lowercase word after an acronym (`HTTP2xx` -> `HTTP`, `2xx`).
pub fn tokenize(identifier: &str) -> Vec<String> {
    token_spans(identifier)
        .into_iter()
        .map(|span| identifier[span].to_string())
        .collect()
}

/// Byte ranges of the tokens [`tokenize`] returns.
pub(crate) fn token_spans(identifier: &str) -> Vec<Range<usize>> {
    let chars: Vec<(usize, char)> = identifier.char_indices().collect();
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &(offset, c)) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if let Some(s) = start.take() {
                spans.push(s..offset);
            }
            continue;
        }

        match start {
            // Token characters are ASCII, so the byte length is the character count.
            Some(s) if starts_token(&chars, i, offset - s) => {
                spans.push(s..offset);
                start = Some(offset);
            }
            Some(_) => {}
            None => start = Some(offset),
        }
    }
    if let Some(s) = start {
        spans.push(s..identifier.len());
    }

    spans
}

/// Whether `chars[i]` begins a new token after a current token of `current_len` characters.
fn starts_token(chars: &[(usize, char)], i: usize, current_len: usize) -> bool {
    let c = chars[i].1;
    let prev = chars[i - 1].1;

    if c.is_ascii_uppercase() {
        let next_is_lower = chars.get(i + 1).is_some_and(|&(_, n)| n.is_ascii_lowercase());
        return prev.is_ascii_lowercase() || prev.is_ascii_digit() || next_is_lower;
    }

    // `V2` and `A1a` stay whole.
    c.is_ascii_digit()
        && prev.is_ascii_uppercase()
        && current_len >= 2
        && digits_then_lowercase(&chars[i..])
}

fn digits_then_lowercase(rest: &[(usize, char)]) -> bool {
    rest.iter()
        .map(|&(_, c)| c)
        .find(|c| !c.is_ascii_digit())
        .is_some_and(|c| c.is_ascii_lowercase())
}

/// Without separators two adjacent digit runs read back as one, so a token starting with a
/// digit is joined onto a preceding token ending in one (`A1`, `1a` -> `A11a`).
fn join_digit_runs(tokens: &[String]) -> Vec<String> {
    let mut words: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match words.last_mut() {
            Some(prev)
                if prev.ends_with(|c: char| c.is_ascii_digit())
                    && token.starts_with(|c: char| c.is_ascii_digit()) =>
            {
                prev.push_str(token);
            }
            _ => words.push(token.clone()),
        }
    }
    words
}

fn is_pascal_case(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

fn is_acronym(token: &str) -> bool {
    token.len() > 1 && !token.chars().any(|c| c.is_ascii_lowercase())
}

fn push_uncapitalized(out: &mut String, token: &str) {
    let mut chars = token.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_lowercase());
        out.extend(chars);
    }
}

fn push_capitalized(out: &mut String, token: &str) {
    let mut chars = token.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_uppercase());
        out.extend(chars.map(|c| c.to_ascii_lowercase()));
    }
}
