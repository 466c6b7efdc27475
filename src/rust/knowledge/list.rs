//! Parsing of list-valued cells such as `['Paracetamol', 'Rest']`.

use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListParseError {
    #[error("list literal must start with '['")]
    NotAList,
    #[error("expected a quoted string at byte {0}")]
    ExpectedString(usize),
    #[error("unterminated string starting at byte {0}")]
    UnterminatedString(usize),
    #[error("expected ',' or ']' at byte {0}")]
    ExpectedSeparator(usize),
    #[error("list literal is not closed")]
    Unclosed,
    #[error("unexpected text after list at byte {0}")]
    Trailing(usize),
}

/// Parses a list literal of single- or double-quoted strings.
///
/// Accepts the usual escapes, whitespace anywhere between tokens, a trailing
/// comma and the empty list.
pub fn parse_list_literal(raw: &str) -> Result<Vec<String>, ListParseError> {
    let mut chars = raw.char_indices().peekable();
    skip_whitespace(&mut chars);
    match chars.next() {
        Some((_, '[')) => {}
        _ => return Err(ListParseError::NotAList),
    }

    let mut items = Vec::new();
    loop {
        skip_whitespace(&mut chars);
        match chars.next() {
            Some((_, ']')) => break,
            Some((pos, quote @ ('\'' | '"'))) => {
                items.push(read_string(&mut chars, quote, pos)?);
            }
            Some((pos, _)) => return Err(ListParseError::ExpectedString(pos)),
            None => return Err(ListParseError::Unclosed),
        }

        skip_whitespace(&mut chars);
        match chars.next() {
            Some((_, ',')) => continue,
            Some((_, ']')) => break,
            Some((pos, _)) => return Err(ListParseError::ExpectedSeparator(pos)),
            None => return Err(ListParseError::Unclosed),
        }
    }

    skip_whitespace(&mut chars);
    if let Some((pos, _)) = chars.next() {
        return Err(ListParseError::Trailing(pos));
    }
    Ok(items)
}

/// Parses `raw` as a list literal, or keeps it whole as a one-item list.
pub fn list_or_single(raw: &str) -> Vec<String> {
    match parse_list_literal(raw) {
        Ok(items) => items,
        Err(e) => {
            log::debug!("Keeping unparsable list cell as a single value ({}): {}", e, raw);
            vec![raw.to_string()]
        }
    }
}

fn skip_whitespace(chars: &mut Peekable<CharIndices<'_>>) {
    while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
}

fn read_string(
    chars: &mut Peekable<CharIndices<'_>>,
    quote: char,
    start: usize,
) -> Result<String, ListParseError> {
    let mut out = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            c if c == quote => return Ok(out),
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, e @ ('\\' | '\'' | '"'))) => out.push(e),
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => break,
            },
            c => out.push(c),
        }
    }
    Err(ListParseError::UnterminatedString(start))
}
