//! Placeholder grammar, extraction and tokenizing.
//!
//! A placeholder is a typed, named slot embedded in SQL text:
//!
//! ```text
//! %(name)s            string
//! %(name)b            boolean
//! %(name)d            decimal number, no fixed precision
//! %(name)0.2d         decimal number with two decimals (also %(name).2d)
//! %(name:hint)s       any of the above with a default value hint
//! ```
//!
//! Matching is purely lexical. The SQL around the placeholders is never
//! interpreted, which is why a quoted `'%(x)s'` is still a placeholder. A
//! doubled `%%` is the driver's escaped percent sign and never opens one.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::error::ParamError;

lazy_static! {
    // `%%` or the head of a placeholder up to its closing parenthesis; the
    // suffix is checked separately so that a bad suffix can be reported
    static ref HEAD: Regex = Regex::new(r"%%|%\((?P<name>[A-Za-z0-9_\-]+)(?::(?P<hint>[^()]*))?\)").unwrap();
    static ref HINT: Regex = Regex::new(r"^[\w.\-]+$").unwrap();
    static ref SUFFIX: Regex = Regex::new(r"^(?:s|b|(?:0?\.(?P<decimals>[0-9]+))?d)").unwrap();
}

/// One occurrence of a placeholder in a SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    /// The default value hint, as written after the colon.
    pub hint: Option<String>,
    /// Digit run of a `0.Nd` suffix, empty when absent.
    pub decimals: String,
    /// One of `s`, `b` or `d`.
    pub suffix: char,
    /// Byte range of the whole placeholder in the text it was found in.
    pub span: Range<usize>,
}

impl Placeholder {
    /// The bare form expected by native named-parameter binding.
    pub fn bare(&self) -> String {
        bare(&self.name)
    }
    pub fn is_bare(&self) -> bool {
        self.hint.is_none() && self.decimals.is_empty() && self.suffix == 's'
    }
}

pub fn bare(name: &str) -> String {
    format!("%({name})s")
}

/// A piece of tokenized SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    /// An escaped `%%`.
    Percent,
    Placeholder(Placeholder),
}

/// Splits SQL text into plain text, escaped percent signs and placeholders in
/// a single left-to-right pass.
///
/// Fails with [`ParamError::InvalidPlaceholder`] when something is shaped
/// like a placeholder (`%(name)` or `%(name:hint)`) but its hint or suffix
/// does not follow the grammar.
pub fn tokenize(sql: &str) -> Result<Vec<Segment<'_>>, ParamError> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for head in HEAD.captures_iter(sql) {
        let Some(whole) = head.get(0) else { continue };
        if cursor < whole.start() {
            segments.push(Segment::Text(&sql[cursor..whole.start()]));
        }
        if whole.as_str() == "%%" {
            segments.push(Segment::Percent);
            cursor = whole.end();
            continue;
        }
        let placeholder = parse(sql, &head)?;
        cursor = placeholder.span.end;
        segments.push(Segment::Placeholder(placeholder));
    }
    if cursor < sql.len() {
        segments.push(Segment::Text(&sql[cursor..]));
    }
    Ok(segments)
}

fn parse(sql: &str, head: &Captures) -> Result<Placeholder, ParamError> {
    let whole = &head[0];
    let start = head.get(0).map_or(0, |m| m.start());
    let end = start + whole.len();
    let invalid = || ParamError::InvalidPlaceholder {
        placeholder: snippet(sql, start, end),
        offset: start,
    };
    let hint = match head.name("hint") {
        Some(hint) if HINT.is_match(hint.as_str()) => Some(hint.as_str().to_string()),
        Some(_) => return Err(invalid()),
        None => None,
    };
    let suffix = SUFFIX.captures(&sql[end..]).ok_or_else(invalid)?;
    let suffix_text = &suffix[0];
    let decimals = suffix.name("decimals").map_or("", |d| d.as_str());
    // the decimal count has to fit the precision it declares
    if !decimals.is_empty() && decimals.parse::<u32>().is_err() {
        return Err(ParamError::InvalidPlaceholder {
            placeholder: sql[start..end + suffix_text.len()].to_string(),
            offset: start,
        });
    }
    Ok(Placeholder {
        name: head["name"].to_string(),
        hint,
        decimals: decimals.to_string(),
        suffix: suffix_text.chars().last().unwrap_or('s'),
        span: start..end + suffix_text.len(),
    })
}

// the offending head plus the character that should have been its suffix
fn snippet(sql: &str, start: usize, end: usize) -> String {
    let next = sql[end..].chars().next().map_or(0, char::len_utf8);
    sql[start..end + next].to_string()
}

/// Every placeholder occurrence in textual order, repeats included.
pub fn extract(sql: &str) -> Result<Vec<Placeholder>, ParamError> {
    Ok(tokenize(sql)?
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(placeholder) => Some(placeholder),
            _ => None,
        })
        .collect())
}

/// The `(name, decimals, suffix)` view of [`extract`].
pub fn triples(sql: &str) -> Result<Vec<(String, String, char)>, ParamError> {
    Ok(extract(sql)?
        .into_iter()
        .map(|p| (p.name, p.decimals, p.suffix))
        .collect())
}

/// A pattern matching any occurrence of `name`, whatever its hint or suffix.
pub fn name_pattern(name: &str) -> Regex {
    Regex::new(&format!(
        r"%\({}(?::[\w.\-]+)?\)(?:s|b|(?:0?\.[0-9]+)?d)",
        regex::escape(name)
    ))
    .expect("an escaped name always forms a valid pattern")
}

/// Number of times `name` occurs as a placeholder in `sql`.
pub fn occurrences(sql: &str, name: &str) -> usize {
    name_pattern(name).find_iter(sql).count()
}
