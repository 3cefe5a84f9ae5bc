//! Format templates with positional and named placeholders.
//!
//! `{}` takes the next token, `{N}` the N-th token and `{name}` reads the
//! record field `name` directly. Tokens are field names resolved against the
//! record at render time. `{{` and `}}` produce literal braces.

use std::sync::OnceLock;

use modelfaker_core::Record;
use regex::Regex;

use crate::errors::ReplaceError;
use crate::replacers::field_text;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Next,
    Index(usize),
    Field(String),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|\{([^{}]*)\}").unwrap_or_else(|err| panic!("invalid regex: {err}"))
    })
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, ReplaceError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for captures in placeholder_regex().captures_iter(source) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            push_literal(&mut literal, &source[last..whole.start()], source)?;
            last = whole.end();

            match whole.as_str() {
                "{{" => literal.push('{'),
                "}}" => literal.push('}'),
                _ => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    let name = captures.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                    segments.push(parse_placeholder(name));
                }
            }
        }
        push_literal(&mut literal, &source[last..], source)?;
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Record fields the template reads, tokens first.
    pub fn fields<'a>(&'a self, tokens: &'a [String]) -> Vec<&'a str> {
        let mut fields: Vec<&str> = tokens.iter().map(String::as_str).collect();
        for segment in &self.segments {
            if let Segment::Field(name) = segment
                && !fields.contains(&name.as_str())
            {
                fields.push(name);
            }
        }
        fields
    }

    pub fn render(&self, record: &Record, tokens: &[String]) -> Result<String, ReplaceError> {
        let mut out = String::new();
        let mut next = 0;
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Next => {
                    out.push_str(&token_text(record, tokens, next, &self.source)?);
                    next += 1;
                }
                Segment::Index(index) => {
                    out.push_str(&token_text(record, tokens, *index, &self.source)?);
                }
                Segment::Field(name) => out.push_str(&field_text(record, name)?),
            }
        }
        Ok(out)
    }
}

fn parse_placeholder(name: &str) -> Segment {
    if name.is_empty() {
        Segment::Next
    } else if let Ok(index) = name.parse::<usize>() {
        Segment::Index(index)
    } else {
        Segment::Field(name.to_string())
    }
}

fn push_literal(literal: &mut String, text: &str, source: &str) -> Result<(), ReplaceError> {
    if text.contains('{') || text.contains('}') {
        return Err(ReplaceError::Template(format!(
            "unbalanced brace in '{source}'"
        )));
    }
    literal.push_str(text);
    Ok(())
}

fn token_text(
    record: &Record,
    tokens: &[String],
    index: usize,
    source: &str,
) -> Result<String, ReplaceError> {
    let field = tokens.get(index).ok_or_else(|| {
        ReplaceError::Template(format!(
            "placeholder {index} of '{source}' has no matching token"
        ))
    })?;
    field_text(record, field)
}
