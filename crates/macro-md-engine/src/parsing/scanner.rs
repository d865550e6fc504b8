use regex::Regex;

use super::header::{parse_chain, split_args};
use crate::error::{MacroError, Result};

/// One macro of a header, with its raw argument list.
///
/// All invocations of a chain share the header's offsets and content span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroInvocation {
    pub identifier: String,
    pub raw_args: Option<String>,
    /// Offset of the delimiter.
    pub start: usize,
    /// Offset just past the opening `{`.
    pub end: usize,
}

impl MacroInvocation {
    /// Arguments split on commas and trimmed.
    pub fn args(&self) -> Vec<String> {
        self.raw_args.as_deref().map(split_args).unwrap_or_default()
    }
}

/// A located header: delimiter, identifier chain and opening boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    pub start: usize,
    pub end: usize,
    pub chain: Vec<MacroInvocation>,
}

impl HeaderMatch {
    /// First byte of the content.
    pub fn content_start(&self) -> usize {
        self.end
    }
}

/// Finds macro headers for one delimiter.
#[derive(Debug, Clone)]
pub struct Scanner {
    delimiter: String,
    header: Regex,
}

impl Scanner {
    pub const DEFAULT_DELIMITER: &'static str = "^";

    /// Compiles the header pattern. The delimiter is matched literally.
    pub fn new(delimiter: &str) -> Result<Self> {
        if delimiter.is_empty() {
            return Err(MacroError::EmptyDelimiter);
        }

        // Header text may not cross a line or contain a brace.
        let pattern = format!(r"{}([^{{}}\r\n]*?)\{{", regex::escape(delimiter));
        let header = Regex::new(&pattern).map_err(|source| MacroError::InvalidDelimiter {
            delimiter: delimiter.to_string(),
            source,
        })?;

        Ok(Self {
            delimiter: delimiter.to_string(),
            header,
        })
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// The delimiter escaped for use inside other patterns.
    pub fn escaped_delimiter(&self) -> String {
        regex::escape(&self.delimiter)
    }

    /// Finds the first header starting at or after byte `from`.
    ///
    /// A delimiter followed by `{` with no identifier in between (`^{`) is
    /// not a header and is skipped. Identifiers never contain the delimiter:
    /// in `x^2 and ^upper{y}` the header is `^upper{`. `None` means no macros
    /// remain.
    pub fn find_at(&self, text: &str, from: usize) -> Option<HeaderMatch> {
        let mut search = from;
        while let Some(caps) = self.header.captures_at(text, search) {
            let whole = caps.get(0)?;
            let raw = caps.get(1)?;

            if let Some(offset) = last_delimiter_outside_args(raw.as_str(), &self.delimiter) {
                search = raw.start() + offset;
                continue;
            }

            let chain: Vec<MacroInvocation> = parse_chain(raw.as_str())
                .into_iter()
                .map(|entry| MacroInvocation {
                    identifier: entry.identifier.to_string(),
                    raw_args: entry.raw_args.map(str::to_string),
                    start: whole.start(),
                    end: whole.end(),
                })
                .collect();

            if !chain.is_empty() {
                log::trace!(
                    "header at {}..{}: {:?}",
                    whole.start(),
                    whole.end(),
                    raw.as_str()
                );
                return Some(HeaderMatch {
                    start: whole.start(),
                    end: whole.end(),
                    chain,
                });
            }
            search = whole.start() + self.delimiter.len();
        }
        None
    }
}

/// Byte offset of the last `delimiter` in `raw` that is not inside `( )`.
fn last_delimiter_outside_args(raw: &str, delimiter: &str) -> Option<usize> {
    let mut in_args = false;
    let mut last = None;
    for (i, c) in raw.char_indices() {
        if !in_args && raw[i..].starts_with(delimiter) {
            last = Some(i);
        } else if c == '(' {
            in_args = true;
        } else if c == ')' {
            in_args = false;
        }
    }
    last
}
