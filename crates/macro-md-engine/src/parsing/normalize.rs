use std::borrow::Cow;

use regex::Regex;

use super::scanner::Scanner;
use crate::error::Result;

/// Strips whitespace that would otherwise make a block invocation look inline.
///
/// - indentation in front of a header that starts its line is removed
/// - spaces and tabs between a closing `}` and the end of its line are removed
///
/// Nothing else in the text is touched.
#[derive(Debug, Clone)]
pub struct Normalizer {
    indented_header: Regex,
    trailing_space: Regex,
}

impl Normalizer {
    pub fn new(scanner: &Scanner) -> Result<Self> {
        let indented_header = Regex::new(&format!(r"(?m)^[ \t]+({})", scanner.escaped_delimiter()))?;
        let trailing_space = Regex::new(r"(?m)\}[ \t]+$")?;
        Ok(Self {
            indented_header,
            trailing_space,
        })
    }

    pub fn normalize<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let dedented = self.indented_header.replace_all(text, "${1}");
        if !self.trailing_space.is_match(&dedented) {
            return dedented;
        }
        Cow::Owned(self.trailing_space.replace_all(&dedented, "}").into_owned())
    }
}
