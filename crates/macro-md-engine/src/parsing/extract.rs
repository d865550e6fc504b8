use super::scanner::{HeaderMatch, Scanner};
use crate::error::{MAX_NESTING_DEPTH, MacroError, Result};

/// Closing content boundary.
pub const CLOSE: char = '}';

/// Byte range of an invocation's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentSpan {
    pub start: usize,
    pub end: usize,
    /// False when the text ran out before the closing boundary.
    pub terminated: bool,
}

impl ContentSpan {
    /// Offset just past the closing boundary (or the end of text if unterminated).
    pub fn boundary_end(&self) -> usize {
        if self.terminated {
            self.end + CLOSE.len_utf8()
        } else {
            self.end
        }
    }
}

/// Finds the content of the invocation starting at `header`.
///
/// Walks forward over candidate closing boundaries keeping an open count.
/// A nested header that appears before the next candidate raises the count
/// and moves the cursor past it, so the nested invocation's own boundary is
/// not mistaken for ours. Nested content is not resolved here.
///
/// Running out of boundaries is tolerated: the content then extends to the
/// end of `text`. More than [`MAX_NESTING_DEPTH`] open invocations is an error.
pub fn extract_content(text: &str, header: &HeaderMatch, scanner: &Scanner) -> Result<ContentSpan> {
    let start = header.content_start();
    let mut open = 1usize;
    let mut cursor = start;

    loop {
        let Some(close) = text[cursor..].find(CLOSE).map(|i| cursor + i) else {
            log::trace!("unterminated macro at {}", header.start);
            return Ok(ContentSpan {
                start,
                end: text.len(),
                terminated: false,
            });
        };

        match scanner.find_at(text, cursor) {
            Some(nested) if nested.start < close => {
                open += 1;
                if open > MAX_NESTING_DEPTH {
                    return Err(MacroError::TooManyNestedMacros {
                        depth: open,
                        limit: MAX_NESTING_DEPTH,
                    });
                }
                cursor = nested.end;
            }
            _ => {
                open -= 1;
                if open == 0 {
                    return Ok(ContentSpan {
                        start,
                        end: close,
                        terminated: true,
                    });
                }
                cursor = close + CLOSE.len_utf8();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn content_of(text: &str) -> Result<String> {
        let scanner = Scanner::new("^").unwrap();
        let header = scanner.find_at(text, 0).unwrap();
        let span = extract_content(text, &header, &scanner)?;
        Ok(text[span.start..span.end].to_string())
    }

    #[rstest]
    #[case::empty("start ^f{} end", "")]
    #[case::inline("start ^f{content} end", "content")]
    #[case::markup_touching_braces("start ^f{_content_} end", "_content_")]
    #[case::multiline("^f{\ncontent\n}", "\ncontent\n")]
    #[case::nested(
        "outerstart ^f{innerstart ^f{content} innerend} outerend",
        "innerstart ^f{content} innerend"
    )]
    #[case::siblings("^f{first} ^f{second}", "first")]
    #[case::nested_siblings("^f{^g{a} ^g{b}} tail", "^g{a} ^g{b}")]
    #[case::chain("start ^f g(arg1){content} end", "content")]
    #[case::spaced_args("start ^f (arg1 ) {content} end", "content")]
    fn extracts_content(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(content_of(text).unwrap(), expected);
    }

    #[test]
    fn unterminated_macro_runs_to_end_of_text() {
        let text = "^f{never closed";
        let scanner = Scanner::new("^").unwrap();
        let header = scanner.find_at(text, 0).unwrap();
        let span = extract_content(text, &header, &scanner).unwrap();

        assert!(!span.terminated);
        assert_eq!(span.end, text.len());
        assert_eq!(span.boundary_end(), text.len());
    }

    #[test]
    fn unterminated_nested_macro_runs_to_end_of_text() {
        assert_eq!(content_of("^f{a ^g{b}").unwrap(), "a ^g{b}");
    }

    #[test]
    fn boundary_end_skips_closing_brace() {
        let text = "^f{x} y";
        let scanner = Scanner::new("^").unwrap();
        let header = scanner.find_at(text, 0).unwrap();
        let span = extract_content(text, &header, &scanner).unwrap();
        assert_eq!(span.boundary_end(), 5);
        assert_eq!(&text[span.boundary_end()..], " y");
    }

    fn self_nested(levels: usize) -> String {
        format!("{}x{}", "^f{".repeat(levels), "}".repeat(levels))
    }

    #[test]
    fn ten_levels_of_nesting_are_allowed() {
        let text = self_nested(MAX_NESTING_DEPTH);
        let content = content_of(&text).unwrap();
        assert_eq!(content, self_nested(MAX_NESTING_DEPTH - 1));
    }

    #[test]
    fn eleven_levels_of_nesting_fail() {
        let text = self_nested(MAX_NESTING_DEPTH + 1);
        let err = content_of(&text).unwrap_err();
        assert!(matches!(
            err,
            MacroError::TooManyNestedMacros {
                depth: 11,
                limit: 10
            }
        ));
    }

    #[test]
    fn sequential_invocations_do_not_count_as_nesting() {
        let inner = "^g{x} ".repeat(MAX_NESTING_DEPTH * 2);
        let text = format!("^f{{{inner}}}");
        assert_eq!(content_of(&text).unwrap(), inner);
    }
}
