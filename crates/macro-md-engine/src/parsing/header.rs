use super::cursor::Cursor;

const ARGS_OPEN: u8 = b'(';
const ARGS_CLOSE: u8 = b')';
const ARG_SEPARATOR: char = ',';

/// One identifier of a header with its raw argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEntry<'a> {
    pub identifier: &'a str,
    /// Text between the parentheses, untrimmed. `None` when no list was given.
    pub raw_args: Option<&'a str>,
}

/// Splits the text between the delimiter and `{` into chain entries.
///
/// `wrap (a, b) upper` yields `wrap` with `"a, b"` and `upper` without arguments.
/// An unterminated argument list runs to the end of the header.
pub fn parse_chain(header: &str) -> Vec<ChainEntry<'_>> {
    let mut cur = Cursor::new(header, 0);
    let mut chain = vec![];

    loop {
        cur.skip_whitespace();
        if cur.eof() {
            break;
        }

        let identifier = cur.eat_while(|b| !is_identifier_end(b));
        cur.skip_whitespace();
        let raw_args = try_parse_args(&mut cur);

        if identifier.is_empty() {
            // Stray `(...)` or `)` with no identifier in front of it.
            if raw_args.is_none() {
                cur.bump();
            }
            continue;
        }
        chain.push(ChainEntry {
            identifier,
            raw_args,
        });
    }

    chain
}

/// Splits a raw argument list on commas and trims each argument.
///
/// An empty or all-whitespace list means no arguments at all.
pub fn split_args(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return vec![];
    }
    raw.split(ARG_SEPARATOR)
        .map(|arg| arg.trim().to_string())
        .collect()
}

fn is_identifier_end(b: u8) -> bool {
    b.is_ascii_whitespace() || b == ARGS_OPEN || b == ARGS_CLOSE
}

fn try_parse_args<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    if cur.peek() != Some(ARGS_OPEN) {
        return None;
    }
    cur.bump(); // (
    let inner = cur.eat_while(|b| b != ARGS_CLOSE);
    cur.bump(); // ) unless at eof
    Some(inner)
}
