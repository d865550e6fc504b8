use crate::context::ParseContext;
use crate::error::{MacroError, Result};

/// Replaces every placeholder pair in `text` with its macro's output.
///
/// The first marker found is paired with the next occurrence of the same
/// token. Everything between the two is resolved first (recursively, all
/// nested pairs), trimmed of layout padding, and passed as content to the
/// macro registered for the marker. A marker with no registered call yields
/// its resolved content unchanged.
///
/// Errors from macro functions are returned as raised.
pub fn resolve_placeholders(text: &str, ctx: &ParseContext) -> Result<String> {
    let guid = ctx.guid();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some((open_start, open_end)) = next_marker(text, guid, pos) {
        let marker = &text[open_start..open_end];
        let (close_start, close_end) = find_partner(text, guid, marker, open_end)
            .ok_or_else(|| MacroError::UnmatchedPlaceholder(marker.to_string()))?;

        let inner = resolve_placeholders(&text[open_end..close_start], ctx)?;
        let content = inner.trim();

        out.push_str(&text[pos..open_start]);
        match ctx.lookup(marker) {
            Some(call) => {
                log::debug!("invoking '{}' for {marker}", call.mac.identifier());
                out.push_str(&call.invoke(content)?);
            }
            None => {
                log::warn!("no macro registered for {marker}, keeping its content");
                out.push_str(content);
            }
        }
        pos = close_end;
    }

    out.push_str(&text[pos..]);
    Ok(out)
}

/// Removes every marker of `guid` from `text`, leaving everything else.
pub fn strip_markers(text: &str, guid: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some((start, end)) = next_marker(text, guid, pos) {
        out.push_str(&text[pos..start]);
        pos = end;
    }
    out.push_str(&text[pos..]);
    out
}

/// Finds the next `{guid}_{digits}` token at or after `from`.
fn next_marker(text: &str, guid: &str, from: usize) -> Option<(usize, usize)> {
    let mut search = from;
    while let Some(found) = text[search..].find(guid) {
        let start = search + found;
        let after_guid = start + guid.len();

        if text.as_bytes().get(after_guid) == Some(&b'_') {
            let digits = text[after_guid + 1..]
                .bytes()
                .take_while(u8::is_ascii_digit)
                .count();
            if digits > 0 {
                return Some((start, after_guid + 1 + digits));
            }
        }
        search = after_guid;
    }
    None
}

/// Finds the next occurrence of exactly `marker` (`M_1` does not match `M_12`).
fn find_partner(text: &str, guid: &str, marker: &str, from: usize) -> Option<(usize, usize)> {
    let mut search = from;
    while let Some((start, end)) = next_marker(text, guid, search) {
        if &text[start..end] == marker {
            return Some((start, end));
        }
        search = end;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Macro, MacroCall};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn tna() -> Macro {
        Macro::new("testNoArguments", |c, _| Ok(format!("TNA_start_{c}_TNA_end")))
    }

    fn twa() -> Macro {
        Macro::new("testWithArgument", |c, args| {
            Ok(format!("TWA_start_{c} {}_TWA_end", args[0]))
        })
    }

    fn tnanc() -> Macro {
        Macro::new("testNoArgumentsNoContent", |_, _| Ok("TNANC".to_string()))
    }

    fn context(calls: Vec<MacroCall>) -> ParseContext {
        let mut ctx = ParseContext::with_guid("GUID");
        for call in calls {
            ctx.register(call);
        }
        ctx
    }

    fn call(mac: Macro, args: &[&str]) -> MacroCall {
        MacroCall::new(mac, args.iter().map(|a| a.to_string()).collect())
    }

    #[rstest]
    #[case::no_macros("<p>start end</p>\n", vec![], "<p>start end</p>\n")]
    #[case::inline_empty(
        "<p>start GUID_0  GUID_0 end</p>\n",
        vec![call(tnanc(), &[])],
        "<p>start TNANC end</p>\n"
    )]
    #[case::inline(
        "<p>start GUID_0 content GUID_0 end</p>\n",
        vec![call(tna(), &[])],
        "<p>start TNA_start_content_TNA_end end</p>\n"
    )]
    #[case::inline_markup(
        "<p>start GUID_0 <em>content</em> GUID_0 end</p>\n",
        vec![call(tna(), &[])],
        "<p>start TNA_start_<em>content</em>_TNA_end end</p>\n"
    )]
    #[case::inline_nested(
        "<p>outerstart GUID_0 innerstart GUID_1 content GUID_1 innerend GUID_0 outerend</p>\n",
        vec![call(tna(), &[]), call(tna(), &[])],
        "<p>outerstart TNA_start_innerstart TNA_start_content_TNA_end innerend_TNA_end outerend</p>\n"
    )]
    #[case::inline_siblings(
        "<p>start GUID_0 first GUID_0 GUID_1 second GUID_1 end</p>\n",
        vec![call(tna(), &[]), call(tna(), &[])],
        "<p>start TNA_start_first_TNA_end TNA_start_second_TNA_end end</p>\n"
    )]
    #[case::block(
        "GUID_0\n<p>content</p>\nGUID_0\n",
        vec![call(tna(), &[])],
        "TNA_start_<p>content</p>_TNA_end\n"
    )]
    #[case::block_siblings(
        "GUID_0\n<p>first</p>\nGUID_0\nGUID_1\n<p>second</p>\nGUID_1\n",
        vec![call(tna(), &[]), call(tna(), &[])],
        "TNA_start_<p>first</p>_TNA_end\nTNA_start_<p>second</p>_TNA_end\n"
    )]
    #[case::argument(
        "<p>start GUID_0 content GUID_0 end</p>\n",
        vec![call(twa(), &["arg1"])],
        "<p>start TWA_start_content arg1_TWA_end end</p>\n"
    )]
    #[case::chain_inline(
        "<p>start GUID_0 GUID_1 content GUID_1 GUID_0 end</p>\n",
        vec![call(tna(), &[]), call(twa(), &["arg1"])],
        "<p>start TNA_start_TWA_start_content arg1_TWA_end_TNA_end end</p>\n"
    )]
    #[case::chain_block(
        "GUID_0\nGUID_1\n<p>content</p>\nGUID_1\nGUID_0\n",
        vec![call(tna(), &[]), call(twa(), &["arg1"])],
        "TNA_start_TWA_start_<p>content</p> arg1_TWA_end_TNA_end\n"
    )]
    fn resolves_placeholders(
        #[case] text: &str,
        #[case] calls: Vec<MacroCall>,
        #[case] expected: &str,
    ) {
        let ctx = context(calls);
        assert_eq!(resolve_placeholders(text, &ctx).unwrap(), expected);
    }

    #[test]
    fn inner_macros_run_before_outer() {
        use std::sync::{Arc, Mutex};

        let order = Arc::new(Mutex::new(Vec::new()));
        let recorder = |name: &'static str| {
            let order = Arc::clone(&order);
            Macro::new(name, move |c, _| {
                order.lock().unwrap().push(name);
                Ok(format!("{name}({c})"))
            })
        };
        let ctx = context(vec![call(recorder("outer"), &[]), call(recorder("inner"), &[])]);

        let out = resolve_placeholders("GUID_0 a GUID_1 b GUID_1 GUID_0", &ctx).unwrap();

        assert_eq!(out, "outer(a inner(b))");
        assert_eq!(*order.lock().unwrap(), vec!["inner", "outer"]);
    }

    #[test]
    fn markers_with_shared_prefix_pair_exactly() {
        let mut calls = Vec::new();
        for _ in 0..12 {
            calls.push(call(tnanc(), &[]));
        }
        calls[1] = call(tna(), &[]);
        let ctx = context(calls);

        let out = resolve_placeholders("GUID_1 x GUID_11 y GUID_11 GUID_1", &ctx).unwrap();
        assert_eq!(out, "TNA_start_x TNANC_TNA_end");
    }

    #[test]
    fn unregistered_marker_keeps_content() {
        let ctx = context(vec![]);
        let out = resolve_placeholders("a GUID_0 kept GUID_0 b", &ctx).unwrap();
        assert_eq!(out, "a kept b");
    }

    #[test]
    fn unmatched_marker_is_an_error() {
        let ctx = context(vec![call(tna(), &[])]);
        let err = resolve_placeholders("a GUID_0 never closed", &ctx).unwrap_err();
        assert!(matches!(err, MacroError::UnmatchedPlaceholder(m) if m == "GUID_0"));
    }

    #[test]
    fn guid_without_index_is_plain_text() {
        let ctx = context(vec![]);
        let out = resolve_placeholders("GUID and GUID_ stay", &ctx).unwrap();
        assert_eq!(out, "GUID and GUID_ stay");
    }

    #[test]
    fn strip_markers_keeps_surrounding_text() {
        assert_eq!(
            strip_markers("GUID_0 title GUID_12 GUID_ OTHER_1", "GUID"),
            " title  GUID_ OTHER_1"
        );
    }

    #[test]
    fn macro_errors_propagate_unchanged() {
        let failing = Macro::new("fail", |_, _| Err(anyhow::anyhow!("macro exploded")));
        let ctx = context(vec![call(failing, &[])]);

        let err = resolve_placeholders("GUID_0 x GUID_0", &ctx).unwrap_err();
        assert!(matches!(err, MacroError::Macro(_)));
        assert_eq!(err.to_string(), "macro exploded");
    }
}
