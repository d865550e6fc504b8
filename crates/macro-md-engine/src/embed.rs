//! # Token Embedding
//!
//! Replaces every invocation with placeholder markers so the markdown
//! renderer never sees macro syntax.
//!
//! ## Layout
//!
//! An invocation is **block** level when its header starts a line and its
//! closing `}` ends one (or ends the span). Block markers are set off by
//! blank lines so the renderer treats each as its own paragraph:
//!
//! ```text
//! ^f{content}   →   M_0\n\ncontent\n\nM_0\n
//! ```
//!
//! Anything else is **inline**; markers are padded with a single space so
//! markup touching the braces (`^f{_x_}`) is still recognised:
//!
//! ```text
//! a ^f{content} b   →   a M_0 content M_0 b
//! ```
//!
//! Inline layout is inherited by everything nested inside an inline
//! invocation. Block layout is re-evaluated at each level.
//!
//! ## Chains
//!
//! `^f g{c}` opens `M_f M_g` and closes `M_g M_f`, so resolution applies `g`
//! first and `f` last.

use crate::context::ParseContext;
use crate::error::Result;
use crate::parsing::{HeaderMatch, Scanner, extract_content};
use crate::registry::{MacroCall, MacroRegistry};

/// How an invocation's markers are laid out for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Block,
    Inline,
}

/// Embeds placeholder markers for every invocation in `text`.
///
/// Each matched identifier is looked up immediately; an unknown identifier
/// aborts embedding.
pub fn embed_tokens(
    text: &str,
    scanner: &Scanner,
    registry: &MacroRegistry,
    ctx: &mut ParseContext,
) -> Result<String> {
    embed_span(text, scanner, registry, ctx, Layout::Block)
}

fn embed_span(
    text: &str,
    scanner: &Scanner,
    registry: &MacroRegistry,
    ctx: &mut ParseContext,
    parent: Layout,
) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(header) = scanner.find_at(text, pos) {
        let content = extract_content(text, &header, scanner)?;
        let markers = register_chain(&header, registry, ctx)?;

        let boundary_end = content.boundary_end();
        let layout = classify(text, header.start, boundary_end, parent);
        let inner = embed_span(
            &text[content.start..content.end],
            scanner,
            registry,
            ctx,
            layout,
        )?;

        out.push_str(&text[pos..header.start]);
        write_invocation(&mut out, &markers, &inner, layout);
        pos = boundary_end;
    }

    out.push_str(&text[pos..]);
    Ok(out)
}

/// Registers every macro of a header in declaration order.
fn register_chain(
    header: &HeaderMatch,
    registry: &MacroRegistry,
    ctx: &mut ParseContext,
) -> Result<Vec<String>> {
    header
        .chain
        .iter()
        .map(|invocation| {
            let mac = registry.lookup(&invocation.identifier)?;
            Ok(ctx.register(MacroCall::new(mac.clone(), invocation.args())))
        })
        .collect()
}

fn classify(text: &str, header_start: usize, boundary_end: usize, parent: Layout) -> Layout {
    if parent == Layout::Inline {
        return Layout::Inline;
    }

    let line_start = text[..header_start].rfind('\n').map_or(0, |i| i + 1);
    let starts_line = text[line_start..header_start].trim().is_empty();

    let rest = &text[boundary_end..];
    let ends_line = rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n");

    if starts_line && ends_line {
        Layout::Block
    } else {
        Layout::Inline
    }
}

fn write_invocation(out: &mut String, markers: &[String], inner: &str, layout: Layout) {
    match layout {
        Layout::Block => {
            // Separate the opening marker from a paragraph or list item above.
            if !out.is_empty() && !out.ends_with("\n\n") {
                out.push_str(if out.ends_with('\n') { "\n" } else { "\n\n" });
            }
            for marker in markers {
                out.push_str(marker);
                out.push_str("\n\n");
            }
            out.push_str(inner);
            for marker in markers.iter().rev() {
                out.push_str("\n\n");
                out.push_str(marker);
            }
            out.push('\n');
        }
        Layout::Inline => {
            for marker in markers {
                out.push_str(marker);
                out.push(' ');
            }
            out.push_str(inner);
            for marker in markers.iter().rev() {
                out.push(' ');
                out.push_str(marker);
            }
        }
    }
}
