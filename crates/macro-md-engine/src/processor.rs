use std::path::Path;

use crate::context::ParseContext;
use crate::embed::embed_tokens;
use crate::error::Result;
use crate::io;
use crate::parsing::{Normalizer, Scanner};
use crate::registry::MacroRegistry;
use crate::render::{CmarkRenderer, Renderer, remove_token_wrappers, strip_empty_paragraphs};
use crate::resolve::resolve_placeholders;

/// Options for a [`MacroProcessor`] using the built-in renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub delimiter: String,
    pub github_style_ids: bool,
    pub gfm: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: Scanner::DEFAULT_DELIMITER.to_string(),
            github_style_ids: false,
            gfm: true,
        }
    }
}

/// Runs the whole pipeline for documents using one registry and delimiter:
///
/// normalize → embed → render → unwrap markers → resolve → drop empty paragraphs
///
/// The processor holds no per-document state. Each call to
/// [`parse_string`](Self::parse_string) builds a fresh [`ParseContext`].
pub struct MacroProcessor<'r, R = CmarkRenderer> {
    registry: &'r MacroRegistry,
    scanner: Scanner,
    normalizer: Normalizer,
    renderer: R,
}

impl<'r> MacroProcessor<'r, CmarkRenderer> {
    pub fn new(registry: &'r MacroRegistry, options: &ParseOptions) -> Result<Self> {
        let renderer = CmarkRenderer::new()
            .with_github_style_ids(options.github_style_ids)
            .with_gfm(options.gfm);
        Self::with_renderer(registry, &options.delimiter, renderer)
    }
}

impl<'r, R: Renderer> MacroProcessor<'r, R> {
    pub fn with_renderer(registry: &'r MacroRegistry, delimiter: &str, renderer: R) -> Result<Self> {
        let scanner = Scanner::new(delimiter)?;
        let normalizer = Normalizer::new(&scanner)?;
        Ok(Self {
            registry,
            scanner,
            normalizer,
            renderer,
        })
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn parse_string(&self, markdown: &str) -> Result<String> {
        let mut ctx = ParseContext::new();
        self.parse_with_context(markdown, &mut ctx)
    }

    /// Like [`parse_string`](Self::parse_string) with a caller supplied context.
    pub fn parse_with_context(&self, markdown: &str, ctx: &mut ParseContext) -> Result<String> {
        let normalized = self.normalizer.normalize(markdown);
        let embedded = embed_tokens(&normalized, &self.scanner, self.registry, ctx)?;
        log::debug!(
            "embedded {} placeholder(s) with guid {}",
            ctx.placeholders().len(),
            ctx.guid()
        );

        let rendered = self.renderer.render_embedded(&embedded, ctx.guid());
        let unwrapped = remove_token_wrappers(&rendered, ctx.guid());
        let resolved = resolve_placeholders(&unwrapped, ctx)?;
        Ok(strip_empty_paragraphs(&resolved))
    }

    /// Reads `path` and parses it. A missing file fails before any parsing.
    pub fn parse_file(&self, path: &Path) -> Result<String> {
        let markdown = io::read_document(path)?;
        self.parse_string(&markdown)
    }
}

/// One-shot [`MacroProcessor::parse_string`].
pub fn parse_string(markdown: &str, registry: &MacroRegistry, options: &ParseOptions) -> Result<String> {
    MacroProcessor::new(registry, options)?.parse_string(markdown)
}

/// One-shot [`MacroProcessor::parse_file`].
pub fn parse_file(path: &Path, registry: &MacroRegistry, options: &ParseOptions) -> Result<String> {
    MacroProcessor::new(registry, options)?.parse_file(path)
}
