//! # Rendering
//!
//! The markdown renderer is treated as an opaque `text -> text` step that runs
//! exactly once per parse, between embedding and resolution.
//!
//! Block placeholders rely on one structural convention of the renderer: a
//! marker alone on its own source line comes out alone inside a `<p>`.
//! [`remove_token_wrappers`] undoes exactly that wrapping.

use std::sync::OnceLock;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;

use crate::resolve::strip_markers;

/// Converts embedded markdown to markup.
pub trait Renderer {
    fn render(&self, text: &str) -> String;

    /// Renders text carrying placeholder markers of `guid`.
    ///
    /// Renderers that derive anything from the text itself (heading anchors)
    /// should ignore the markers.
    fn render_embedded(&self, text: &str, _guid: &str) -> String {
        self.render(text)
    }
}

impl<F> Renderer for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, text: &str) -> String {
        self(text)
    }
}

/// CommonMark to HTML via pulldown-cmark.
#[derive(Debug, Clone, Default)]
pub struct CmarkRenderer {
    github_style_ids: bool,
    gfm: bool,
}

impl CmarkRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give every heading an `id` derived from its text.
    pub fn with_github_style_ids(mut self, enabled: bool) -> Self {
        self.github_style_ids = enabled;
        self
    }

    /// Enable tables, strikethrough and task lists.
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    fn options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options.insert(Options::ENABLE_TABLES);
            options.insert(Options::ENABLE_STRIKETHROUGH);
            options.insert(Options::ENABLE_TASKLISTS);
        }
        options
    }

    fn render_with_guid(&self, text: &str, guid: Option<&str>) -> String {
        let parser = Parser::new_ext(text, self.options());
        let mut html_out = String::with_capacity(text.len() * 3 / 2);
        if self.github_style_ids {
            html::push_html(&mut html_out, with_heading_ids(parser, guid));
        } else {
            html::push_html(&mut html_out, parser);
        }
        html_out
    }
}

impl Renderer for CmarkRenderer {
    fn render(&self, text: &str) -> String {
        self.render_with_guid(text, None)
    }

    fn render_embedded(&self, text: &str, guid: &str) -> String {
        self.render_with_guid(text, Some(guid))
    }
}

/// Buffers each heading's events so its id can be computed from the full text.
fn with_heading_ids<'a>(
    events: impl Iterator<Item = Event<'a>>,
    guid: Option<&str>,
) -> impl Iterator<Item = Event<'a>> {
    let mut out = Vec::new();
    let mut heading: Option<Vec<Event<'a>>> = None;

    for event in events {
        if matches!(event, Event::Start(Tag::Heading { .. })) {
            heading = Some(vec![event]);
            continue;
        }
        if matches!(event, Event::End(TagEnd::Heading(_))) {
            match heading.take() {
                Some(mut buffered) => {
                    buffered.push(event);
                    assign_heading_id(&mut buffered, guid);
                    out.append(&mut buffered);
                }
                None => out.push(event),
            }
            continue;
        }
        match heading.as_mut() {
            Some(buffered) => buffered.push(event),
            None => out.push(event),
        }
    }

    out.into_iter()
}

/// Placeholder markers never reach the slug, so the id matches the visible
/// heading and stays the same across parses.
fn assign_heading_id(events: &mut [Event<'_>], guid: Option<&str>) {
    let text: String = events
        .iter()
        .filter_map(|e| match e {
            Event::Text(t) | Event::Code(t) => Some(&**t),
            _ => None,
        })
        .collect();
    let slug = match guid {
        Some(guid) => slugify(&strip_markers(&text, guid)),
        None => slugify(&text),
    };

    if let Some(Event::Start(Tag::Heading { id, .. })) = events.first_mut()
        && id.is_none()
        && !slug.is_empty()
    {
        *id = Some(CowStr::from(slug));
    }
}

/// GitHub-style anchor: lowercase, runs of non-word characters become `-`,
/// no leading or trailing `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Unwraps placeholder markers of `guid` that the renderer put alone in a
/// paragraph. Paragraphs holding any other `word_N` token are left alone.
pub fn remove_token_wrappers(html: &str, guid: &str) -> String {
    static WRAPPED_TOKEN: OnceLock<Regex> = OnceLock::new();
    let re = WRAPPED_TOKEN.get_or_init(|| {
        Regex::new(r"<p>\s*([^\s<>]+)_(\d+)\s*</p>").expect("Invalid wrapped token regex")
    });
    re.replace_all(html, |caps: &regex::Captures<'_>| {
        if &caps[1] == guid {
            format!("{}_{}", &caps[1], &caps[2])
        } else {
            caps[0].to_string()
        }
    })
    .into_owned()
}

/// Drops paragraphs left empty once macros have produced their output.
pub fn strip_empty_paragraphs(html: &str) -> String {
    static EMPTY_PARAGRAPH: OnceLock<Regex> = OnceLock::new();
    let re = EMPTY_PARAGRAPH
        .get_or_init(|| Regex::new(r"(?i)<p>\s*</p>").expect("Invalid empty paragraph regex"));
    re.replace_all(html, "").into_owned()
}
