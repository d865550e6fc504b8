//! Macros available without a library file.

use anyhow::{Result, bail};
use html_escape::{encode_double_quoted_attribute, encode_text};
use macro_md_engine::{Macro, MacroRegistry};

pub fn builtin_macros() -> Vec<Macro> {
    vec![
        Macro::new("upper", |content, _| Ok(content.to_uppercase())),
        Macro::new("lower", |content, _| Ok(content.to_lowercase())),
        Macro::new("wrap", wrap),
        Macro::new("span", |content, args| {
            let class = required(args, 0, "span", "class")?;
            Ok(format!(
                "<span class=\"{}\">{content}</span>",
                encode_double_quoted_attribute(class)
            ))
        }),
        Macro::new("div", |content, args| {
            let class = required(args, 0, "div", "class")?;
            Ok(format!(
                "<div class=\"{}\">\n{content}\n</div>",
                encode_double_quoted_attribute(class)
            ))
        }),
        Macro::new("details", |content, args| {
            let summary = required(args, 0, "details", "summary")?;
            Ok(format!(
                "<details>\n<summary>{}</summary>\n{content}\n</details>",
                encode_text(summary)
            ))
        }),
        Macro::new("link", |content, args| {
            let href = required(args, 0, "link", "href")?;
            Ok(format!(
                "<a href=\"{}\">{content}</a>",
                encode_double_quoted_attribute(href)
            ))
        }),
    ]
}

/// Registry holding only the built-in macros.
pub fn builtin_registry() -> Result<MacroRegistry> {
    let mut registry = MacroRegistry::new();
    for mac in builtin_macros() {
        registry.insert(mac)?;
    }
    Ok(registry)
}

/// `wrap(open)` puts `open` on both sides, `wrap(open, close)` uses each once.
fn wrap(content: &str, args: &[String]) -> Result<String> {
    let open = required(args, 0, "wrap", "opening text")?;
    let close = args.get(1).map_or(open, String::as_str);
    Ok(format!("{open}{content}{close}"))
}

fn required<'a>(args: &'a [String], index: usize, name: &str, what: &str) -> Result<&'a str> {
    match args.get(index) {
        Some(arg) if !arg.is_empty() => Ok(arg.as_str()),
        _ => bail!("macro '{name}' needs a {what} argument"),
    }
}
