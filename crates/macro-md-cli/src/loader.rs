use std::path::Path;

use anyhow::{Context, Result};
use macro_md_config::{MacroLibrary, MacroTemplate};
use macro_md_engine::{Macro, MacroRegistry};

use crate::builtins::builtin_registry;

/// Built-in macros plus the templates of `library`, if any.
///
/// Library templates take precedence over built-ins with the same identifier.
pub fn build_registry(library: Option<&MacroLibrary>) -> Result<MacroRegistry> {
    let mut registry = builtin_registry()?;

    for (identifier, template) in library.into_iter().flat_map(|library| library.iter()) {
        if registry.replace(template_macro(identifier, template)).is_some() {
            log::info!("library macro '{identifier}' overrides the built-in");
        }
    }

    log::debug!("{} macros registered", registry.len());
    Ok(registry)
}

pub fn load_library(path: &Path) -> Result<MacroLibrary> {
    let library = MacroLibrary::load_from_path(path)
        .with_context(|| format!("Failed to load macro library: {}", path.display()))?;
    log::info!(
        "Loaded {} macro(s) from {}",
        library.len(),
        path.display()
    );
    Ok(library)
}

fn template_macro(identifier: &str, template: &MacroTemplate) -> Macro {
    let template = template.clone();
    Macro::new(identifier, move |content, args| Ok(template.expand(content, args)))
}
