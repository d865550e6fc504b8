//! # Macro and Placeholder Registries
//!
//! - **`MacroRegistry`**: identifier → macro function, built by a loader before
//!   parsing starts and only read afterwards.
//! - **`PlaceholderRegistry`**: per-parse, ordered placeholder → [`MacroCall`]
//!   mapping filled by the embedder and read by the resolver.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::{MacroError, Result};

/// Signature of a macro function: resolved content first, then the header arguments.
pub type MacroFn = dyn Fn(&str, &[String]) -> anyhow::Result<String> + Send + Sync;

/// A named macro function.
#[derive(Clone)]
pub struct Macro {
    identifier: String,
    func: Arc<MacroFn>,
}

impl Macro {
    pub fn new<F>(identifier: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str, &[String]) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self {
            identifier: identifier.into(),
            func: Arc::new(func),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Invokes the function. Errors are returned exactly as the function raised them.
    pub fn call(&self, content: &str, args: &[String]) -> anyhow::Result<String> {
        (self.func)(content, args)
    }

    /// True when both handles point at the same registered function.
    pub fn ptr_eq(&self, other: &Macro) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Macro")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// Identifier → macro function lookup table.
#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    macros: HashMap<String, Macro>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a closure under `identifier`.
    pub fn register<F>(&mut self, identifier: impl Into<String>, func: F) -> Result<()>
    where
        F: Fn(&str, &[String]) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.insert(Macro::new(identifier, func))
    }

    /// Adds a macro. Identifiers are unique within one registry.
    pub fn insert(&mut self, mac: Macro) -> Result<()> {
        if self.macros.contains_key(mac.identifier()) {
            return Err(MacroError::DuplicateMacro(mac.identifier().to_string()));
        }
        self.macros.insert(mac.identifier().to_string(), mac);
        Ok(())
    }

    /// Adds a macro, returning the one it displaced.
    pub fn replace(&mut self, mac: Macro) -> Option<Macro> {
        self.macros.insert(mac.identifier().to_string(), mac)
    }

    pub fn get(&self, identifier: &str) -> Option<&Macro> {
        self.macros.get(identifier)
    }

    /// Like [`get`](Self::get) but unknown identifiers are an error.
    pub fn lookup(&self, identifier: &str) -> Result<&Macro> {
        self.get(identifier)
            .ok_or_else(|| MacroError::UnknownMacro {
                identifier: identifier.to_string(),
            })
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.macros.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Registered identifiers in sorted order.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.macros.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// A matched invocation awaiting its content.
///
/// The content is not stored: it only exists once the inner placeholders
/// have been resolved, and is passed as the first argument at that point.
#[derive(Debug, Clone)]
pub struct MacroCall {
    pub mac: Macro,
    pub args: Vec<String>,
}

impl MacroCall {
    pub fn new(mac: Macro, args: Vec<String>) -> Self {
        Self { mac, args }
    }

    pub fn invoke(&self, content: &str) -> anyhow::Result<String> {
        self.mac.call(content, &self.args)
    }
}

/// Per-parse slot number. Rendered into the text as `{guid}_{index}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Placeholder(pub usize);

impl Placeholder {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn marker(self, guid: &str) -> String {
        format!("{guid}_{}", self.0)
    }

    /// Parses a marker produced by [`marker`](Self::marker) for the same `guid`.
    pub fn parse(marker: &str, guid: &str) -> Option<Self> {
        let digits = marker.strip_prefix(guid)?.strip_prefix('_')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Placeholder)
    }
}

/// Ordered placeholder → call mapping for one parse.
#[derive(Debug, Default)]
pub struct PlaceholderRegistry {
    calls: BTreeMap<Placeholder, MacroCall>,
}

impl PlaceholderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, placeholder: Placeholder, call: MacroCall) {
        self.calls.insert(placeholder, call);
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&MacroCall> {
        self.calls.get(&placeholder)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Placeholder, &MacroCall)> {
        self.calls.iter().map(|(p, c)| (*p, c))
    }
}
