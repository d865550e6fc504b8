use uuid::Uuid;

use crate::registry::{MacroCall, Placeholder, PlaceholderRegistry};

/// State owned by a single parse: the marker GUID and the placeholders
/// registered so far.
///
/// Every parse builds its own context, so concurrent parses never share
/// marker numbering or registry entries.
#[derive(Debug)]
pub struct ParseContext {
    guid: String,
    next_index: usize,
    placeholders: PlaceholderRegistry,
}

impl ParseContext {
    /// Creates a context with a fresh random GUID.
    pub fn new() -> Self {
        // Uppercase prefix keeps markers out of lowercased heading slugs.
        Self::with_guid(format!("MacroMd{}", Uuid::new_v4().simple()))
    }

    /// Creates a context with a fixed GUID. Used to get stable markers in tests.
    pub fn with_guid(guid: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            next_index: 0,
            placeholders: PlaceholderRegistry::new(),
        }
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// Stores `call` under the next placeholder and returns its marker text.
    pub fn register(&mut self, call: MacroCall) -> String {
        let placeholder = Placeholder(self.next_index);
        self.next_index += 1;

        let marker = placeholder.marker(&self.guid);
        log::debug!(
            "registered {marker} for macro '{}' with args {:?}",
            call.mac.identifier(),
            call.args
        );
        self.placeholders.insert(placeholder, call);
        marker
    }

    /// Finds the call registered for a marker of this parse.
    pub fn lookup(&self, marker: &str) -> Option<&MacroCall> {
        let placeholder = Placeholder::parse(marker, &self.guid)?;
        self.placeholders.get(placeholder)
    }

    pub fn placeholders(&self) -> &PlaceholderRegistry {
        &self.placeholders
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new()
    }
}
