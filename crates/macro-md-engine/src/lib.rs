pub mod context;
pub mod embed;
pub mod error;
pub mod io;
pub mod parsing;
pub mod processor;
pub mod registry;
pub mod render;
pub mod resolve;

// Re-export key types for easier usage
pub use context::ParseContext;
pub use embed::{Layout, embed_tokens};
pub use error::{MAX_NESTING_DEPTH, MacroError, Result};
pub use processor::{MacroProcessor, ParseOptions, parse_file, parse_string};
pub use registry::{Macro, MacroCall, MacroRegistry, Placeholder, PlaceholderRegistry};
pub use render::{CmarkRenderer, Renderer, remove_token_wrappers, strip_empty_paragraphs};
pub use resolve::resolve_placeholders;
