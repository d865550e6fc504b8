//! # Macro Syntax Parsing
//!
//! Locating macro invocations in raw markdown text.
//!
//! ## Syntax
//!
//! ```text
//! DELIM ident1 ident2(arg1, arg2) { content }
//! ```
//!
//! `DELIM` is configurable (`^` by default). A header holds one or more
//! whitespace separated identifiers (a macro chain), each with an optional
//! parenthesized argument list. All identifiers share the content span.
//!
//! ## Modules
//!
//! - **`cursor`**: byte cursor used to walk header text
//! - **`header`**: splits header text into identifiers and argument lists
//! - **`scanner`**: finds the next header for a given delimiter
//! - **`extract`**: finds the closing boundary of an invocation's content,
//!   skipping nested invocations
//! - **`normalize`**: pre-pass that strips incidental whitespace around
//!   invocation boundaries

pub mod cursor;
pub mod extract;
pub mod header;
pub mod normalize;
pub mod scanner;

pub use extract::{ContentSpan, extract_content};
pub use normalize::Normalizer;
pub use scanner::{HeaderMatch, MacroInvocation, Scanner};
