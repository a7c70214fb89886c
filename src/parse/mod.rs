//! Source parsing: import/export extraction and specifier resolution.

pub mod imports;
pub mod resolve;

pub use imports::{ParsedModule, parse_module};
pub use resolve::resolve_import;
