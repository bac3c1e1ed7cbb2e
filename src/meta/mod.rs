//! Static page metadata extraction.
//!
//! Page sources are never executed. Script regions are tokenized, the
//! first configured macro call is located and its argument is read as a
//! literal. Properties that are not literals are tagged dynamic and left
//! for the runtime to resolve.

mod cache;
mod extract;
mod lexer;
mod parser;
mod scanner;
mod script;

pub use cache::MetaCache;
pub use extract::{ExtractedPageMeta, Extraction, Extractor, MetaField, augment, augment_routes};
pub use parser::{Argument, Property};
pub use scanner::{LiteralScanner, MacroCall, MacroScanner};
pub use script::script_blocks;
