//! Page discovery and route tree construction.
//!
//! ```text
//! layers ──scan──▶ ScannedFile[] ──compile_path──▶ segments ──build_tree──▶ PageNode[]
//! ```

mod glob;
mod scan;
mod segment;
mod tree;
mod types;

pub use glob::{path_to_wildcard, wildcard_map};
pub use scan::{Layer, ScannedFile, scan_layers, scanned_file_for, sort_scanned};
pub use segment::{
    CompiledPath, CompiledRoute, CompiledSegment, SegmentToken, SegmentTokens, compile_path,
    compile_route, parse_segment, route_name,
};
pub use tree::{TreeBuild, build_tree, duplicate_names};
pub use types::{PageKey, PageNode, RouteMode, join_full_path};

pub(crate) use tree::{Removal, insert_page, may_adopt, remove_page};
