pub mod api;
pub mod boxes;
pub mod error;
pub mod json_api;
pub mod known_boxes;
pub mod parser;
pub mod stco;
pub mod strip;
pub mod util;
pub mod writer;

pub use api::{CorrectionSummary, StripOptions, load, load_from_reader, save, save_to_writer, strip_meta, strip_meta_with};
pub use boxes::{BoxHeader, BoxTree, FourCC, Node, NodeId, NodeKind};
pub use error::{Error, Result};
pub use json_api::{JsonBox, JsonSummary, tree_to_json};
pub use parser::{build_tree, read_box};
