use crate::{
    api::CorrectionSummary,
    boxes::{BoxTree, NodeId, NodeKind},
    known_boxes::KnownBox,
    strip::RemovedBox,
};
use serde::Serialize;

const PREVIEW_BYTES: usize = 16;

/// A JSON-serializable view of one active box in the output layout.
#[derive(Serialize)]
pub struct JsonBox {
    /// Offset in the output file
    pub offset: u64,
    pub size: u64,
    pub header_size: u64,
    pub typ: String,
    pub kind: String,
    pub full_name: String,
    /// Hex of the first payload bytes, leaves only
    pub payload_preview: Option<String>,
    pub children: Option<Vec<JsonBox>>,
    /// Children left out because of the depth limit
    pub truncated: bool,
}

#[derive(Serialize)]
pub struct JsonSummary {
    pub removed: Vec<RemovedBox>,
    pub removed_bytes: u64,
    pub offset_correction: u64,
    pub patched_tables: usize,
    pub patched_entries: u64,
    pub warnings: Vec<String>,
}

impl From<&CorrectionSummary> for JsonSummary {
    fn from(s: &CorrectionSummary) -> Self {
        JsonSummary {
            removed: s.removed.clone(),
            removed_bytes: s.removed_bytes,
            offset_correction: s.offset_correction,
            patched_tables: s.patched_tables,
            patched_entries: s.patched_entries,
            warnings: s.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Default nesting limit for [`tree_to_json`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Active top-level boxes of `tree` with offsets as they will be written.
///
/// Containers at depth `max_depth` are listed with `children: None` and
/// `truncated: true`; offsets of later boxes still account for them.
pub fn tree_to_json(tree: &BoxTree, max_depth: usize) -> Vec<JsonBox> {
    let mut pos = 0u64;
    tree.roots()
        .iter()
        .filter(|&&id| tree.node(id).active)
        .map(|&id| build_box(tree, id, 0, max_depth, &mut pos))
        .collect()
}

fn build_box(tree: &BoxTree, id: NodeId, depth: usize, max_depth: usize, pos: &mut u64) -> JsonBox {
    let node = tree.node(id);
    let hdr = &node.hdr;
    let offset = *pos;
    let mut truncated = false;

    let (kind, payload_preview, children) = match &node.kind {
        NodeKind::Container(_) if depth >= max_depth => {
            *pos += hdr.size;
            truncated = true;
            ("container", None, None)
        }
        NodeKind::Container(kids) => {
            *pos += hdr.header_size;
            let children = kids
                .iter()
                .filter(|&&c| tree.node(c).active)
                .map(|&c| build_box(tree, c, depth + 1, max_depth, pos))
                .collect();
            ("container", None, Some(children))
        }
        NodeKind::Leaf(data) => {
            *pos += hdr.size;
            let preview = hex::encode(&data[..data.len().min(PREVIEW_BYTES)]);
            ("leaf", Some(preview), None)
        }
    };

    JsonBox {
        offset,
        size: hdr.size,
        header_size: hdr.header_size,
        typ: hdr.typ.to_string(),
        kind: kind.to_string(),
        full_name: KnownBox::from(hdr.typ).full_name().to_string(),
        payload_preview,
        children,
        truncated,
    }
}
