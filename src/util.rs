use crate::boxes::{BoxTree, NodeKind};
use crate::known_boxes::KnownBox;

/// Position of the first occurrence of `tag` anywhere in `bytes`.
///
/// A raw byte scan, so it also hits tags sitting inside payloads. Only good
/// as a sanity probe.
pub fn find_tag(bytes: &[u8], tag: &[u8; 4]) -> Option<u64> {
    bytes.windows(4).position(|w| w == tag).map(|p| p as u64)
}

/// One line per active box: output offset, size, tag and box name, indented
/// by depth.
pub fn tree_lines(tree: &BoxTree) -> Vec<String> {
    let mut pos = 0u64;
    let mut out = Vec::new();
    for (id, depth) in tree.active_preorder() {
        let node = tree.node(id);
        let hdr = &node.hdr;
        let indent = "  ".repeat(depth);
        let name = KnownBox::from(hdr.typ).full_name();
        let at = format!("{pos:#x}");
        let (size, typ) = (hdr.size, hdr.typ);
        match &node.kind {
            NodeKind::Container(_) => {
                out.push(format!("{indent}{at:>8} {size:>10} {typ} (container, {name})"));
                pos += hdr.header_size;
            }
            NodeKind::Leaf(_) => {
                out.push(format!("{indent}{at:>8} {size:>10} {typ} ({name})"));
                pos += hdr.size;
            }
        }
    }
    out
}
