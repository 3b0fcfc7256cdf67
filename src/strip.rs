use crate::boxes::{BoxTree, NodeId};
use crate::known_boxes::KnownBox;
use serde::Serialize;

/// One `meta` box taken out of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedBox {
    /// Dotted path from the top level, e.g. `moov.udta.meta`.
    pub path: String,
    /// Offset of the box in the input file.
    pub offset: u64,
    pub size: u64,
    /// Whether it shifted the media data (appeared before the first `mdat`).
    pub before_mdat: bool,
}

/// Result of the meta removal walk.
#[derive(Debug, Default)]
pub struct MetaRemoval {
    pub removed: Vec<RemovedBox>,
    /// Bytes removed ahead of the first `mdat`; to be subtracted from every
    /// absolute chunk offset.
    pub offset_correction: u64,
    /// Every active `stco` box, in file order.
    pub chunk_offset_tables: Vec<NodeId>,
    pub has_co64: bool,
}

impl MetaRemoval {
    pub fn removed_bytes(&self) -> u64 {
        self.removed.iter().map(|b| b.size).sum()
    }
}

/// Deactivate every active `meta` box and shrink all of its ancestors.
///
/// The walk is depth-first in file order. Once an `mdat` has been seen at
/// any level, removed bytes no longer count towards the offset correction.
/// Boxes already inactive are skipped, so a second run changes nothing.
pub fn remove_meta(tree: &mut BoxTree) -> MetaRemoval {
    let mut out = MetaRemoval::default();
    let mut seen_mdat = false;

    for id in tree.preorder() {
        let node = tree.node(id);
        if !node.active {
            continue;
        }
        let (typ, size, offset) = (node.hdr.typ, node.hdr.size, node.hdr.start);

        match KnownBox::from(typ) {
            KnownBox::Mdat => seen_mdat = true,
            KnownBox::Stco => out.chunk_offset_tables.push(id),
            KnownBox::Co64 => out.has_co64 = true,
            KnownBox::Meta => {
                let path = tree.path(id);
                tree.node_mut(id).active = false;
                let ancestors: Vec<NodeId> = tree.ancestors(id).collect();
                for a in ancestors {
                    // cannot underflow: an ancestor's size covers all its children
                    tree.node_mut(a).hdr.size -= size;
                }
                if !seen_mdat {
                    out.offset_correction += size;
                }
                log::debug!(
                    "removed {} ({} bytes at offset {}){}",
                    path,
                    size,
                    offset,
                    if seen_mdat { ", after mdat" } else { "" }
                );
                out.removed.push(RemovedBox { path, offset, size, before_mdat: !seen_mdat });
            }
            _ => {}
        }
    }

    out
}
