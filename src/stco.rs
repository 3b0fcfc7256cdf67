//! Chunk offset table (`stco`) access and correction.
//!
//! Payload layout: version/flags (4), entry count (4, big-endian), then
//! `count` absolute file offsets (4 each, big-endian). The 64-bit `co64`
//! variant is never touched.

use crate::boxes::{BoxTree, NodeId, NodeKind};
use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder};

const TABLE_HEADER: usize = 8;

/// Entries of the `stco` box `id`.
pub fn read_chunk_offsets(tree: &BoxTree, id: NodeId) -> Result<Vec<u32>> {
    let node = tree.node(id);
    let payload = node.payload().ok_or(Error::BadOffsetTable {
        offset: node.hdr.start,
        reason: "not a leaf box",
    })?;
    let count = entry_count(payload, node.hdr.start)?;
    Ok(payload[TABLE_HEADER..TABLE_HEADER + count * 4]
        .chunks_exact(4)
        .map(BigEndian::read_u32)
        .collect())
}

/// Subtract `correction` from every entry of every table in `tables`.
///
/// All tables are checked before any is written, so on error no payload has
/// changed. Returns the number of entries rewritten.
pub fn patch_chunk_offsets(tree: &mut BoxTree, tables: &[NodeId], correction: u64) -> Result<u64> {
    if correction == 0 {
        return Ok(0);
    }

    let mut planned = Vec::with_capacity(tables.len());
    for &id in tables {
        let corrected = read_chunk_offsets(tree, id)?
            .into_iter()
            .enumerate()
            .map(|(i, off)| {
                u64::from(off)
                    .checked_sub(correction)
                    .map(|v| v as u32)
                    .ok_or(Error::OffsetUnderflow { index: i as u32, offset: off, correction })
            })
            .collect::<Result<Vec<u32>>>()?;
        planned.push((id, corrected));
    }

    let mut patched = 0u64;
    for (id, offsets) in planned {
        let path = tree.path(id);
        if let NodeKind::Leaf(payload) = &mut tree.node_mut(id).kind {
            for (slot, off) in payload[TABLE_HEADER..].chunks_exact_mut(4).zip(&offsets) {
                BigEndian::write_u32(slot, *off);
            }
        }
        log::debug!("patched {} entries of {} by -{}", offsets.len(), path, correction);
        patched += offsets.len() as u64;
    }
    Ok(patched)
}

fn entry_count(payload: &[u8], offset: u64) -> Result<usize> {
    if payload.len() < TABLE_HEADER {
        return Err(Error::BadOffsetTable { offset, reason: "payload shorter than table header" });
    }
    let count = BigEndian::read_u32(&payload[4..8]) as usize;
    let needed = count
        .checked_mul(4)
        .and_then(|n| n.checked_add(TABLE_HEADER))
        .ok_or(Error::BadOffsetTable { offset, reason: "entry count overflows" })?;
    if payload.len() < needed {
        return Err(Error::BadOffsetTable { offset, reason: "entry count exceeds payload" });
    }
    Ok(count)
}
