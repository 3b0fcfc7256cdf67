use crate::boxes::{BoxHeader, BoxTree, NodeKind};
use crate::error::{Error, Result};
use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

/// Write every active box in file order. Returns the number of bytes written.
///
/// Headers keep the encoding they were read with: a box that used the
/// 64-bit size field on input uses it on output.
pub fn write_tree<W: Write>(tree: &BoxTree, w: &mut W) -> Result<u64> {
    let mut written = 0u64;
    for (id, _) in tree.active_preorder() {
        let node = tree.node(id);
        written += write_header(w, &node.hdr)?;
        if let NodeKind::Leaf(data) = &node.kind {
            w.write_all(data)?;
            written += data.len() as u64;
        }
    }
    Ok(written)
}

pub fn tree_to_bytes(tree: &BoxTree) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(tree.output_len() as usize);
    write_tree(tree, &mut out)?;
    Ok(out)
}

fn write_header<W: Write>(w: &mut W, hdr: &BoxHeader) -> Result<u64> {
    if hdr.is_extended() {
        w.write_u32::<BigEndian>(1)?;
        w.write_all(&hdr.typ.0)?;
        w.write_u64::<BigEndian>(hdr.size)?;
    } else {
        let size = u32::try_from(hdr.size).map_err(|_| {
            Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("box '{}' size {} does not fit a 32-bit header", hdr.typ, hdr.size),
            ))
        })?;
        w.write_u32::<BigEndian>(size)?;
        w.write_all(&hdr.typ.0)?;
    }
    Ok(hdr.header_size)
}
