use crate::boxes::{BoxHeader, BoxTree, FourCC, Node, NodeId, NodeKind};
use crate::error::{Error, Result};
use crate::known_boxes::KnownBox;
use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use std::io::{self, Read, Seek};

/// Decode one box starting at the current stream position.
///
/// Containers come back with no children and the stream left at their first
/// child; leaves come back with their payload and the stream left after it.
/// Returns `Ok(None)` at end of input or on a zero-size header that is the
/// last thing in the input. A zero-size ("to end of file") box followed by
/// data is `UnboundedBox`: its contents cannot be carried through.
pub fn read_box<R: Read + Seek>(r: &mut R) -> Result<Option<Node>> {
    let start = r.stream_position()?;

    // size -> type -> [64-bit size]
    let mut size_buf = [0u8; 4];
    match read_up_to(r, &mut size_buf)? {
        0 => return Ok(None),
        4 => {}
        _ => return Err(truncated("box header", start, 8)),
    }
    let size32 = BigEndian::read_u32(&size_buf);

    let mut typ = [0u8; 4];
    r.read_exact(&mut typ).map_err(|e| eof_as_truncated(e, "box header", start, 8))?;
    let typ = FourCC(typ);

    if size32 == 0 {
        let trailing = io::copy(r, &mut io::sink())?;
        if trailing > 0 {
            return Err(Error::UnboundedBox { typ, offset: start, trailing });
        }
        log::debug!("zero-size '{typ}' box at offset {start} ends the box stream");
        return Ok(None);
    }

    let (size, header_size) = if size32 == 1 {
        let size = r
            .read_u64::<BigEndian>()
            .map_err(|e| eof_as_truncated(e, "extended box header", start, 16))?;
        (size, 16)
    } else {
        (size32 as u64, 8)
    };

    if size < header_size {
        return Err(Error::MalformedBox { typ, offset: start, size, header_size });
    }

    let hdr = BoxHeader { size, typ, header_size, start };
    let payload_size = hdr.payload_size();

    let kind = if KnownBox::from(typ).is_container() {
        NodeKind::Container(Vec::new())
    } else {
        let mut data = Vec::new();
        let got = r.by_ref().take(payload_size).read_to_end(&mut data)? as u64;
        if got < payload_size {
            return Err(truncated(&format!("'{typ}' payload"), start + header_size, payload_size));
        }
        NodeKind::Leaf(data)
    };

    log::trace!("box '{}' at {} size {} header {}", typ, start, size, header_size);
    Ok(Some(Node::new(hdr, kind)))
}

struct OpenContainer {
    id: NodeId,
    remaining: u64,
}

/// Read the whole box stream into a tree.
///
/// Every container's declared size must be exactly covered by its children;
/// a child that runs past the end of its parent is a `BoxOverrun`, and input
/// that ends while a container is still short of children is a
/// `TruncatedFile`.
pub fn build_tree<R: Read + Seek>(r: &mut R) -> Result<BoxTree> {
    let mut tree = BoxTree::new();
    let mut open: Vec<OpenContainer> = Vec::new();

    while let Some(node) = read_box(r)? {
        let size = node.hdr.size;
        let budget = if node.is_container() { node.hdr.payload_size() } else { 0 };

        if let Some(top) = open.last_mut() {
            match top.remaining.checked_sub(size) {
                Some(left) => top.remaining = left,
                None => {
                    let parent = &tree.node(top.id).hdr;
                    return Err(Error::BoxOverrun {
                        parent: parent.typ,
                        parent_offset: parent.start,
                        child: node.hdr.typ,
                        child_offset: node.hdr.start,
                        overrun: size - top.remaining,
                    });
                }
            }
        }

        let id = tree.attach(open.last().map(|o| o.id), node);
        if budget > 0 {
            open.push(OpenContainer { id, remaining: budget });
        }
        while open.last().is_some_and(|o| o.remaining == 0) {
            open.pop();
        }
    }

    if let Some(o) = open.last() {
        let hdr = &tree.node(o.id).hdr;
        return Err(truncated(&format!("'{}' container", hdr.typ), hdr.start, hdr.size));
    }

    log::debug!("parsed {} boxes, {} at top level", tree.len(), tree.roots().len());
    Ok(tree)
}

fn truncated(context: &str, offset: u64, needed: u64) -> Error {
    Error::TruncatedFile { context: context.to_string(), offset, needed }
}

fn eof_as_truncated(e: io::Error, context: &str, offset: u64, needed: u64) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        truncated(context, offset, needed)
    } else {
        Error::Io(e)
    }
}

fn read_up_to<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
