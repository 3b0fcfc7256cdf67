use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const META: FourCC = FourCC(*b"meta");
    pub const STCO: FourCC = FourCC(*b"stco");

    pub fn as_str_lossy(&self) -> String {
        self.0.iter().map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
}
impl fmt::Debug for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }
impl fmt::Display for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxHeader {
    pub size: u64,          // total size including header
    pub typ: FourCC,
    pub header_size: u64,   // 8, or 16 with the 64-bit size field
    pub start: u64,         // input file offset of header start
}

impl BoxHeader {
    pub fn is_extended(&self) -> bool {
        self.header_size == 16
    }

    pub fn payload_size(&self) -> u64 {
        self.size.saturating_sub(self.header_size)
    }
}

/// Index of a node inside a [`BoxTree`] arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug)]
pub enum NodeKind {
    /// Children in file order.
    Container(Vec<NodeId>),
    /// Opaque payload, copied verbatim on output.
    Leaf(Vec<u8>),
}

#[derive(Debug)]
pub struct Node {
    pub hdr: BoxHeader,
    pub kind: NodeKind,
    /// `None` for boxes sitting directly under the synthetic root.
    pub parent: Option<NodeId>,
    pub active: bool,
}

impl Node {
    pub fn new(hdr: BoxHeader, kind: NodeKind) -> Self {
        Node { hdr, kind, parent: None, active: true }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Container(_))
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Container(kids) => kids,
            NodeKind::Leaf(_) => &[],
        }
    }

    pub fn payload(&self) -> Option<&[u8]> {
        match &self.kind {
            NodeKind::Leaf(data) => Some(data),
            NodeKind::Container(_) => None,
        }
    }
}

/// Whole box tree held in memory.
///
/// The synthetic root is not stored as a node; `roots` lists its children.
/// Nodes are appended in the order their headers appear in the file and are
/// never removed, only deactivated.
#[derive(Debug, Default)]
pub struct BoxTree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl BoxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `node` as the last child of `parent` (or of the root).
    /// `parent` must be a container.
    pub(crate) fn attach(&mut self, parent: Option<NodeId>, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        self.nodes.push(node);
        match parent {
            None => self.roots.push(id),
            Some(p) => {
                debug_assert!(self.nodes[p.0].is_container());
                if let NodeKind::Container(kids) = &mut self.nodes[p.0].kind {
                    kids.push(id);
                }
            }
        }
        id
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ancestors of `id`, nearest first, excluding the synthetic root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors { tree: self, next: self.nodes[id.0].parent }
    }

    /// Depth-first, file-order walk over every node, active or not.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children().iter().rev().copied());
        }
        out
    }

    /// Active nodes with their depth, in output order. Inactive subtrees are
    /// skipped entirely.
    pub fn active_preorder(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|&id| (id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            if !node.active {
                continue;
            }
            out.push((id, depth));
            stack.extend(node.children().iter().rev().map(|&c| (c, depth + 1)));
        }
        out
    }

    /// Dotted tag path from the top level down to `id`, e.g. `moov.udta.meta`.
    pub fn path(&self, id: NodeId) -> String {
        let mut parts: Vec<String> = self.ancestors(id).map(|a| self.node(a).hdr.typ.to_string()).collect();
        parts.reverse();
        parts.push(self.node(id).hdr.typ.to_string());
        parts.join(".")
    }

    /// Sum of declared sizes of the active top-level boxes, i.e. the size of
    /// the file `write_tree` would produce.
    pub fn output_len(&self) -> u64 {
        self.roots
            .iter()
            .map(|&id| self.node(id))
            .filter(|n| n.active)
            .map(|n| n.hdr.size)
            .sum()
    }

    /// Active nodes with the given tag, in file order. Nodes under an
    /// inactive ancestor are skipped.
    pub fn find_active(&self, typ: FourCC) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| {
                let n = self.node(id);
                n.hdr.typ == typ && n.active && self.ancestors(id).all(|a| self.node(a).active)
            })
            .collect()
    }
}

pub struct Ancestors<'a> {
    tree: &'a BoxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.node(id).parent;
        Some(id)
    }
}
