use crate::boxes::FourCC;

/// Typed view over the MP4 / ISOBMFF boxes this tool treats specially.
///
/// Anything not in this list becomes `KnownBox::Unknown(fourcc)` and is
/// carried through as opaque payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownBox {
    // File-level / top-level
    Ftyp,
    Moov,
    Mdat,
    Free,
    Skip,
    Meta,

    // Containers that can hold meta or the chunk offset table
    Udta,
    Trak,
    Mdia,
    Minf,
    Stbl,

    // Sample table leaves
    Stco,
    Co64,

    // Anything else
    Unknown(FourCC),
}

impl From<FourCC> for KnownBox {
    fn from(cc: FourCC) -> Self {
        match &cc.0 {
            b"ftyp" => KnownBox::Ftyp,
            b"moov" => KnownBox::Moov,
            b"mdat" => KnownBox::Mdat,
            b"free" => KnownBox::Free,
            b"skip" => KnownBox::Skip,
            b"meta" => KnownBox::Meta,

            b"udta" => KnownBox::Udta,
            b"trak" => KnownBox::Trak,
            b"mdia" => KnownBox::Mdia,
            b"minf" => KnownBox::Minf,
            b"stbl" => KnownBox::Stbl,

            b"stco" => KnownBox::Stco,
            b"co64" => KnownBox::Co64,

            _ => KnownBox::Unknown(cc),
        }
    }
}

impl KnownBox {
    /// Is this box descended into while building the tree?
    ///
    /// Closed whitelist: only the containers on a path to `meta` or `stco`.
    /// Everything else, `meta` included, is kept as an opaque leaf even if
    /// its payload happens to look like nested boxes.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            KnownBox::Moov
                | KnownBox::Udta
                | KnownBox::Trak
                | KnownBox::Mdia
                | KnownBox::Minf
                | KnownBox::Stbl
        )
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            KnownBox::Ftyp => "File Type Box",
            KnownBox::Moov => "Movie Box",
            KnownBox::Mdat => "Media Data Box",
            KnownBox::Free => "Free Space Box",
            KnownBox::Skip => "Free Space Box",
            KnownBox::Meta => "Meta Box",
            KnownBox::Udta => "User Data Box",
            KnownBox::Trak => "Track Box",
            KnownBox::Mdia => "Media Box",
            KnownBox::Minf => "Media Information Box",
            KnownBox::Stbl => "Sample Table Box",
            KnownBox::Stco => "Chunk Offset Box",
            KnownBox::Co64 => "64-bit Chunk Offset Box",
            KnownBox::Unknown(_) => "Unknown Box",
        }
    }
}
