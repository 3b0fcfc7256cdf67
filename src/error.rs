use crate::boxes::FourCC;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer bytes left in the input than a header or payload needs.
    #[error("truncated file: {context} at offset {offset} needs {needed} bytes")]
    TruncatedFile { context: String, offset: u64, needed: u64 },

    /// Declared length smaller than the header that carries it.
    #[error("malformed box '{typ}' at offset {offset}: size {size} smaller than its {header_size}-byte header")]
    MalformedBox { typ: FourCC, offset: u64, size: u64, header_size: u64 },

    /// Size 0 ("extends to end of file") with data after the header.
    #[error("box '{typ}' at offset {offset} has size 0 and {trailing} bytes after its header")]
    UnboundedBox { typ: FourCC, offset: u64, trailing: u64 },

    /// Children add up to more than the container declared.
    #[error("box '{child}' at offset {child_offset} overruns parent '{parent}' at offset {parent_offset} by {overrun} bytes")]
    BoxOverrun {
        parent: FourCC,
        parent_offset: u64,
        child: FourCC,
        child_offset: u64,
        overrun: u64,
    },

    #[error("chunk offset {offset} (entry {index}) is smaller than correction {correction}")]
    OffsetUnderflow { index: u32, offset: u32, correction: u64 },

    /// Offsets needed correcting but there was no 32-bit table to correct.
    #[error("{correction} bytes removed before mdat but no stco table found (co64 present: {has_co64})")]
    MissingOffsetTable { correction: u64, has_co64: bool },

    #[error("chunk offset table at offset {offset} is malformed: {reason}")]
    BadOffsetTable { offset: u64, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
