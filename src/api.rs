use crate::{
    boxes::BoxTree,
    error::{Error, Result},
    parser::build_tree,
    stco::patch_chunk_offsets,
    strip::{RemovedBox, remove_meta},
    writer::write_tree,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

/// Knobs for [`strip_meta_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StripOptions {
    /// Fail with `MissingOffsetTable` instead of reporting it as a warning.
    pub strict: bool,
}

/// What [`strip_meta`] changed.
#[derive(Debug, Default)]
pub struct CorrectionSummary {
    pub removed: Vec<RemovedBox>,
    /// Total declared size of the removed boxes.
    pub removed_bytes: u64,
    /// Amount subtracted from every chunk offset.
    pub offset_correction: u64,
    pub patched_tables: usize,
    pub patched_entries: u64,
    /// Non-fatal problems, currently only `Error::MissingOffsetTable`.
    pub warnings: Vec<Error>,
}

impl CorrectionSummary {
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Parse an MP4/ISOBMFF file into memory.
///
/// ```no_run
/// let mut tree = mp4demeta::load("in.m4a")?;
/// let summary = mp4demeta::strip_meta(&mut tree)?;
/// println!("removed {} bytes", summary.removed_bytes);
/// mp4demeta::save(&tree, "out.m4a")?;
/// # Ok::<(), mp4demeta::Error>(())
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<BoxTree> {
    let mut r = BufReader::new(File::open(path)?);
    load_from_reader(&mut r)
}

pub fn load_from_reader<R: Read + Seek>(r: &mut R) -> Result<BoxTree> {
    build_tree(r)
}

/// Remove every `meta` box and correct sizes and chunk offsets, with default
/// options.
pub fn strip_meta(tree: &mut BoxTree) -> Result<CorrectionSummary> {
    strip_meta_with(tree, StripOptions::default())
}

/// Remove every `meta` box, shrink its ancestors and patch every `stco`
/// table by the bytes removed ahead of the first `mdat`.
///
/// On error the tree may already have boxes deactivated and should be
/// dropped, not saved.
pub fn strip_meta_with(tree: &mut BoxTree, opts: StripOptions) -> Result<CorrectionSummary> {
    let removal = remove_meta(tree);
    let correction = removal.offset_correction;

    let mut warnings = Vec::new();
    if correction > 0 && removal.chunk_offset_tables.is_empty() {
        let missing = Error::MissingOffsetTable { correction, has_co64: removal.has_co64 };
        if opts.strict {
            return Err(missing);
        }
        log::warn!("{missing}");
        warnings.push(missing);
    } else if correction > 0 && removal.has_co64 {
        log::warn!("co64 table present; its offsets are left unchanged");
    }

    let patched_entries = patch_chunk_offsets(tree, &removal.chunk_offset_tables, correction)?;
    let patched_tables = if correction > 0 { removal.chunk_offset_tables.len() } else { 0 };

    Ok(CorrectionSummary {
        removed_bytes: removal.removed_bytes(),
        removed: removal.removed,
        offset_correction: correction,
        patched_tables,
        patched_entries,
        warnings,
    })
}

/// Write the tree to `path`.
///
/// Data goes to a temporary file next to `path` that is renamed over it only
/// once fully written, so a failed save never leaves a partial file.
pub fn save<P: AsRef<Path>>(tree: &BoxTree, path: P) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    let written = {
        let mut w = BufWriter::new(tmp.as_file_mut());
        let written = write_tree(tree, &mut w)?;
        w.flush()?;
        written
    };
    tmp.as_file().sync_all()?;
    log::debug!("wrote {} bytes to {}", written, tmp.path().display());
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

pub fn save_to_writer<W: Write>(tree: &BoxTree, w: &mut W) -> Result<u64> {
    write_tree(tree, w)
}
