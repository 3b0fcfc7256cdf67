use anyhow::Context;
use clap::{ArgAction, Parser};
use mp4demeta::{
    JsonSummary, StripOptions, load, save, strip_meta_with, tree_to_json,
    json_api::DEFAULT_MAX_DEPTH,
    util::{find_tag, tree_lines},
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Remove meta boxes from an MP4/ISOBMFF file")]
struct Args {
    /// Input MP4/ISOBMFF file
    input: PathBuf,

    /// Output file (written atomically)
    output: PathBuf,

    /// Fail when offsets need correcting but no stco table exists
    #[arg(long, action = ArgAction::SetTrue)]
    strict: bool,

    /// Print the box tree after stripping
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "json")]
    tree: bool,

    /// Scan input and output bytes for a stray "meta" tag
    #[arg(long, action = ArgAction::SetTrue)]
    check: bool,

    /// Emit the summary and box tree as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Limit nesting depth of the JSON box tree
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Log filter (overrides RUST_LOG), e.g. "debug" or "mp4demeta=trace"
    #[arg(long)]
    log: Option<String>,
}

#[derive(Serialize)]
struct JsonReport {
    input: String,
    output: String,
    summary: JsonSummary,
    boxes: Vec<mp4demeta::JsonBox>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut builder = env_logger::Builder::new();
    if let Some(ref filters) = args.log {
        builder.parse_filters(filters);
    } else if let Ok(ref filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(filters);
    } else {
        builder.parse_filters("info");
    }
    builder.init();

    if args.check {
        probe(&args.input)?;
    }

    let mut tree = load(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let summary = strip_meta_with(&mut tree, StripOptions { strict: args.strict })
        .with_context(|| format!("stripping {}", args.input.display()))?;
    save(&tree, &args.output).with_context(|| format!("writing {}", args.output.display()))?;

    if args.json {
        let report = JsonReport {
            input: args.input.display().to_string(),
            output: args.output.display().to_string(),
            summary: JsonSummary::from(&summary),
            boxes: tree_to_json(&tree, args.max_depth),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for b in &summary.removed {
            println!("removed {} ({} bytes at offset {})", b.path, b.size, b.offset);
        }
        println!(
            "{} meta box(es), {} bytes removed; chunk offsets shifted by {} in {} table(s)",
            summary.removed.len(),
            summary.removed_bytes,
            summary.offset_correction,
            summary.patched_tables
        );
        for w in &summary.warnings {
            println!("warning: {w}");
        }
        if args.tree {
            println!();
            for line in tree_lines(&tree) {
                println!("{line}");
            }
        }
    }

    if args.check {
        probe(&args.output)?;
    }

    Ok(())
}

fn probe(path: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    match find_tag(&bytes, b"meta") {
        Some(pos) => log::info!("{}: found 'meta' at byte {}", path.display(), pos),
        None => log::info!("{}: no 'meta' in {} bytes", path.display(), bytes.len()),
    }
    Ok(())
}
