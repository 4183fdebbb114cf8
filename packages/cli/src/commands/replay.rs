use super::document::{load_blocks, to_json, write_blocks};
use anyhow::{Context, Result};
use blockforge_common::EditorConfig;
use blockforge_editor::{DocumentStore, SurfaceMessage};
use blockforge_workspace::SurfaceBridge;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Block document (JSON) to start from
    pub document: PathBuf,

    /// JSON array of surface messages to apply in order
    pub script: PathBuf,

    /// Where to write the resulting document (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default, PartialEq)]
pub struct ReplaySummary {
    pub messages: usize,
    pub broadcasts: usize,
    pub undo_levels: usize,
    pub dirty: bool,
}

pub fn replay(args: ReplayArgs, config: &EditorConfig) -> Result<()> {
    let blocks = load_blocks(&args.document)?;
    let messages = load_script(&args.script)?;

    let mut store = DocumentStore::with_config(config.clone());
    store.set_blocks(blocks);
    let (bridge, summary) = run_script(SurfaceBridge::new(store), messages);

    eprintln!("▶️  {} {}", "Replayed".green().bold(), args.script.display());
    eprintln!("   Messages:   {}", summary.messages);
    eprintln!("   Broadcasts: {}", summary.broadcasts);
    eprintln!("   Undo levels: {}", summary.undo_levels);
    eprintln!("   Dirty: {}", summary.dirty);

    let blocks = bridge.store().blocks();
    match &args.output {
        Some(path) => {
            write_blocks(path, blocks)?;
            eprintln!("   {} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", to_json(blocks)?),
    }
    Ok(())
}

fn load_script(path: &Path) -> Result<Vec<SurfaceMessage>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a list of surface messages", path.display()))
}

pub fn run_script(
    mut bridge: SurfaceBridge,
    messages: Vec<SurfaceMessage>,
) -> (SurfaceBridge, ReplaySummary) {
    let mut summary = ReplaySummary::default();
    for message in messages {
        summary.messages += 1;
        summary.broadcasts += bridge.handle(message).len();
    }
    summary.undo_levels = bridge.store().history_len();
    summary.dirty = bridge.store().is_dirty();
    (bridge, summary)
}
