use super::document::load_blocks;
use anyhow::Result;
use blockforge_common::{check_integrity, count_blocks};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Block document (JSON) to validate
    pub input: PathBuf,
}

pub fn check(args: CheckArgs) -> Result<()> {
    println!("🔍 {} {}", "Checking".green().bold(), args.input.display());

    let blocks = load_blocks(&args.input)?;
    let issues = check_integrity(&blocks);

    for issue in &issues {
        println!("   {} {}", "✗".red(), issue);
    }

    println!();
    println!("   Blocks: {}", count_blocks(&blocks));

    if issues.is_empty() {
        println!("   {} No issues found!", "✓".green());
        Ok(())
    } else {
        Err(anyhow::anyhow!("{} issue(s) found", issues.len()))
    }
}
