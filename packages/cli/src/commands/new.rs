use anyhow::Result;
use blockforge_common::{default_settings, default_variant, Block, BlockType, IdGenerator};
use clap::Args;

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Block type, e.g. `hero` or `product-grid`
    pub block_type: String,

    /// Variant (defaults to the catalog's default for the type)
    #[arg(short, long)]
    pub variant: Option<String>,
}

pub fn new_block(args: NewArgs) -> Result<()> {
    let block = build_block(&args)?;
    println!("{}", serde_json::to_string_pretty(&block)?);
    Ok(())
}

fn build_block(args: &NewArgs) -> Result<Block> {
    let block_type: BlockType = args.block_type.parse()?;
    let variant = args
        .variant
        .clone()
        .unwrap_or_else(|| default_variant(block_type).to_string());
    let id = IdGenerator::new("blockforge-cli").new_id(block_type.as_str());

    Ok(Block::new(id, block_type, variant).with_settings(default_settings(block_type)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_catalog_block() {
        let block = build_block(&NewArgs {
            block_type: "product-grid".into(),
            variant: None,
        })
        .unwrap();
        assert_eq!(block.block_type, BlockType::ProductGrid);
        assert_eq!(block.variant, default_variant(BlockType::ProductGrid));
        assert!(block.id.starts_with("product-grid-"));
    }

    #[test]
    fn test_unknown_type_is_error() {
        let result = build_block(&NewArgs {
            block_type: "carousel".into(),
            variant: None,
        });
        assert!(result.is_err());
    }
}
