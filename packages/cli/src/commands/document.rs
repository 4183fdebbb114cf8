//! Reading and writing block documents on disk.

use anyhow::{Context, Result};
use blockforge_common::Block;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Accepted document shapes: a bare block array or `{ "blocks": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DocumentFile {
    Blocks(Vec<Block>),
    Wrapped { blocks: Vec<Block> },
}

#[derive(Debug, Serialize)]
struct WrappedRef<'a> {
    blocks: &'a [Block],
}

pub fn load_blocks(path: &Path) -> Result<Vec<Block>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let document: DocumentFile = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a block document", path.display()))?;

    Ok(match document {
        DocumentFile::Blocks(blocks) => blocks,
        DocumentFile::Wrapped { blocks } => blocks,
    })
}

pub fn to_json(blocks: &[Block]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&WrappedRef { blocks })?)
}

pub fn write_blocks(path: &Path, blocks: &[Block]) -> Result<()> {
    fs::write(path, to_json(blocks)?)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockforge_common::BlockType;

    #[test]
    fn test_reads_both_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let bare = dir.path().join("bare.json");
        let wrapped = dir.path().join("wrapped.json");
        fs::write(&bare, r#"[{ "id": "a", "type": "hero", "variant": "split" }]"#).unwrap();
        fs::write(
            &wrapped,
            r#"{ "blocks": [{ "id": "b", "type": "faq", "variant": "list" }] }"#,
        )
        .unwrap();

        let blocks = load_blocks(&bare).unwrap();
        assert_eq!(blocks[0].block_type, BlockType::Hero);
        assert!(blocks[0].visible);
        assert_eq!(load_blocks(&wrapped).unwrap()[0].id, "b");
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_blocks(&path, &[Block::new("x", BlockType::Spacer, "small")]).unwrap();
        assert_eq!(load_blocks(&path).unwrap()[0].id, "x");
    }

    #[test]
    fn test_rejects_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"[{ "id": "a", "type": "carousel", "variant": "x" }]"#).unwrap();
        assert!(load_blocks(&path).is_err());
    }
}
