//! Copy/paste of a block's presentational settings.

use crate::document::DocumentStore;
use crate::tree;
use blockforge_common::{BlockType, Settings};

/// Settings keys treated as style (everything else is content)
pub const STYLE_KEYS: [&str; 11] = [
    "backgroundColor",
    "textColor",
    "padding",
    "paddingTop",
    "paddingBottom",
    "margin",
    "marginTop",
    "marginBottom",
    "alignment",
    "textAlign",
    "maxWidth",
];

#[derive(Debug, Clone, PartialEq)]
pub struct CopiedStyles {
    pub source_type: BlockType,
    pub styles: Settings,
}

impl DocumentStore {
    /// Capture the style keys of a block. Not undoable.
    pub fn copy_block_styles(&mut self, id: &str) -> bool {
        let Some(block) = self.block(id) else {
            return false;
        };
        let styles: Settings = block
            .settings
            .iter()
            .filter(|(key, _)| STYLE_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let source_type = block.block_type;
        self.copied_styles = Some(CopiedStyles { source_type, styles });
        true
    }

    /// Write the copied style keys onto `id`, leaving content untouched
    pub fn paste_block_styles(&mut self, id: &str) -> bool {
        let Some(copied) = self.copied_styles.clone() else {
            return false;
        };
        self.commit("Paste styles", |store| {
            match tree::find_mut(store.blocks_mut(), id) {
                Some(block) => {
                    block.merge_settings(&copied.styles);
                    true
                }
                None => false,
            }
        })
    }

    pub fn copied_styles(&self) -> Option<&CopiedStyles> {
        self.copied_styles.as_ref()
    }

    pub fn has_copied_styles(&self) -> bool {
        self.copied_styles.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockforge_common::Block;
    use serde_json::json;

    #[test]
    fn test_copy_and_paste_only_style_keys() {
        let mut store = DocumentStore::from_blocks(vec![
            Block::new("a", BlockType::Hero, "x")
                .with_setting("backgroundColor", "#000")
                .with_setting("padding", 24)
                .with_setting("title", "Source"),
            Block::new("b", BlockType::Newsletter, "x").with_setting("title", "Target"),
        ]);

        assert!(!store.has_copied_styles());
        assert!(!store.paste_block_styles("b"));

        assert!(store.copy_block_styles("a"));
        assert_eq!(store.copied_styles().unwrap().source_type, BlockType::Hero);
        assert_eq!(store.history_len(), 0);

        assert!(store.paste_block_styles("b"));
        let target = store.block("b").unwrap();
        assert_eq!(target.settings["backgroundColor"], json!("#000"));
        assert_eq!(target.settings["padding"], json!(24));
        assert_eq!(target.settings["title"], json!("Target"));
        assert_eq!(store.history_len(), 1);
    }

    #[test]
    fn test_paste_to_missing_block_is_noop() {
        let mut store = DocumentStore::from_blocks(vec![Block::new("a", BlockType::Hero, "x")]);
        store.copy_block_styles("a");
        assert!(!store.paste_block_styles("missing"));
        assert!(!store.is_dirty());
    }
}
