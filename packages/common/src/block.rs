//! # Block Model
//!
//! A document is an ordered tree of blocks. Top-level blocks form the page;
//! container-capable blocks (`container`, `columns`, `section`) may hold an
//! ordered list of child blocks.
//!
//! ## Invariants
//!
//! - `order` values among siblings are always `0..N-1`
//! - `id` is unique across the whole tree and never reused
//! - `parent_id` is a lookup-only back-reference, never used for ownership

use crate::error::CommonError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Open, type-specific key/value record carried by every block
pub type Settings = Map<String, Value>;

/// Closed set of block types the builder knows how to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Hero,
    Header,
    Footer,
    ProductGrid,
    FeaturedProduct,
    CollectionList,
    RichText,
    ImageBanner,
    ImageWithText,
    Newsletter,
    Testimonials,
    Faq,
    Video,
    Gallery,
    ContactForm,
    Spacer,
    Divider,
    Container,
    Columns,
    Section,
}

impl BlockType {
    pub const ALL: [BlockType; 20] = [
        BlockType::Hero,
        BlockType::Header,
        BlockType::Footer,
        BlockType::ProductGrid,
        BlockType::FeaturedProduct,
        BlockType::CollectionList,
        BlockType::RichText,
        BlockType::ImageBanner,
        BlockType::ImageWithText,
        BlockType::Newsletter,
        BlockType::Testimonials,
        BlockType::Faq,
        BlockType::Video,
        BlockType::Gallery,
        BlockType::ContactForm,
        BlockType::Spacer,
        BlockType::Divider,
        BlockType::Container,
        BlockType::Columns,
        BlockType::Section,
    ];

    /// Tag used in serialized documents and generated ids
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Hero => "hero",
            BlockType::Header => "header",
            BlockType::Footer => "footer",
            BlockType::ProductGrid => "product-grid",
            BlockType::FeaturedProduct => "featured-product",
            BlockType::CollectionList => "collection-list",
            BlockType::RichText => "rich-text",
            BlockType::ImageBanner => "image-banner",
            BlockType::ImageWithText => "image-with-text",
            BlockType::Newsletter => "newsletter",
            BlockType::Testimonials => "testimonials",
            BlockType::Faq => "faq",
            BlockType::Video => "video",
            BlockType::Gallery => "gallery",
            BlockType::ContactForm => "contact-form",
            BlockType::Spacer => "spacer",
            BlockType::Divider => "divider",
            BlockType::Container => "container",
            BlockType::Columns => "columns",
            BlockType::Section => "section",
        }
    }

    /// Whether blocks of this type may hold children
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            BlockType::Container | BlockType::Columns | BlockType::Section
        )
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CommonError::UnknownBlockType(s.to_string()))
    }
}

/// Atomic content unit of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,

    #[serde(rename = "type")]
    pub block_type: BlockType,

    pub variant: String,

    /// Position among siblings (dense, 0-based)
    #[serde(default)]
    pub order: usize,

    #[serde(default = "default_visible")]
    pub visible: bool,

    #[serde(default)]
    pub settings: Settings,

    /// Locked blocks refuse structural edits
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    /// Only present on container-capable types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Block>>,

    /// Set on nested blocks only; rebuilt by the store after every mutation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

fn default_visible() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Block {
    /// Create a visible block with empty settings
    pub fn new(id: impl Into<String>, block_type: BlockType, variant: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            block_type,
            variant: variant.into(),
            order: 0,
            visible: true,
            settings: Settings::new(),
            locked: false,
            group_id: None,
            children: block_type.is_container().then(Vec::new),
            parent_id: None,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn is_container(&self) -> bool {
        self.block_type.is_container()
    }

    pub fn children(&self) -> &[Block] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Children list, created on demand for container types
    pub fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        if !self.is_container() {
            return None;
        }
        Some(self.children.get_or_insert_with(Vec::new))
    }

    /// Shallow-merge settings; keys absent from `partial` are untouched
    pub fn merge_settings(&mut self, partial: &Settings) {
        for (key, value) in partial {
            self.settings.insert(key.clone(), value.clone());
        }
    }
}

/// Partial update for the content attributes of a block.
///
/// Identity and position (`id`, `order`) are never patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,

    /// Replaces the whole settings record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

impl BlockPatch {
    pub fn is_empty(&self) -> bool {
        self.variant.is_none()
            && self.visible.is_none()
            && self.settings.is_none()
            && self.locked.is_none()
    }

    /// Apply the patch, returning whether anything changed
    pub fn apply_to(&self, block: &mut Block) -> bool {
        let before = (
            block.variant.clone(),
            block.visible,
            block.locked,
            block.settings.clone(),
        );

        if let Some(variant) = &self.variant {
            block.variant = variant.clone();
        }
        if let Some(visible) = self.visible {
            block.visible = visible;
        }
        if let Some(settings) = &self.settings {
            block.settings = settings.clone();
        }
        if let Some(locked) = self.locked {
            block.locked = locked;
        }

        before
            != (
                block.variant.clone(),
                block.visible,
                block.locked,
                block.settings.clone(),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_type_round_trips_through_str() {
        for block_type in BlockType::ALL {
            assert_eq!(block_type.as_str().parse::<BlockType>().unwrap(), block_type);
        }
        assert!("carousel".parse::<BlockType>().is_err());
    }

    #[test]
    fn test_block_serializes_with_camel_case_keys() {
        let mut block = Block::new("hero-1", BlockType::ProductGrid, "default");
        block.group_id = Some("group-1".to_string());

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "product-grid");
        assert_eq!(value["groupId"], "group-1");
        assert!(value.get("locked").is_none());
        assert!(value.get("children").is_none());
    }

    #[test]
    fn test_block_deserializes_with_defaults() {
        let block: Block = serde_json::from_value(json!({
            "id": "a",
            "type": "hero",
            "variant": "centered"
        }))
        .unwrap();

        assert!(block.visible);
        assert_eq!(block.order, 0);
        assert!(block.settings.is_empty());
        assert!(!block.locked);
    }

    #[test]
    fn test_container_blocks_start_with_children() {
        assert_eq!(Block::new("c", BlockType::Section, "x").children, Some(vec![]));
        assert_eq!(Block::new("h", BlockType::Hero, "x").children, None);
    }

    #[test]
    fn test_children_mut_refused_on_leaf_types() {
        let mut hero = Block::new("h", BlockType::Hero, "x");
        assert!(hero.children_mut().is_none());
    }

    #[test]
    fn test_merge_settings_keeps_other_keys() {
        let mut block = Block::new("a", BlockType::Hero, "x")
            .with_setting("title", "Hello")
            .with_setting("subtitle", "World");

        let mut partial = Settings::new();
        partial.insert("title".to_string(), json!("Hi"));
        block.merge_settings(&partial);

        assert_eq!(block.settings["title"], "Hi");
        assert_eq!(block.settings["subtitle"], "World");
    }

    #[test]
    fn test_patch_reports_changes() {
        let mut block = Block::new("a", BlockType::Hero, "x");

        assert!(!BlockPatch::default().apply_to(&mut block));

        let patch = BlockPatch {
            visible: Some(false),
            ..Default::default()
        };
        assert!(patch.apply_to(&mut block));
        assert!(!block.visible);
        assert!(!patch.apply_to(&mut block));
    }
}
