//! Default content for freshly added blocks.

use crate::block::{BlockType, Settings};
use serde_json::{json, Value};

/// Variant used when a block is added without one
pub fn default_variant(block_type: BlockType) -> &'static str {
    match block_type {
        BlockType::Hero => "centered",
        BlockType::Header => "classic",
        BlockType::Footer => "columns",
        BlockType::ProductGrid => "grid",
        BlockType::Columns => "two-column",
        _ => "default",
    }
}

/// Starter settings for a block type
pub fn default_settings(block_type: BlockType) -> Settings {
    let value = match block_type {
        BlockType::Hero => json!({
            "title": "Welcome to our store",
            "subtitle": "Discover our latest collection",
            "buttonText": "Shop now",
            "buttonLink": "/collections/all",
            "alignment": "center",
        }),
        BlockType::Header => json!({
            "logoText": "My Store",
            "menuItems": [
                { "label": "Home", "link": "/" },
                { "label": "Shop", "link": "/collections/all" },
            ],
            "sticky": false,
        }),
        BlockType::Footer => json!({
            "copyright": "© My Store",
            "columns": [],
        }),
        BlockType::ProductGrid => json!({
            "title": "Featured products",
            "productsPerRow": 4,
            "limit": 8,
        }),
        BlockType::FeaturedProduct => json!({ "productId": Value::Null, "showPrice": true }),
        BlockType::CollectionList => json!({ "title": "Collections", "collections": [] }),
        BlockType::RichText => json!({ "heading": "Talk about your brand", "content": "" }),
        BlockType::ImageBanner => json!({ "image": Value::Null, "heading": "Image banner", "overlayOpacity": 0.3 }),
        BlockType::ImageWithText => json!({ "image": Value::Null, "heading": "Image with text", "text": "", "imagePosition": "left" }),
        BlockType::Newsletter => json!({ "heading": "Subscribe to our emails", "buttonText": "Subscribe" }),
        BlockType::Testimonials => json!({ "heading": "What our customers say", "items": [] }),
        BlockType::Faq => json!({ "heading": "Frequently asked questions", "items": [] }),
        BlockType::Video => json!({ "url": "", "autoplay": false }),
        BlockType::Gallery => json!({ "images": [], "columns": 3 }),
        BlockType::ContactForm => json!({ "heading": "Contact us", "fields": ["name", "email", "message"] }),
        BlockType::Spacer => json!({ "height": 48 }),
        BlockType::Divider => json!({ "thickness": 1 }),
        BlockType::Container => json!({ "maxWidth": "1200px" }),
        BlockType::Columns => json!({ "columns": 2, "gap": "24px" }),
        BlockType::Section => json!({ "padding": "48px 0" }),
    };

    match value {
        Value::Object(map) => map,
        _ => Settings::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_object_settings() {
        for block_type in BlockType::ALL {
            // Every table entry is an object literal
            let _ = default_settings(block_type);
            assert!(!default_variant(block_type).is_empty());
        }
        assert_eq!(default_settings(BlockType::Hero)["buttonText"], "Shop now");
    }
}
