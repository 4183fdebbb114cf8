//! Drag-to-reorder session state.

use crate::document::DocumentStore;
use crate::geometry::Rect;
use crate::guides::{compute_guides, Guide, GuideOptions, GuideResult};
use crate::tree;

#[derive(Debug, Clone, Default)]
pub struct DragSession {
    active_drag_id: Option<String>,
    over_block_id: Option<String>,
    guides: Vec<Guide>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_drag_id(&self) -> Option<&str> {
        self.active_drag_id.as_deref()
    }

    pub fn over_block_id(&self) -> Option<&str> {
        self.over_block_id.as_deref()
    }

    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn is_dragging(&self) -> bool {
        self.active_drag_id.is_some()
    }

    /// Start (Some) or abandon (None) a drag
    pub fn set_active_drag_id(&mut self, id: Option<&str>) {
        self.active_drag_id = id.map(str::to_string);
        if self.active_drag_id.is_none() {
            self.over_block_id = None;
            self.guides.clear();
        }
    }

    pub fn set_over_block_id(&mut self, id: Option<&str>) {
        self.over_block_id = id.map(str::to_string);
    }

    /// Recompute transient guides for the dragged rect
    pub fn update_guides(
        &mut self,
        dragged: Rect,
        others: &[Rect],
        container: Option<Rect>,
        options: &GuideOptions,
    ) -> GuideResult {
        let result = compute_guides(dragged, others, container, options);
        self.guides = result.guides.clone();
        result
    }

    /// Drop onto the hovered block: the dragged block takes the
    /// over-block's index among their shared siblings. Ends the session.
    pub fn drop(&mut self, store: &mut DocumentStore) -> bool {
        let active = self.active_drag_id.take();
        let over = self.over_block_id.take();
        self.guides.clear();

        let (Some(active), Some(over)) = (active, over) else {
            return false;
        };
        if active == over {
            return false;
        }

        let (Some((active_parent, from)), Some((over_parent, to))) = (
            tree::locate(store.blocks(), &active),
            tree::locate(store.blocks(), &over),
        ) else {
            tracing::debug!(active = %active, over = %over, "drop: stale block ids");
            return false;
        };

        match (active_parent, over_parent) {
            (None, None) => store.move_block(from, to),
            (Some(a), Some(b)) if a == b => store.move_block_within_container(&a, from, to),
            _ => {
                tracing::debug!(active = %active, over = %over, "drop: blocks are not siblings");
                false
            }
        }
    }

    /// Abandon the drag without touching the store
    pub fn cancel(&mut self) {
        self.set_active_drag_id(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockforge_common::{Block, BlockType};

    fn store() -> DocumentStore {
        DocumentStore::from_blocks(vec![
            Block::new("A", BlockType::Hero, "x"),
            Block::new("B", BlockType::Header, "x"),
            Block::new("C", BlockType::Footer, "x"),
        ])
    }

    fn ids(store: &DocumentStore) -> Vec<&str> {
        store.blocks().iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_drop_moves_to_over_index() {
        let mut store = store();
        let mut drag = DragSession::new();
        drag.set_active_drag_id(Some("A"));
        drag.set_over_block_id(Some("C"));

        assert!(drag.drop(&mut store));
        assert_eq!(ids(&store), vec!["B", "C", "A"]);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_cancel_leaves_store_untouched() {
        let mut store = store();
        let mut drag = DragSession::new();
        drag.set_active_drag_id(Some("B"));
        drag.set_over_block_id(Some("C"));
        drag.cancel();

        assert!(!drag.drop(&mut store));
        assert_eq!(ids(&store), vec!["A", "B", "C"]);
        assert_eq!(store.history_len(), 0);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_drop_within_container() {
        let mut store = DocumentStore::from_blocks(vec![Block::new("s", BlockType::Section, "x")
            .with_children(vec![
                Block::new("one", BlockType::RichText, "x"),
                Block::new("two", BlockType::RichText, "x"),
            ])]);
        let mut drag = DragSession::new();
        drag.set_active_drag_id(Some("two"));
        drag.set_over_block_id(Some("one"));
        assert!(drag.drop(&mut store));

        let children: Vec<&str> = store.block("s").unwrap().children().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(children, vec!["two", "one"]);
    }
}
