//! Container operations.
//!
//! Containers (`container`, `columns`, `section`) own an ordered child
//! list. These operations work at any nesting depth; a block can never be
//! moved into itself or one of its own descendants.

use crate::document::DocumentStore;
use crate::tree;
use blockforge_common::Block;

impl DocumentStore {
    /// Insert `block` into a container's children (at the end when
    /// `index` is None, clamped otherwise) and select it.
    pub fn add_block_to_container(
        &mut self,
        container_id: &str,
        mut block: Block,
        index: Option<usize>,
    ) -> Option<String> {
        if !self.block(container_id).is_some_and(Block::is_container) {
            tracing::debug!(container_id = %container_id, "add_block_to_container: not a container");
            return None;
        }
        self.ensure_unique_ids(&mut block);
        let id = block.id.clone();

        let applied = self.commit("Add block to container", |store| {
            let placed = tree::insert(
                store.blocks_mut(),
                Some(container_id),
                index.unwrap_or(usize::MAX),
                block,
            );
            if placed {
                store.selection.replace(&id);
            }
            placed
        });
        applied.then_some(id)
    }

    /// Re-parent a block. `container_id = None` moves it to the top level.
    pub fn move_block_to_container(
        &mut self,
        block_id: &str,
        container_id: Option<&str>,
        index: Option<usize>,
    ) -> bool {
        self.commit("Move block to container", |store| {
            let Some(block) = store.block(block_id) else {
                return false;
            };
            if block.locked {
                return false;
            }
            if let Some(target) = container_id {
                if target == block_id || tree::is_descendant(block, target) {
                    tracing::debug!(block_id = %block_id, target = %target, "refusing cyclic move");
                    return false;
                }
                if !store.block(target).is_some_and(Block::is_container) {
                    return false;
                }
            }

            let Some(moved) = tree::remove(store.blocks_mut(), block_id) else {
                return false;
            };
            tree::insert(
                store.blocks_mut(),
                container_id,
                index.unwrap_or(usize::MAX),
                moved,
            )
        })
    }

    /// Reorder a container's direct children
    pub fn move_block_within_container(&mut self, container_id: &str, from: usize, to: usize) -> bool {
        self.commit("Move block within container", |store| {
            let Some(children) = tree::find_mut(store.blocks_mut(), container_id)
                .and_then(|container| container.children.as_mut())
            else {
                return false;
            };
            if from >= children.len() || to >= children.len() || children[from].locked {
                return false;
            }
            let block = children.remove(from);
            children.insert(to, block);
            true
        })
    }

    /// Remove a direct child of `container_id`
    pub fn remove_block_from_container(&mut self, container_id: &str, block_id: &str) -> bool {
        self.commit("Remove block from container", |store| {
            let Some(children) = tree::find_mut(store.blocks_mut(), container_id)
                .and_then(|container| container.children.as_mut())
            else {
                return false;
            };
            let Some(pos) = children.iter().position(|child| child.id == block_id) else {
                return false;
            };
            if children[pos].locked {
                return false;
            }
            let removed = children.remove(pos);
            store.clear_selection_if_removed(&removed);
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionMode;
    use blockforge_common::{check_integrity, BlockType};

    fn store() -> DocumentStore {
        DocumentStore::from_blocks(vec![
            Block::new("hero", BlockType::Hero, "x"),
            Block::new("section", BlockType::Section, "x").with_children(vec![
                Block::new("text", BlockType::RichText, "x"),
                Block::new("cols", BlockType::Columns, "x")
                    .with_children(vec![Block::new("img", BlockType::ImageBanner, "x")]),
            ]),
        ])
    }

    fn child_ids(store: &DocumentStore, parent: &str) -> Vec<String> {
        store
            .block(parent)
            .unwrap()
            .children()
            .iter()
            .map(|b| b.id.clone())
            .collect()
    }

    #[test]
    fn test_add_to_nested_container() {
        let mut store = store();
        let id = store
            .add_block_to_container("cols", Block::new("new", BlockType::Video, "x"), Some(0))
            .unwrap();
        assert_eq!(child_ids(&store, "cols"), vec![id.clone(), "img".to_string()]);
        assert_eq!(store.block(&id).unwrap().parent_id.as_deref(), Some("cols"));
        assert_eq!(store.selected_block_id(), Some("new"));
        assert!(check_integrity(store.blocks()).is_empty());
    }

    #[test]
    fn test_add_to_leaf_is_noop() {
        let mut store = store();
        let result = store.add_block_to_container("hero", Block::new("n", BlockType::Video, "x"), None);
        assert!(result.is_none());
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn test_move_into_own_descendant_is_noop() {
        let mut store = store();
        assert!(!store.move_block_to_container("section", Some("cols"), None));
        assert!(!store.move_block_to_container("section", Some("section"), None));
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn test_move_to_top_level_and_back() {
        let mut store = store();
        assert!(store.move_block_to_container("img", None, Some(0)));
        assert_eq!(store.blocks()[0].id, "img");
        assert!(store.block("img").unwrap().parent_id.is_none());
        assert!(child_ids(&store, "cols").is_empty());

        assert!(store.move_block_to_container("img", Some("section"), None));
        assert_eq!(child_ids(&store, "section"), vec!["text", "cols", "img"]);
        assert!(check_integrity(store.blocks()).is_empty());
    }

    #[test]
    fn test_move_within_container() {
        let mut store = store();
        assert!(store.move_block_within_container("section", 0, 1));
        assert_eq!(child_ids(&store, "section"), vec!["cols", "text"]);
        assert_eq!(store.block("text").unwrap().order, 1);
        assert!(!store.move_block_within_container("section", 0, 5));
    }

    #[test]
    fn test_remove_from_container_direct_child_only() {
        let mut store = store();
        store.select_block(Some("cols"), SelectionMode::Replace);
        assert!(!store.remove_block_from_container("section", "img"));
        assert!(store.remove_block_from_container("section", "cols"));
        assert!(store.block("img").is_none());
        assert_eq!(store.selected_block_id(), None);
    }
}
