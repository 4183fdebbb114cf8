//! Undoable block operations on [`DocumentStore`].
//!
//! Every operation here runs inside a single transaction: one history
//! entry on success, nothing recorded on a no-op.

use crate::document::DocumentStore;
use crate::selection::SelectionMode;
use crate::tree;
use blockforge_common::{
    collect_ids, default_settings, default_variant, Block, BlockPatch, BlockType, Settings,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Direction for moving blocks one step among their siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveDirection {
    Up,
    Down,
}

impl DocumentStore {
    // ---------------------------------------------------------------------
    // Content updates
    // ---------------------------------------------------------------------

    pub fn update_block(&mut self, id: &str, patch: &BlockPatch) -> bool {
        self.commit("Update block", |store| {
            match tree::find_mut(store.blocks_mut(), id) {
                Some(block) => {
                    patch.apply_to(block);
                    true
                }
                None => false,
            }
        })
    }

    /// Shallow-merge `settings` into the block's settings
    pub fn update_block_settings(&mut self, id: &str, settings: &Settings) -> bool {
        self.commit("Update settings", |store| {
            match tree::find_mut(store.blocks_mut(), id) {
                Some(block) => {
                    block.merge_settings(settings);
                    true
                }
                None => false,
            }
        })
    }

    pub fn change_block_variant(&mut self, id: &str, variant: &str) -> bool {
        self.commit("Change variant", |store| {
            match tree::find_mut(store.blocks_mut(), id) {
                Some(block) => {
                    block.variant = variant.to_string();
                    true
                }
                None => false,
            }
        })
    }

    pub fn toggle_block_visibility(&mut self, id: &str) -> bool {
        self.commit("Toggle visibility", |store| {
            match tree::find_mut(store.blocks_mut(), id) {
                Some(block) => {
                    block.visible = !block.visible;
                    true
                }
                None => false,
            }
        })
    }

    // ---------------------------------------------------------------------
    // Structure
    // ---------------------------------------------------------------------

    /// Splice a top-level block from `from` and reinsert it at `to`.
    ///
    /// `from == to` is still recorded as a (no-change) history entry.
    pub fn move_block(&mut self, from: usize, to: usize) -> bool {
        self.commit("Move block", |store| {
            let blocks = store.blocks_mut();
            if from >= blocks.len() || to >= blocks.len() {
                tracing::debug!(from, to, len = blocks.len(), "move_block: index out of range");
                return false;
            }
            if blocks[from].locked {
                tracing::debug!(block_id = %blocks[from].id, "move_block: block is locked");
                return false;
            }
            let block = blocks.remove(from);
            blocks.insert(to, block);
            true
        })
    }

    /// Move a block one step among its siblings, at any depth
    pub fn move_block_up(&mut self, id: &str) -> bool {
        self.step_block(id, MoveDirection::Up)
    }

    pub fn move_block_down(&mut self, id: &str) -> bool {
        self.step_block(id, MoveDirection::Down)
    }

    fn step_block(&mut self, id: &str, direction: MoveDirection) -> bool {
        let label = match direction {
            MoveDirection::Up => "Move block up",
            MoveDirection::Down => "Move block down",
        };
        self.commit(label, |store| {
            let Some((parent, index)) = tree::locate(store.blocks(), id) else {
                return false;
            };
            let Some(siblings) = tree::siblings_mut(store.blocks_mut(), parent.as_deref()) else {
                return false;
            };
            if siblings[index].locked {
                return false;
            }
            match direction {
                MoveDirection::Up if index > 0 => siblings.swap(index, index - 1),
                MoveDirection::Down if index + 1 < siblings.len() => siblings.swap(index, index + 1),
                _ => return false,
            }
            true
        })
    }

    /// Append a block at the end of the document and select it.
    ///
    /// Empty or already-used ids are replaced; the id actually used is
    /// returned.
    pub fn add_block(&mut self, block: Block) -> String {
        self.insert_block_after(None, block, "Add block")
    }

    /// Append a block built from the catalog defaults for `block_type`
    pub fn add_block_by_type(&mut self, block_type: BlockType, variant: Option<&str>) -> String {
        let block = self.catalog_block(block_type, variant);
        self.insert_block_after(None, block, "Add block")
    }

    /// Insert a catalog block directly after `anchor_id`
    pub fn add_block_below(
        &mut self,
        anchor_id: &str,
        block_type: BlockType,
        variant: Option<&str>,
    ) -> Option<String> {
        if !self.contains(anchor_id) {
            return None;
        }
        let block = self.catalog_block(block_type, variant);
        Some(self.insert_block_after(Some(anchor_id), block, "Add block below"))
    }

    fn catalog_block(&mut self, block_type: BlockType, variant: Option<&str>) -> Block {
        let id = self.fresh_id(block_type.as_str());
        Block::new(id, block_type, variant.unwrap_or(default_variant(block_type)))
            .with_settings(default_settings(block_type))
    }

    /// Insert after `anchor_id` when it still exists, otherwise at the end.
    /// The inserted block becomes the selection.
    pub(crate) fn insert_block_after(
        &mut self,
        anchor_id: Option<&str>,
        mut block: Block,
        label: &str,
    ) -> String {
        self.ensure_unique_ids(&mut block);
        let id = block.id.clone();

        self.commit(label, |store| {
            let placed = match anchor_id {
                Some(anchor) if store.contains(anchor) => {
                    tree::insert_after(store.blocks_mut(), anchor, block)
                }
                _ => {
                    store.blocks_mut().push(block);
                    true
                }
            };
            if placed {
                store.selection.replace(&id);
            }
            placed
        });

        id
    }

    /// Replace empty or colliding ids anywhere in `block`'s subtree
    pub(crate) fn ensure_unique_ids(&mut self, block: &mut Block) {
        let mut seen = HashSet::new();
        self.ensure_unique_in(block, &mut seen);
    }

    fn ensure_unique_in(&mut self, block: &mut Block, seen: &mut HashSet<String>) {
        if block.id.is_empty() || self.contains(&block.id) || seen.contains(&block.id) {
            block.id = self.fresh_id(block.block_type.as_str());
        }
        seen.insert(block.id.clone());
        if let Some(children) = block.children.as_mut() {
            for child in children.iter_mut() {
                self.ensure_unique_in(child, seen);
            }
        }
    }

    /// Remove a block (and its subtree) from wherever it lives
    pub fn remove_block(&mut self, id: &str) -> bool {
        self.commit("Remove block", |store| {
            if store.block(id).map_or(true, |block| block.locked) {
                return false;
            }
            match tree::remove(store.blocks_mut(), id) {
                Some(removed) => {
                    store.clear_selection_if_removed(&removed);
                    true
                }
                None => false,
            }
        })
    }

    /// Drop the whole selection when its primary lived in `removed`
    pub(crate) fn clear_selection_if_removed(&mut self, removed: &Block) {
        let primary_removed = self
            .selection
            .primary()
            .is_some_and(|primary| primary == removed.id || tree::is_descendant(removed, primary));
        if primary_removed {
            self.selection.clear();
        }
    }

    /// Deep-copy a block next to the original and select the copy
    pub fn duplicate_block(&mut self, id: &str) -> Option<String> {
        let mut created = None;
        self.commit("Duplicate block", |store| {
            let Some(copy_id) = store.duplicate_in_place(id) else {
                return false;
            };
            store.selection.replace(&copy_id);
            created = Some(copy_id);
            true
        });
        created
    }

    fn duplicate_in_place(&mut self, id: &str) -> Option<String> {
        let mut copy = self.block(id)?.clone();
        self.reidentify(&mut copy);
        tree::for_each_mut(std::slice::from_mut(&mut copy), &mut |block: &mut Block| {
            block.locked = false;
            block.group_id = None;
        });
        let copy_id = copy.id.clone();
        tree::insert_after(self.blocks_mut(), id, copy).then_some(copy_id)
    }

    // ---------------------------------------------------------------------
    // Bulk variants
    // ---------------------------------------------------------------------

    /// Selected ids in document order, without ids nested under another
    /// selected block
    fn selected_roots(&self) -> Vec<String> {
        let selected: Vec<String> = collect_ids(self.blocks())
            .into_iter()
            .filter(|id| self.selection.contains(id))
            .collect();

        selected
            .iter()
            .filter(|id| {
                !selected.iter().any(|other| {
                    other != *id
                        && self
                            .block(other)
                            .is_some_and(|ancestor| tree::is_descendant(ancestor, id))
                })
            })
            .cloned()
            .collect()
    }

    /// Duplicate every selected block; the copies become the selection
    pub fn duplicate_selected_blocks(&mut self) -> Vec<String> {
        let roots = self.selected_roots();
        let mut created = Vec::new();
        self.commit("Duplicate blocks", |store| {
            for id in &roots {
                if let Some(copy_id) = store.duplicate_in_place(id) {
                    created.push(copy_id);
                }
            }
            if created.is_empty() {
                return false;
            }
            store.selection.set_many(&created);
            true
        });
        created
    }

    /// Remove every selected, unlocked block
    pub fn remove_selected_blocks(&mut self) -> bool {
        let roots = self.selected_roots();
        self.commit("Remove blocks", |store| {
            let mut removed_any = false;
            for id in &roots {
                if store.block(id).is_some_and(|block| block.locked) {
                    continue;
                }
                removed_any |= tree::remove(store.blocks_mut(), id).is_some();
            }
            removed_any
        })
    }

    /// Move selected top-level blocks one step, keeping their relative
    /// order. Refuses when the boundary block would leave the list.
    pub fn move_selected_blocks(&mut self, direction: MoveDirection) -> bool {
        self.commit("Move blocks", |store| {
            let blocks = store.blocks();
            let indices: Vec<usize> = blocks
                .iter()
                .enumerate()
                .filter(|(_, block)| store.selection.contains(&block.id) && !block.locked)
                .map(|(index, _)| index)
                .collect();
            let (Some(&first), Some(&last)) = (indices.first(), indices.last()) else {
                return false;
            };
            let len = blocks.len();

            let blocks = store.blocks_mut();
            match direction {
                MoveDirection::Up => {
                    if first == 0 {
                        return false;
                    }
                    for &index in &indices {
                        blocks.swap(index, index - 1);
                    }
                }
                MoveDirection::Down => {
                    if last + 1 >= len {
                        return false;
                    }
                    for &index in indices.iter().rev() {
                        blocks.swap(index, index + 1);
                    }
                }
            }
            true
        })
    }

    // ---------------------------------------------------------------------
    // Locking
    // ---------------------------------------------------------------------

    /// Flip a block's lock; grouped blocks lock and unlock together
    pub fn toggle_block_lock(&mut self, id: &str) -> bool {
        self.commit("Toggle lock", |store| {
            let Some(block) = store.block(id) else {
                return false;
            };
            let locked = !block.locked;
            let group = block.group_id.clone();
            tree::for_each_mut(store.blocks_mut(), &mut |block: &mut Block| {
                let member = match &group {
                    Some(group) => block.group_id.as_ref() == Some(group),
                    None => block.id == id,
                };
                if member {
                    block.locked = locked;
                }
            });
            true
        })
    }

    pub fn lock_selected_blocks(&mut self) -> bool {
        self.set_selected_locked(true, "Lock blocks")
    }

    pub fn unlock_selected_blocks(&mut self) -> bool {
        self.set_selected_locked(false, "Unlock blocks")
    }

    fn set_selected_locked(&mut self, locked: bool, label: &str) -> bool {
        let selected: HashSet<String> = self.selection.ids().iter().cloned().collect();
        self.commit(label, |store| {
            let mut changed = false;
            tree::for_each_mut(store.blocks_mut(), &mut |block: &mut Block| {
                if selected.contains(&block.id) && block.locked != locked {
                    block.locked = locked;
                    changed = true;
                }
            });
            changed
        })
    }

    // ---------------------------------------------------------------------
    // Grouping
    // ---------------------------------------------------------------------

    /// Tag every selected block with a fresh group id
    pub fn group_selected_blocks(&mut self) -> Option<String> {
        let selected: HashSet<String> = self.selection.ids().iter().cloned().collect();
        if selected.len() < 2 {
            return None;
        }
        let group_id = self.fresh_id("group");
        let applied = self.commit("Group blocks", |store| {
            tree::for_each_mut(store.blocks_mut(), &mut |block: &mut Block| {
                if selected.contains(&block.id) {
                    block.group_id = Some(group_id.clone());
                }
            });
            true
        });
        applied.then_some(group_id)
    }

    pub fn ungroup_block(&mut self, group_id: &str) -> bool {
        self.commit("Ungroup blocks", |store| {
            let mut changed = false;
            tree::for_each_mut(store.blocks_mut(), &mut |block: &mut Block| {
                if block.group_id.as_deref() == Some(group_id) {
                    block.group_id = None;
                    changed = true;
                }
            });
            changed
        })
    }

    /// Select a single block (convenience used by façades)
    pub(crate) fn select_only(&mut self, id: &str) -> bool {
        self.select_block(Some(id), SelectionMode::Replace)
    }
}
