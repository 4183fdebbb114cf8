//! Recursive find/mutate helpers over the block tree.
//!
//! Every helper is depth-agnostic: containers nested at any level are
//! searched the same way as the top-level list.

use blockforge_common::Block;

pub fn find<'a>(blocks: &'a [Block], id: &str) -> Option<&'a Block> {
    for block in blocks {
        if block.id == id {
            return Some(block);
        }
        if let Some(found) = find(block.children(), id) {
            return Some(found);
        }
    }
    None
}

pub fn find_mut<'a>(blocks: &'a mut [Block], id: &str) -> Option<&'a mut Block> {
    for block in blocks.iter_mut() {
        if block.id == id {
            return Some(block);
        }
        if let Some(children) = block.children.as_mut() {
            if let Some(found) = find_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

pub fn contains(blocks: &[Block], id: &str) -> bool {
    find(blocks, id).is_some()
}

/// Parent id (None for top level) and sibling index of a block
pub fn locate(blocks: &[Block], id: &str) -> Option<(Option<String>, usize)> {
    locate_in(blocks, id, None)
}

fn locate_in(blocks: &[Block], id: &str, parent: Option<&str>) -> Option<(Option<String>, usize)> {
    if let Some(index) = blocks.iter().position(|b| b.id == id) {
        return Some((parent.map(str::to_string), index));
    }
    blocks
        .iter()
        .find_map(|block| locate_in(block.children(), id, Some(&block.id)))
}

/// Sibling list owned by `parent` (None = top level)
pub fn siblings_mut<'a>(blocks: &'a mut Vec<Block>, parent: Option<&str>) -> Option<&'a mut Vec<Block>> {
    match parent {
        None => Some(blocks),
        Some(parent_id) => find_mut(blocks, parent_id)?.children_mut(),
    }
}

/// Detach a block (and its subtree) from wherever it lives
pub fn remove(blocks: &mut Vec<Block>, id: &str) -> Option<Block> {
    if let Some(pos) = blocks.iter().position(|b| b.id == id) {
        return Some(blocks.remove(pos));
    }
    for block in blocks.iter_mut() {
        if let Some(children) = block.children.as_mut() {
            if let Some(removed) = remove(children, id) {
                return Some(removed);
            }
        }
    }
    None
}

/// Insert into `parent`'s children (None = top level), clamping the index
pub fn insert(blocks: &mut Vec<Block>, parent: Option<&str>, index: usize, block: Block) -> bool {
    match siblings_mut(blocks, parent) {
        Some(siblings) => {
            let index = index.min(siblings.len());
            siblings.insert(index, block);
            true
        }
        None => false,
    }
}

/// Insert directly after `anchor_id` in the anchor's own sibling list
pub fn insert_after(blocks: &mut Vec<Block>, anchor_id: &str, block: Block) -> bool {
    match locate(blocks, anchor_id) {
        Some((parent, index)) => insert(blocks, parent.as_deref(), index + 1, block),
        None => false,
    }
}

/// Whether `id` lives strictly inside `block`'s subtree
pub fn is_descendant(block: &Block, id: &str) -> bool {
    contains(block.children(), id)
}

pub fn for_each_mut(blocks: &mut [Block], f: &mut impl FnMut(&mut Block)) {
    for block in blocks.iter_mut() {
        f(block);
        if let Some(children) = block.children.as_mut() {
            for_each_mut(children, f);
        }
    }
}

/// Renumber every sibling list to `0..N-1`
pub fn renumber(blocks: &mut [Block]) {
    for (order, block) in blocks.iter_mut().enumerate() {
        block.order = order;
        if let Some(children) = block.children.as_mut() {
            renumber(children);
        }
    }
}

/// Rebuild `parent_id` back-references from actual ownership
pub fn assign_parents(blocks: &mut [Block], parent: Option<&str>) {
    for block in blocks.iter_mut() {
        block.parent_id = parent.map(str::to_string);
        let id = block.id.clone();
        if let Some(children) = block.children.as_mut() {
            assign_parents(children, Some(&id));
        }
    }
}

/// Restore order contiguity and parent links after a structural change
pub fn normalize(blocks: &mut [Block]) {
    renumber(blocks);
    assign_parents(blocks, None);
}
