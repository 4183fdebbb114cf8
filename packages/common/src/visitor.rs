use crate::block::Block;

/// Visitor pattern for traversing a block tree immutably
///
/// The default implementation walks every block depth-first, parents
/// before children. Override `visit_block` to act on nodes and call
/// `walk_block` to keep descending.
pub trait Visitor: Sized {
    fn visit_block(&mut self, block: &Block, depth: usize) {
        walk_block(self, block, depth);
    }
}

pub fn walk_blocks<V: Visitor>(visitor: &mut V, blocks: &[Block], depth: usize) {
    for block in blocks {
        visitor.visit_block(block, depth);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block, depth: usize) {
    walk_blocks(visitor, block.children(), depth + 1);
}

/// Collects every id in the tree in visit order
#[derive(Debug, Default)]
pub struct IdCollector {
    pub ids: Vec<String>,
}

impl Visitor for IdCollector {
    fn visit_block(&mut self, block: &Block, depth: usize) {
        self.ids.push(block.id.clone());
        walk_block(self, block, depth);
    }
}

/// All ids in the tree, parents before children
pub fn collect_ids(blocks: &[Block]) -> Vec<String> {
    let mut collector = IdCollector::default();
    walk_blocks(&mut collector, blocks, 0);
    collector.ids
}

/// Number of blocks at any depth
pub fn count_blocks(blocks: &[Block]) -> usize {
    blocks
        .iter()
        .map(|block| 1 + count_blocks(block.children()))
        .sum()
}
