//! Structural checks for a block tree.
//!
//! The store maintains these invariants itself; the checks exist for
//! documents arriving from outside (loaded files, synced collections) and
//! for tests.

use crate::block::Block;
use crate::visitor::{walk_block, walk_blocks, Visitor};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityIssue {
    /// Sibling orders are not exactly `0..N-1`
    OrderGap {
        parent_id: Option<String>,
        orders: Vec<usize>,
    },
    DuplicateId(String),
    EmptyId,
    /// A non-container block carries children
    ChildrenOnLeaf(String),
    /// `parent_id` disagrees with the actual owner
    ParentMismatch {
        id: String,
        expected: Option<String>,
        found: Option<String>,
    },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::OrderGap { parent_id, orders } => write!(
                f,
                "orders under {} are {:?}, expected 0..{}",
                parent_id.as_deref().unwrap_or("<root>"),
                orders,
                orders.len()
            ),
            IntegrityIssue::DuplicateId(id) => write!(f, "duplicate block id `{}`", id),
            IntegrityIssue::EmptyId => write!(f, "block with empty id"),
            IntegrityIssue::ChildrenOnLeaf(id) => {
                write!(f, "block `{}` has children but is not a container", id)
            }
            IntegrityIssue::ParentMismatch { id, expected, found } => write!(
                f,
                "block `{}` has parentId {:?}, expected {:?}",
                id, found, expected
            ),
        }
    }
}

struct IntegrityChecker {
    seen: HashSet<String>,
    issues: Vec<IntegrityIssue>,
}

impl IntegrityChecker {
    fn check_siblings(&mut self, parent_id: Option<&str>, siblings: &[Block]) {
        let orders: Vec<usize> = siblings.iter().map(|b| b.order).collect();
        if orders.iter().enumerate().any(|(i, order)| i != *order) {
            self.issues.push(IntegrityIssue::OrderGap {
                parent_id: parent_id.map(str::to_string),
                orders,
            });
        }

        for block in siblings {
            if block.parent_id.as_deref() != parent_id {
                self.issues.push(IntegrityIssue::ParentMismatch {
                    id: block.id.clone(),
                    expected: parent_id.map(str::to_string),
                    found: block.parent_id.clone(),
                });
            }
        }
    }
}

impl Visitor for IntegrityChecker {
    fn visit_block(&mut self, block: &Block, depth: usize) {
        if block.id.is_empty() {
            self.issues.push(IntegrityIssue::EmptyId);
        } else if !self.seen.insert(block.id.clone()) {
            self.issues.push(IntegrityIssue::DuplicateId(block.id.clone()));
        }

        if !block.is_container() && !block.children().is_empty() {
            self.issues.push(IntegrityIssue::ChildrenOnLeaf(block.id.clone()));
        }

        self.check_siblings(Some(&block.id), block.children());
        walk_block(self, block, depth);
    }
}

/// Every violation of the document invariants, in visit order
pub fn check_integrity(blocks: &[Block]) -> Vec<IntegrityIssue> {
    let mut checker = IntegrityChecker {
        seen: HashSet::new(),
        issues: Vec::new(),
    };
    checker.check_siblings(None, blocks);
    walk_blocks(&mut checker, blocks, 0);
    checker.issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;

    fn block(id: &str, order: usize) -> Block {
        let mut b = Block::new(id, BlockType::Hero, "x");
        b.order = order;
        b
    }

    #[test]
    fn test_valid_tree_has_no_issues() {
        let mut child = block("b", 0);
        child.parent_id = Some("s".to_string());
        let mut section = Block::new("s", BlockType::Section, "x").with_children(vec![child]);
        section.order = 1;

        assert!(check_integrity(&[block("a", 0), section]).is_empty());
    }

    #[test]
    fn test_detects_order_gap_and_duplicates() {
        let issues = check_integrity(&[block("a", 0), block("a", 2)]);
        assert!(issues.contains(&IntegrityIssue::DuplicateId("a".to_string())));
        assert!(matches!(issues[0], IntegrityIssue::OrderGap { .. }));
    }

    #[test]
    fn test_detects_children_on_leaf() {
        let mut hero = block("h", 0);
        let mut nested = block("n", 0);
        nested.parent_id = Some("h".to_string());
        hero.children = Some(vec![nested]);

        assert_eq!(
            check_integrity(&[hero]),
            vec![IntegrityIssue::ChildrenOnLeaf("h".to_string())]
        );
    }
}
