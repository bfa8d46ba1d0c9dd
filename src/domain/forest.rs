//! Queries over a built classification forest.

use std::collections::BTreeMap;

use termtree::Tree;

use crate::domain::entities::{ClassificationCode, Level, TableRow};

/// Depth-first, pre-order iterator over a forest.
pub struct PreOrderIter<'a> {
    stack: Vec<&'a ClassificationCode>,
}

impl<'a> PreOrderIter<'a> {
    fn new(roots: &'a [ClassificationCode]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a ClassificationCode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}

/// A node in pre-order together with the letter of its enclosing section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode<'a> {
    pub section: &'a str,
    pub node: &'a ClassificationCode,
}

/// Read-only operations on `[ClassificationCode]` forests.
pub trait Forest {
    fn preorder(&self) -> PreOrderIter<'_>;

    /// Every node in pre-order, tagged with its section letter.
    fn flatten_nodes(&self) -> Vec<FlatNode<'_>>;

    /// Number of nodes per level.
    fn level_counts(&self) -> BTreeMap<Level, usize>;

    /// First node whose dotted or normalized code equals `code`.
    fn find(&self, code: &str) -> Option<&ClassificationCode>;

    /// Render as a terminal tree, cutting children below `max_level`.
    fn to_tree_string(&self, max_level: Level) -> Tree<String>;
}

impl Forest for [ClassificationCode] {
    fn preorder(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    fn flatten_nodes(&self) -> Vec<FlatNode<'_>> {
        self.iter()
            .flat_map(|section| {
                let letter = section.raw_code.as_str();
                std::slice::from_ref(section)
                    .preorder()
                    .map(move |node| FlatNode {
                        section: letter,
                        node,
                    })
            })
            .collect()
    }

    fn level_counts(&self) -> BTreeMap<Level, usize> {
        let mut counts = BTreeMap::new();
        for node in self.preorder() {
            *counts.entry(node.level).or_insert(0) += 1;
        }
        counts
    }

    fn find(&self, code: &str) -> Option<&ClassificationCode> {
        let code = code.trim();
        self.preorder()
            .find(|n| n.raw_code == code || n.normalized_code == code)
    }

    fn to_tree_string(&self, max_level: Level) -> Tree<String> {
        fn build(node: &ClassificationCode, max_level: Level) -> Tree<String> {
            let leaves: Vec<_> = if node.level < max_level {
                node.children.iter().map(|c| build(c, max_level)).collect()
            } else {
                Vec::new()
            };
            Tree::new(node.to_string()).with_leaves(leaves)
        }

        Tree::new("NACE".to_string()).with_leaves(self.iter().map(|s| build(s, max_level)))
    }
}

impl ClassificationCode {
    /// Descendants of this node as table rows, in pre-order, excluding the node itself.
    ///
    /// Sections are not re-synthesized into marker text, so this is only meaningful
    /// below the section level.
    pub fn descendant_rows(&self) -> Vec<TableRow> {
        std::slice::from_ref(self)
            .preorder()
            .skip(1)
            .map(|n| TableRow::new(n.raw_code.clone(), "", "", n.description.clone()))
            .collect()
    }

    /// Height of the subtree rooted here (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ClassificationCode::depth)
            .max()
            .unwrap_or(0)
    }
}
