//! Structural views of a tree for diagnostics.

use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::domain::avl::{AvlTree, Position};

/// Preorder listing, one `(key; value)` line per node, indented two spaces per level.
#[instrument(level = "debug", skip(tree))]
pub fn preorder_indent<K, V>(tree: &AvlTree<K, V>) -> String
where
    K: Ord + Display,
    V: Display,
{
    let mut out = String::new();
    let mut stack: Vec<(Position, usize)> = tree.root().map(|p| (p, 0)).into_iter().collect();

    while let Some((pos, depth)) = stack.pop() {
        if let (Some(key), Some(value)) = (tree.key(pos), tree.value(pos)) {
            out.push_str(&format!("{}({}; {})\n", "  ".repeat(depth), key, value));
        }
        // right first so the left subtree is printed first
        if let Some(right) = tree.right(pos) {
            stack.push((right, depth + 1));
        }
        if let Some(left) = tree.left(pos) {
            stack.push((left, depth + 1));
        }
    }
    out
}

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<K, V> TreeDisplay for AvlTree<K, V>
where
    K: Ord + Display,
{
    fn to_tree_string(&self) -> Tree<String> {
        fn build<K: Ord + Display, V>(tree: &AvlTree<K, V>, pos: Position) -> Tree<String> {
            let label = tree.key(pos).map(ToString::to_string).unwrap_or_default();
            let leaves: Vec<Tree<String>> = [tree.left(pos), tree.right(pos)]
                .into_iter()
                .flatten()
                .map(|child| build(tree, child))
                .collect();
            Tree::new(label).with_leaves(leaves)
        }

        match self.root() {
            Some(root) => build(self, root),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> AvlTree<String, u32> {
        ["C", "B", "A"]
            .into_iter()
            .enumerate()
            .map(|(i, k)| (k.to_string(), i as u32))
            .collect()
    }

    #[test]
    fn given_balanced_tree_when_preorder_indent_then_root_first_children_indented() {
        let text = preorder_indent(&abc());
        assert_eq!(text, "(B; 1)\n  (A; 2)\n  (C; 0)\n");
    }

    #[test]
    fn given_empty_tree_when_preorder_indent_then_empty_string() {
        let tree: AvlTree<String, u32> = AvlTree::new();
        assert!(preorder_indent(&tree).is_empty());
    }

    #[test]
    fn given_tree_when_to_tree_string_then_root_and_leaves() {
        let rendered = abc().to_tree_string();
        assert_eq!(rendered.root, "B");
        assert_eq!(rendered.leaves.len(), 2);
        assert_eq!(rendered.leaves[0].root, "A");
        assert_eq!(rendered.leaves[1].root, "C");
    }

    #[test]
    fn given_empty_tree_when_to_tree_string_then_placeholder() {
        let tree: AvlTree<String, u32> = AvlTree::new();
        assert_eq!(tree.to_tree_string().root, "Empty tree");
    }
}
