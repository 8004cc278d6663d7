//! ASCII-art prefixes for displaying a subtree line by line.
//!
//! Only the structural part of each line is produced here; the host pairs
//! every prefix with its own label.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::error::TreeResult;

/// Glyphs used to draw the tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderStyle {
    /// Connector for a child that has later siblings
    pub branch: String,
    /// Connector for the last child
    pub last_branch: String,
    /// Continuation below an ancestor that has later siblings
    pub vertical: String,
    /// Continuation below a last child
    pub blank: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            branch: "├─ ".into(),
            last_branch: "└─ ".into(),
            vertical: "│  ".into(),
            blank: "   ".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Root,
    Middle,
    Last,
}

#[derive(Debug, Clone)]
struct Frame {
    id: NodeId,
    continuation: String,
    slot: Slot,
}

/// Lazy pre-order iterator over the prefixes of a subtree.
///
/// Cloning the iterator restarts from the clone's position.
#[derive(Debug, Clone)]
pub struct Render<'a, T> {
    tree: &'a TreeArena<T>,
    style: RenderStyle,
    stack: Vec<Frame>,
}

impl<T> TreeArena<T> {
    /// Renders the subtree at `root` with the default glyphs.
    pub fn render(&self, root: NodeId) -> TreeResult<Render<'_, T>> {
        self.render_with(root, &RenderStyle::default())
    }

    #[instrument(level = "trace", skip(self, style))]
    pub fn render_with(&self, root: NodeId, style: &RenderStyle) -> TreeResult<Render<'_, T>> {
        self.node(root)?;
        Ok(Render {
            tree: self,
            style: style.clone(),
            stack: vec![Frame {
                id: root,
                continuation: String::new(),
                slot: Slot::Root,
            }],
        })
    }

    /// Complete display lines: each prefix followed by the node's label.
    #[instrument(level = "debug", skip(self, label))]
    pub fn render_labeled<F>(&self, root: NodeId, mut label: F) -> TreeResult<Vec<String>>
    where
        F: FnMut(&T) -> String,
    {
        Ok(self
            .render(root)?
            .entries()
            .filter_map(|(id, prefix)| {
                self.get(id)
                    .map(|node| format!("{}{}", prefix, label(&node.value)))
            })
            .collect())
    }

    /// Converts the visible part of the subtree into a `termtree` for debug output.
    pub fn to_termtree(&self, root: NodeId) -> TreeResult<Tree<String>>
    where
        T: Display,
    {
        fn build<T: Display>(tree: &TreeArena<T>, id: NodeId) -> TreeResult<Tree<String>> {
            let node = tree.node(id)?;
            let mut out = Tree::new(node.value.to_string());
            if !node.is_collapsed() {
                for &child in node.children() {
                    out.push(build(tree, child)?);
                }
            }
            Ok(out)
        }

        build(self, root)
    }
}

impl<'a, T> Render<'a, T> {
    /// Next node together with its prefix.
    pub fn next_entry(&mut self) -> Option<(NodeId, String)> {
        let tree = self.tree;
        while let Some(frame) = self.stack.pop() {
            let Some(node) = tree.get(frame.id) else {
                continue;
            };

            let Frame {
                id,
                continuation,
                slot,
            } = frame;
            let (prefix, below) = match slot {
                Slot::Root => (String::new(), continuation),
                Slot::Middle => (
                    format!("{}{}", continuation, self.style.branch),
                    format!("{}{}", continuation, self.style.vertical),
                ),
                Slot::Last => (
                    format!("{}{}", continuation, self.style.last_branch),
                    format!("{}{}", continuation, self.style.blank),
                ),
            };

            if !node.is_collapsed() {
                let children = node.children();
                for (i, &child) in children.iter().enumerate().rev() {
                    let slot = if i + 1 == children.len() {
                        Slot::Last
                    } else {
                        Slot::Middle
                    };
                    self.stack.push(Frame {
                        id: child,
                        continuation: below.clone(),
                        slot,
                    });
                }
            }
            return Some((id, prefix));
        }
        None
    }

    /// Adapts the iterator to yield `(NodeId, prefix)` pairs.
    pub fn entries(mut self) -> impl Iterator<Item = (NodeId, String)> + 'a {
        std::iter::from_fn(move || self.next_entry())
    }
}

impl<T> Iterator for Render<'_, T> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().map(|(_, prefix)| prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_node_renders_empty_prefix() {
        let mut tree = TreeArena::new();
        let a = tree.insert_root(());

        assert_eq!(tree.render(a).unwrap().collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn test_siblings_use_branch_then_last_branch() {
        let mut tree = TreeArena::new();
        let a = tree.insert_root(());
        tree.insert((), Some(a), &[]).unwrap();
        tree.insert((), Some(a), &[]).unwrap();
        tree.insert((), Some(a), &[]).unwrap();

        let actual: Vec<String> = tree.render(a).unwrap().collect();
        assert_eq!(actual, vec!["", "├─ ", "├─ ", "└─ "]);
    }

    #[test]
    fn test_clone_restarts_from_current_position() {
        let mut tree = TreeArena::new();
        let a = tree.insert_root(());
        tree.insert((), Some(a), &[]).unwrap();

        let mut render = tree.render(a).unwrap();
        assert_eq!(render.next().as_deref(), Some(""));
        let rest: Vec<String> = render.clone().collect();
        assert_eq!(rest, vec!["└─ "]);
        assert_eq!(render.collect::<Vec<_>>(), rest);
    }

    #[test]
    fn test_custom_style() {
        let mut tree = TreeArena::new();
        let a = tree.insert_root(());
        let b = tree.insert((), Some(a), &[]).unwrap();
        tree.insert((), Some(b), &[]).unwrap();
        tree.insert((), Some(a), &[]).unwrap();
        let style = RenderStyle {
            branch: "|- ".into(),
            last_branch: "`- ".into(),
            vertical: "|  ".into(),
            blank: "   ".into(),
        };

        let actual: Vec<String> = tree.render_with(a, &style).unwrap().collect();
        assert_eq!(actual, vec!["", "|- ", "|  `- ", "`- "]);
    }
}
