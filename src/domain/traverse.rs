//! Depth-first iteration over subtrees.

use tracing::instrument;

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::error::TreeResult;

/// Visiting order for [`TreeArena::traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Parents before their children
    #[default]
    Pre,
    /// Children before their parents
    Post,
}

impl<T> TreeArena<T> {
    /// Iterates the subtree rooted at `root`, siblings left to right.
    #[instrument(level = "trace", skip(self))]
    pub fn traverse(&self, root: NodeId, order: Order) -> TreeResult<Traverse<'_, T>> {
        self.node(root)?;
        Ok(Traverse {
            tree: self,
            order,
            stack: vec![(root, false)],
        })
    }

    /// Pre-order iteration over `root` and everything below it.
    pub fn descendants(&self, root: NodeId) -> TreeResult<Traverse<'_, T>> {
        self.traverse(root, Order::Pre)
    }

    /// Walks from the parent of `id` up to its root.
    pub fn ancestors(&self, id: NodeId) -> TreeResult<Ancestors<'_, T>> {
        let next = self.node(id)?.parent();
        Ok(Ancestors { tree: self, next })
    }

    /// Nodes without children below `root`, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self, root: NodeId) -> TreeResult<Vec<NodeId>> {
        Ok(self
            .descendants(root)?
            .filter(|&id| self.get(id).is_some_and(|node| node.children().is_empty()))
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct Traverse<'a, T> {
    tree: &'a TreeArena<T>,
    order: Order,
    stack: Vec<(NodeId, bool)>,
}

impl<T> Iterator for Traverse<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            let Some(node) = self.tree.get(current) else {
                continue;
            };
            match self.order {
                Order::Pre => {
                    // Reverse push keeps left-to-right output
                    for &child in node.children().iter().rev() {
                        self.stack.push((child, false));
                    }
                    return Some(current);
                }
                Order::Post if visited => return Some(current),
                Order::Post => {
                    self.stack.push((current, true));
                    for &child in node.children().iter().rev() {
                        self.stack.push((child, false));
                    }
                }
            }
        }
        None
    }
}

#[derive(Debug, Clone)]
pub struct Ancestors<'a, T> {
    tree: &'a TreeArena<T>,
    next: Option<NodeId>,
}

impl<T> Iterator for Ancestors<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.get(current).and_then(|node| node.parent());
        Some(current)
    }
}
