use std::collections::HashSet;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::{TreeError, TreeResult};

/// Stable handle to a node stored in a [`TreeArena`].
///
/// Handles are generational: once a node is removed its handle never
/// resolves again, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "node#{}.{}", slot, generation)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    /// Caller payload, e.g. a tab handle
    pub value: T,
    /// Parent node, None for root nodes
    parent: Option<NodeId>,
    /// Children in display order
    children: Vec<NodeId>,
    /// Hides the descendants from rendering
    collapsed: bool,
}

impl<T> TreeNode<T> {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }
}

/// Arena holding any number of ordered trees.
///
/// Parents are stored as non-owning handles, children as an ordered list of
/// handles, so there are no reference cycles. The arena keeps the invariant
/// `child ∈ parent.children ⇔ child.parent == parent` and never allows a
/// node to become its own ancestor.
#[derive(Debug, Clone)]
pub struct TreeArena<T> {
    arena: Arena<TreeNode<T>>,
    /// Nodes without a parent, in the order they became roots
    roots: Vec<NodeId>,
}

impl<T> Default for TreeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeArena<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.arena.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode<T>> {
        self.arena.get_mut(id.0)
    }

    pub fn value(&self, id: NodeId) -> TreeResult<&T> {
        Ok(&self.node(id)?.value)
    }

    pub fn value_mut(&mut self, id: NodeId) -> TreeResult<&mut T> {
        Ok(&mut self.node_mut(id)?.value)
    }

    pub fn parent(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// All current roots, in the order they became roots.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_collapsed(&self, id: NodeId) -> TreeResult<bool> {
        Ok(self.node(id)?.collapsed)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn set_collapsed(&mut self, id: NodeId, collapsed: bool) -> TreeResult<()> {
        self.node_mut(id)?.collapsed = collapsed;
        Ok(())
    }

    /// Inserts a new node below `parent` (appended last) and adopts `children`.
    ///
    /// Each adopted child is moved out of its previous parent, in order.
    /// Arguments are validated before the tree is modified: a child that is
    /// `parent` itself or one of its ancestors is rejected with
    /// [`TreeError::CycleDetected`].
    #[instrument(level = "debug", skip(self, value))]
    pub fn insert(
        &mut self,
        value: T,
        parent: Option<NodeId>,
        children: &[NodeId],
    ) -> TreeResult<NodeId> {
        if let Some(parent_id) = parent {
            self.node(parent_id)?;
        }
        let mut seen = HashSet::with_capacity(children.len());
        for &child in children {
            self.node(child)?;
            if !seen.insert(child) {
                return Err(TreeError::DuplicateChild(child));
            }
            if let Some(parent_id) = parent {
                if self.is_ancestor_or_self(child, parent_id) {
                    return Err(TreeError::CycleDetected {
                        node: child,
                        target: parent_id,
                    });
                }
            }
        }

        let id = NodeId(self.arena.insert(TreeNode {
            value,
            parent: None,
            children: Vec::with_capacity(children.len()),
            collapsed: false,
        }));
        self.attach(id, parent)?;
        for &child in children {
            self.detach(child)?;
            self.attach(child, Some(id))?;
        }
        debug!("inserted {} under {:?} adopting {} children", id, parent, children.len());
        Ok(id)
    }

    pub fn insert_root(&mut self, value: T) -> NodeId {
        let id = NodeId(self.arena.insert(TreeNode {
            value,
            parent: None,
            children: Vec::new(),
            collapsed: false,
        }));
        self.roots.push(id);
        id
    }

    /// Moves `id` to the end of `new_parent`'s children, or makes it a root.
    #[instrument(level = "debug", skip(self))]
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> TreeResult<()> {
        self.node(id)?;
        if let Some(target) = new_parent {
            self.node(target)?;
            if self.is_ancestor_or_self(id, target) {
                return Err(TreeError::CycleDetected { node: id, target });
            }
        }
        self.detach(id)?;
        self.attach(id, new_parent)?;
        debug!("reparented {} to {:?}", id, new_parent);
        Ok(())
    }

    /// Same as `reparent(child, Some(parent))`.
    pub fn adopt(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.reparent(child, Some(parent))
    }

    /// Detaches `child` from `parent`, making it a root.
    #[instrument(level = "debug", skip(self))]
    pub fn disown(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.position(parent, child)?;
        self.detach(child)?;
        self.attach(child, None)
    }

    /// Swaps `child` with its previous sibling. No-op when already first.
    #[instrument(level = "trace", skip(self))]
    pub fn promote(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        let pos = self.position(parent, child)?;
        if pos > 0 {
            self.node_mut(parent)?.children.swap(pos - 1, pos);
        }
        Ok(())
    }

    /// Swaps `child` with its next sibling. No-op when already last.
    #[instrument(level = "trace", skip(self))]
    pub fn demote(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        let pos = self.position(parent, child)?;
        let children = &mut self.node_mut(parent)?.children;
        if pos + 1 < children.len() {
            children.swap(pos, pos + 1);
        }
        Ok(())
    }

    /// Removes `id` with its whole subtree, returning the payloads in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: NodeId) -> TreeResult<Vec<T>> {
        let doomed: Vec<NodeId> = self.descendants(id)?.collect();
        self.detach(id)?;
        let values = doomed
            .into_iter()
            .filter_map(|node| self.arena.remove(node.0))
            .map(|node| node.value)
            .collect::<Vec<_>>();
        debug!("removed {} nodes rooted at {}", values.len(), id);
        Ok(values)
    }

    /// Number of ancestors; roots have depth 0.
    pub fn depth(&self, id: NodeId) -> TreeResult<usize> {
        Ok(self.ancestors(id)?.count())
    }

    /// Handles from the root down to `id`, inclusive.
    pub fn path(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let mut path: Vec<NodeId> = self.ancestors(id)?.collect();
        path.reverse();
        path.push(id);
        Ok(path)
    }

    pub fn root_of(&self, id: NodeId) -> TreeResult<NodeId> {
        Ok(self.ancestors(id)?.last().unwrap_or(id))
    }

    /// Position of `id` among its siblings (or among the roots).
    pub fn index_in_parent(&self, id: NodeId) -> TreeResult<usize> {
        let parent = self.node(id)?.parent;
        let siblings = match parent {
            Some(parent_id) => &self.node(parent_id)?.children,
            None => &self.roots,
        };
        siblings
            .iter()
            .position(|&sibling| sibling == id)
            .ok_or(TreeError::NodeNotFound(id))
    }

    pub(crate) fn node(&self, id: NodeId) -> TreeResult<&TreeNode<T>> {
        self.arena.get(id.0).ok_or(TreeError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut TreeNode<T>> {
        self.arena.get_mut(id.0).ok_or(TreeError::NodeNotFound(id))
    }

    fn position(&self, parent: NodeId, child: NodeId) -> TreeResult<usize> {
        self.node(child)?;
        self.node(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(TreeError::NotAChild { parent, child })
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == candidate {
                return true;
            }
            current = self.get(node_id).and_then(|node| node.parent);
        }
        false
    }

    fn siblings_mut(&mut self, parent: Option<NodeId>) -> TreeResult<&mut Vec<NodeId>> {
        match parent {
            Some(parent_id) => Ok(&mut self.node_mut(parent_id)?.children),
            None => Ok(&mut self.roots),
        }
    }

    fn detach(&mut self, id: NodeId) -> TreeResult<()> {
        let parent = self.node(id)?.parent;
        self.siblings_mut(parent)?.retain(|&sibling| sibling != id);
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    fn attach(&mut self, id: NodeId, parent: Option<NodeId>) -> TreeResult<()> {
        self.siblings_mut(parent)?.push(id);
        self.node_mut(id)?.parent = parent;
        Ok(())
    }
}
