//! Ordered multi-way trees for hierarchical tab management.
//!
//! Nodes live in a [`TreeArena`] and are addressed by [`NodeId`] handles.
//! Parents are non-owning back-references, children an ordered list, so a
//! host can reparent, reorder and render trees without reference cycles.

pub mod config;
pub mod domain;
pub mod errors;
pub mod util;

pub use crate::config::Settings;
pub use crate::domain::{
    NodeId, Order, Render, RenderStyle, TreeArena, TreeError, TreeNode, TreeResult,
};
