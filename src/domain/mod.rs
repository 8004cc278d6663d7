//! Domain layer: the tab tree and its operations
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod arena;
pub mod error;
pub mod render;
pub mod traverse;

pub use arena::{NodeId, TreeArena, TreeNode};
pub use error::{TreeError, TreeResult};
pub use render::{Render, RenderStyle};
pub use traverse::{Ancestors, Order, Traverse};
