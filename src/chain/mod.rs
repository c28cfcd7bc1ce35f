//! Presentation chain - nested overlays driven by the stack.
//!
//! - [`PresentationChain`]: arena of per-layer nodes, dismiss handling, rendering
//! - [`ChainNode`]: one layer's snapshot and [`NodeFlags`]

mod node;
mod renderer;

pub use node::{ChainNode, NodeFlags};
pub use renderer::{DismissOutcome, Layer, PresentationChain};
