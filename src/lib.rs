//! # spark-sheets
//!
//! Stack-driven sheet presentation for reactive Rust UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! Presentation state is a single ordered stack of type-erased [`Screen`]
//! values. Pushing shows one more nested overlay; truncating collapses the
//! overlays above the cut. Each screen is turned into a view by the
//! [`DestinationRegistry`], which is keyed by type and falls back along a
//! host-declared supertype table.
//!
//! ```text
//! present(item) → PresentationStack (Signal) → chain effect → arena of ChainNodes
//!                                                   ↓
//!                  render() → Layer per index → DestinationRegistry::resolve
//! ```
//!
//! The host runtime draws the layers and reports their lifecycle back
//! (`did_appear`, `did_disappear`, `dismiss`, `dismiss_root`).
//!
//! ## Modules
//!
//! - [`screen`] - Type-erased screen values and type keys
//! - [`destination`] - Registry, type hierarchy, local destinations
//! - [`stack`] - The observable presentation stack
//! - [`chain`] - Nested overlay arena and dismissal rules
//! - [`host`] - Host wiring and the `present` entry point

pub mod chain;
pub mod config;
pub mod destination;
pub mod error;
pub mod host;
pub mod screen;
pub mod stack;

pub use chain::{ChainNode, DismissOutcome, Layer, NodeFlags, PresentationChain};
pub use config::{PresentationConfig, UnresolvedPolicy};
pub use destination::{
    DestinationKey, DestinationRegistry, DestinationView, LocalDestinationId, TypeHierarchy,
    UnresolvedDestination,
};
pub use error::{PresentationError, Result};
pub use host::{active_stack, present, HostGuard, PresentationHost, PresentedTree};
pub use screen::{DestinationPath, Screen, ScreenValue, TypeKey};
pub use stack::{PresentationStack, StackBinding};
