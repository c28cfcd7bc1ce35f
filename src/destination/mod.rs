//! Destinations - resolving screen values into views.
//!
//! - [`DestinationRegistry`]: type-keyed and local-keyed resolvers
//! - [`TypeHierarchy`]: host-declared supertype table used for fallback
//! - [`LocalDestinationId`]: token key for one-off builders
//! - [`DestinationView`]: placeholder for values nothing resolves

mod hierarchy;
mod local;
mod registry;
mod view;

pub use hierarchy::TypeHierarchy;
pub use local::LocalDestinationId;
pub use registry::{DestinationKey, DestinationRegistry};
pub use view::{DestinationView, UnresolvedDestination};
