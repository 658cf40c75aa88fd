//! Filesystem side of serving: resolving URL paths under the root, listing
//! directories, and counting serves.

pub mod counter;
pub mod listing;
pub mod resolver;

pub use counter::RequestCounter;
pub use listing::render_listing;
pub use resolver::{ResolvedTarget, ServedRoot, TargetKind};
