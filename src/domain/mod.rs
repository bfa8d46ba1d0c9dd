//! Domain layer: classification entities and hierarchy reconstruction
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;
pub mod forest;
pub mod section;

pub use builder::{BuildState, HierarchyBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult, StructuralError};
pub use forest::{FlatNode, Forest, PreOrderIter};
pub use section::{title_case, FnSectionParser, RegexSectionParser, SectionMarker, SectionMarkerParser};
