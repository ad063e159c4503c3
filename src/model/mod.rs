//! Canonical (middleware) representation of an SBOM.
//!
//! Every format adapter decodes into [`CanonicalSbom`] and encodes from it;
//! merge and export operate on it exclusively.
//!
//! # Index Support
//!
//! Traversals build a [`GraphIndex`] once and walk integer handles:
//!
//! ```ignore
//! let sbom = gateway.decode(&bytes, None)?;
//! let index = sbom.build_index();
//! let start = index.position("pkg-a").unwrap();
//! let deps = index.successors(start);
//! ```

mod identifiers;
mod index;
mod license;
mod metadata;
mod sbom;

pub use identifiers::*;
pub use index::*;
pub use license::*;
pub use metadata::*;
pub use sbom::*;
