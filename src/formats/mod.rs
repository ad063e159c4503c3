//! SBOM format adapters.
//!
//! One [`FormatAdapter`] per external schema translates between its JSON
//! documents and the canonical model:
//!
//! - [`MiddlewareAdapter`]: the canonical schema itself, lossless
//! - [`SpdxAdapter`]: SPDX 2.2/2.3 in, SPDX 2.3 out
//! - [`CycloneDxAdapter`]: CycloneDX 1.4-1.6 in, 1.6 out
//! - [`OssbomAdapter`]: OSSBOM 1.0
//!
//! ## Format Detection
//!
//! Each adapter reports a confidence score (0.0-1.0) for handling content;
//! [`FormatRegistry::detect`] selects the highest.
//!
//! ## Loss accounting
//!
//! Encoders consult the static [`FieldSupport`] table of their format. A
//! construct the table rejects goes through a [`LossRecorder`], which either
//! records a [`LossWarning`] or fails with `UnsupportedMapping` depending on
//! the [`LossPolicy`].

mod cyclonedx;
pub(crate) mod json;
mod middleware;
mod ossbom;
mod registry;
mod spdx;
mod support;
mod traits;

pub use cyclonedx::CycloneDxAdapter;
pub use middleware::MiddlewareAdapter;
pub use ossbom::OssbomAdapter;
pub use registry::{DetectionResult, FormatRegistry, MIN_CONFIDENCE_THRESHOLD};
pub use spdx::SpdxAdapter;
pub use support::{
    Cardinality, FieldSupport, Passthrough, CYCLONEDX_SUPPORT, MIDDLEWARE_SUPPORT,
    OSSBOM_SUPPORT, SPDX_EXTRA_HASHES, SPDX_EXTRA_RELATIONSHIPS, SPDX_FILE_SUPPORT, SPDX_SUPPORT,
};
pub use traits::{
    Encoded, EncodeOptions, FormatAdapter, FormatConfidence, FormatDetection, LossPolicy,
    LossRecorder, LossWarning,
};
