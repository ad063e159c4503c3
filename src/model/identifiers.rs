//! Component identifiers.
//!
//! A [`ComponentId`] is the graph-local key of a component. It is kept
//! verbatim across every format that can carry it; SPDX, whose element
//! identifiers are restricted to `SPDXRef-[A-Za-z0-9.-]+`, gets a
//! sanitised alias through [`spdx_element_id`].

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Identifier of a component, unique within one canonical graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Synthetic identifier for components that arrive without one.
    ///
    /// Format: `group/name@version`, `name@version` or `name`.
    #[must_use]
    pub fn synthetic(group: Option<&str>, name: &str, version: Option<&str>) -> Self {
        let base = match group {
            Some(g) if !g.is_empty() => format!("{g}/{name}"),
            _ => name.to_string(),
        };
        match version {
            Some(v) if !v.is_empty() => Self(format!("{base}@{v}")),
            _ => Self(base),
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for ComponentId {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<&ComponentId> for ComponentId {
    fn from(value: &ComponentId) -> Self {
        value.clone()
    }
}

// ============================================================================
// SPDX element identifiers
// ============================================================================

static SPDX_ID: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^SPDXRef-[A-Za-z0-9.\-]+$").expect("static regex")
});

/// Prefix every SPDX element identifier carries
pub const SPDX_REF_PREFIX: &str = "SPDXRef-";

/// Returns true if `value` is a syntactically valid SPDX element identifier.
#[must_use]
pub fn is_spdx_element_id(value: &str) -> bool {
    SPDX_ID.is_match(value)
}

/// Replace every character SPDX identifiers cannot carry with `-`.
#[must_use]
pub fn sanitize_id_fragment(value: &str) -> String {
    let sanitized: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = sanitized.trim_matches('-');
    if trimmed.is_empty() {
        "component".to_string()
    } else {
        trimmed.to_string()
    }
}

/// SPDX element identifier for a component id.
///
/// Valid SPDX identifiers are used as-is; anything else is sanitised and
/// prefixed. The result is not guaranteed unique, callers dedupe.
#[must_use]
pub fn spdx_element_id(id: &ComponentId) -> String {
    if is_spdx_element_id(id.as_str()) {
        id.as_str().to_string()
    } else {
        format!("{SPDX_REF_PREFIX}{}", sanitize_id_fragment(id.as_str()))
    }
}

// ============================================================================
// Ecosystem
// ============================================================================

/// Package ecosystem, derived from the purl type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ecosystem {
    Npm,
    PyPi,
    Cargo,
    Maven,
    Golang,
    Nuget,
    RubyGems,
    Composer,
    Conda,
    Deb,
    Rpm,
    Apk,
    Generic,
    Unknown(String),
}

impl Ecosystem {
    /// Parse ecosystem from PURL type
    #[must_use]
    pub fn from_purl_type(purl_type: &str) -> Self {
        match purl_type.to_lowercase().as_str() {
            "npm" => Self::Npm,
            "pypi" => Self::PyPi,
            "cargo" => Self::Cargo,
            "maven" => Self::Maven,
            "golang" | "go" => Self::Golang,
            "nuget" => Self::Nuget,
            "gem" => Self::RubyGems,
            "composer" => Self::Composer,
            "conda" => Self::Conda,
            "deb" => Self::Deb,
            "rpm" => Self::Rpm,
            "apk" => Self::Apk,
            "generic" => Self::Generic,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Ecosystem of a package URL, `None` if the purl does not parse.
    #[must_use]
    pub fn from_purl(purl: &str) -> Option<Self> {
        packageurl::PackageUrl::from_str(purl)
            .ok()
            .map(|p| Self::from_purl_type(p.ty()))
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Npm => write!(f, "npm"),
            Self::PyPi => write!(f, "pypi"),
            Self::Cargo => write!(f, "cargo"),
            Self::Maven => write!(f, "maven"),
            Self::Golang => write!(f, "golang"),
            Self::Nuget => write!(f, "nuget"),
            Self::RubyGems => write!(f, "gem"),
            Self::Composer => write!(f, "composer"),
            Self::Conda => write!(f, "conda"),
            Self::Deb => write!(f, "deb"),
            Self::Rpm => write!(f, "rpm"),
            Self::Apk => write!(f, "apk"),
            Self::Generic => write!(f, "generic"),
            Self::Unknown(s) => write!(f, "{s}"),
        }
    }
}
