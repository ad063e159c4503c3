//! License data structures and SPDX expression handling.
//!
//! Uses the `spdx` crate for expression validation. Expressions that do not
//! parse are kept verbatim; only the `is_valid_spdx` flag records the outcome.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// License expression following SPDX license expression syntax
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LicenseExpression {
    /// The raw license expression string
    pub expression: String,
    /// Whether this is a valid SPDX expression
    pub is_valid_spdx: bool,
}

impl LicenseExpression {
    /// Create a new license expression
    pub fn new(expression: impl Into<String>) -> Self {
        let expression = expression.into();
        let is_valid_spdx = Self::validate_spdx(&expression);
        Self {
            expression,
            is_valid_spdx,
        }
    }

    /// Validate an SPDX expression using the spdx crate.
    ///
    /// Lax mode accepts common non-standard spellings ("Apache2", "/" for OR).
    fn validate_spdx(expr: &str) -> bool {
        if expr.is_empty() || expr.contains("NOASSERTION") || expr.contains("NONE") {
            return false;
        }
        spdx::Expression::parse_mode(expr, spdx::ParseMode::LAX).is_ok()
    }

    /// True if the expression is exactly one SPDX license identifier.
    #[must_use]
    pub fn is_single_license_id(&self) -> bool {
        spdx::license_id(self.expression.trim()).is_some()
    }

    /// True for the SPDX placeholders `NOASSERTION` and `NONE`.
    #[must_use]
    pub fn is_placeholder(value: &str) -> bool {
        matches!(value.trim(), "NOASSERTION" | "NONE" | "")
    }

    /// Combine several expressions into one conjunctive expression.
    ///
    /// Compound operands are parenthesised.
    #[must_use]
    pub fn conjunction(parts: &[LicenseExpression]) -> Option<Self> {
        match parts {
            [] => None,
            [single] => Some(single.clone()),
            many => {
                let joined = many
                    .iter()
                    .map(|p| {
                        if p.expression.contains(' ') {
                            format!("({})", p.expression)
                        } else {
                            p.expression.clone()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" AND ");
                Some(Self::new(joined))
            }
        }
    }
}

impl fmt::Display for LicenseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl Serialize for LicenseExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.expression)
    }
}

impl<'de> Deserialize<'de> for LicenseExpression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

/// Declared and concluded license information of a component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseInfo {
    /// Licenses declared by the supplier
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declared: Vec<LicenseExpression>,
    /// License concluded by analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concluded: Option<LicenseExpression>,
}

impl LicenseInfo {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty() && self.concluded.is_none()
    }

    pub fn add_declared(&mut self, license: LicenseExpression) {
        if !self.declared.contains(&license) {
            self.declared.push(license);
        }
    }
}
