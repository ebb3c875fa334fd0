//! License assertion state.
//!
//! SPDX uses the sentinels `NONE` and `NOASSERTION` in license fields, and
//! either format may simply leave the field out. These cases are folded into
//! [`LicenseAssertionState`] once, at normalization time, so scoring never
//! compares raw strings.

use serde::{Deserialize, Serialize};

/// Sentinel for "no attempt was made to determine the license"
pub const NOASSERTION: &str = "NOASSERTION";

/// Sentinel for "the package carries no license"
pub const NONE: &str = "NONE";

/// Whether a license field actually asserts a license
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "expression", rename_all = "snake_case")]
pub enum LicenseAssertionState {
    /// Field missing, empty, or `NONE`
    #[default]
    Absent,
    /// Field is `NOASSERTION`
    NotAsserted,
    /// A license expression
    Present(String),
}

impl LicenseAssertionState {
    /// Classify a raw license field value
    #[must_use]
    pub fn from_field(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("" | NONE) => Self::Absent,
            Some(NOASSERTION) => Self::NotAsserted,
            Some(expression) => Self::Present(expression.to_string()),
        }
    }

    /// Whether a license expression is asserted
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// The asserted expression, if any
    #[must_use]
    pub fn expression(&self) -> Option<&str> {
        match self {
            Self::Present(expression) => Some(expression),
            _ => None,
        }
    }

    /// Combine several license choices into one state.
    ///
    /// The first present expression wins; otherwise `NotAsserted` beats
    /// `Absent`.
    #[must_use]
    pub fn first_present(states: impl IntoIterator<Item = Self>) -> Self {
        let mut best = Self::Absent;
        for state in states {
            match state {
                Self::Present(_) => return state,
                Self::NotAsserted => best = Self::NotAsserted,
                Self::Absent => {}
            }
        }
        best
    }
}
