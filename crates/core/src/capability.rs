//! Availability outcome for environment-dependent features.
//!
//! Storage binds, persisted-record decodes, asset loads, and the AR runtime
//! probe all report one of these instead of failing. Callers branch on the
//! degraded path the same way tests do.

use serde::{Deserialize, Serialize};

/// How available an environment-dependent feature turned out to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Capability {
    /// The feature works as intended.
    Available,
    /// The feature works, but something was repaired or substituted.
    Degraded(String),
    /// The feature is absent; defaults are in effect.
    Unavailable(String),
}

impl Capability {
    #[must_use]
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self::Degraded(reason.into())
    }

    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// The reason attached to a degraded or unavailable outcome.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Available => None,
            Self::Degraded(reason) | Self::Unavailable(reason) => Some(reason),
        }
    }
}

impl Default for Capability {
    fn default() -> Self {
        Self::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_is_only_present_when_degraded_or_unavailable() {
        assert_eq!(Capability::Available.reason(), None);
        assert_eq!(
            Capability::degraded("repaired record").reason(),
            Some("repaired record")
        );
        assert_eq!(
            Capability::unavailable("no runtime").reason(),
            Some("no runtime")
        );
    }

    #[test]
    fn predicates_match_variants() {
        assert!(Capability::Available.is_available());
        assert!(Capability::degraded("x").is_degraded());
        assert!(Capability::unavailable("x").is_unavailable());
        assert!(!Capability::unavailable("x").is_available());
    }
}
