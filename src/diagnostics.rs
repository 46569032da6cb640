// ABOUTME: Diagnostics accumulator for non-fatal warnings during a rollout.
// ABOUTME: Collects warnings that shouldn't fail a run but should be shown to users.

use serde::Serialize;

/// Collects non-fatal warnings during rollout operations.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during a rollout.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The deployment group could not be pointed back at its scaling group.
    pub fn compensation_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::CompensationFailed,
            message: message.into(),
        }
    }

    /// More than one instance was initializing when the new one was picked.
    pub fn ambiguous_discovery(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::AmbiguousDiscovery,
            message: message.into(),
        }
    }

    /// The requested environment had no profile.
    pub fn profile_defaulted(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ProfileDefaulted,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a rollout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// Reattaching the scaling group after a failure did not succeed.
    CompensationFailed,
    /// Several instances were initializing at discovery time.
    AmbiguousDiscovery,
    /// An unknown environment key fell back to a default profile.
    ProfileDefaulted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::compensation_failed("reattach refused"));
        diag.warn(Warning::profile_defaulted("no profile named feature-x"));

        assert!(diag.has_warnings());
        assert_eq!(diag.warnings().len(), 2);
    }

    #[test]
    fn warning_constructors_set_correct_kind() {
        assert_eq!(
            Warning::compensation_failed("x").kind,
            WarningKind::CompensationFailed
        );
        assert_eq!(
            Warning::ambiguous_discovery("x").kind,
            WarningKind::AmbiguousDiscovery
        );
        assert_eq!(
            Warning::profile_defaulted("x").kind,
            WarningKind::ProfileDefaulted
        );
    }
}
