// verify.rs — Verification orchestrator
//
// Runs the applicable passes over an AppModel (and optional Backend),
// partitions their diagnostics by severity and condenses them into a single
// verdict with a confidence score.
//
// Preconditions: none; any AppModel is accepted.
// Postconditions: `passed == (errors.is_empty())`; diagnostics keep pass order
//   (type-safety, null-safety, endpoint, exhaustiveness) and, within a pass,
//   traversal order.
// Failure modes: none. `verify` always returns a result.
// Side effects: tracing events only.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::diag::{Diagnostic, Severity};
use crate::endpoint::check_endpoints;
use crate::model::{AppModel, Backend};
use crate::null_safety::check_null_safety;
use crate::pass::{applicable_passes, descriptor, PassId};
use crate::reachability::check_reachability;
use crate::type_safety::check_type_safety;

/// Confidence never drops below this while the model still passes.
pub const CONFIDENCE_FLOOR: u32 = 85;
/// Confidence lost per warning.
pub const WARNING_PENALTY: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub passed: bool,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub info: Vec<Diagnostic>,
    pub summary: Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_checks: u32,
    pub error_count: u32,
    pub warning_count: u32,
    /// 0..=100.
    pub confidence_score: u32,
}

impl VerificationResult {
    /// All diagnostics: errors, then warnings, then info.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.info.iter())
    }
}

/// `max(85, 100 - 3 * warnings)` while passing, 0 once any error exists.
pub fn confidence_score(error_count: u32, warning_count: u32) -> u32 {
    if error_count > 0 {
        return 0;
    }
    100u32
        .saturating_sub(warning_count.saturating_mul(WARNING_PENALTY))
        .max(CONFIDENCE_FLOOR)
}

/// Stateless verification service. Construct one per caller; every run is a
/// pure function of its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verifier;

impl Verifier {
    pub fn new() -> Self {
        Verifier
    }

    /// Run a single pass.
    pub fn run_pass(&self, id: PassId, app: &AppModel, backend: Option<&Backend>) -> Vec<Diagnostic> {
        match id {
            PassId::TypeSafety => check_type_safety(app),
            PassId::NullSafety => check_null_safety(app),
            PassId::Endpoint => check_endpoints(app, backend),
            PassId::Exhaustiveness => check_reachability(app),
        }
    }

    /// Run every applicable pass and aggregate the verdict.
    ///
    /// The endpoint pass runs whenever a backend is supplied, even an empty
    /// one, so callers can ask for its "no backend" warning explicitly.
    pub fn verify(&self, app: &AppModel, backend: Option<&Backend>) -> VerificationResult {
        let passes = applicable_passes(backend.is_some());
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut info_diags = Vec::new();

        for &id in &passes {
            let start = Instant::now();
            let diags = self.run_pass(id, app, backend);
            let pass = descriptor(id);
            debug!(
                pass = pass.name,
                inspects = pass.inspects,
                diagnostics = diags.len(),
                elapsed_us = start.elapsed().as_micros() as u64,
                "pass complete"
            );
            for diag in diags {
                match diag.severity {
                    Severity::Error => errors.push(diag),
                    Severity::Warning => warnings.push(diag),
                    Severity::Info => info_diags.push(diag),
                }
            }
        }

        let error_count = count(&errors);
        let warning_count = count(&warnings);
        let passed = error_count == 0;
        let summary = Summary {
            total_checks: count(&passes),
            error_count,
            warning_count,
            confidence_score: confidence_score(error_count, warning_count),
        };
        info!(
            passed,
            errors = error_count,
            warnings = warning_count,
            confidence = summary.confidence_score,
            "verification finished"
        );

        VerificationResult {
            passed,
            errors,
            warnings,
            info: info_diags,
            summary,
        }
    }
}

fn count<T>(items: &[T]) -> u32 {
    u32::try_from(items.len()).unwrap_or(u32::MAX)
}

/// Verify with a fresh [`Verifier`].
pub fn verify(app: &AppModel, backend: Option<&Backend>) -> VerificationResult {
    Verifier::new().verify(app, backend)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{Category, Location};
    use crate::model::{Action, ShowStmt, Statement, StatementKind};

    #[test]
    fn confidence_formula() {
        assert_eq!(confidence_score(0, 0), 100);
        assert_eq!(confidence_score(0, 1), 97);
        assert_eq!(confidence_score(0, 5), 85);
        assert_eq!(confidence_score(0, 6), 85);
        assert_eq!(confidence_score(0, u32::MAX), 85);
        assert_eq!(confidence_score(1, 0), 0);
    }

    #[test]
    fn empty_model_passes_with_full_confidence() {
        let result = verify(&AppModel::default(), None);
        assert!(result.passed);
        assert_eq!(result.summary.total_checks, 3);
        assert_eq!(result.summary.confidence_score, 100);
        assert!(result.diagnostics().next().is_none());
    }

    #[test]
    fn empty_backend_still_runs_endpoint_pass() {
        let result = verify(&AppModel::default(), Some(&Backend::default()));
        assert!(result.passed);
        assert_eq!(result.summary.total_checks, 4);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].category, Category::Endpoint);
        assert_eq!(result.summary.confidence_score, 97);
    }

    #[test]
    fn diagnostics_are_partitioned_by_severity() {
        let show = |line| Statement {
            kind: StatementKind::Show(ShowStmt {
                view: "Home".into(),
            }),
            loc: Location::new(line, 1),
        };
        let app = AppModel {
            actions: vec![Action {
                name: "a".into(),
                params: vec![],
                ops: vec![show(1), show(2)],
                loc: Location::default(),
            }],
            ..AppModel::default()
        };
        let result = Verifier::new().verify(&app, None);
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.info.is_empty());
        assert_eq!(result.summary.warning_count, 1);
    }

    #[test]
    fn summary_serializes_camel_case() {
        let result = verify(&AppModel::default(), None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["summary"]["confidenceScore"], 100);
        assert_eq!(json["summary"]["totalChecks"], 3);
        assert_eq!(json["passed"], true);
    }
}
