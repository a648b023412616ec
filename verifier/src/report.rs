// report.rs — Rendering verification results for people and tools
//
// Text output lists every diagnostic followed by a one-line verdict. JSON
// output wraps the VerificationResult together with a provenance record so
// a report can be tied back to the exact inputs it was computed from.
//
// Preconditions: none.
// Postconditions: rendering is deterministic for identical inputs.
// Failure modes: JSON serialization of the report types cannot fail.
// Side effects: none.

use std::fmt::Write as _;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::model::{AppModel, Backend};
use crate::verify::VerificationResult;

/// Identifies the inputs and verifier build behind a report.
///
/// Hashes are SHA-256 over the compact JSON serialization of the inputs, so
/// they are independent of how the parser formatted its output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub model_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_hash: Option<String>,
    pub verifier_version: &'static str,
}

/// Compute provenance for a model and optional backend.
pub fn compute_provenance(app: &AppModel, backend: Option<&Backend>) -> Provenance {
    Provenance {
        model_hash: fingerprint(app),
        backend_hash: backend.map(fingerprint),
        verifier_version: env!("CARGO_PKG_VERSION"),
    }
}

fn fingerprint<T: Serialize>(value: &T) -> String {
    // Plain data with string keys: serialization does not fail.
    let canonical = serde_json::to_vec(value).unwrap_or_default();
    let digest = Sha256::digest(&canonical);
    let mut hex = String::with_capacity(64);
    for b in digest {
        let _ = write!(hex, "{:02x}", b);
    }
    hex
}

/// Human-readable report: errors, warnings, info, then the verdict line.
pub fn render_text(result: &VerificationResult) -> String {
    let mut out = String::new();
    for diag in result.diagnostics() {
        let _ = writeln!(out, "{diag}");
    }
    let verdict = if result.passed { "passed" } else { "failed" };
    let _ = writeln!(
        out,
        "verification {}: {} error(s), {} warning(s), {} info, confidence {}%",
        verdict,
        result.summary.error_count,
        result.summary.warning_count,
        result.info.len(),
        result.summary.confidence_score
    );
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    provenance: &'a Provenance,
    result: &'a VerificationResult,
}

/// Machine-readable report: `{ "provenance": ..., "result": ... }`.
pub fn render_json(result: &VerificationResult, provenance: &Provenance) -> String {
    let report = JsonReport { provenance, result };
    serde_json::to_string_pretty(&report).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::verify;

    #[test]
    fn fingerprint_is_stable_and_hex() {
        let app = AppModel::default();
        let a = compute_provenance(&app, None);
        let b = compute_provenance(&app, None);
        assert_eq!(a, b);
        assert_eq!(a.model_hash.len(), 64);
        assert!(a.model_hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(a.backend_hash.is_none());
    }

    #[test]
    fn fingerprint_changes_with_model() {
        let mut app = AppModel::default();
        let before = compute_provenance(&app, None).model_hash;
        app.views.push(crate::model::View {
            name: "Home".into(),
            loc: Default::default(),
        });
        assert_ne!(compute_provenance(&app, None).model_hash, before);
    }

    #[test]
    fn text_report_for_clean_model() {
        let result = verify(&AppModel::default(), None);
        assert_eq!(
            render_text(&result),
            "verification passed: 0 error(s), 0 warning(s), 0 info, confidence 100%\n"
        );
    }

    #[test]
    fn json_report_has_both_sections() {
        let app = AppModel::default();
        let backend = Backend::default();
        let result = verify(&app, Some(&backend));
        let provenance = compute_provenance(&app, Some(&backend));
        let json: serde_json::Value = serde_json::from_str(&render_json(&result, &provenance)).unwrap();
        assert_eq!(json["result"]["summary"]["totalChecks"], 4);
        assert_eq!(json["result"]["warnings"][0]["category"], "endpoint");
        assert!(json["provenance"]["backend_hash"].is_string());
    }
}
