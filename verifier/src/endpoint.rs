// endpoint.rs — Endpoint-Validation pass
//
// Cross-checks every `call` and `load` against the backend's declared
// endpoints by exact (method, path) match, suggesting the closest declared
// endpoints when nothing matches. `load` is read-only sugar over GET, so a
// `load` bound to another method is a warning.
//
// Preconditions: `app` is a parsed AppModel; `backend` may be absent.
// Postconditions: without endpoints, exactly one warning and nothing else.
// Failure modes: none; findings are diagnostics.
// Side effects: none.

use crate::diag::{Category, Diagnostic, Location};
use crate::model::{AppModel, Backend, Endpoint, Statement, StatementKind};

/// Run the Endpoint-Validation pass.
pub fn check_endpoints(app: &AppModel, backend: Option<&Backend>) -> Vec<Diagnostic> {
    let backend = match backend {
        Some(b) if !b.endpoints.is_empty() => b,
        _ => {
            return vec![Diagnostic::warning(
                Category::Endpoint,
                Location::default(),
                "No backend defined. API calls cannot be validated.",
            )]
        }
    };

    let mut diagnostics = Vec::new();
    for action in &app.actions {
        check_block(&action.ops, backend, &mut diagnostics);
    }
    diagnostics
}

fn check_block(ops: &[Statement], backend: &Backend, diagnostics: &mut Vec<Diagnostic>) {
    for stmt in ops {
        match &stmt.kind {
            StatementKind::Call(call) => {
                if backend.find(&call.method, &call.path).is_none() {
                    diagnostics.push(not_found(backend, &call.method, &call.path, stmt.loc));
                }
            }
            StatementKind::Load(load) => match backend.find(&load.method, &load.path) {
                None => diagnostics.push(not_found(backend, &load.method, &load.path, stmt.loc)),
                Some(endpoint) if endpoint.method != "GET" => diagnostics.push(
                    Diagnostic::warning(
                        Category::Endpoint,
                        stmt.loc,
                        format!("'load' typically uses GET endpoints. Found: {}", endpoint),
                    )
                    .with_suggestion(format!("Use 'call' for {} requests", endpoint.method)),
                ),
                Some(_) => {}
            },
            StatementKind::If(branch) => {
                check_block(&branch.then, backend, diagnostics);
                check_block(&branch.otherwise, backend, diagnostics);
            }
            StatementKind::Add(_)
            | StatementKind::Show(_)
            | StatementKind::Guard(_)
            | StatementKind::Raw(_) => {}
        }
    }
}

fn not_found(backend: &Backend, method: &str, path: &str, loc: Location) -> Diagnostic {
    Diagnostic::error(
        Category::Endpoint,
        loc,
        format!("Endpoint not found: {} {}", method, path),
    )
    .with_suggestion(suggest(backend, method, path))
}

/// Pick the most specific hint: same method, then same path, then paths
/// sharing a segment, then everything declared.
fn suggest(backend: &Backend, method: &str, path: &str) -> String {
    let same_method: Vec<&Endpoint> = backend
        .endpoints
        .iter()
        .filter(|e| e.method == method)
        .collect();
    if !same_method.is_empty() {
        return format!("Available {} endpoints: {}", method, join(&same_method));
    }

    let same_path: Vec<&Endpoint> = backend.endpoints.iter().filter(|e| e.path == path).collect();
    if !same_path.is_empty() {
        return format!("Endpoint exists with a different method: {}", join(&same_path));
    }

    let similar: Vec<&Endpoint> = backend
        .endpoints
        .iter()
        .filter(|e| segments_overlap(&e.path, path))
        .collect();
    if !similar.is_empty() {
        return format!("Did you mean one of: {}", join(&similar));
    }

    let all: Vec<&Endpoint> = backend.endpoints.iter().collect();
    format!("Available endpoints: {}", join(&all))
}

fn segments_overlap(a: &str, b: &str) -> bool {
    let segs_b: Vec<&str> = b.split('/').filter(|s| !s.is_empty()).collect();
    a.split('/')
        .filter(|s| !s.is_empty())
        .any(|sa| segs_b.iter().any(|sb| sa.contains(sb) || sb.contains(sa)))
}

fn join(endpoints: &[&Endpoint]) -> String {
    endpoints
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Tests ───────────────────────────────────────────────────────────────────
