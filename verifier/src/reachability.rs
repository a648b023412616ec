// reachability.rs — Exhaustiveness pass: dead code after `show`
//
// `show <View>` hands control to a view and ends the action, so statements
// after it in the same block never run. Each block (action body or `if`
// branch) is scanned independently; dead code is a warning, never an error.

use crate::diag::{Category, Diagnostic};
use crate::model::{AppModel, Statement, StatementKind};

/// Run the Exhaustiveness pass over every action.
pub fn check_reachability(app: &AppModel) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for action in &app.actions {
        check_block(&action.ops, &mut diagnostics);
    }
    diagnostics
}

fn check_block(ops: &[Statement], diagnostics: &mut Vec<Diagnostic>) {
    for (i, stmt) in ops.iter().enumerate() {
        match &stmt.kind {
            StatementKind::If(branch) => {
                check_block(&branch.then, diagnostics);
                check_block(&branch.otherwise, diagnostics);
            }
            StatementKind::Show(show) => {
                if let Some(next) = ops.get(i + 1) {
                    diagnostics.push(
                        Diagnostic::warning(
                            Category::Exhaustiveness,
                            next.loc,
                            format!("Unreachable code after 'show {}'", show.view),
                        )
                        .with_suggestion(format!(
                            "Remove the statements after 'show {}'",
                            show.view
                        )),
                    );
                }
                // Anything further is already dead.
                return;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{Location, Severity};
    use crate::model::{Action, IfStmt, RawStmt, ShowStmt};

    fn show(view: &str, line: u32) -> Statement {
        Statement {
            kind: StatementKind::Show(ShowStmt { view: view.into() }),
            loc: Location::new(line, 3),
        }
    }

    fn raw(line: u32) -> Statement {
        Statement {
            kind: StatementKind::Raw(RawStmt { text: "x".into() }),
            loc: Location::new(line, 3),
        }
    }

    fn app(ops: Vec<Statement>) -> AppModel {
        AppModel {
            actions: vec![Action {
                name: "act".into(),
                params: vec![],
                ops,
                loc: Location::default(),
            }],
            ..AppModel::default()
        }
    }

    #[test]
    fn trailing_show_is_fine() {
        assert!(check_reachability(&app(vec![raw(1), show("Home", 2)])).is_empty());
        assert!(check_reachability(&app(vec![])).is_empty());
    }

    #[test]
    fn one_warning_at_first_dead_statement() {
        let diags = check_reachability(&app(vec![
            show("Dashboard", 1),
            raw(2),
            show("Other", 3),
            raw(4),
        ]));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(diags[0].message, "Unreachable code after 'show Dashboard'");
        assert_eq!(diags[0].location.line, 2);
    }

    #[test]
    fn branches_are_scanned_separately() {
        let branch = Statement {
            kind: StatementKind::If(IfStmt {
                condition: "ok".into(),
                then: vec![show("A", 2), raw(3)],
                otherwise: vec![show("B", 5)],
            }),
            loc: Location::new(1, 1),
        };
        let diags = check_reachability(&app(vec![branch, raw(6)]));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].location.line, 3);
    }
}
