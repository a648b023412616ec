// type_safety.rs — Type-Safety pass
//
// Checks every `add <Data> with field=value` against the entity declaration:
// the entity and each supplied field must exist, each value's inferred type
// must fit the declared type, and omitted fields are reported as warnings.
//
// Preconditions: `app` is a parsed AppModel.
// Postconditions: diagnostics follow action declaration order, then statement
//   order (then-branch before else-branch).
// Failure modes: none; findings are diagnostics.
// Side effects: none.

use crate::diag::{Category, Diagnostic, Location};
use crate::infer::{build_type_environment, infer_field_value_type, TypeEnvironment};
use crate::model::{AddStmt, AppModel, Statement, StatementKind};
use crate::types::{is_compatible, make_nullable, Type};

/// Run the Type-Safety pass over every action.
pub fn check_type_safety(app: &AppModel) -> Vec<Diagnostic> {
    let mut ctx = TypeSafetyCtx {
        app,
        diagnostics: Vec::new(),
    };
    for action in &app.actions {
        let mut env = build_type_environment(&action.params);
        ctx.check_block(&action.ops, &mut env);
    }
    ctx.diagnostics
}

struct TypeSafetyCtx<'a> {
    app: &'a AppModel,
    diagnostics: Vec<Diagnostic>,
}

impl TypeSafetyCtx<'_> {
    fn check_block(&mut self, ops: &[Statement], env: &mut TypeEnvironment) {
        for stmt in ops {
            match &stmt.kind {
                StatementKind::Add(add) => self.check_add(add, stmt.loc, env),
                StatementKind::Load(load) => {
                    if let Some(target) = &load.target {
                        let ty = load.ty.clone().unwrap_or(Type::Unknown);
                        env.bind(target.clone(), make_nullable(&ty));
                    }
                }
                StatementKind::If(branch) => {
                    // Bindings made inside a branch stay visible afterwards;
                    // null-safety tracks whether they are actually set.
                    self.check_block(&branch.then, env);
                    self.check_block(&branch.otherwise, env);
                }
                StatementKind::Call(_)
                | StatementKind::Show(_)
                | StatementKind::Guard(_)
                | StatementKind::Raw(_) => {}
            }
        }
    }

    fn check_add(&mut self, add: &AddStmt, loc: Location, env: &TypeEnvironment) {
        let Some(data) = self.app.data(&add.data) else {
            self.diagnostics.push(Diagnostic::error(
                Category::TypeSafety,
                loc,
                format!("Model '{}' not found", add.data),
            ));
            return;
        };

        for assign in &add.fields {
            let Some(field) = data.field(&assign.name) else {
                self.diagnostics.push(Diagnostic::error(
                    Category::TypeSafety,
                    loc,
                    format!("Field '{}' not found in model '{}'", assign.name, data.name),
                ));
                continue;
            };

            let value = assign.value.trim();
            let inferred = infer_field_value_type(value, env);
            if !is_compatible(&field.ty, &inferred) {
                self.diagnostics.push(
                    Diagnostic::error(
                        Category::TypeSafety,
                        loc,
                        format!(
                            "Type mismatch in field '{}': expected {}, got {}",
                            assign.name, field.ty, inferred
                        ),
                    )
                    .with_suggestion(format!(
                        "Change '{}' to a value of type {}",
                        value, field.ty
                    )),
                );
            }
        }

        for field in &data.fields {
            if add.fields.iter().any(|a| a.name == field.name) {
                continue;
            }
            let suggestion = match field.default_value() {
                Some(default) => format!(
                    "'{}' falls back to its default {}; pass it explicitly to make that visible",
                    field.name, default
                ),
                None => format!("Add {}=<{}> to the 'add {}' statement", field.name, field.ty, data.name),
            };
            self.diagnostics.push(
                Diagnostic::warning(
                    Category::TypeSafety,
                    loc,
                    format!("Missing field '{}' in add {}", field.name, data.name),
                )
                .with_suggestion(suggestion),
            );
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
