// null_safety.rs — Null-Safety pass
//
// Walks each action with a FlowEnvironment, narrowing variables through
// `if` conditions and `ensure` guards, and reports every use of a variable
// that may still be null where a non-null value is required: `add` fields
// with a non-nullable declared type, `call` fields, and path parameters.
//
// Variables bound by `load` start out nullable: they hold external data.
//
// Preconditions: `app` is a parsed AppModel.
// Postconditions: diagnostics follow action order, then statement order.
// Failure modes: none; unclassified statements produce info diagnostics.
// Side effects: none.

use crate::diag::{Category, Diagnostic, Location};
use crate::flow::{
    clone_environment, condition_mentions, create_flow_environment, get_variable_type,
    mark_as_checked, merge_environments, refine_types, FlowEnvironment,
};
use crate::infer::get_model_field_type;
use crate::model::{path_params, AppModel, FieldAssign, Statement, StatementKind};
use crate::types::{is_nullable, make_nullable, Type};

/// Run the Null-Safety pass over every action.
pub fn check_null_safety(app: &AppModel) -> Vec<Diagnostic> {
    let mut ctx = NullSafetyCtx {
        app,
        diagnostics: Vec::new(),
    };
    for action in &app.actions {
        let mut env = create_flow_environment();
        for param in &action.params {
            env.declare(param.name.clone(), param.ty.clone());
        }
        ctx.check_block(&action.ops, &mut env);
    }
    ctx.diagnostics
}

struct NullSafetyCtx<'a> {
    app: &'a AppModel,
    diagnostics: Vec<Diagnostic>,
}

impl NullSafetyCtx<'_> {
    fn check_block(&mut self, ops: &[Statement], env: &mut FlowEnvironment) {
        for stmt in ops {
            self.check_statement(stmt, env);
        }
    }

    fn check_statement(&mut self, stmt: &Statement, env: &mut FlowEnvironment) {
        match &stmt.kind {
            StatementKind::Add(add) => {
                for assign in &add.fields {
                    let declared = get_model_field_type(&add.data, &assign.name, self.app);
                    // Missing models/fields are type-safety findings.
                    let Some(declared) = declared else { continue };
                    if is_nullable(&declared) {
                        continue;
                    }
                    if let Some(var) = self.nullable_variable(assign, env) {
                        self.push(
                            stmt.loc,
                            format!(
                                "Variable '{}' may be null when assigned to field '{}'",
                                var, assign.name
                            ),
                            var,
                        );
                    }
                }
            }
            StatementKind::Call(call) => {
                for assign in &call.fields {
                    if let Some(var) = self.nullable_variable(assign, env) {
                        self.push(
                            stmt.loc,
                            format!(
                                "Variable '{}' may be null when passed to {} {}",
                                var, call.method, call.path
                            ),
                            var,
                        );
                    }
                }
                self.check_path(&call.method, &call.path, stmt.loc, env);
            }
            StatementKind::Load(load) => {
                self.check_path(&load.method, &load.path, stmt.loc, env);
                if let Some(target) = &load.target {
                    let ty = load.ty.clone().unwrap_or(Type::Unknown);
                    env.declare(target.clone(), make_nullable(&ty));
                }
            }
            StatementKind::If(branch) => {
                let mut then_env = clone_environment(env);
                let mut else_env = clone_environment(env);
                let mentioned: Vec<String> = env
                    .variables
                    .keys()
                    .filter(|name| condition_mentions(&branch.condition, name))
                    .cloned()
                    .collect();
                for var in &mentioned {
                    refine_types(&branch.condition, var, &mut then_env, &mut else_env);
                }
                self.check_block(&branch.then, &mut then_env);
                self.check_block(&branch.otherwise, &mut else_env);
                *env = merge_environments(&then_env, &else_env);
            }
            StatementKind::Guard(guard) => mark_as_checked(&guard.variable, env),
            StatementKind::Raw(raw) => {
                self.diagnostics.push(Diagnostic::info(
                    Category::NullSafety,
                    stmt.loc,
                    format!("Statement not analyzed for null safety: {}", raw.text),
                ));
            }
            StatementKind::Show(_) => {}
        }
    }

    fn check_path(&mut self, method: &str, path: &str, loc: Location, env: &FlowEnvironment) {
        for name in path_params(path) {
            if current_type_is_nullable(name, env) {
                self.push(
                    loc,
                    format!(
                        "Variable '{}' may be null when used as path parameter in {} {}",
                        name, method, path
                    ),
                    name,
                );
            }
        }
    }

    /// The variable named by `assign.value`, if it is currently nullable.
    fn nullable_variable<'s>(&self, assign: &'s FieldAssign, env: &FlowEnvironment) -> Option<&'s str> {
        let value = assign.value.trim();
        current_type_is_nullable(value, env).then_some(value)
    }

    fn push(&mut self, loc: Location, message: String, var: &str) {
        self.diagnostics.push(
            Diagnostic::error(Category::NullSafety, loc, message).with_suggestion(format!(
                "Check '{}' exists before using it (if {} exists: ... or ensure {})",
                var, var, var
            )),
        );
    }
}

fn current_type_is_nullable(name: &str, env: &FlowEnvironment) -> bool {
    get_variable_type(name, env).is_some_and(|ty| is_nullable(&ty))
}

// ── Tests ───────────────────────────────────────────────────────────────────
