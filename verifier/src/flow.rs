// flow.rs — Flow-sensitive variable types for null-safety analysis
//
// A FlowEnvironment holds the declared (base) type of every variable in an
// action and, on top of it, narrower types proven by conditionals. Branches
// work on clones; at a join only refinements both branches agree on survive.
//
// Refinement recognizes conditions by substring only (`exists`, `!= null`,
// `== null`, `is null`). It is not a predicate analysis.
//
// Preconditions: base types are seeded from declarations before use.
// Postconditions: `refined` entries only ever narrow a nullable base type.
// Failure modes: none.
// Side effects: none.

use std::collections::HashMap;

use tracing::trace;

use crate::types::{is_nullable, make_nullable, remove_null, Type};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowEnvironment {
    pub variables: HashMap<String, Type>,
    /// Narrower types valid for the rest of the current branch.
    pub refined: HashMap<String, Type>,
}

impl FlowEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or overwrite the base type of `name`, dropping any stale refinement.
    pub fn declare(&mut self, name: impl Into<String>, ty: Type) {
        let name = name.into();
        self.refined.remove(&name);
        self.variables.insert(name, ty);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }
}

pub fn create_flow_environment() -> FlowEnvironment {
    FlowEnvironment::new()
}

/// Deep copy, taken before diverging into a branch.
pub fn clone_environment(env: &FlowEnvironment) -> FlowEnvironment {
    env.clone()
}

/// Current type of `name`: the refined type if any, else the base type.
pub fn get_variable_type(name: &str, env: &FlowEnvironment) -> Option<Type> {
    env.refined
        .get(name)
        .or_else(|| env.variables.get(name))
        .cloned()
}

/// Narrow `variable` in the branch environments according to `condition`.
///
/// Only fires when the variable's base type is nullable.
pub fn refine_types(
    condition: &str,
    variable: &str,
    then_env: &mut FlowEnvironment,
    else_env: &mut FlowEnvironment,
) {
    let Some(base) = then_env.variables.get(variable).cloned() else {
        return;
    };
    if !is_nullable(&base) {
        return;
    }
    let non_null = remove_null(&base);

    if condition.contains("exists") || condition.contains("!= null") {
        trace!(variable, condition, "then-branch narrowed to {non_null}");
        then_env.refined.insert(variable.to_string(), non_null);
    } else if condition.contains("== null") || condition.contains("is null") {
        trace!(variable, condition, "then-branch narrowed to null");
        then_env.refined.insert(variable.to_string(), Type::Null);
        else_env.refined.insert(variable.to_string(), non_null);
    }
}

/// Join two branch environments.
///
/// A refinement is kept only when both branches hold the identical refined
/// type. A variable bound on one side only, or with differing base types,
/// may be absent or different at runtime and is widened to nullable.
pub fn merge_environments(a: &FlowEnvironment, b: &FlowEnvironment) -> FlowEnvironment {
    let mut merged = FlowEnvironment::new();

    for (name, ty_a) in &a.variables {
        let ty = match b.variables.get(name) {
            Some(ty_b) if ty_b == ty_a => ty_a.clone(),
            _ => make_nullable(ty_a),
        };
        merged.variables.insert(name.clone(), ty);
    }
    for (name, ty_b) in &b.variables {
        if !a.variables.contains_key(name) {
            merged.variables.insert(name.clone(), make_nullable(ty_b));
        }
    }

    for (name, refined_a) in &a.refined {
        if b.refined.get(name) == Some(refined_a) && merged.variables.contains_key(name) {
            merged.refined.insert(name.clone(), refined_a.clone());
        }
    }

    merged
}

/// Permanently narrow `name` to its non-null type after an explicit check.
pub fn mark_as_checked(name: &str, env: &mut FlowEnvironment) {
    if let Some(base) = env.variables.get(name).cloned() {
        let non_null = remove_null(&base);
        env.variables.insert(name.to_string(), non_null.clone());
        env.refined.insert(name.to_string(), non_null);
    }
}

/// Whether `condition` mentions `name` as a whole identifier.
pub fn condition_mentions(condition: &str, name: &str) -> bool {
    condition
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|word| word == name)
}
