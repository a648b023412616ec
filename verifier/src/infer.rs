// infer.rs — Type environments and field-value inference
//
// Builds the per-action mapping from parameter names to declared types and
// classifies the right-hand side of `field=value` assignments.
//
// Preconditions: parameter types come verbatim from the parsed declarations.
// Postconditions: inference never fails; un-inferable values are `Unknown`.
// Failure modes: none. A missing model/field is `None` from
//   `get_model_field_type`, which callers report themselves.
// Side effects: none.

use std::collections::HashMap;

use crate::lexer::{self, Token};
use crate::model::{AppModel, Param};
use crate::types::Type;

/// Variable and parameter types visible inside one action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeEnvironment {
    bindings: HashMap<String, Type>,
}

impl TypeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bind (or rebind) `name`, e.g. the target of a `load`.
    pub fn bind(&mut self, name: impl Into<String>, ty: Type) {
        self.bindings.insert(name.into(), ty);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// One entry per declared parameter; parameters are explicitly typed so
/// nothing is inferred here.
pub fn build_type_environment(params: &[Param]) -> TypeEnvironment {
    let mut env = TypeEnvironment::new();
    for param in params {
        env.bind(param.name.clone(), param.ty.clone());
    }
    env
}

/// Classify a field-value expression by its syntax.
///
/// Priority: quoted literal, boolean literal, numeric literal, `null`, then a
/// variable reference looked up in `env`. Anything unresolved is `Unknown`.
pub fn infer_field_value_type(expr: &str, env: &TypeEnvironment) -> Type {
    let expr = expr.trim();
    match lexer::single_token(expr) {
        Some(Token::StringLit(_)) => Type::Text,
        Some(Token::True | Token::False) => Type::Boolean,
        Some(Token::Number(_)) => Type::Number,
        Some(Token::Null) => Type::Null,
        _ => env.get(expr).cloned().unwrap_or(Type::Unknown),
    }
}

/// Declared type of `model_name.field_name`, or `None` when either is missing.
pub fn get_model_field_type(model_name: &str, field_name: &str, app: &AppModel) -> Option<Type> {
    app.data(model_name)?
        .field(field_name)
        .map(|field| field.ty.clone())
}
