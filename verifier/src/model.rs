// Application model types consumed by the verifier.
//
// Produced by the external DSL parser (usually handed over as JSON) and
// treated as read-only by every pass. Statements and field constraints are
// closed sum types so passes match on them exhaustively.
//
// Preconditions: produced by the parser from a valid or partially-valid source.
// Postconditions: each statement carries the source location of its keyword.
// Failure modes: none (data-only module).
// Side effects: none.

use serde::{Deserialize, Serialize};

use crate::diag::Location;
use crate::types::Type;

// ── Root ──

/// A complete parsed application: entities, views and actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppModel {
    #[serde(default)]
    pub datas: Vec<Data>,
    #[serde(default)]
    pub views: Vec<View>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl AppModel {
    /// Look up a data entity by name.
    pub fn data(&self, name: &str) -> Option<&Data> {
        self.datas.iter().find(|d| d.name == name)
    }
}

// ── Entities ──

/// `data <Name>: field: type, ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Data {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub loc: Location,
}

impl Data {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub constraints: Vec<FieldConstraint>,
    #[serde(default)]
    pub loc: Location,
}

impl Field {
    /// The literal of a `default` constraint, if the field declares one.
    pub fn default_value(&self) -> Option<&str> {
        self.constraints.iter().find_map(|c| match c {
            FieldConstraint::Default(value) => Some(value.as_str()),
            _ => None,
        })
    }
}

/// Constraint attached to an entity field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FieldConstraint {
    Required,
    Optional,
    Unique,
    Default(String),
    Min(f64),
    Max(f64),
}

// ── Views ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    #[serde(default)]
    pub loc: Location,
}

// ── Actions ──

/// `action <name>(params): ops`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub ops: Vec<Statement>,
    #[serde(default)]
    pub loc: Location,
}

/// A typed name: action parameter or endpoint parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

// ── Statements ──

/// An action statement with its source location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(flatten)]
    pub kind: StatementKind,
    #[serde(default)]
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StatementKind {
    Add(AddStmt),
    Call(CallStmt),
    Load(LoadStmt),
    Show(ShowStmt),
    If(IfStmt),
    Guard(GuardStmt),
    Raw(RawStmt),
}

/// `add <Data> with field=value, ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddStmt {
    pub data: String,
    #[serde(default)]
    pub fields: Vec<FieldAssign>,
}

/// `call <METHOD> "<path>" with field=value, ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallStmt {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub fields: Vec<FieldAssign>,
}

/// `load <METHOD> "<path>" [into <target>[: type]]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadStmt {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<Type>,
}

/// `show <View>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowStmt {
    pub view: String,
}

/// `if <condition>: ... else: ...`
///
/// The condition is kept as the parser rendered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub condition: String,
    #[serde(default)]
    pub then: Vec<Statement>,
    #[serde(default, rename = "else")]
    pub otherwise: Vec<Statement>,
}

/// `ensure <variable>`: an early-return null check with no branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardStmt {
    pub variable: String,
}

/// A statement the parser kept as text without classifying it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStmt {
    pub text: String,
}

/// `name=value` inside `add ... with` / `call ... with`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAssign {
    pub name: String,
    pub value: String,
}

// ── Backend ──

/// Declared HTTP surface of the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Backend {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

impl Backend {
    /// Exact `(method, path)` lookup.
    pub fn find(&self, method: &str, path: &str) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|e| e.method == method && e.path == path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub parameters: Vec<Param>,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Names of the path parameters in `path`, written `:name` or `{name}`.
pub fn path_params(path: &str) -> Vec<&str> {
    path.split('/')
        .filter_map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                Some(name)
            } else {
                segment.strip_prefix('{')?.strip_suffix('}')
            }
        })
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_deserialize_from_tagged_json() {
        let json = r#"{
            "name": "createUser",
            "params": [{"name": "userName", "type": "text"}],
            "ops": [
                {"kind": "add", "data": "User", "fields": [{"name": "name", "value": "userName"}], "loc": {"line": 4, "column": 5}},
                {"kind": "load", "method": "GET", "path": "/users/:id", "target": "user", "type": "User"},
                {"kind": "if", "condition": "user exists", "then": [{"kind": "show", "view": "Profile"}]},
                {"kind": "guard", "variable": "user"},
                {"kind": "raw", "text": "wait 5s"}
            ]
        }"#;
        let action: Action = serde_json::from_str(json).unwrap();
        assert_eq!(action.params[0].ty, Type::Text);
        assert_eq!(action.ops.len(), 5);
        assert_eq!(action.ops[0].loc, Location::new(4, 5));
        match &action.ops[1].kind {
            StatementKind::Load(load) => {
                assert_eq!(load.target.as_deref(), Some("user"));
                assert_eq!(load.ty, Some(Type::model("User")));
            }
            other => panic!("expected load, got {other:?}"),
        }
        match &action.ops[2].kind {
            StatementKind::If(branch) => {
                assert_eq!(branch.then.len(), 1);
                assert!(branch.otherwise.is_empty());
            }
            other => panic!("expected if, got {other:?}"),
        }
        assert_eq!(action.ops[2].loc, Location::default());
    }

    #[test]
    fn field_constraints() {
        let json = r#"{"name": "status", "type": "text", "constraints": [{"kind": "required"}, {"kind": "default", "value": "open"}]}"#;
        let field: Field = serde_json::from_str(json).unwrap();
        assert_eq!(field.constraints[0], FieldConstraint::Required);
        assert_eq!(field.default_value(), Some("open"));
    }

    #[test]
    fn backend_lookup_is_exact() {
        let backend = Backend {
            endpoints: vec![Endpoint {
                method: "GET".into(),
                path: "/reminders".into(),
                parameters: vec![],
            }],
        };
        assert!(backend.find("GET", "/reminders").is_some());
        assert!(backend.find("POST", "/reminders").is_none());
        assert!(backend.find("GET", "/reminders/").is_none());
    }

    #[test]
    fn path_parameters() {
        assert_eq!(path_params("/users/:id/orders/{orderId}"), vec!["id", "orderId"]);
        assert!(path_params("/users").is_empty());
        assert!(path_params("/users/:").is_empty());
    }
}
