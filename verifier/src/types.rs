// types.rs — Type algebra for application models
//
// Closed set of value types an entity field, action parameter or field value
// can have, plus the structural compatibility rule every pass shares.
//
// Preconditions: none.
// Postconditions: `Nullable` never wraps another `Nullable` or `Null` when
//   constructed through `Type::nullable` / `make_nullable` / `FromStr`.
// Failure modes: unparsable type expressions produce `TypeParseError`.
// Side effects: none.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::lexer::{self, Token};

/// A value type in the application model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Type {
    Text,
    Number,
    /// Spelled `yes/no` in the DSL.
    Boolean,
    DateTime,
    Id,
    /// Reference to a declared entity.
    ///
    /// Entity names that collide with a builtin keyword (see
    /// [`BUILTIN_TYPE_NAMES`]) have no textual form: `"text"` always parses as
    /// `Text`, never as `Model("text")`.
    Model(String),
    Array(Box<Type>),
    Nullable(Box<Type>),
    /// The type of the null value itself; the then-branch of an `== null`
    /// check narrows a variable to it.
    Null,
    /// Error recovery only: the type of a value that could not be inferred.
    Unknown,
}

impl Type {
    pub fn model(name: impl Into<String>) -> Self {
        Type::Model(name.into())
    }

    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    /// Wrap in `Nullable`, collapsing double wrapping.
    pub fn nullable(base: Type) -> Self {
        make_nullable(&base)
    }
}

// ── Compatibility ───────────────────────────────────────────────────────────

/// Whether a value of type `actual` may be stored in a slot of type `expected`.
///
/// `Unknown` only matches itself, so an un-inferable value never satisfies a
/// concrete slot.
pub fn is_compatible(expected: &Type, actual: &Type) -> bool {
    if expected == actual {
        return true;
    }
    match (expected, actual) {
        (Type::Nullable(_), Type::Null) => true,
        (Type::Nullable(e), Type::Nullable(a)) => is_compatible(e, a),
        (Type::Nullable(e), _) => is_compatible(e, actual),
        // Callers must narrow before assigning into a non-nullable slot.
        (_, Type::Nullable(_) | Type::Null) => false,
        (Type::Array(e), Type::Array(a)) => is_compatible(e, a),
        _ => false,
    }
}

pub fn is_nullable(t: &Type) -> bool {
    matches!(t, Type::Nullable(_) | Type::Null)
}

/// Unwrap one `Nullable` level; identity for every other type.
pub fn remove_null(t: &Type) -> Type {
    match t {
        Type::Nullable(base) => (**base).clone(),
        other => other.clone(),
    }
}

/// Idempotent: already-nullable types are returned unchanged.
pub fn make_nullable(t: &Type) -> Type {
    if is_nullable(t) {
        t.clone()
    } else {
        Type::Nullable(Box::new(t.clone()))
    }
}

/// Human-readable rendering used in diagnostic messages.
pub fn format_type(t: &Type) -> String {
    t.to_string()
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Text => write!(f, "text"),
            Type::Number => write!(f, "number"),
            Type::Boolean => write!(f, "boolean"),
            Type::DateTime => write!(f, "datetime"),
            Type::Id => write!(f, "id"),
            Type::Model(name) => write!(f, "{name}"),
            Type::Array(element) => write!(f, "[{element}]"),
            Type::Nullable(base) => write!(f, "{base} | null"),
            Type::Null => write!(f, "null"),
            Type::Unknown => write!(f, "unknown"),
        }
    }
}

// ── Parsing ─────────────────────────────────────────────────────────────────

/// A declared type expression that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid type expression {input:?}: {reason}")]
pub struct TypeParseError {
    pub input: String,
    pub reason: String,
}

/// Identifiers that name builtin types; they take priority over entity names.
pub const BUILTIN_TYPE_NAMES: [&str; 10] = [
    "text", "string", "number", "boolean", "bool", "datetime", "date", "id", "unknown", "null",
];

/// Grammar:
///   type  := base ( '?' | '|' 'null' )*
///   base  := '[' type ']' | 'null' | 'yes/no' | IDENT
impl FromStr for Type {
    type Err = TypeParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let lexed = lexer::lex(input);
        let fail = |reason: String| TypeParseError {
            input: input.to_string(),
            reason,
        };
        if let Some(err) = lexed.errors.first() {
            return Err(fail(err.message.clone()));
        }
        let tokens: Vec<Token> = lexed.tokens.into_iter().map(|(t, _)| t).collect();
        let mut parser = TypeParser { tokens, pos: 0 };
        let ty = parser.parse_type().map_err(fail)?;
        if let Some(extra) = parser.peek() {
            return Err(fail(format!("unexpected `{extra}` after type")));
        }
        Ok(ty)
    }
}

struct TypeParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl TypeParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_type(&mut self) -> Result<Type, String> {
        let mut ty = self.parse_base()?;
        loop {
            match self.peek() {
                Some(Token::Question) => {
                    self.pos += 1;
                    ty = make_nullable(&ty);
                }
                Some(Token::Pipe) => {
                    self.pos += 1;
                    match self.next() {
                        Some(Token::Null) => ty = make_nullable(&ty),
                        Some(other) => return Err(format!("expected `null` after `|`, found `{other}`")),
                        None => return Err("expected `null` after `|`".to_string()),
                    }
                }
                _ => return Ok(ty),
            }
        }
    }

    fn parse_base(&mut self) -> Result<Type, String> {
        match self.next() {
            Some(Token::LBracket) => {
                let element = self.parse_type()?;
                match self.next() {
                    Some(Token::RBracket) => Ok(Type::array(element)),
                    _ => Err("unclosed `[`".to_string()),
                }
            }
            Some(Token::Null) => Ok(Type::Null),
            Some(Token::YesNo) => Ok(Type::Boolean),
            Some(Token::Ident(name)) => Ok(match name.as_str() {
                "text" | "string" => Type::Text,
                "number" => Type::Number,
                "boolean" | "bool" => Type::Boolean,
                "datetime" | "date" => Type::DateTime,
                "id" => Type::Id,
                "unknown" => Type::Unknown,
                _ => Type::Model(name),
            }),
            Some(other) => Err(format!("unexpected `{other}`")),
            None => Err("empty type".to_string()),
        }
    }
}

impl TryFrom<String> for Type {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Type> for String {
    fn from(value: Type) -> Self {
        value.to_string()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
