// input.rs — Loading parser output from disk
//
// The DSL parser hands its AppModel and Backend descriptions over as JSON.
// This module reads and deserializes them; the verifier itself never touches
// the filesystem.
//
// Preconditions: files contain JSON matching the `model` schemas.
// Postconditions: returned models are fully deserialized, types parsed.
// Failure modes: unreadable file or malformed JSON (including unparsable
//   type expressions) produce `InputError`, as does an entity named after a
//   builtin type, which no type expression could refer to.
// Side effects: reads files.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::model::{AppModel, Backend};
use crate::types::BUILTIN_TYPE_NAMES;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}:{column}: {source}", .path.display())]
    Json {
        path: PathBuf,
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("{}: entity name '{name}' is reserved for a builtin type", .path.display())]
    ReservedEntityName { path: PathBuf, name: String },
}

pub fn app_model_from_str(json: &str) -> Result<AppModel, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn backend_from_str(json: &str) -> Result<Backend, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read an AppModel JSON file.
pub fn load_app_model(path: &Path) -> Result<AppModel, InputError> {
    let text = read(path)?;
    let app = app_model_from_str(&text).map_err(|e| json_error(path, e))?;
    if let Some(data) = app
        .datas
        .iter()
        .find(|d| BUILTIN_TYPE_NAMES.contains(&d.name.as_str()))
    {
        return Err(InputError::ReservedEntityName {
            path: path.to_path_buf(),
            name: data.name.clone(),
        });
    }
    debug!(
        path = %path.display(),
        datas = app.datas.len(),
        views = app.views.len(),
        actions = app.actions.len(),
        "loaded app model"
    );
    Ok(app)
}

/// Read a Backend JSON file.
pub fn load_backend(path: &Path) -> Result<Backend, InputError> {
    let text = read(path)?;
    let backend = backend_from_str(&text).map_err(|e| json_error(path, e))?;
    debug!(path = %path.display(), endpoints = backend.endpoints.len(), "loaded backend");
    Ok(backend)
}

fn read(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn json_error(path: &Path, source: serde_json::Error) -> InputError {
    InputError::Json {
        path: path.to_path_buf(),
        line: source.line(),
        column: source.column(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let err = load_app_model(Path::new("/nonexistent/avc/model.json")).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
        assert!(err.to_string().starts_with("/nonexistent/avc/model.json: "));
    }

    #[test]
    fn malformed_json_reports_position() {
        let path = std::env::temp_dir().join("avc_input_malformed.json");
        std::fs::write(&path, "{\n  \"datas\": [\n}").unwrap();
        let err = load_app_model(&path).unwrap_err();
        match &err {
            InputError::Json { line, .. } => assert_eq!(*line, 3),
            other => panic!("expected JSON error, got {other:?}"),
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn entity_named_after_builtin_type_is_rejected() {
        let path = std::env::temp_dir().join("avc_input_reserved.json");
        std::fs::write(&path, r#"{"datas": [{"name": "id", "fields": []}]}"#).unwrap();
        let err = load_app_model(&path).unwrap_err();
        assert!(
            matches!(&err, InputError::ReservedEntityName { name, .. } if name == "id"),
            "{err:?}"
        );
        assert!(err.to_string().ends_with("entity name 'id' is reserved for a builtin type"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn bad_type_expression_is_rejected() {
        let json = r#"{"datas": [{"name": "User", "fields": [{"name": "age", "type": "[number"}]}]}"#;
        let err = app_model_from_str(json).unwrap_err();
        assert!(err.to_string().contains("invalid type expression"), "{err}");
    }

    #[test]
    fn backend_round_trip() {
        let backend = backend_from_str(
            r#"{"endpoints": [{"method": "GET", "path": "/reminders", "parameters": []}]}"#,
        )
        .unwrap();
        assert_eq!(backend.endpoints[0].to_string(), "GET /reminders");
    }
}
