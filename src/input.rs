//! Loading symbol records from SourceKitten JSON.
//!
//! Accepted shapes:
//!
//! - `sourcekitten doc`: `[{"/path/File.swift": {record}}, ...]`, one module
//! - `sourcekitten structure`: `{record}`, one project-wide tree
//! - several `doc` dumps concatenated: `[[...], [...]]`, one module each

use crate::error::InputError;
use crate::record::SymbolRecord;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// A named sequence of top-level records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub name: String,
    pub records: Vec<SymbolRecord>,
}

/// Parse one JSON document into modules. `origin` names the source in
/// errors and is the name of a single-module document.
pub fn parse_modules(origin: &str, text: &str) -> Result<Vec<Module>, InputError> {
    let value: Value = serde_json::from_str(text).map_err(|source| InputError::Json {
        origin: origin.to_string(),
        source,
    })?;

    let modules = match value {
        Value::Array(items) if items.iter().all(Value::is_array) && !items.is_empty() => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| Module {
                name: format!("{}#{}", origin, i),
                records: records_from(item),
            })
            .collect(),
        other => vec![Module {
            name: origin.to_string(),
            records: records_from(other),
        }],
    };

    if modules.iter().all(|m| m.records.is_empty()) {
        return Err(InputError::Empty {
            origin: origin.to_string(),
        });
    }
    Ok(modules)
}

/// Read and parse a JSON file.
pub fn load_file(path: &Path) -> Result<Vec<Module>, InputError> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let origin = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    parse_modules(&origin, &text)
}

fn records_from(value: Value) -> Vec<SymbolRecord> {
    match value {
        Value::Array(items) => items.into_iter().flat_map(records_from).collect(),
        Value::Object(map) => records_from_object(map),
        _ => Vec::new(),
    }
}

/// An object is either a record itself or a `{path: record}` wrapper.
fn records_from_object(map: Map<String, Value>) -> Vec<SymbolRecord> {
    if SymbolRecord::looks_like_record(&map) {
        return vec![SymbolRecord::from_map(map)];
    }
    map.into_iter()
        .filter_map(|(_, value)| match value {
            Value::Object(inner) => Some(SymbolRecord::from_map(inner)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC_OUTPUT: &str = r#"[
        {"/src/A.swift": {"key.diagnostic_stage": "source.diagnostic.stage.swift.parse",
                          "key.substructure": [{"key.kind": "source.lang.swift.decl.struct", "key.name": "A"}]}},
        {"/src/B.swift": {"key.substructure": [{"key.kind": "source.lang.swift.decl.class", "key.name": "B"}]}}
    ]"#;

    #[test]
    fn doc_output_is_one_module() {
        let modules = parse_modules("Kit", DOC_OUTPUT).unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].name, "Kit");
        assert_eq!(modules[0].records.len(), 2);
        assert_eq!(modules[0].records[0].children()[0].name(), Some("A"));
    }

    #[test]
    fn structure_output_is_single_tree() {
        let text = r#"{"key.offset": 0, "key.substructure": [
            {"key.kind": "source.lang.swift.decl.protocol", "key.name": "P"}
        ]}"#;
        let modules = parse_modules("structure", text).unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].records.len(), 1);
    }

    #[test]
    fn nested_arrays_are_separate_modules() {
        let text = format!("[{}, {}]", DOC_OUTPUT, DOC_OUTPUT);
        let modules = parse_modules("all", &text).unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[1].name, "all#1");
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = parse_modules("broken", "{not json").unwrap_err();
        assert!(matches!(err, InputError::Json { .. }));
        assert_eq!(err.to_string(), "invalid symbol JSON in broken");
    }

    #[test]
    fn empty_input_is_reported() {
        assert!(matches!(
            parse_modules("empty", "[]"),
            Err(InputError::Empty { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_file(Path::new("/nonexistent/symbols.json")).unwrap_err();
        assert!(matches!(err, InputError::Read { .. }));
    }
}
