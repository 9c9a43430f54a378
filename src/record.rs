//! Raw symbol records as emitted by SourceKitten.
//!
//! A record is an untyped, order-preserving map of `key.*` entries. The only
//! structure we impose at ingestion is pulling `key.substructure` out into a
//! typed list of child records; everything else stays a `serde_json::Value`.

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// SourceKit dictionary keys consumed by the classifier.
pub mod keys {
    pub const KIND: &str = "key.kind";
    pub const NAME: &str = "key.name";
    pub const ACCESSIBILITY: &str = "key.accessibility";
    pub const SUBSTRUCTURE: &str = "key.substructure";
    pub const DOC_COMMENT: &str = "key.doc.comment";
    pub const PARSED_DECLARATION: &str = "key.parsed_declaration";
    pub const DOC_DECLARATION: &str = "key.doc.declaration";
    pub const TYPENAME: &str = "key.typename";
    pub const DOC_FILE: &str = "key.doc.file";
    pub const FILEPATH: &str = "key.filepath";
    pub const DOC_LINE: &str = "key.doc.line";
    pub const OFFSET: &str = "key.offset";
}

/// One declared entity and its children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolRecord {
    fields: Map<String, Value>,
    children: Vec<SymbolRecord>,
}

impl SymbolRecord {
    /// Build a record from a JSON object. Returns `None` for non-objects.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from_map(map)),
            _ => None,
        }
    }

    pub fn from_map(mut fields: Map<String, Value>) -> Self {
        let children = match fields.remove(keys::SUBSTRUCTURE) {
            Some(Value::Array(items)) => items.into_iter().filter_map(Self::from_value).collect(),
            _ => Vec::new(),
        };
        Self { fields, children }
    }

    /// Whether the map looks like a record rather than a `{path: record}` wrapper.
    pub fn looks_like_record(map: &Map<String, Value>) -> bool {
        map.contains_key(keys::KIND) || map.contains_key(keys::SUBSTRUCTURE)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    pub fn raw_kind(&self) -> Option<&str> {
        self.get_str(keys::KIND)
    }

    pub fn kind(&self) -> DeclKind {
        self.raw_kind().map(DeclKind::from_tag).unwrap_or(DeclKind::Other)
    }

    /// Declared name, with blank names treated as absent.
    pub fn name(&self) -> Option<&str> {
        self.get_str(keys::NAME).filter(|n| !n.trim().is_empty())
    }

    pub fn declaration(&self) -> Option<&str> {
        self.get_str(keys::PARSED_DECLARATION)
            .or_else(|| self.get_str(keys::DOC_DECLARATION))
            .filter(|d| !d.trim().is_empty())
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.get_str(keys::DOC_COMMENT).filter(|c| !c.trim().is_empty())
    }

    /// Unrecognized accessibility tags are treated as absent.
    pub fn access_level(&self) -> Option<AccessLevel> {
        self.get_str(keys::ACCESSIBILITY)
            .and_then(|tag| AccessLevel::from_tag(tag).ok())
    }

    pub fn type_name(&self) -> Option<&str> {
        self.get_str(keys::TYPENAME)
    }

    pub fn location(&self) -> Option<SourceLocation> {
        let file = self
            .get_str(keys::DOC_FILE)
            .or_else(|| self.get_str(keys::FILEPATH))?;
        Some(SourceLocation {
            file: file.to_string(),
            line: self.get_u64(keys::DOC_LINE),
        })
    }

    /// Byte offset of the declaration in its file. Present in both
    /// `doc` and `structure` output.
    pub fn offset(&self) -> Option<u64> {
        self.get_u64(keys::OFFSET)
    }

    pub fn children(&self) -> &[SymbolRecord] {
        &self.children
    }
}

/// Where a declaration lives in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: Option<u64>,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.file, line),
            None => f.write_str(&self.file),
        }
    }
}

/// Closed set of declaration categories we care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Struct,
    Class,
    Extension,
    Enum,
    EnumCase,
    EnumElement,
    Protocol,
    TypeAlias,
    Method,
    Property,
    Other,
}

const DECL_PREFIX: &str = "source.lang.swift.decl.";

impl DeclKind {
    /// Map a `key.kind` tag such as `source.lang.swift.decl.struct`.
    pub fn from_tag(tag: &str) -> Self {
        let Some(rest) = tag.strip_prefix(DECL_PREFIX) else {
            return DeclKind::Other;
        };
        match rest {
            "struct" => DeclKind::Struct,
            "class" => DeclKind::Class,
            "enum" => DeclKind::Enum,
            "enumcase" => DeclKind::EnumCase,
            "enumelement" => DeclKind::EnumElement,
            "protocol" => DeclKind::Protocol,
            "typealias" => DeclKind::TypeAlias,
            "var.instance" | "var.static" | "var.class" => DeclKind::Property,
            "function.constructor" | "function.destructor" | "function.subscript" => {
                DeclKind::Method
            }
            _ if rest == "extension" || rest.starts_with("extension.") => DeclKind::Extension,
            _ if rest.starts_with("function.method.") || rest.starts_with("function.operator") => {
                DeclKind::Method
            }
            _ => DeclKind::Other,
        }
    }

    /// Kinds that become members of their enclosing type.
    pub fn is_member(self) -> bool {
        matches!(self, DeclKind::Method | DeclKind::Property)
    }
}

/// Swift access levels, ordered from least to most visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum AccessLevel {
    Private,
    #[value(name = "fileprivate")]
    FilePrivate,
    Internal,
    Public,
    Open,
}

const ACCESSIBILITY_PREFIX: &str = "source.lang.swift.accessibility.";

impl AccessLevel {
    /// Parse a `key.accessibility` tag; bare level names are accepted too.
    pub fn from_tag(tag: &str) -> Result<Self, UnknownAccessLevel> {
        tag.strip_prefix(ACCESSIBILITY_PREFIX).unwrap_or(tag).parse()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::Private => "private",
            AccessLevel::FilePrivate => "fileprivate",
            AccessLevel::Internal => "internal",
            AccessLevel::Public => "public",
            AccessLevel::Open => "open",
        }
    }

    /// Level assumed when a declaration carries no accessibility key.
    pub fn implicit() -> Self {
        AccessLevel::Internal
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        AccessLevel::implicit()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown access level: {0}")]
pub struct UnknownAccessLevel(pub String);

impl FromStr for AccessLevel {
    type Err = UnknownAccessLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(AccessLevel::Private),
            "fileprivate" => Ok(AccessLevel::FilePrivate),
            "internal" => Ok(AccessLevel::Internal),
            "public" => Ok(AccessLevel::Public),
            "open" => Ok(AccessLevel::Open),
            other => Err(UnknownAccessLevel(other.to_string())),
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
