//! Turns one raw symbol record into a documentation entity.
//!
//! Pure: nothing here touches the document index. Raw records stop at this
//! boundary; everything downstream works on `Entity`.

use crate::error::ClassifyError;
use crate::model::*;
use crate::record::{DeclKind, SymbolRecord};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Leading type path of an extension name, before any `: Conformance`,
/// generic clause or `where` clause.
static RE_EXTENSION_BASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^\s:<]+)").unwrap());

/// Classify a record. `Ok(None)` means the kind is not documentable at the
/// top level; the caller should still descend into its children.
pub fn classify(record: &SymbolRecord) -> Result<Option<Entity>, ClassifyError> {
    let entity = match record.kind() {
        DeclKind::Struct => Entity::Type(TypeEntity {
            flavor: TypeFlavor::Struct,
            decl: decl(record)?,
            members: collect_members(record),
        }),
        DeclKind::Class => Entity::Type(TypeEntity {
            flavor: TypeFlavor::Class,
            decl: decl(record)?,
            members: collect_members(record),
        }),
        DeclKind::Extension => {
            let mut decl = decl(record)?;
            decl.name = extension_base_name(&decl.name).ok_or_else(|| {
                ClassifyError::MissingBaseName {
                    declared: decl.name.clone(),
                    location: decl.location.as_ref().map(ToString::to_string),
                }
            })?;
            Entity::Extension(ExtensionEntity {
                decl,
                members: collect_members(record),
            })
        }
        DeclKind::Enum => Entity::Enum(EnumEntity {
            decl: decl(record)?,
            members: collect_enum_members(record),
        }),
        DeclKind::Protocol => Entity::Protocol(ProtocolEntity {
            decl: decl(record)?,
            members: collect_members(record),
        }),
        DeclKind::TypeAlias => Entity::Alias(AliasEntity {
            decl: decl(record)?,
            aliased: record.type_name().map(str::to_string),
        }),
        DeclKind::EnumCase
        | DeclKind::EnumElement
        | DeclKind::Method
        | DeclKind::Property
        | DeclKind::Other => return Ok(None),
    };
    Ok(Some(entity))
}

/// Strip conformance, generic and `where` suffixes from an extension name.
///
/// `"Foo: Equatable"` → `"Foo"`, `"Array<Int>"` → `"Array"`.
pub fn extension_base_name(declared: &str) -> Option<String> {
    RE_EXTENSION_BASE
        .captures(declared)
        .map(|caps| caps[1].to_string())
}

fn decl(record: &SymbolRecord) -> Result<Decl, ClassifyError> {
    let location = record.location();
    let name = record.name().ok_or_else(|| ClassifyError::MissingName {
        kind: record.raw_kind().unwrap_or("unknown").to_string(),
        location: location.as_ref().map(ToString::to_string),
    })?;
    Ok(Decl {
        name: name.to_string(),
        declaration: record.declaration().map(str::to_string),
        doc_comment: record.doc_comment().map(str::to_string),
        access: record.access_level(),
        location,
    })
}

/// Properties and methods among the immediate children, in source order.
fn collect_members(record: &SymbolRecord) -> Vec<Member> {
    record
        .children()
        .iter()
        .filter(|child| child.kind().is_member())
        .filter_map(|child| match child.kind() {
            DeclKind::Property => member(child, MemberKind::Property),
            DeclKind::Method => member(child, MemberKind::Method),
            _ => None,
        })
        .collect()
}

/// Like `collect_members`, plus enumeration cases. A `case a, b` line is an
/// `enumcase` wrapping one `enumelement` per name.
fn collect_enum_members(record: &SymbolRecord) -> Vec<Member> {
    let mut members = Vec::new();
    for child in record.children() {
        match child.kind() {
            DeclKind::EnumCase => members.extend(
                child
                    .children()
                    .iter()
                    .filter(|el| el.kind() == DeclKind::EnumElement)
                    .filter_map(|el| case_member(el, child)),
            ),
            DeclKind::EnumElement => members.extend(case_member(child, child)),
            DeclKind::Property => members.extend(member(child, MemberKind::Property)),
            DeclKind::Method => members.extend(member(child, MemberKind::Method)),
            _ => {}
        }
    }
    members
}

fn member(record: &SymbolRecord, kind: MemberKind) -> Option<Member> {
    let Some(name) = record.name() else {
        debug!(kind = ?kind, "skipping unnamed member");
        return None;
    };
    Some(Member {
        kind,
        name: name.to_string(),
        declaration: record.declaration().map(str::to_string),
        doc_comment: record.doc_comment().map(str::to_string),
        access: record.access_level(),
        location: record.location(),
        offset: record.offset(),
    })
}

/// Cases have no access level of their own. The documentation comment
/// usually sits on the element, but falls back to the enclosing `case`.
fn case_member(element: &SymbolRecord, case: &SymbolRecord) -> Option<Member> {
    let mut member = member(element, MemberKind::Case)?;
    member.access = None;
    if member.doc_comment.is_none() {
        member.doc_comment = case.doc_comment().map(str::to_string);
    }
    if member.declaration.is_none() {
        member.declaration = case.declaration().map(str::to_string);
    }
    Some(member)
}
